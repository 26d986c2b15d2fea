//! Achievement store, data feed and saved progress.
//!
//! Progress is stored as the list of unlocked ids plus the level total in
//! `progress.json` under the platform data directory.

pub mod data;
pub mod persistence;
pub mod store;
pub mod types;

pub use data::{built_in_achievements, load_feed, parse_feed, DataError};
pub use persistence::{JsonFileStore, KeyValueStore, MemoryStore, Progress, ProgressAdapter};
pub use store::{AchievementStore, UnlockError};
pub use types::{Achievement, AchievementDef, AchievementId, Position};
