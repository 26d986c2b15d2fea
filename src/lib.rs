//! Unlocktree - Achievement Dependency Graph Library
//!
//! Exposes the achievement store, unlock state machine and animation scene
//! for testing and for the terminal front end.

pub mod achievements;
pub mod app;
pub mod build_info;
pub mod constants;
pub mod graph;
pub mod interaction;
pub mod scene;
pub mod selection;
pub mod unlock;
pub mod view;
