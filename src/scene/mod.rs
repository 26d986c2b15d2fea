//! Rendering capability: retained primitives animated by named transitions.
//!
//! The scene knows nothing about achievements beyond the [`Track`] tags used
//! to route completion events back to whoever started a transition.

pub mod color;
pub mod easing;
pub mod stage;
pub mod types;

pub use color::Rgb;
pub use easing::Easing;
pub use stage::Scene;
pub use types::{
    Attr, AttrValue, CircleShape, Layer, LineShape, Primitive, PrimitiveId, Track,
    TransitionEvent, TransitionOutcome, TransitionSpec,
};
