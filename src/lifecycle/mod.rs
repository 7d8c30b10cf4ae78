//! Orchestration layer: the [`Serializer`] front door, file-friendly [`Settings`]
//! and the tracing setup used by the demo binary.

pub mod serializer;
pub mod settings;
pub mod tracing;

pub use serializer::{Options, Serializer};
pub use settings::Settings;
