//! Declarative resource serialization engine.
//!
//! This module provides the building blocks for turning arbitrary objects into
//! ordered JSON mappings from a declared [`Resource`] definition.
//!
//! # Main Components
//!
//! - [`Source`] - Trait through which the engine reads objects
//! - [`Resource`] - The declared attribute table, built with [`Resource::builder`]
//! - [`Association`] - Nested `one`/`many` relationships
//! - [`Within`] - Traversal scope that bounds association expansion
//! - [`Engine`] - Resolves an object (or collection) against a resource
//! - [`OnError`] / [`SerializeError`] - Error policy and error types
//!
//! # Testing
//!
//! See the [`mock`] module for a recording [`Source`] test double.

pub mod association;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod keys;
pub mod mock;
pub mod naming;
pub mod resource;
pub mod source;
pub mod typed;
pub mod within;

// Re-export core types for convenience
pub use association::{Association, Cardinality, Target};
pub use catalog::Catalog;
pub use config::{Config, Encoder};
pub use engine::{Engine, Mapping};
pub use error::{ErrorContext, OnError, SerializeError};
pub use keys::KeyTransform;
pub use naming::{DefaultNaming, NameResolver};
pub use resource::{Attribute, Condition, Entry, Params, Resolved, Resource, ResourceBuilder, RootKey};
pub use source::{BoxError, Node, Source, SourceError};
pub use typed::{AttributeType, TypedAttribute};
pub use within::Within;
