#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Resource Recipe
//!
//! > **A Recipe for declarative JSON resources in Rust.**
//!
//! This crate turns arbitrary objects into ordered JSON documents from a declared
//! *resource*: a table of attributes, computed and typed values, nested resources and
//! `one`/`many` associations, each with an optional condition.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Declare once, resolve anywhere
//!
//! A [`Resource`](framework::Resource) is built with a builder and then frozen. It knows
//! nothing about the concrete type it serializes: every read goes through the
//! [`Source`](framework::Source) trait, implemented for your domain types, smart pointers,
//! `Vec`s and `serde_json::Value`.
//!
//! - **Ordered output**: keys appear in declaration order, always.
//! - **No hidden reads**: a failed condition or an out-of-scope association never touches
//!   the object.
//! - **Per-key errors**: a failing attribute is handed to an error policy (`raise`,
//!   `nullify`, `ignore` or a custom handler) without affecting its siblings.
//!
//! ## 🚀 Core Concepts
//!
//! ### Traversal scope
//! [`Within`](framework::Within) bounds how deep associations expand. The default scope is
//! unrestricted, but a resource is never re-entered on the same path, so cyclic object
//! graphs (author → books → author) still terminate.
//!
//! ### Configuration without globals
//! Error policy, key transform and naming live in a [`Config`](framework::Config) value
//! passed to every call. File-based configuration goes through
//! [`Settings`](lifecycle::Settings).
//!
//! ### Mocking
//! [`MockSource`](framework::mock::MockSource) records every read, which makes "this
//! attribute was never read" a one-line assertion. See the [`framework::mock`] module.
//!
//! ### Observability
//! The engine logs with `tracing`: warnings for swallowed errors, traces for every skipped
//! key. See the [`lifecycle::tracing`] module for details.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! - **Role**: Resource definitions, the `Source` trait and the resolution algorithm.
//! - **Key items**: [`Resource`](framework::Resource), [`Engine`](framework::Engine),
//!   [`Within`](framework::Within), [`OnError`](framework::OnError).
//!
//! ### 2. The Front Door ([`lifecycle`])
//! - **Role**: Looks resources up by name, adds root keys and `meta`, encodes the result.
//! - **Key items**: [`Serializer`](lifecycle::Serializer), [`Options`](lifecycle::Options).
//!
//! ### 3. The Demo Model ([`model`])
//! - **Role**: A blog and a cyclic library with their resources.
//! - **Key items**: [`User`](model::User), [`Author`](model::Author),
//!   [`catalog`](model::resources::catalog).
//!
//! ## 🚀 Quick Start
//!
//! ```rust
//! use resource_recipe::framework::{Catalog, Config, Resource};
//! use resource_recipe::lifecycle::{Options, Serializer};
//! use serde_json::json;
//!
//! let catalog = Catalog::new()
//!     .with(Resource::builder("UserResource").attribute("name").many("articles", "ArticleResource").build())
//!     .with(Resource::builder("ArticleResource").attribute("title").build());
//! let serializer = Serializer::new(Config::default(), catalog);
//!
//! let user = json!({ "name": "Alice", "articles": [{ "title": "Hello" }] });
//! let text = serializer.serialize(&user, "UserResource", &Options::default()).unwrap();
//! assert_eq!(text, r#"{"name":"Alice","articles":[{"title":"Hello"}]}"#);
//! ```
//!
//! ### Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod framework;
pub mod lifecycle;
pub mod model;
