//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging with the `tracing`
//! crate. The library itself only emits events; installing a subscriber is left to
//! the binary (see `main.rs`) or to whoever embeds the crate.
//!
//! ## What Gets Traced
//!
//! | Level   | Events                                                                |
//! |---------|-----------------------------------------------------------------------|
//! | `info`  | One line per [`serialize`](crate::lifecycle::Serializer::serialize) call |
//! | `warn`  | Attributes nullified or ignored by the error policy, dropped `meta`   |
//! | `debug` | Resource registration, collections, cycle cut-offs, error handlers    |
//! | `trace` | Every object resolved, every condition or scope that skipped a key    |
//!
//! ## Usage Examples
//!
//! ```bash
//! # One line per document
//! RUST_LOG=info cargo run
//!
//! # See why a key is missing from the output
//! RUST_LOG=trace cargo run
//!
//! # Only the engine
//! RUST_LOG=resource_recipe::framework=debug cargo run
//! ```
//!
//! With `RUST_LOG=debug` a serialization of a user with two articles reads like:
//!
//! ```text
//! DEBUG serialize: Resolving resource="UserResource" is_collection=false within=Unrestricted
//! DEBUG serialize: Resolving collection resource="ArticleResource" count=2
//! DEBUG serialize: Cycle detected, stopping expansion resource="UserResource" depth=2
//!  INFO serialize: Serialized bytes=412 resource="UserResource"
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Resource names are carried as fields
        .compact() // Compact format shows spans inline (e.g., "serialize:")
        .init();
}
