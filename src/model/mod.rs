//! Demo domain: a small blog (users, articles, comments) and a cyclic library
//! (authors and books), with the resources that serialize them.

pub mod blog;
pub mod library;
pub mod resources;

pub use blog::*;
pub use library::*;
