//! # Mock Sources
//!
//! Utilities for testing resources without real domain objects.
//!
//! [`MockSource`] answers reads from expectations set up front and records every
//! attribute and association it is asked for. That makes it easy to assert the
//! things the engine promises *not* to do, such as reading an attribute whose
//! condition was false or loading an association that is out of scope.
//!
//! ```rust
//! use resource_recipe::framework::mock::MockSource;
//! use resource_recipe::framework::{Config, Engine, Params, Resource, Within};
//! use serde_json::json;
//!
//! let mut user = MockSource::new("User");
//! user.expect_read("name").return_ok(json!("Alice"));
//! user.expect_read("email").return_err("database offline");
//!
//! let resource = Resource::builder("UserResource").attribute("name").build();
//! let config = Config::default();
//! let value = Engine::new(&config)
//!     .resolve(&user, &resource, &Params::new(), &Within::default())
//!     .unwrap();
//!
//! assert_eq!(value, json!({ "name": "Alice" }));
//! assert_eq!(user.reads(), ["name"]);
//! ```

use crate::framework::source::{BoxError, Node, Source, SourceError};
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Mutex;

enum Relation {
    One(Option<Box<MockSource>>),
    Many(Vec<MockSource>),
}

/// A [`Source`] driven by expectations, recording every access.
pub struct MockSource {
    name: String,
    attributes: IndexMap<String, Result<Value, String>>,
    relations: IndexMap<String, Relation>,
    reads: Mutex<Vec<String>>,
    relations_read: Mutex<Vec<String>>,
}

impl MockSource {
    /// Creates a mock with no expectations. `name` only shows up in debug output.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            relations: IndexMap::new(),
            reads: Mutex::new(Vec::new()),
            relations_read: Mutex::new(Vec::new()),
        }
    }

    /// Expects the attribute `name` to be read.
    pub fn expect_read(&mut self, name: impl Into<String>) -> ReadExpectationBuilder<'_> {
        ReadExpectationBuilder {
            name: name.into(),
            attributes: &mut self.attributes,
        }
    }

    /// Sets up a `one` relation. `None` models an empty relation.
    pub fn expect_one(&mut self, name: impl Into<String>, related: Option<MockSource>) {
        self.relations
            .insert(name.into(), Relation::One(related.map(Box::new)));
    }

    pub fn expect_many(&mut self, name: impl Into<String>, related: Vec<MockSource>) {
        self.relations.insert(name.into(), Relation::Many(related));
    }

    /// Attribute names read so far, in order.
    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }

    /// Association names read so far, in order.
    pub fn relations_read(&self) -> Vec<String> {
        self.relations_read.lock().unwrap().clone()
    }

    /// Panics when an expected attribute was never read.
    pub fn verify(&self) {
        let reads = self.reads.lock().unwrap();
        let missing: Vec<_> = self
            .attributes
            .keys()
            .filter(|name| !reads.iter().any(|read| read == *name))
            .collect();
        if !missing.is_empty() {
            panic!("Not all expectations were met on {}. Never read: {:?}", self.name, missing);
        }
    }
}

impl Source for MockSource {
    fn read(&self, name: &str) -> Result<Value, BoxError> {
        self.reads.lock().unwrap().push(name.to_string());
        match self.attributes.get(name) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(message)) => Err(message.clone().into()),
            None => Err(SourceError::MissingAttribute(name.to_string()).into()),
        }
    }

    fn related(&self, name: &str) -> Result<Option<Node<'_>>, BoxError> {
        self.relations_read.lock().unwrap().push(name.to_string());
        match self.relations.get(name) {
            Some(Relation::One(Some(related))) => Ok(Some(Box::new(&**related))),
            Some(Relation::One(None)) => Ok(None),
            Some(Relation::Many(related)) => Ok(Some(Box::new(related))),
            None => Err(SourceError::MissingAssociation(name.to_string()).into()),
        }
    }
}

impl fmt::Debug for MockSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockSource")
            .field("name", &self.name)
            .field("attributes", &self.attributes.keys().collect::<Vec<_>>())
            .field("relations", &self.relations.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for read expectations.
pub struct ReadExpectationBuilder<'m> {
    name: String,
    attributes: &'m mut IndexMap<String, Result<Value, String>>,
}

impl ReadExpectationBuilder<'_> {
    /// The read succeeds with `value`.
    pub fn return_ok(self, value: Value) {
        self.attributes.insert(self.name, Ok(value));
    }

    /// The read fails with `message`.
    pub fn return_err(self, message: impl Into<String>) {
        self.attributes.insert(self.name, Err(message.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mock_source_with_expectations() {
        let mut mock = MockSource::new("User");
        mock.expect_read("name").return_ok(json!("Alice"));
        mock.expect_read("email").return_err("offline");

        assert_eq!(mock.read("name").unwrap(), json!("Alice"));
        assert_eq!(mock.read("email").unwrap_err().to_string(), "offline");
        assert!(mock.read("age").is_err());

        assert_eq!(mock.reads(), ["name", "email", "age"]);
        mock.verify();
    }

    #[test]
    #[should_panic(expected = "Never read")]
    fn test_verify_reports_unread_expectations() {
        let mut mock = MockSource::new("User");
        mock.expect_read("name").return_ok(json!("Alice"));
        mock.verify();
    }

    #[test]
    fn test_mock_relations() {
        let mut author = MockSource::new("Author");
        author.expect_read("name").return_ok(json!("Bob"));

        let mut article = MockSource::new("Article");
        article.expect_one("author", Some(author));
        article.expect_one("editor", None);
        article.expect_many("comments", vec![MockSource::new("Comment"), MockSource::new("Comment")]);

        let related = article.related("author").unwrap().unwrap();
        assert_eq!(related.read("name").unwrap(), json!("Bob"));
        assert!(article.related("editor").unwrap().is_none());

        let comments = article.related("comments").unwrap().unwrap();
        assert_eq!(comments.elements().map(|c| c.len()), Some(2));
        assert_eq!(article.relations_read(), ["author", "editor", "comments"]);
    }
}
