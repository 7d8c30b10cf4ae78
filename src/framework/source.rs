//! # Source Objects
//!
//! The engine never knows the concrete type it is serializing. Everything it needs
//! from an object goes through the [`Source`] trait:
//!
//! - [`Source::read`] - a named attribute, as a JSON value
//! - [`Source::related`] - a named association, as another (boxed) source
//! - [`Source::elements`] - the collection probe: `Some` means "I am a collection"
//!
//! Blanket impls cover the usual smart pointers, so a related object can be handed
//! out borrowed (`Box::new(&self.author)`), shared (`Box::new(Rc::clone(&rc))`) or
//! owned (`Box::new(filtered_vec)`).
//!
//! `serde_json::Value` implements `Source` too, which means anything that derives
//! `Serialize` can be fed to the engine through `serde_json::to_value`.

use serde_json::Value;
use std::rc::Rc;
use std::sync::Arc;

/// Boxed error type used for anything a user-supplied reader or closure can raise.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A related object handed out by [`Source::related`].
pub type Node<'a> = Box<dyn Source + 'a>;

/// Errors raised by the stock `Source` implementations.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum SourceError {
    #[error("undefined attribute `{0}`")]
    MissingAttribute(String),
    #[error("undefined association `{0}`")]
    MissingAssociation(String),
    #[error("a collection has no attribute `{0}`")]
    NotAnObject(String),
    #[error("association `{0}` is not a collection")]
    NotACollection(String),
}

/// Read access to an object being serialized.
///
/// Only [`read`](Source::read) is required. Objects without associations keep the
/// default [`related`](Source::related), which reports the association as missing.
pub trait Source {
    /// Reads the attribute `name`.
    fn read(&self, name: &str) -> Result<Value, BoxError>;

    /// Reads the association `name`. `Ok(None)` means the relation is empty (`nil`).
    fn related(&self, name: &str) -> Result<Option<Node<'_>>, BoxError> {
        Err(SourceError::MissingAssociation(name.to_string()).into())
    }

    /// Returns the members when this object is a collection.
    fn elements(&self) -> Option<Vec<&dyn Source>> {
        None
    }
}

impl<T: Source + ?Sized> Source for &T {
    fn read(&self, name: &str) -> Result<Value, BoxError> {
        (**self).read(name)
    }
    fn related(&self, name: &str) -> Result<Option<Node<'_>>, BoxError> {
        (**self).related(name)
    }
    fn elements(&self) -> Option<Vec<&dyn Source>> {
        (**self).elements()
    }
}

impl<T: Source + ?Sized> Source for Box<T> {
    fn read(&self, name: &str) -> Result<Value, BoxError> {
        (**self).read(name)
    }
    fn related(&self, name: &str) -> Result<Option<Node<'_>>, BoxError> {
        (**self).related(name)
    }
    fn elements(&self) -> Option<Vec<&dyn Source>> {
        (**self).elements()
    }
}

impl<T: Source + ?Sized> Source for Rc<T> {
    fn read(&self, name: &str) -> Result<Value, BoxError> {
        (**self).read(name)
    }
    fn related(&self, name: &str) -> Result<Option<Node<'_>>, BoxError> {
        (**self).related(name)
    }
    fn elements(&self) -> Option<Vec<&dyn Source>> {
        (**self).elements()
    }
}

impl<T: Source + ?Sized> Source for Arc<T> {
    fn read(&self, name: &str) -> Result<Value, BoxError> {
        (**self).read(name)
    }
    fn related(&self, name: &str) -> Result<Option<Node<'_>>, BoxError> {
        (**self).related(name)
    }
    fn elements(&self) -> Option<Vec<&dyn Source>> {
        (**self).elements()
    }
}

impl<T: Source> Source for Vec<T> {
    fn read(&self, name: &str) -> Result<Value, BoxError> {
        Err(SourceError::NotAnObject(name.to_string()).into())
    }
    fn elements(&self) -> Option<Vec<&dyn Source>> {
        Some(self.iter().map(|item| item as &dyn Source).collect())
    }
}

/// JSON documents are sources: objects expose their fields, arrays are collections,
/// and any non-null field can be followed as an association.
impl Source for Value {
    fn read(&self, name: &str) -> Result<Value, BoxError> {
        match self {
            Value::Object(fields) => fields
                .get(name)
                .cloned()
                .ok_or_else(|| SourceError::MissingAttribute(name.to_string()).into()),
            Value::Array(_) => Err(SourceError::NotAnObject(name.to_string()).into()),
            _ => Err(SourceError::MissingAttribute(name.to_string()).into()),
        }
    }

    fn related(&self, name: &str) -> Result<Option<Node<'_>>, BoxError> {
        let Value::Object(fields) = self else {
            return Err(SourceError::MissingAssociation(name.to_string()).into());
        };
        match fields.get(name) {
            None => Err(SourceError::MissingAssociation(name.to_string()).into()),
            Some(Value::Null) => Ok(None),
            Some(related) => Ok(Some(Box::new(related))),
        }
    }

    fn elements(&self) -> Option<Vec<&dyn Source>> {
        match self {
            Value::Array(items) => Some(items.iter().map(|item| item as &dyn Source).collect()),
            _ => None,
        }
    }
}
