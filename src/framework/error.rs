//! # Errors and Error Policy
//!
//! Resolution errors fall in two groups:
//!
//! - **Attribute errors** ([`SerializeError::Read`], [`SerializeError::TypeMismatch`],
//!   [`SerializeError::Attribute`]) belong to a single key. They are caught per
//!   attribute and handed to the active [`OnError`] policy, so one bad key never
//!   stops its siblings from resolving.
//! - **Structural errors** (unknown resources, invalid scopes, invalid settings)
//!   point at a declaration bug and always propagate, whatever the policy says.

use crate::framework::resource::Attribute;
use crate::framework::source::{BoxError, Source};
use crate::framework::typed::AttributeType;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Errors that can occur while serializing a resource.
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    /// Reading a plain attribute or an association failed.
    #[error("failed to read `{attribute}`: {source}")]
    Read {
        attribute: String,
        #[source]
        source: BoxError,
    },
    #[error("type mismatch for `{attribute}`: expected {expected}, {detail}")]
    TypeMismatch {
        attribute: String,
        expected: AttributeType,
        detail: String,
    },
    /// An attribute error re-raised by the `raise` policy, tagged with where it happened.
    #[error("{resource}.{attribute}: {source}")]
    Attribute {
        resource: String,
        attribute: String,
        #[source]
        source: Box<SerializeError>,
    },
    #[error("invalid traversal scope: {0}")]
    InvalidTraversalScope(String),
    #[error("invalid error policy: {0}")]
    InvalidErrorPolicy(String),
    #[error("invalid key transform: {0}")]
    InvalidKeyTransform(String),
    #[error("unknown resource: {0}")]
    UnknownResource(String),
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
    #[error("encoding failed: {0}")]
    Encode(BoxError),
}

impl SerializeError {
    /// Structural errors bypass the error policy.
    pub fn is_fatal(&self) -> bool {
        match self {
            SerializeError::Read { .. }
            | SerializeError::TypeMismatch { .. }
            | SerializeError::Attribute { .. } => false,
            SerializeError::InvalidTraversalScope(_)
            | SerializeError::InvalidErrorPolicy(_)
            | SerializeError::InvalidKeyTransform(_)
            | SerializeError::UnknownResource(_)
            | SerializeError::Settings(_)
            | SerializeError::Encode(_) => true,
        }
    }
}

/// Everything a custom error handler gets to see about a failed attribute.
pub struct ErrorContext<'a> {
    pub error: &'a SerializeError,
    pub object: &'a dyn Source,
    /// The declared (untransformed) key.
    pub key: &'a str,
    pub attribute: &'a Attribute,
    pub resource: &'a str,
}

/// Custom handler: returns the `(key, value)` pair to emit, or `None` to omit the key.
pub type ErrorHandler =
    Arc<dyn Fn(&ErrorContext<'_>) -> Option<(String, Value)> + Send + Sync>;

/// What happens when resolving a single attribute fails.
#[derive(Clone, Default)]
pub enum OnError {
    /// Abort the whole resolution.
    #[default]
    Raise,
    /// Emit the key with `null`.
    Nullify,
    /// Leave the key out.
    Ignore,
    Handler(ErrorHandler),
}

impl OnError {
    pub fn handler(
        f: impl Fn(&ErrorContext<'_>) -> Option<(String, Value)> + Send + Sync + 'static,
    ) -> Self {
        OnError::Handler(Arc::new(f))
    }
}

impl fmt::Debug for OnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnError::Raise => write!(f, "Raise"),
            OnError::Nullify => write!(f, "Nullify"),
            OnError::Ignore => write!(f, "Ignore"),
            OnError::Handler(_) => write!(f, "Handler(..)"),
        }
    }
}

impl FromStr for OnError {
    type Err = SerializeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raise" => Ok(OnError::Raise),
            "nullify" => Ok(OnError::Nullify),
            "ignore" => Ok(OnError::Ignore),
            other => Err(SerializeError::InvalidErrorPolicy(other.to_string())),
        }
    }
}
