//! # Associations
//!
//! An [`Association`] is a declared relationship to other objects that are rendered
//! with their own resource definition:
//!
//! - [`Cardinality::One`] - a single related object (`null` when absent)
//! - [`Cardinality::Many`] - a collection, rendered element by element in order
//!
//! ## Expansion order
//!
//! 1. The traversal scope is consulted **first**. When it denies the association,
//!    the source object is never asked for the relation, so lazily-loaded relations
//!    that are out of scope are never loaded.
//! 2. The target resource is looked up (inline, or by name in the catalog).
//! 3. The related object is read, filtered and resolved with the child scope and
//!    the merged params.

use crate::framework::engine::Pass;
use crate::framework::error::SerializeError;
use crate::framework::keys::KeyTransform;
use crate::framework::resource::{Params, Resource};
use crate::framework::source::{BoxError, Node, Source, SourceError};
use crate::framework::within::Within;
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

/// Which resource renders the related objects.
#[derive(Clone)]
pub enum Target {
    /// Not given yet; the builder replaces it with a [`Target::Named`] guess.
    Inferred,
    /// A resource registered in the catalog under this name.
    Named(String),
    Inline(Arc<Resource>),
}

impl PartialEq for Target {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Target::Inferred, Target::Inferred) => true,
            (Target::Named(a), Target::Named(b)) => a == b,
            (Target::Inline(a), Target::Inline(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Inferred => write!(f, "Inferred"),
            Target::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Target::Inline(resource) => f.debug_tuple("Inline").field(&resource.name()).finish(),
        }
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Target::Named(name.to_string())
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Target::Named(name)
    }
}

impl From<Resource> for Target {
    fn from(resource: Resource) -> Self {
        Target::Inline(Arc::new(resource))
    }
}

impl From<Arc<Resource>> for Target {
    fn from(resource: Arc<Resource>) -> Self {
        Target::Inline(resource)
    }
}

/// Keeps or drops related objects before they are resolved.
pub type Filter = Arc<dyn Fn(&dyn Source, &Params) -> bool + Send + Sync>;

/// A declared `one`/`many` relationship.
#[derive(Clone)]
pub struct Association {
    pub(crate) kind: Cardinality,
    pub(crate) name: String,
    pub(crate) key: Option<String>,
    pub(crate) target: Target,
    pub(crate) params: Params,
    pub(crate) filter: Option<Filter>,
}

impl Association {
    pub fn one(name: impl Into<String>) -> Self {
        Self::new(Cardinality::One, name.into())
    }

    pub fn many(name: impl Into<String>) -> Self {
        Self::new(Cardinality::Many, name.into())
    }

    fn new(kind: Cardinality, name: String) -> Self {
        Self {
            kind,
            name,
            key: None,
            target: Target::Inferred,
            params: Params::new(),
            filter: None,
        }
    }

    pub fn resource(mut self, target: impl Into<Target>) -> Self {
        self.target = target.into();
        self
    }

    /// Emits the association under `key` instead of its name.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Extra params merged over the caller's params for the related objects.
    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Only related objects accepted by `f` are rendered. A rejected `one` renders as `null`.
    pub fn filter(mut self, f: impl Fn(&dyn Source, &Params) -> bool + Send + Sync + 'static) -> Self {
        self.filter = Some(Arc::new(f));
        self
    }

    pub fn kind(&self) -> Cardinality {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn output_key(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.name)
    }

    /// Expands the association on `object`. `Ok(None)` means the scope denied it.
    pub(crate) fn expand<'o>(
        &self,
        object: &'o dyn Source,
        params: &Params,
        within: &Within,
        keys: &KeyTransform,
        pass: &mut Pass<'_, '_>,
    ) -> Result<Option<Expansion<'o>>, SerializeError> {
        let Some(child_within) = within.permit(&self.name) else {
            trace!(association = %self.name, "Outside traversal scope");
            return Ok(None);
        };
        let target = pass.target(&self.target)?;
        let child_within = pass.guard_cycle(child_within, &target);

        let related = object.related(&self.name).map_err(|source| self.read_error(source))?;
        let params = self.child_params(params);

        let value = match (&related, self.kind) {
            (None, _) => Value::Null,
            (Some(node), Cardinality::One) => {
                if self.accepts(node.as_ref(), &params) {
                    pass.resolve(node.as_ref(), &target, &params, &child_within, keys)?
                } else {
                    Value::Null
                }
            }
            (Some(node), Cardinality::Many) => {
                let members = node.elements().ok_or_else(|| {
                    self.read_error(SourceError::NotACollection(self.name.clone()).into())
                })?;
                let mut items = Vec::with_capacity(members.len());
                for member in members {
                    if self.accepts(member, &params) {
                        items.push(pass.resolve(member, &target, &params, &child_within, keys)?);
                    }
                }
                Value::Array(items)
            }
        };

        Ok(Some(Expansion { value, related }))
    }

    fn accepts(&self, related: &dyn Source, params: &Params) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(related, params))
    }

    fn child_params<'p>(&self, params: &'p Params) -> Cow<'p, Params> {
        if self.params.is_empty() {
            return Cow::Borrowed(params);
        }
        let mut merged = params.clone();
        for (name, value) in &self.params {
            merged.insert(name.clone(), value.clone());
        }
        Cow::Owned(merged)
    }

    fn read_error(&self, source: BoxError) -> SerializeError {
        SerializeError::Read {
            attribute: self.name.clone(),
            source,
        }
    }
}

impl fmt::Debug for Association {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Association")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("key", &self.key)
            .field("target", &self.target)
            .field("params", &self.params)
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

/// A resolved association plus the raw related object it came from.
pub(crate) struct Expansion<'o> {
    pub value: Value,
    pub related: Option<Node<'o>>,
}
