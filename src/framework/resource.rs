//! # Resource Definitions
//!
//! A [`Resource`] is the declarative description of how one kind of object turns
//! into a mapping: an ordered table of [`Entry`] values keyed by output identifier.
//!
//! ```rust
//! use resource_recipe::framework::{AttributeType, Condition, Resource, TypedAttribute};
//! use serde_json::json;
//!
//! let users = Resource::builder("UserResource")
//!     .attributes(["id", "name"])
//!     .typed("age", TypedAttribute::new("age", AttributeType::Integer))
//!     .computed("display", |user, _params| {
//!         Ok(json!(format!("#{} {}", user.read("id")?, user.read("name")?)))
//!     })
//!     .attribute_if("email", Condition::when(|_user, params| params.contains_key("admin")))
//!     .many("articles", "ArticleResource")
//!     .build();
//!
//! let keys: Vec<_> = users.keys().collect();
//! assert_eq!(keys, ["id", "name", "age", "display", "email", "articles"]);
//! ```
//!
//! ## Ordering and overriding
//!
//! The table is an insertion-ordered map. Declaring a key twice replaces the entry
//! but keeps the position of the first declaration, which is how [`Resource::extend`]
//! lets a derived resource override or [`remove`](ResourceBuilder::remove) inherited
//! attributes.
//!
//! Once built, a `Resource` is frozen: there are no mutators, only the builder.

use crate::framework::association::{Association, Target};
use crate::framework::error::OnError;
use crate::framework::keys::KeyTransform;
use crate::framework::naming::{namespace_of, DefaultNaming, NameResolver};
use crate::framework::source::{BoxError, Source};
use crate::framework::typed::TypedAttribute;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Free-form parameters passed to computed attributes, conditions and filters.
pub type Params = Map<String, Value>;

/// A computed attribute: `(object, params) -> value`.
pub type Computed = Arc<dyn Fn(&dyn Source, &Params) -> Result<Value, BoxError> + Send + Sync>;

/// Replacement for `null` values: `(object, key) -> value`.
pub type NilHandler = Arc<dyn Fn(&dyn Source, &str) -> Value + Send + Sync>;

/// The thing a condition of kind [`Condition::Value`] gets to inspect.
#[derive(Clone, Copy)]
pub enum Resolved<'a> {
    /// The resolved value of a plain, computed, typed or nested attribute.
    Value(&'a Value),
    /// The raw related object of an association (not its mapping).
    Object(Option<&'a dyn Source>),
}

impl<'a> Resolved<'a> {
    pub fn value(&self) -> Option<&'a Value> {
        match self {
            Resolved::Value(value) => Some(value),
            Resolved::Object(_) => None,
        }
    }

    pub fn object(&self) -> Option<&'a dyn Source> {
        match self {
            Resolved::Object(object) => *object,
            Resolved::Value(_) => None,
        }
    }
}

/// Conditional inclusion of an attribute.
#[derive(Clone)]
pub enum Condition {
    /// Evaluated before the attribute; `false` means the attribute is never read.
    Simple(Arc<dyn Fn(&dyn Source, &Params) -> bool + Send + Sync>),
    /// Evaluated after the attribute resolved, with the resolved value.
    Value(Arc<dyn Fn(&dyn Source, Resolved<'_>, &Params) -> bool + Send + Sync>),
}

impl Condition {
    pub fn when(f: impl Fn(&dyn Source, &Params) -> bool + Send + Sync + 'static) -> Self {
        Condition::Simple(Arc::new(f))
    }

    pub fn when_value(
        f: impl Fn(&dyn Source, Resolved<'_>, &Params) -> bool + Send + Sync + 'static,
    ) -> Self {
        Condition::Value(Arc::new(f))
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Simple(_) => write!(f, "Simple(..)"),
            Condition::Value(_) => write!(f, "Value(..)"),
        }
    }
}

/// One declared attribute kind.
#[derive(Clone)]
pub enum Attribute {
    Plain(String),
    Computed(Computed),
    Typed(TypedAttribute),
    Association(Association),
    /// An inline sub-mapping resolved against the same object.
    Nested(Arc<Resource>),
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Plain(name) => f.debug_tuple("Plain").field(name).finish(),
            Attribute::Computed(_) => write!(f, "Computed(..)"),
            Attribute::Typed(typed) => f.debug_tuple("Typed").field(typed).finish(),
            Attribute::Association(assoc) => f.debug_tuple("Association").field(assoc).finish(),
            Attribute::Nested(resource) => f.debug_tuple("Nested").field(&resource.name).finish(),
        }
    }
}

/// A table entry: an attribute and its optional condition.
#[derive(Debug, Clone)]
pub struct Entry {
    pub attribute: Attribute,
    pub condition: Option<Condition>,
}

/// Explicit root keys for single objects and collections.
#[derive(Debug, Clone, PartialEq)]
pub enum RootKey {
    Explicit { one: String, many: Option<String> },
    /// Derived from the resource name by the configured name resolver.
    Inferred,
}

/// A frozen resource definition.
#[derive(Clone)]
pub struct Resource {
    name: String,
    entries: IndexMap<String, Entry>,
    on_error: Option<OnError>,
    transform_keys: Option<KeyTransform>,
    on_nil: Option<NilHandler>,
    root_key: Option<RootKey>,
    collection_key: Option<String>,
}

impl Resource {
    pub fn builder(name: impl Into<String>) -> ResourceBuilder {
        ResourceBuilder {
            resource: Resource {
                name: name.into(),
                entries: IndexMap::new(),
                on_error: None,
                transform_keys: None,
                on_nil: None,
                root_key: None,
                collection_key: None,
            },
            naming: Arc::new(DefaultNaming),
        }
    }

    /// Starts a new resource that inherits every entry and setting of `parent`.
    pub fn extend(name: impl Into<String>, parent: &Resource) -> ResourceBuilder {
        let mut builder = Resource::builder(name);
        builder.resource.entries = parent.entries.clone();
        builder.resource.on_error = parent.on_error.clone();
        builder.resource.transform_keys = parent.transform_keys.clone();
        builder.resource.on_nil = parent.on_nil.clone();
        builder.resource.root_key = parent.root_key.clone();
        builder.resource.collection_key = parent.collection_key.clone();
        builder
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn on_error(&self) -> Option<&OnError> {
        self.on_error.as_ref()
    }

    pub fn transform_keys(&self) -> Option<&KeyTransform> {
        self.transform_keys.as_ref()
    }

    pub fn on_nil(&self) -> Option<&NilHandler> {
        self.on_nil.as_ref()
    }

    pub fn root_key(&self) -> Option<&RootKey> {
        self.root_key.as_ref()
    }

    pub fn collection_key(&self) -> Option<&str> {
        self.collection_key.as_deref()
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("entries", &self.entries)
            .field("on_error", &self.on_error)
            .field("transform_keys", &self.transform_keys)
            .field("root_key", &self.root_key)
            .field("collection_key", &self.collection_key)
            .finish()
    }
}

/// Declaration API for [`Resource`].
pub struct ResourceBuilder {
    resource: Resource,
    naming: Arc<dyn NameResolver>,
}

impl ResourceBuilder {
    /// Name resolver used to infer association targets. Defaults to [`DefaultNaming`].
    pub fn naming(mut self, naming: Arc<dyn NameResolver>) -> Self {
        self.naming = naming;
        self
    }

    /// Declares `key` with an arbitrary attribute, replacing any previous declaration.
    pub fn declare(self, key: impl Into<String>, attribute: Attribute) -> Self {
        self.insert(key.into(), attribute, None)
    }

    pub fn declare_if(self, key: impl Into<String>, attribute: Attribute, condition: Condition) -> Self {
        self.insert(key.into(), attribute, Some(condition))
    }

    pub fn attribute(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.insert(name.clone(), Attribute::Plain(name), None)
    }

    pub fn attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self = self.attribute(name);
        }
        self
    }

    pub fn attribute_if(self, name: impl Into<String>, condition: Condition) -> Self {
        let name = name.into();
        self.insert(name.clone(), Attribute::Plain(name), Some(condition))
    }

    pub fn computed(
        self,
        key: impl Into<String>,
        f: impl Fn(&dyn Source, &Params) -> Result<Value, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.insert(key.into(), Attribute::Computed(Arc::new(f)), None)
    }

    pub fn typed(self, key: impl Into<String>, typed: TypedAttribute) -> Self {
        self.insert(key.into(), Attribute::Typed(typed), None)
    }

    pub fn nested(self, key: impl Into<String>, resource: Resource) -> Self {
        self.insert(key.into(), Attribute::Nested(Arc::new(resource)), None)
    }

    pub fn one(self, name: impl Into<String>, target: impl Into<Target>) -> Self {
        self.association(Association::one(name).resource(target))
    }

    pub fn many(self, name: impl Into<String>, target: impl Into<Target>) -> Self {
        self.association(Association::many(name).resource(target))
    }

    pub fn association(self, association: Association) -> Self {
        self.association_entry(association, None)
    }

    pub fn association_if(self, association: Association, condition: Condition) -> Self {
        self.association_entry(association, Some(condition))
    }

    /// Removes an inherited (or earlier) declaration.
    pub fn remove(mut self, key: &str) -> Self {
        self.resource.entries.shift_remove(key);
        self
    }

    pub fn on_error(mut self, policy: OnError) -> Self {
        self.resource.on_error = Some(policy);
        self
    }

    pub fn transform_keys(mut self, transform: KeyTransform) -> Self {
        self.resource.transform_keys = Some(transform);
        self
    }

    pub fn on_nil(mut self, f: impl Fn(&dyn Source, &str) -> Value + Send + Sync + 'static) -> Self {
        self.resource.on_nil = Some(Arc::new(f));
        self
    }

    pub fn root_key(mut self, one: impl Into<String>, many: Option<&str>) -> Self {
        self.resource.root_key = Some(RootKey::Explicit {
            one: one.into(),
            many: many.map(str::to_string),
        });
        self
    }

    pub fn infer_root_key(mut self) -> Self {
        self.resource.root_key = Some(RootKey::Inferred);
        self
    }

    /// Renders collections as an object keyed by this attribute of each element.
    pub fn collection_key(mut self, key: impl Into<String>) -> Self {
        self.resource.collection_key = Some(key.into());
        self
    }

    pub fn build(self) -> Resource {
        self.resource
    }

    fn association_entry(self, mut association: Association, condition: Option<Condition>) -> Self {
        if matches!(association.target, Target::Inferred) {
            let namespace = namespace_of(&self.resource.name);
            let name = self
                .naming
                .resource_for(namespace, &association.name, association.kind);
            association.target = Target::Named(name);
        }
        let key = association.output_key().to_string();
        self.insert(key, Attribute::Association(association), condition)
    }

    fn insert(mut self, key: String, attribute: Attribute, condition: Option<Condition>) -> Self {
        self.resource.entries.insert(key, Entry { attribute, condition });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::typed::AttributeType;

    #[test]
    fn test_declaration_order_is_kept() {
        let resource = Resource::builder("UserResource")
            .attributes(["id", "name"])
            .computed("initials", |_, _| Ok(Value::Null))
            .attribute("email")
            .build();
        let keys: Vec<_> = resource.keys().collect();
        assert_eq!(keys, ["id", "name", "initials", "email"]);
    }

    #[test]
    fn test_redeclaration_replaces_in_place() {
        let resource = Resource::builder("UserResource")
            .attributes(["id", "name", "email"])
            .typed("id", TypedAttribute::new("id", AttributeType::String))
            .build();
        let keys: Vec<_> = resource.keys().collect();
        assert_eq!(keys, ["id", "name", "email"]);
        assert!(matches!(
            resource.entry("id").map(|e| &e.attribute),
            Some(Attribute::Typed(_))
        ));
    }

    #[test]
    fn test_extend_overrides_and_removes() {
        let base = Resource::builder("UserResource")
            .attributes(["id", "name", "email"])
            .on_error(OnError::Ignore)
            .build();
        let public = Resource::extend("PublicUserResource", &base)
            .remove("email")
            .computed("name", |_, _| Ok(Value::from("hidden")))
            .attribute("avatar")
            .build();

        let keys: Vec<_> = public.keys().collect();
        assert_eq!(keys, ["id", "name", "avatar"]);
        assert!(matches!(public.on_error(), Some(OnError::Ignore)));
        // The parent is untouched.
        assert_eq!(base.len(), 3);
    }

    #[test]
    fn test_association_target_is_inferred_from_namespace() {
        let resource = Resource::builder("api::UserResource")
            .association(Association::many("articles"))
            .association(Association::one("profile").key("bio"))
            .build();

        let Some(Attribute::Association(articles)) = resource.entry("articles").map(|e| &e.attribute) else {
            panic!("articles should be an association");
        };
        assert_eq!(articles.target, Target::Named("api::ArticleResource".into()));

        let Some(Attribute::Association(profile)) = resource.entry("bio").map(|e| &e.attribute) else {
            panic!("profile should be declared under its key");
        };
        assert_eq!(profile.target, Target::Named("api::ProfileResource".into()));
    }

    #[test]
    fn test_resolved_accessors() {
        let value = Value::from(3);
        assert_eq!(Resolved::Value(&value).value(), Some(&value));
        assert!(Resolved::Value(&value).object().is_none());
        assert!(Resolved::Object(None).value().is_none());
    }
}
