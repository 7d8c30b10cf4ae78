//! # Resolution Engine
//!
//! The [`Engine`] turns a source object and a [`Resource`] into a JSON value:
//!
//! - a single object becomes an object whose keys follow declaration order,
//! - a collection (anything whose [`Source::elements`] is `Some`) becomes an array
//!   with one object per element, in the original order.
//!
//! ## Per-attribute resolution
//!
//! For each entry, in declaration order:
//!
//! 1. the key goes through the active [`KeyTransform`],
//! 2. a [`Condition::Simple`] is evaluated before anything is read,
//! 3. the attribute is resolved (plain read, computed call, typed coercion, nested
//!    resource or association expansion),
//! 4. a [`Condition::Value`] is evaluated with the resolved value (the raw related
//!    object for associations),
//! 5. a `null` value is replaced by the resource's `on_nil` handler, if any.
//!
//! ## Error isolation
//!
//! Errors are caught per entry and handed to the resource's [`OnError`] policy (or
//! the config default). A failing entry never prevents its siblings from resolving;
//! only the `raise` policy aborts, and structural errors always propagate.
//!
//! ## Cycles
//!
//! Explicit scopes terminate on their own. The default `Unrestricted` scope is
//! narrowed to `Stopped` when an association re-enters a resource that is already
//! being resolved further up the current path, so cyclic object graphs terminate
//! under the default scope too. The check is on definitions, never on objects.

use crate::framework::association::Target;
use crate::framework::catalog::Catalog;
use crate::framework::config::Config;
use crate::framework::error::{ErrorContext, OnError, SerializeError};
use crate::framework::keys::KeyTransform;
use crate::framework::resource::{Attribute, Condition, Entry, Params, Resolved, Resource};
use crate::framework::source::Source;
use crate::framework::within::Within;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// The ordered mapping produced for one object.
pub type Mapping = Map<String, Value>;

pub struct Engine<'c> {
    config: &'c Config,
    catalog: Option<&'c Catalog>,
}

impl<'c> Engine<'c> {
    pub fn new(config: &'c Config) -> Self {
        Self { config, catalog: None }
    }

    /// Resolves named association targets against `catalog`.
    pub fn with_catalog(mut self, catalog: &'c Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    /// Resolves `object` (a single object or a collection) with `resource`.
    pub fn resolve(
        &self,
        object: &dyn Source,
        resource: &Resource,
        params: &Params,
        within: &Within,
    ) -> Result<Value, SerializeError> {
        Pass::new(self).resolve(object, resource, params, within, &self.config.key_transform)
    }

    /// Resolves the single entry declared under `key`.
    ///
    /// Returns `Ok(None)` when the entry is omitted (condition, scope) or not declared.
    /// Errors are returned as-is; the error policy is not applied here.
    pub fn resolve_attribute(
        &self,
        object: &dyn Source,
        resource: &Resource,
        key: &str,
        params: &Params,
        within: &Within,
    ) -> Result<Option<(String, Value)>, SerializeError> {
        let Some(entry) = resource.entry(key) else {
            return Ok(None);
        };
        let keys = resource.transform_keys().unwrap_or(&self.config.key_transform);
        let mut pass = Pass::new(self);
        pass.trail.push(resource as *const Resource);
        pass.resolve_entry(object, resource, key, entry, params, within, keys)
    }

    fn recover(
        &self,
        error: SerializeError,
        object: &dyn Source,
        resource: &Resource,
        key: &str,
        entry: &Entry,
        keys: &KeyTransform,
    ) -> Result<Option<(String, Value)>, SerializeError> {
        let resource_name = resource.name();
        match resource.on_error().unwrap_or(&self.config.on_error) {
            OnError::Raise => Err(SerializeError::Attribute {
                resource: resource_name.to_string(),
                attribute: key.to_string(),
                source: Box::new(error),
            }),
            OnError::Nullify => {
                warn!(resource = resource_name, key, error = %error, "Attribute failed, emitting null");
                Ok(Some((keys.apply(key), Value::Null)))
            }
            OnError::Ignore => {
                warn!(resource = resource_name, key, error = %error, "Attribute failed, omitting key");
                Ok(None)
            }
            OnError::Handler(handler) => {
                let context = ErrorContext {
                    error: &error,
                    object,
                    key,
                    attribute: &entry.attribute,
                    resource: resource_name,
                };
                let outcome = handler(&context);
                debug!(resource = resource_name, key, replaced = outcome.is_some(), "Error handler ran");
                Ok(outcome)
            }
        }
    }
}

/// State of one top-level resolution.
pub(crate) struct Pass<'e, 'c> {
    engine: &'e Engine<'c>,
    /// Resources being resolved on the current path, outermost first.
    /// Addresses are only compared, never dereferenced.
    trail: Vec<*const Resource>,
}

impl<'e, 'c> Pass<'e, 'c> {
    fn new(engine: &'e Engine<'c>) -> Self {
        Self {
            engine,
            trail: Vec::new(),
        }
    }

    pub(crate) fn resolve(
        &mut self,
        object: &dyn Source,
        resource: &Resource,
        params: &Params,
        within: &Within,
        keys: &KeyTransform,
    ) -> Result<Value, SerializeError> {
        let Some(members) = object.elements() else {
            return self
                .resolve_object(object, resource, params, within, keys)
                .map(Value::Object);
        };
        debug!(resource = resource.name(), count = members.len(), "Resolving collection");
        let mut items = Vec::with_capacity(members.len());
        for member in members {
            items.push(Value::Object(
                self.resolve_object(member, resource, params, within, keys)?,
            ));
        }
        Ok(Value::Array(items))
    }

    pub(crate) fn target(&self, target: &Target) -> Result<Arc<Resource>, SerializeError> {
        match target {
            Target::Inline(resource) => Ok(Arc::clone(resource)),
            Target::Named(name) => match self.engine.catalog {
                Some(catalog) => catalog.lookup(name),
                None => Err(SerializeError::UnknownResource(name.clone())),
            },
            Target::Inferred => Err(SerializeError::UnknownResource(
                "association declared without a resource".to_string(),
            )),
        }
    }

    /// Stops an unrestricted scope from re-entering a resource already on the path.
    pub(crate) fn guard_cycle(&self, child: Within, target: &Resource) -> Within {
        if child == Within::Unrestricted && self.trail.contains(&(target as *const Resource)) {
            debug!(resource = target.name(), depth = self.trail.len(), "Cycle detected, stopping expansion");
            return Within::Stopped;
        }
        child
    }

    fn resolve_object(
        &mut self,
        object: &dyn Source,
        resource: &Resource,
        params: &Params,
        within: &Within,
        inherited: &KeyTransform,
    ) -> Result<Mapping, SerializeError> {
        let keys = resource.transform_keys().unwrap_or(inherited);
        trace!(resource = resource.name(), entries = resource.len(), "Resolving object");

        self.trail.push(resource as *const Resource);
        let result = self.resolve_entries(object, resource, params, within, keys);
        self.trail.pop();
        result
    }

    fn resolve_entries(
        &mut self,
        object: &dyn Source,
        resource: &Resource,
        params: &Params,
        within: &Within,
        keys: &KeyTransform,
    ) -> Result<Mapping, SerializeError> {
        let mut mapping = Mapping::new();
        for (key, entry) in resource.entries() {
            let outcome = match self.resolve_entry(object, resource, key, entry, params, within, keys) {
                Ok(outcome) => outcome,
                Err(error) if error.is_fatal() => return Err(error),
                Err(error) => self.engine.recover(error, object, resource, key, entry, keys)?,
            };
            if let Some((key, value)) = outcome {
                mapping.insert(key, value);
            }
        }
        Ok(mapping)
    }

    #[allow(clippy::too_many_arguments)]
    fn resolve_entry(
        &mut self,
        object: &dyn Source,
        resource: &Resource,
        key: &str,
        entry: &Entry,
        params: &Params,
        within: &Within,
        keys: &KeyTransform,
    ) -> Result<Option<(String, Value)>, SerializeError> {
        let out_key = keys.apply(key);

        if let Some(Condition::Simple(condition)) = &entry.condition {
            if !condition(object, params) {
                trace!(resource = resource.name(), key, "Condition rejected, attribute skipped");
                return Ok(None);
            }
        }

        let (value, related) = match &entry.attribute {
            Attribute::Plain(name) => {
                let value = object.read(name).map_err(|source| SerializeError::Read {
                    attribute: name.clone(),
                    source,
                })?;
                (value, None)
            }
            Attribute::Computed(compute) => {
                let value = compute(object, params).map_err(|source| SerializeError::Read {
                    attribute: key.to_string(),
                    source,
                })?;
                (value, None)
            }
            Attribute::Typed(typed) => (typed.value(object)?, None),
            Attribute::Nested(nested) => {
                let mapping = self.resolve_object(object, nested, params, within, keys)?;
                (Value::Object(mapping), None)
            }
            Attribute::Association(association) => {
                match association.expand(object, params, within, keys, self)? {
                    Some(expansion) => (expansion.value, Some(expansion.related)),
                    None => return Ok(None),
                }
            }
        };

        if let Some(Condition::Value(condition)) = &entry.condition {
            let resolved = match &related {
                Some(related) => Resolved::Object(related.as_deref()),
                None => Resolved::Value(&value),
            };
            if !condition(object, resolved, params) {
                trace!(resource = resource.name(), key, "Condition rejected resolved value");
                return Ok(None);
            }
        }

        let value = match (value, resource.on_nil()) {
            (Value::Null, Some(on_nil)) => on_nil(object, key),
            (value, _) => value,
        };
        Ok(Some((out_key, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::association::Association;
    use crate::framework::mock::MockSource;
    use crate::framework::typed::{AttributeType, TypedAttribute};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn keys_of(value: &Value) -> Vec<&str> {
        value
            .as_object()
            .map(|map| map.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_key_order_skips_omitted_entries() {
        let config = Config::default();
        let resource = Resource::builder("Abc")
            .attribute("a")
            .attribute_if("b", Condition::when(|_, _| false))
            .attribute("c")
            .build();

        let value = Engine::new(&config)
            .resolve(&json!({ "a": 1, "b": 2, "c": 3 }), &resource, &Params::new(), &Within::default())
            .unwrap();
        assert_eq!(keys_of(&value), ["a", "c"]);
        assert_eq!(value, json!({ "a": 1, "c": 3 }));
    }

    #[test]
    fn test_simple_condition_prevents_read() {
        let config = Config::default();
        let mut source = MockSource::new("User");
        source.expect_read("name").return_ok(json!("Alice"));
        source.expect_read("secret").return_ok(json!("hunter2"));

        let resource = Resource::builder("UserResource")
            .attribute("name")
            .attribute_if("secret", Condition::when(|_, params| params.contains_key("admin")))
            .build();

        let value = Engine::new(&config)
            .resolve(&source, &resource, &Params::new(), &Within::default())
            .unwrap();
        assert_eq!(value, json!({ "name": "Alice" }));
        assert_eq!(source.reads(), ["name"]);
    }

    #[test]
    fn test_value_condition_sees_resolved_value() {
        let config = Config::default();
        let resource = Resource::builder("UserResource")
            .typed("age", TypedAttribute::new("age", AttributeType::Integer))
            .declare_if(
                "nickname",
                Attribute::Plain("nickname".into()),
                Condition::when_value(|_, resolved, _| {
                    resolved.value().and_then(Value::as_str).is_some_and(|s| !s.is_empty())
                }),
            )
            .build();
        let engine = Engine::new(&config);

        let kept = engine
            .resolve(&json!({ "age": "30", "nickname": "Al" }), &resource, &Params::new(), &Within::default())
            .unwrap();
        assert_eq!(kept, json!({ "age": 30, "nickname": "Al" }));

        let dropped = engine
            .resolve(&json!({ "age": 30, "nickname": "" }), &resource, &Params::new(), &Within::default())
            .unwrap();
        assert_eq!(dropped, json!({ "age": 30 }));
    }

    #[test]
    fn test_collection_maps_each_element_in_order() {
        let config = Config::default();
        let resource = Resource::builder("ItemResource").attribute("id").build();
        let engine = Engine::new(&config);

        let value = engine
            .resolve(&json!([{ "id": 3 }, { "id": 1 }, { "id": 2 }]), &resource, &Params::new(), &Within::default())
            .unwrap();
        assert_eq!(value, json!([{ "id": 3 }, { "id": 1 }, { "id": 2 }]));

        let empty = engine
            .resolve(&json!([]), &resource, &Params::new(), &Within::default())
            .unwrap();
        assert_eq!(empty, json!([]));
    }

    #[test]
    fn test_denied_association_is_never_read() {
        let config = Config::default();
        let mut source = MockSource::new("User");
        source.expect_read("name").return_ok(json!("Alice"));
        source.expect_many("articles", vec![MockSource::new("Article")]);

        let articles = Resource::builder("ArticleResource").build();
        let resource = Resource::builder("UserResource")
            .attribute("name")
            .many("articles", articles)
            .build();

        let value = Engine::new(&config)
            .resolve(&source, &resource, &Params::new(), &Within::Stopped)
            .unwrap();
        assert_eq!(value, json!({ "name": "Alice" }));
        assert!(source.relations_read().is_empty());
    }

    #[test]
    fn test_association_value_condition_gets_raw_object() {
        let config = Config::default();
        let authors = Resource::builder("AuthorResource").attribute("name").build();
        let resource = Resource::builder("ArticleResource")
            .attribute("title")
            .association_if(
                Association::one("author").resource(authors),
                Condition::when_value(|_, resolved, _| {
                    // The raw author, not its rendered mapping.
                    resolved
                        .object()
                        .and_then(|author| author.read("active").ok())
                        == Some(json!(true))
                }),
            )
            .build();
        let engine = Engine::new(&config);

        let active = json!({ "title": "T", "author": { "name": "Bob", "active": true } });
        let value = engine.resolve(&active, &resource, &Params::new(), &Within::default()).unwrap();
        assert_eq!(value, json!({ "title": "T", "author": { "name": "Bob" } }));

        let inactive = json!({ "title": "T", "author": { "name": "Bob", "active": false } });
        let value = engine.resolve(&inactive, &resource, &Params::new(), &Within::default()).unwrap();
        assert_eq!(value, json!({ "title": "T" }));
    }

    #[test]
    fn test_nested_resource_and_key_transform() {
        let config = Config::default().key_transform(KeyTransform::LowerCamel);
        let address = Resource::builder("AddressResource").attributes(["street_name", "zip_code"]).build();
        let resource = Resource::builder("UserResource")
            .attribute("first_name")
            .nested("home_address", address)
            .build();

        let value = Engine::new(&config)
            .resolve(
                &json!({ "first_name": "Al", "street_name": "Main", "zip_code": "1" }),
                &resource,
                &Params::new(),
                &Within::default(),
            )
            .unwrap();
        assert_eq!(
            value,
            json!({ "firstName": "Al", "homeAddress": { "streetName": "Main", "zipCode": "1" } })
        );
    }

    #[test]
    fn test_on_nil_replaces_null() {
        let config = Config::default();
        let resource = Resource::builder("UserResource")
            .attributes(["name", "bio"])
            .on_nil(|_, key| json!(format!("no {key}")))
            .build();

        let value = Engine::new(&config)
            .resolve(&json!({ "name": "Al", "bio": null }), &resource, &Params::new(), &Within::default())
            .unwrap();
        assert_eq!(value, json!({ "name": "Al", "bio": "no bio" }));
    }

    #[test]
    fn test_resolve_attribute_contract() {
        let config = Config::default().key_transform(KeyTransform::Camel);
        let resource = Resource::builder("UserResource").attribute("first_name").build();
        let engine = Engine::new(&config);
        let object = json!({ "first_name": "Al" });

        let pair = engine
            .resolve_attribute(&object, &resource, "first_name", &Params::new(), &Within::default())
            .unwrap();
        assert_eq!(pair, Some(("FirstName".to_string(), json!("Al"))));

        let missing = engine
            .resolve_attribute(&object, &resource, "undeclared", &Params::new(), &Within::default())
            .unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn test_unknown_named_target_is_fatal() {
        let config = Config::default().on_error(OnError::Ignore);
        let resource = Resource::builder("UserResource").many("articles", "ArticleResource").build();

        let err = Engine::new(&config)
            .resolve(&json!({ "articles": [] }), &resource, &Params::new(), &Within::default())
            .unwrap_err();
        assert!(matches!(err, SerializeError::UnknownResource(name) if name == "ArticleResource"));
    }
}
