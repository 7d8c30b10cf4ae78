use crate::framework::catalog::Catalog;
use crate::framework::config::Config;
use crate::framework::engine::{Engine, Mapping};
use crate::framework::error::SerializeError;
use crate::framework::resource::{Params, Resource, RootKey};
use crate::framework::source::Source;
use crate::framework::within::Within;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Per-call options for [`Serializer::serialize`].
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Read-only parameters passed to every condition and computed attribute.
    pub params: Params,
    /// Traversal scope for associations.
    pub within: Within,
    /// Overrides the resource's root key for this call.
    pub root_key: Option<String>,
    /// Merged next to the root key. Ignored when there is no root key.
    pub meta: Option<Value>,
}

impl Options {
    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    pub fn within(mut self, within: Within) -> Self {
        self.within = within;
        self
    }

    pub fn root_key(mut self, key: impl Into<String>) -> Self {
        self.root_key = Some(key.into());
        self
    }

    pub fn meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// The entry point tying a [`Config`] to a [`Catalog`] of resources.
///
/// `Serializer` is responsible for:
/// - **Lookup**: Finding the resource to serialize with by name
/// - **Envelope**: Wrapping the result under a root key, with optional `meta`
/// - **Encoding**: Turning the final mapping into text through the configured encoder
///
/// Resolution itself is delegated to the [`Engine`].
///
/// # Example
///
/// ```rust
/// use resource_recipe::framework::{Catalog, Config, Resource};
/// use resource_recipe::lifecycle::{Options, Serializer};
/// use serde_json::json;
///
/// let catalog = Catalog::new().with(
///     Resource::builder("UserResource")
///         .attributes(["id", "name"])
///         .infer_root_key()
///         .build(),
/// );
/// let serializer = Serializer::new(Config::default(), catalog);
///
/// let user = json!({ "id": 1, "name": "Alice", "password": "secret" });
/// let text = serializer
///     .serialize(&user, "UserResource", &Options::default())
///     .unwrap();
/// assert_eq!(text, r#"{"user":{"id":1,"name":"Alice"}}"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Serializer {
    config: Config,
    catalog: Catalog,
}

impl Serializer {
    pub fn new(config: Config, catalog: Catalog) -> Self {
        Self { config, catalog }
    }

    /// Adds a resource to the catalog after construction.
    pub fn register(&mut self, resource: Resource) -> Arc<Resource> {
        self.catalog.register(resource)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Serializes `object` with the resource registered as `resource` and encodes it.
    #[instrument(skip(self, object, options))]
    pub fn serialize(
        &self,
        object: &dyn Source,
        resource: &str,
        options: &Options,
    ) -> Result<String, SerializeError> {
        let value = self.to_value(object, resource, options)?;
        let text = (self.config.encoder)(&value).map_err(SerializeError::Encode)?;
        info!(bytes = text.len(), "Serialized");
        Ok(text)
    }

    /// Same as [`serialize`](Self::serialize), without the final encoding step.
    pub fn to_value(
        &self,
        object: &dyn Source,
        resource: &str,
        options: &Options,
    ) -> Result<Value, SerializeError> {
        let resource = self.catalog.lookup(resource)?;
        let engine = Engine::new(&self.config).with_catalog(&self.catalog);
        let members = object.elements();
        let is_collection = members.is_some();
        debug!(resource = resource.name(), is_collection, within = ?options.within, "Resolving");

        let body = match (members, resource.collection_key()) {
            (Some(members), Some(key)) => {
                let mut keyed = Mapping::new();
                for member in members {
                    let id = member.read(key).map_err(|source| SerializeError::Read {
                        attribute: key.to_string(),
                        source,
                    })?;
                    let id = match id {
                        Value::String(id) => id,
                        other => other.to_string(),
                    };
                    keyed.insert(id, engine.resolve(member, &resource, &options.params, &options.within)?);
                }
                Value::Object(keyed)
            }
            _ => engine.resolve(object, &resource, &options.params, &options.within)?,
        };

        match self.root_key(&resource, is_collection, options) {
            Some(root) => {
                let mut envelope = Mapping::new();
                envelope.insert(root, body);
                if let Some(meta) = &options.meta {
                    envelope.insert("meta".to_string(), meta.clone());
                }
                Ok(Value::Object(envelope))
            }
            None => {
                if options.meta.is_some() {
                    warn!(resource = resource.name(), "Meta ignored without a root key");
                }
                Ok(body)
            }
        }
    }

    fn root_key(&self, resource: &Resource, is_collection: bool, options: &Options) -> Option<String> {
        let naming = &self.config.naming;
        let key = match (&options.root_key, resource.root_key()) {
            (Some(key), _) => key.clone(),
            (None, Some(RootKey::Explicit { one, many })) => {
                if is_collection {
                    many.clone()?
                } else {
                    one.clone()
                }
            }
            (None, Some(RootKey::Inferred)) => {
                let one = naming.root_key(resource.name());
                if is_collection {
                    naming.pluralize(&one)
                } else {
                    one
                }
            }
            (None, None) => return None,
        };
        if !self.config.transform_root_key {
            return Some(key);
        }
        let transform = resource.transform_keys().unwrap_or(&self.config.key_transform);
        Some(transform.apply(&key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::keys::KeyTransform;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn users() -> Catalog {
        Catalog::new()
            .with(
                Resource::builder("UserResource")
                    .attributes(["id", "first_name"])
                    .infer_root_key()
                    .build(),
            )
            .with(Resource::builder("PlainResource").attribute("id").build())
    }

    #[test]
    fn test_inferred_root_key_follows_cardinality() {
        let serializer = Serializer::new(Config::default(), users());
        let options = Options::default();

        let one = serializer
            .to_value(&json!({ "id": 1, "first_name": "Ann" }), "UserResource", &options)
            .unwrap();
        assert_eq!(one, json!({ "user": { "id": 1, "first_name": "Ann" } }));

        let many = serializer
            .to_value(&json!([{ "id": 1, "first_name": "Ann" }]), "UserResource", &options)
            .unwrap();
        assert_eq!(many, json!({ "users": [{ "id": 1, "first_name": "Ann" }] }));
    }

    #[test]
    fn test_root_key_override_and_transform() {
        let config = Config::default()
            .key_transform(KeyTransform::LowerCamel)
            .transform_root_key(true);
        let serializer = Serializer::new(config, users());

        let value = serializer
            .to_value(
                &json!({ "id": 1, "first_name": "Ann" }),
                "UserResource",
                &Options::default().root_key("account_holder"),
            )
            .unwrap();
        assert_eq!(value, json!({ "accountHolder": { "id": 1, "firstName": "Ann" } }));
    }

    #[test]
    fn test_meta_needs_root_key() {
        let serializer = Serializer::new(Config::default(), users());
        let options = Options::default().meta(json!({ "total": 1 }));

        let wrapped = serializer
            .to_value(&json!({ "id": 1, "first_name": "Ann" }), "UserResource", &options)
            .unwrap();
        assert_eq!(wrapped["meta"], json!({ "total": 1 }));

        let bare = serializer
            .to_value(&json!({ "id": 1 }), "PlainResource", &options)
            .unwrap();
        assert_eq!(bare, json!({ "id": 1 }));
    }

    #[test]
    fn test_explicit_root_key_without_plural_leaves_collections_bare() {
        let catalog = Catalog::new().with(
            Resource::builder("TagResource")
                .attribute("name")
                .root_key("tag", None)
                .build(),
        );
        let serializer = Serializer::new(Config::default(), catalog);

        let value = serializer
            .to_value(&json!([{ "name": "rust" }]), "TagResource", &Options::default())
            .unwrap();
        assert_eq!(value, json!([{ "name": "rust" }]));
    }

    #[test]
    fn test_collection_key_indexes_members() {
        let catalog = Catalog::new().with(
            Resource::builder("UserResource")
                .attribute("name")
                .collection_key("id")
                .build(),
        );
        let serializer = Serializer::new(Config::default(), catalog);

        let value = serializer
            .to_value(
                &json!([{ "id": 7, "name": "Ann" }, { "id": "b", "name": "Bo" }]),
                "UserResource",
                &Options::default(),
            )
            .unwrap();
        assert_eq!(value, json!({ "7": { "name": "Ann" }, "b": { "name": "Bo" } }));
    }

    #[test]
    fn test_unknown_resource() {
        let serializer = Serializer::new(Config::default(), users());
        let error = serializer
            .serialize(&json!({}), "MissingResource", &Options::default())
            .unwrap_err();
        assert!(matches!(error, SerializeError::UnknownResource(_)));
    }

    #[test]
    fn test_encoder_failure_is_reported() {
        let config = Config::default().encoder(|_| Err("disk full".into()));
        let serializer = Serializer::new(config, users());
        let error = serializer
            .serialize(&json!({ "id": 1 }), "PlainResource", &Options::default())
            .unwrap_err();
        assert!(matches!(error, SerializeError::Encode(_)));
    }
}
