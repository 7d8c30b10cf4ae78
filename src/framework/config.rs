//! Engine configuration.
//!
//! [`Config`] replaces process-wide knobs: it is built once, handed to the engine
//! at call time, and never changes during a resolution. Resource-level settings
//! (`on_error`, `transform_keys`) fall back to the values here when unset.

use crate::framework::error::OnError;
use crate::framework::keys::KeyTransform;
use crate::framework::naming::{DefaultNaming, NameResolver};
use crate::framework::source::BoxError;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Turns the final mapping into text.
pub type Encoder = Arc<dyn Fn(&Value) -> Result<String, BoxError> + Send + Sync>;

#[derive(Clone)]
pub struct Config {
    pub on_error: OnError,
    pub key_transform: KeyTransform,
    /// Whether root keys go through `key_transform` as well.
    pub transform_root_key: bool,
    pub naming: Arc<dyn NameResolver>,
    pub encoder: Encoder,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            on_error: OnError::Raise,
            key_transform: KeyTransform::Identity,
            transform_root_key: false,
            naming: Arc::new(DefaultNaming),
            encoder: Arc::new(|value: &Value| -> Result<String, BoxError> {
                Ok(serde_json::to_string(value)?)
            }),
        }
    }
}

impl Config {
    pub fn on_error(mut self, policy: OnError) -> Self {
        self.on_error = policy;
        self
    }

    pub fn key_transform(mut self, transform: KeyTransform) -> Self {
        self.key_transform = transform;
        self
    }

    pub fn transform_root_key(mut self, enabled: bool) -> Self {
        self.transform_root_key = enabled;
        self
    }

    pub fn naming(mut self, naming: Arc<dyn NameResolver>) -> Self {
        self.naming = naming;
        self
    }

    pub fn encoder(
        mut self,
        encoder: impl Fn(&Value) -> Result<String, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.encoder = Arc::new(encoder);
        self
    }

    /// Switches the default encoder to indented output.
    pub fn pretty(self) -> Self {
        self.encoder(|value| serde_json::to_string_pretty(value).map_err(Into::into))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("on_error", &self.on_error)
            .field("key_transform", &self.key_transform)
            .field("transform_root_key", &self.transform_root_key)
            .finish_non_exhaustive()
    }
}
