//! File-friendly configuration.
//!
//! [`Settings`] is the serde view of [`Config`]: policies and transforms are named
//! by string so they can live in a JSON document. Unknown names are rejected when
//! the settings are turned into a `Config`, never later during serialization.
//!
//! ```json
//! { "on_error": "nullify", "transform_keys": "lower_camel", "transform_root_key": true }
//! ```

use crate::framework::config::Config;
use crate::framework::error::{OnError, SerializeError};
use crate::framework::keys::KeyTransform;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// `raise`, `nullify` or `ignore`. Defaults to `raise`.
    pub on_error: Option<String>,
    /// `none`, `lower_camel`, `camel`, `snake` or `dash`.
    pub transform_keys: Option<String>,
    pub transform_root_key: bool,
    /// Indented output.
    pub pretty: bool,
}

impl Settings {
    pub fn from_json(text: &str) -> Result<Self, SerializeError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Validates the named values and builds a [`Config`] from them.
    pub fn into_config(self) -> Result<Config, SerializeError> {
        let mut config = Config::default().transform_root_key(self.transform_root_key);
        if let Some(policy) = &self.on_error {
            config = config.on_error(policy.parse::<OnError>()?);
        }
        if let Some(transform) = &self.transform_keys {
            config = config.key_transform(transform.parse::<KeyTransform>()?);
        }
        if self.pretty {
            config = config.pretty();
        }
        debug!(?config, "Settings applied");
        Ok(config)
    }
}
