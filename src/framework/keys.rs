//! Key transformation.
//!
//! Every emitted key, at every depth, goes through a [`KeyTransform`]. The built-in
//! casings split a key into words on `_`, `-`, spaces and lower-to-upper boundaries
//! and then join them again in the requested style.

use crate::framework::error::SerializeError;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A pure `&str -> String` key rewriting rule.
#[derive(Clone, Default)]
pub enum KeyTransform {
    /// Keys are emitted exactly as declared.
    #[default]
    Identity,
    /// `first_name` -> `firstName`
    LowerCamel,
    /// `first_name` -> `FirstName`
    Camel,
    /// `firstName` -> `first_name`
    Snake,
    /// `first_name` -> `first-name`
    Dash,
    Custom(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl KeyTransform {
    pub fn custom(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        KeyTransform::Custom(Arc::new(f))
    }

    pub fn apply(&self, key: &str) -> String {
        match self {
            KeyTransform::Identity => key.to_string(),
            KeyTransform::LowerCamel => lower_camelize(key),
            KeyTransform::Camel => camelize(key),
            KeyTransform::Snake => words(key).join("_"),
            KeyTransform::Dash => words(key).join("-"),
            KeyTransform::Custom(f) => f(key),
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, KeyTransform::Identity)
    }
}

impl fmt::Debug for KeyTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyTransform::Identity => write!(f, "Identity"),
            KeyTransform::LowerCamel => write!(f, "LowerCamel"),
            KeyTransform::Camel => write!(f, "Camel"),
            KeyTransform::Snake => write!(f, "Snake"),
            KeyTransform::Dash => write!(f, "Dash"),
            KeyTransform::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl FromStr for KeyTransform {
    type Err = SerializeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "identity" => Ok(KeyTransform::Identity),
            "lower_camel" => Ok(KeyTransform::LowerCamel),
            "camel" => Ok(KeyTransform::Camel),
            "snake" => Ok(KeyTransform::Snake),
            "dash" => Ok(KeyTransform::Dash),
            other => Err(SerializeError::InvalidKeyTransform(other.to_string())),
        }
    }
}

/// Splits a key into lowercase words.
pub(crate) fn words(key: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in key.chars() {
        if ch == '_' || ch == '-' || ch.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        current.extend(ch.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(crate) fn camelize(key: &str) -> String {
    words(key).iter().map(|w| capitalize(w)).collect()
}

pub(crate) fn lower_camelize(key: &str) -> String {
    let mut out = String::new();
    for (i, word) in words(key).iter().enumerate() {
        if i == 0 {
            out.push_str(word);
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}
