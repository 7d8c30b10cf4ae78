//! Name resolution conventions.
//!
//! Used in two places only: inferring the target resource of an association that
//! was declared without one, and inferring root keys from resource names.

use crate::framework::association::Cardinality;
use crate::framework::keys::{camelize, words};

/// Maps declared names to resource names and root keys.
pub trait NameResolver: Send + Sync {
    /// Resource name for an association declared inside `namespace`.
    fn resource_for(&self, namespace: Option<&str>, association: &str, kind: Cardinality) -> String;

    /// Singular root key for a resource name.
    fn root_key(&self, resource: &str) -> String;

    fn pluralize(&self, key: &str) -> String;
}

/// `articles` in `api::v1` -> `api::v1::ArticleResource`; `api::UserResource` -> `user`/`users`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNaming;

const SUFFIXES: [&str; 2] = ["Resource", "Serializer"];

impl NameResolver for DefaultNaming {
    fn resource_for(&self, namespace: Option<&str>, association: &str, kind: Cardinality) -> String {
        let base = match kind {
            Cardinality::Many => singularize(association),
            Cardinality::One => association.to_string(),
        };
        let name = format!("{}Resource", camelize(&base));
        match namespace {
            Some(ns) if !ns.is_empty() => format!("{ns}::{name}"),
            _ => name,
        }
    }

    fn root_key(&self, resource: &str) -> String {
        let last = resource.rsplit("::").next().unwrap_or(resource);
        let base = SUFFIXES
            .iter()
            .find_map(|suffix| last.strip_suffix(suffix).filter(|b| !b.is_empty()))
            .unwrap_or(last);
        words(base).join("_")
    }

    fn pluralize(&self, key: &str) -> String {
        if let Some(stem) = key.strip_suffix('y') {
            if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) && !stem.is_empty() {
                return format!("{stem}ies");
            }
        }
        if ["s", "x", "z", "ch", "sh"].iter().any(|end| key.ends_with(end)) {
            return format!("{key}es");
        }
        format!("{key}s")
    }
}

pub(crate) fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{stem}y");
    }
    for end in ["sses", "xes", "zes", "ches", "shes"] {
        if word.ends_with(end) {
            return word[..word.len() - 2].to_string();
        }
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.ends_with('s') && !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}

/// The `a::b` part of `a::b::UserResource`.
pub(crate) fn namespace_of(resource: &str) -> Option<&str> {
    resource.rsplit_once("::").map(|(ns, _)| ns)
}
