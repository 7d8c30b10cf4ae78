//! # Traversal Scope ("within")
//!
//! A [`Within`] value decides which associations may expand at the current depth,
//! and what scope the expanded child receives:
//!
//! | Scope | `articles` allowed? | child scope |
//! |---|---|---|
//! | `Unrestricted` | yes | `Unrestricted` |
//! | `Tree({articles: s})` | yes | `s` |
//! | `Tree({comments: ..})` | no | - |
//! | `Set([articles, ..])` | yes | `Stopped` |
//! | `Name(articles)` | yes | `Stopped` |
//! | `Stopped` | no | - |
//!
//! A branch that reached `Stopped` never expands again, whatever the objects look
//! like. That is what makes recursion depth a function of the scope's shape rather
//! than of the object graph.

use crate::framework::error::SerializeError;
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Within {
    #[default]
    Unrestricted,
    Tree(IndexMap<String, Within>),
    Set(IndexSet<String>),
    Name(String),
    Stopped,
}

impl Within {
    /// A one-level scope allowing only `names`.
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Within::Set(names.into_iter().map(Into::into).collect())
    }

    /// An empty tree; add branches with [`Within::branch`].
    pub fn tree() -> Self {
        Within::Tree(IndexMap::new())
    }

    /// Adds `name -> child` to a tree scope. Any other scope is turned into a tree.
    pub fn branch(self, name: impl Into<String>, child: Within) -> Self {
        let mut branches = match self {
            Within::Tree(branches) => branches,
            _ => IndexMap::new(),
        };
        branches.insert(name.into(), child);
        Within::Tree(branches)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, Within::Stopped)
    }

    /// Looks up `association`. `None` means the association must not expand;
    /// `Some(child)` is the scope the expanded association resolves under.
    pub fn permit(&self, association: &str) -> Option<Within> {
        match self {
            Within::Unrestricted => Some(Within::Unrestricted),
            Within::Tree(branches) => branches.get(association).cloned(),
            Within::Set(names) => names.contains(association).then_some(Within::Stopped),
            Within::Name(name) => (name == association).then_some(Within::Stopped),
            Within::Stopped => None,
        }
    }
}

/// Builds a scope from its JSON shape: `null`/booleans stop, a string names one
/// association, an array of strings is a set, an object is a tree.
impl TryFrom<&Value> for Within {
    type Error = SerializeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null | Value::Bool(_) => Ok(Within::Stopped),
            Value::String(name) => Ok(Within::Name(name.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(name) => Ok(name.clone()),
                    other => Err(SerializeError::InvalidTraversalScope(format!(
                        "expected an association name, found `{other}`"
                    ))),
                })
                .collect::<Result<IndexSet<_>, _>>()
                .map(Within::Set),
            Value::Object(branches) => branches
                .iter()
                .map(|(name, child)| Ok((name.clone(), Within::try_from(child)?)))
                .collect::<Result<IndexMap<_, _>, SerializeError>>()
                .map(Within::Tree),
            Value::Number(n) => Err(SerializeError::InvalidTraversalScope(format!(
                "a number ({n}) is not a scope"
            ))),
        }
    }
}

impl TryFrom<Value> for Within {
    type Error = SerializeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Within::try_from(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unrestricted_passes_through() {
        assert_eq!(Within::default().permit("articles"), Some(Within::Unrestricted));
    }

    #[test]
    fn test_tree_hands_down_subtree() {
        let within = Within::tree()
            .branch("articles", Within::tree().branch("comments", Within::Stopped))
            .branch("profile", Within::Stopped);

        let child = within.permit("articles").expect("articles allowed");
        assert_eq!(child.permit("comments"), Some(Within::Stopped));
        assert_eq!(child.permit("author"), None);
        assert_eq!(within.permit("profile"), Some(Within::Stopped));
        assert_eq!(within.permit("friends"), None);
    }

    #[test]
    fn test_set_and_name_stop_after_one_level() {
        let set = Within::only(["articles", "profile"]);
        assert_eq!(set.permit("profile"), Some(Within::Stopped));
        assert_eq!(set.permit("friends"), None);

        let name = Within::Name("articles".into());
        assert_eq!(name.permit("articles"), Some(Within::Stopped));
        assert_eq!(name.permit("profile"), None);
    }

    #[test]
    fn test_stopped_never_expands() {
        let stopped = Within::Stopped;
        assert!(stopped.is_stopped());
        assert_eq!(stopped.permit("anything"), None);
    }

    #[test]
    fn test_from_json_shapes() {
        let within = Within::try_from(json!({ "articles": ["comments"], "profile": null })).unwrap();
        let articles = within.permit("articles").unwrap();
        assert_eq!(articles, Within::only(["comments"]));
        assert_eq!(within.permit("profile"), Some(Within::Stopped));

        assert_eq!(Within::try_from(json!("articles")).unwrap(), Within::Name("articles".into()));
        assert_eq!(Within::try_from(json!(false)).unwrap(), Within::Stopped);
    }

    #[test]
    fn test_unrecognized_shapes_are_rejected() {
        assert!(matches!(
            Within::try_from(json!(3)),
            Err(SerializeError::InvalidTraversalScope(_))
        ));
        assert!(matches!(
            Within::try_from(json!({ "articles": [1] })),
            Err(SerializeError::InvalidTraversalScope(_))
        ));
    }
}
