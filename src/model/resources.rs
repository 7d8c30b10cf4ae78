//! Resource definitions for the demo model.
//!
//! Associations are declared by association name only, so their targets are
//! inferred (`articles` -> `ArticleResource`) and looked up in the catalog when the
//! association expands.

use crate::framework::association::Association;
use crate::framework::catalog::Catalog;
use crate::framework::resource::{Condition, Params, Resource};
use crate::framework::typed::{AttributeType, TypedAttribute};
use serde_json::{json, Value};

pub fn user() -> Resource {
    Resource::builder("UserResource")
        .attributes(["id", "first_name", "last_name"])
        .computed("full_name", |user, _params| {
            let first = user.read("first_name")?;
            let last = user.read("last_name")?;
            Ok(json!(format!(
                "{} {}",
                first.as_str().unwrap_or_default(),
                last.as_str().unwrap_or_default()
            )))
        })
        .typed("age", TypedAttribute::new("age", AttributeType::Integer))
        .attribute_if("email", Condition::when(|_user, params| is_admin(params.get("viewer"))))
        .association(Association::one("profile"))
        .association(
            Association::many("articles")
                .filter(|article, params| {
                    params.get("drafts") == Some(&Value::Bool(true))
                        || article.read("published").ok() == Some(Value::Bool(true))
                }),
        )
        .infer_root_key()
        .build()
}

/// [`user`] for the account owner: the email is always shown, drafts always listed.
pub fn account() -> Resource {
    Resource::extend("AccountResource", &user())
        .attribute("email")
        .attribute("admin")
        .association(Association::many("articles").params(drafts()))
        .remove("full_name")
        .root_key("account", None)
        .build()
}

pub fn profile() -> Resource {
    Resource::builder("ProfileResource")
        .attributes(["bio", "website"])
        .on_nil(|_profile, _key| json!(""))
        .build()
}

pub fn article() -> Resource {
    Resource::builder("ArticleResource")
        .attributes(["id", "title"])
        .attribute_if(
            "published",
            Condition::when(|_article, params| params.get("drafts") == Some(&Value::Bool(true))),
        )
        .association_if(
            Association::many("comments").filter(|comment, _params| {
                comment.read("spam").ok() != Some(Value::Bool(true))
            }),
            Condition::when_value(|_article, resolved, _params| {
                resolved
                    .object()
                    .and_then(|comments| comments.elements())
                    .is_some_and(|comments| !comments.is_empty())
            }),
        )
        .infer_root_key()
        .build()
}

pub fn comment() -> Resource {
    Resource::builder("CommentResource")
        .attributes(["id", "body"])
        .build()
}

pub fn author() -> Resource {
    Resource::builder("AuthorResource")
        .attribute("name")
        .many("books", "BookResource")
        .build()
}

pub fn book() -> Resource {
    Resource::builder("BookResource")
        .attribute("title")
        .one("author", "AuthorResource")
        .build()
}

/// Every resource of the demo model.
pub fn catalog() -> Catalog {
    Catalog::new()
        .with(user())
        .with(account())
        .with(profile())
        .with(article())
        .with(comment())
        .with(author())
        .with(book())
}

fn drafts() -> Params {
    let mut params = Params::new();
    params.insert("drafts".to_string(), Value::Bool(true));
    params
}

fn is_admin(viewer: Option<&Value>) -> bool {
    viewer
        .and_then(|viewer| viewer.get("admin"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}
