//! # Resource Recipe Demo
//!
//! Serializes the demo blog and library model with the resources declared in
//! [`resource_recipe::model::resources`].
//!
//! ```bash
//! RUST_LOG=debug cargo run
//! ```

use resource_recipe::framework::{Config, KeyTransform, OnError, Resource, Within};
use resource_recipe::lifecycle::tracing::setup_tracing;
use resource_recipe::lifecycle::{Options, Serializer, Settings};
use resource_recipe::model::resources::catalog;
use resource_recipe::model::{Article, Author, Comment, Profile, User};
use serde_json::json;
use tracing::{info, info_span};

fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let mut alice = User::new(1, "Alice", "Liddell");
    alice.age = "42".to_string();
    alice.profile = Some(Profile {
        bio: Some("Curious".to_string()),
        website: None,
    });
    let mut published = Article::new(10, "Down the Rabbit Hole", true);
    published.comments = vec![
        Comment { id: 100, body: "Lovely".to_string(), spam: false },
        Comment { id: 101, body: "Buy pills".to_string(), spam: true },
    ];
    alice.articles = vec![published, Article::new(11, "Through the Looking-Glass", false)];

    let serializer = Serializer::new(Config::default(), catalog());

    let text = info_span!("public_view").in_scope(|| {
        serializer
            .serialize(&alice, "UserResource", &Options::default())
            .map_err(|e| e.to_string())
    })?;
    println!("{text}");

    // The owner sees drafts and the email, camel-cased, with a meta block.
    let settings = Settings::from_json(r#"{ "transform_keys": "lower_camel", "pretty": true }"#)
        .map_err(|e| e.to_string())?;
    let owner = Serializer::new(settings.into_config().map_err(|e| e.to_string())?, catalog());
    let options = Options::default()
        .param("viewer", json!({ "admin": true }))
        .within(Within::tree().branch("articles", Within::only(["comments"])))
        .meta(json!({ "generated_by": "demo" }));
    let text = info_span!("owner_view").in_scope(|| {
        owner
            .serialize(&alice, "AccountResource", &options)
            .map_err(|e| e.to_string())
    })?;
    println!("{text}");

    // Cyclic graph: the default scope stops at the second visit of AuthorResource.
    let ursula = Author::new("Ursula");
    ursula.write("A Wizard of Earthsea");
    ursula.write("The Dispossessed");
    let text = serializer
        .serialize(&ursula, "AuthorResource", &Options::default())
        .map_err(|e| e.to_string())?;
    println!("{text}");

    // A broken attribute under a lenient policy.
    let mut lenient = Serializer::new(
        Config::default()
            .on_error(OnError::Nullify)
            .key_transform(KeyTransform::Dash),
        catalog(),
    );
    lenient.register(
        Resource::builder("BrokenResource")
            .attributes(["id", "nickname"])
            .build(),
    );
    let text = lenient
        .serialize(&alice, "BrokenResource", &Options::default())
        .map_err(|e| e.to_string())?;
    println!("{text}");

    info!("Demo finished");
    Ok(())
}
