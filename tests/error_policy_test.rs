use pretty_assertions::assert_eq;
use resource_recipe::framework::mock::MockSource;
use resource_recipe::framework::{
    Association, Catalog, Config, Engine, OnError, Params, Resource, SerializeError, Within,
};
use resource_recipe::lifecycle::{Options, Serializer};
use serde_json::{json, Value};

/// `{a: 1, b: <raises>, c: 3}`
fn abc() -> (MockSource, Resource) {
    let mut source = MockSource::new("Abc");
    source.expect_read("a").return_ok(json!(1));
    source.expect_read("b").return_err("boom");
    source.expect_read("c").return_ok(json!(3));
    let resource = Resource::builder("AbcResource").attributes(["a", "b", "c"]).build();
    (source, resource)
}

fn resolve(config: &Config, source: &MockSource, resource: &Resource) -> Result<Value, SerializeError> {
    Engine::new(config).resolve(source, resource, &Params::new(), &Within::default())
}

#[test]
fn test_ignore_omits_failed_key() {
    let (source, resource) = abc();
    let value = resolve(&Config::default().on_error(OnError::Ignore), &source, &resource).unwrap();
    assert_eq!(value, json!({ "a": 1, "c": 3 }));
    source.verify();
}

#[test]
fn test_nullify_keeps_failed_key() {
    let (source, resource) = abc();
    let value = resolve(&Config::default().on_error(OnError::Nullify), &source, &resource).unwrap();
    assert_eq!(value, json!({ "a": 1, "b": null, "c": 3 }));
}

#[test]
fn test_raise_aborts_and_wraps_error() {
    let (source, resource) = abc();
    let error = resolve(&Config::default(), &source, &resource).unwrap_err();

    assert_eq!(error.to_string(), "AbcResource.b: failed to read `b`: boom");
    // c is never reached
    assert_eq!(source.reads(), ["a", "b"]);
}

#[test]
fn test_handler_decides_key_and_value() {
    let (source, resource) = abc();
    let config = Config::default().on_error(OnError::handler(|context| {
        assert_eq!(context.resource, "AbcResource");
        assert!(matches!(context.error, SerializeError::Read { .. }));
        let fallback = context.object.read("a").ok()?;
        Some((format!("{}_fallback", context.key), fallback))
    }));

    let value = resolve(&config, &source, &resource).unwrap();
    assert_eq!(value, json!({ "a": 1, "b_fallback": 1, "c": 3 }));
}

#[test]
fn test_handler_can_omit_key() {
    let (source, resource) = abc();
    let config = Config::default().on_error(OnError::handler(|_| None));
    let value = resolve(&config, &source, &resource).unwrap();
    assert_eq!(value, json!({ "a": 1, "c": 3 }));
}

#[test]
fn test_resource_policy_overrides_config() {
    let (source, _) = abc();
    let resource = Resource::builder("AbcResource")
        .attributes(["a", "b", "c"])
        .on_error(OnError::Nullify)
        .build();
    let value = resolve(&Config::default(), &source, &resource).unwrap();
    assert_eq!(value, json!({ "a": 1, "b": null, "c": 3 }));
}

/// A nested resource that raises fails the association key, which the parent's
/// policy then handles.
#[test]
fn test_nested_raise_handled_by_parent_policy() {
    let mut article = MockSource::new("Article");
    article.expect_read("title").return_ok(json!("Hello"));
    article.expect_read("views").return_err("counter offline");
    let mut user = MockSource::new("User");
    user.expect_read("name").return_ok(json!("Alice"));
    user.expect_many("articles", vec![article]);

    let articles = Resource::builder("ArticleResource")
        .attributes(["title", "views"])
        .on_error(OnError::Raise)
        .build();
    let resource = Resource::builder("UserResource")
        .attribute("name")
        .many("articles", articles)
        .on_error(OnError::Ignore)
        .build();

    let value = resolve(&Config::default(), &user, &resource).unwrap();
    assert_eq!(value, json!({ "name": "Alice" }));
}

/// Structural errors ignore the policy.
#[test]
fn test_unknown_target_is_fatal_under_ignore() {
    let catalog = Catalog::new().with(
        Resource::builder("UserResource")
            .attribute("name")
            .association(Association::one("team"))
            .build(),
    );
    let serializer = Serializer::new(Config::default().on_error(OnError::Ignore), catalog);

    let error = serializer
        .serialize(&json!({ "name": "Alice", "team": { "name": "Core" } }), "UserResource", &Options::default())
        .unwrap_err();
    assert!(matches!(error, SerializeError::UnknownResource(name) if name == "TeamResource"));
}

#[test]
fn test_policy_names_are_validated() {
    assert!(matches!("nullify".parse::<OnError>(), Ok(OnError::Nullify)));
    assert!(matches!(
        "explode".parse::<OnError>(),
        Err(SerializeError::InvalidErrorPolicy(name)) if name == "explode"
    ));
}
