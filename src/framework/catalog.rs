//! Named registry of resource definitions.
//!
//! Associations declared by name (or with an inferred name) are looked up here at
//! resolution time. Looking targets up by name is what allows definitions to refer
//! to each other, or to themselves, while every `Resource` stays immutable.

use crate::framework::error::SerializeError;
use crate::framework::resource::Resource;
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    resources: IndexMap<String, Arc<Resource>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `resource` under its name, replacing an earlier registration.
    pub fn register(&mut self, resource: Resource) -> Arc<Resource> {
        let resource = Arc::new(resource);
        debug!(resource = resource.name(), size = self.resources.len() + 1, "Registered");
        self.resources
            .insert(resource.name().to_string(), Arc::clone(&resource));
        resource
    }

    pub fn with(mut self, resource: Resource) -> Self {
        self.register(resource);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Resource>> {
        self.resources.get(name)
    }

    pub fn lookup(&self, name: &str) -> Result<Arc<Resource>, SerializeError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| SerializeError::UnknownResource(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let catalog = Catalog::new()
            .with(Resource::builder("UserResource").attribute("id").build())
            .with(Resource::builder("ArticleResource").attribute("title").build());

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.lookup("UserResource").unwrap().name(), "UserResource");
        assert!(matches!(
            catalog.lookup("CommentResource"),
            Err(SerializeError::UnknownResource(name)) if name == "CommentResource"
        ));
        let names: Vec<_> = catalog.names().collect();
        assert_eq!(names, ["UserResource", "ArticleResource"]);
    }
}
