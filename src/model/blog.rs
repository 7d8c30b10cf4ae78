use crate::framework::source::{BoxError, Node, Source, SourceError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A registered user of the blog.
///
/// `age` is kept as the raw text users typed in; the resource layer is what turns
/// it into a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: String,
    pub admin: bool,
    pub profile: Option<Profile>,
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub bio: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub published: bool,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub body: String,
    pub spam: bool,
}

impl User {
    /// Creates a user with no profile and no articles.
    pub fn new(id: u64, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        let first_name = first_name.into();
        Self {
            id,
            email: format!("{}@example.com", first_name.to_lowercase()),
            first_name,
            last_name: last_name.into(),
            age: String::new(),
            admin: false,
            profile: None,
            articles: Vec::new(),
        }
    }
}

impl Article {
    pub fn new(id: u64, title: impl Into<String>, published: bool) -> Self {
        Self {
            id,
            title: title.into(),
            body: String::new(),
            published,
            comments: Vec::new(),
        }
    }
}

impl Source for User {
    fn read(&self, name: &str) -> Result<Value, BoxError> {
        Ok(match name {
            "id" => json!(self.id),
            "first_name" => json!(self.first_name),
            "last_name" => json!(self.last_name),
            "email" => json!(self.email),
            "age" => json!(self.age),
            "admin" => json!(self.admin),
            _ => return Err(SourceError::MissingAttribute(name.to_string()).into()),
        })
    }

    fn related(&self, name: &str) -> Result<Option<Node<'_>>, BoxError> {
        match name {
            "profile" => Ok(self.profile.as_ref().map(|profile| Box::new(profile) as Node<'_>)),
            "articles" => Ok(Some(Box::new(&self.articles))),
            _ => Err(SourceError::MissingAssociation(name.to_string()).into()),
        }
    }
}

impl Source for Profile {
    fn read(&self, name: &str) -> Result<Value, BoxError> {
        match name {
            "bio" => Ok(json!(self.bio)),
            "website" => Ok(json!(self.website)),
            _ => Err(SourceError::MissingAttribute(name.to_string()).into()),
        }
    }
}

impl Source for Article {
    fn read(&self, name: &str) -> Result<Value, BoxError> {
        Ok(match name {
            "id" => json!(self.id),
            "title" => json!(self.title),
            "body" => json!(self.body),
            "published" => json!(self.published),
            _ => return Err(SourceError::MissingAttribute(name.to_string()).into()),
        })
    }

    fn related(&self, name: &str) -> Result<Option<Node<'_>>, BoxError> {
        match name {
            "comments" => Ok(Some(Box::new(&self.comments))),
            _ => Err(SourceError::MissingAssociation(name.to_string()).into()),
        }
    }
}

impl Source for Comment {
    fn read(&self, name: &str) -> Result<Value, BoxError> {
        Ok(match name {
            "id" => json!(self.id),
            "body" => json!(self.body),
            "spam" => json!(self.spam),
            _ => return Err(SourceError::MissingAttribute(name.to_string()).into()),
        })
    }
}
