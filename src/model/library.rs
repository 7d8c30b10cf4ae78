//! A cyclic object graph: authors own their books, books point back at their author.
//!
//! The back reference is a [`Weak`] so the graph can be dropped. Serializing an
//! author under the default scope stops at the second visit of `AuthorResource`.

use crate::framework::source::{BoxError, Node, Source, SourceError};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[derive(Debug)]
pub struct Author {
    pub name: String,
    books: RefCell<Vec<Rc<Book>>>,
}

#[derive(Debug)]
pub struct Book {
    pub title: String,
    author: Weak<Author>,
}

impl Author {
    pub fn new(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            books: RefCell::new(Vec::new()),
        })
    }

    /// Adds a book written by `self`.
    pub fn write(self: &Rc<Self>, title: impl Into<String>) -> Rc<Book> {
        let book = Rc::new(Book {
            title: title.into(),
            author: Rc::downgrade(self),
        });
        self.books.borrow_mut().push(Rc::clone(&book));
        book
    }

    pub fn books(&self) -> Vec<Rc<Book>> {
        self.books.borrow().clone()
    }
}

impl Book {
    pub fn author(&self) -> Option<Rc<Author>> {
        self.author.upgrade()
    }
}

impl Source for Author {
    fn read(&self, name: &str) -> Result<Value, BoxError> {
        match name {
            "name" => Ok(json!(self.name)),
            _ => Err(SourceError::MissingAttribute(name.to_string()).into()),
        }
    }

    fn related(&self, name: &str) -> Result<Option<Node<'_>>, BoxError> {
        match name {
            "books" => Ok(Some(Box::new(self.books()))),
            _ => Err(SourceError::MissingAssociation(name.to_string()).into()),
        }
    }
}

impl Source for Book {
    fn read(&self, name: &str) -> Result<Value, BoxError> {
        match name {
            "title" => Ok(json!(self.title)),
            _ => Err(SourceError::MissingAttribute(name.to_string()).into()),
        }
    }

    fn related(&self, name: &str) -> Result<Option<Node<'_>>, BoxError> {
        match name {
            "author" => Ok(self.author().map(|author| Box::new(author) as Node<'_>)),
            _ => Err(SourceError::MissingAssociation(name.to_string()).into()),
        }
    }
}
