/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the reducer and the UI layer.
use chrono::{DateTime, Utc};

/// Who wrote a comment. Compared by email for edit/delete rights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: String,
}

/// A single comment attached to an image
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Client-generated, millisecond timestamp based
    pub id: String,
    pub text: String,
    pub author: Author,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Whether `email` belongs to the author of this comment
    pub fn is_authored_by(&self, email: &str) -> bool {
        self.author.email == email
    }
}

/// Represents a single image in the gallery
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    /// Remote URI, asset path or `data:` URI. Also the identity of the record.
    pub url: String,
    pub comments: Vec<Comment>,
}

impl ImageRecord {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            comments: Vec::new(),
        }
    }
}
