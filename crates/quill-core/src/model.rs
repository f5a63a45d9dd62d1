//! Entity types: [`SiteData`], [`Author`], [`Post`], [`Comment`].
//!
//! Every entity keeps unknown JSON fields in `extra` so that whatever a client
//! submitted is handed back unchanged on reads.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Identifier of an [`Author`].
pub type AuthorId = String;

/// Identifier of a [`Post`], derived from its title.
pub type PostId = String;

/// Anything addressable by a string id.
pub trait Identified {
    fn id(&self) -> &str;
}

/// The root aggregate held by the store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteData {
    /// Posts in display order.
    #[serde(default)]
    pub posts: Vec<Post>,
    /// Registered authors. Order carries no meaning.
    #[serde(default)]
    pub authors: Vec<Author>,
}

impl SiteData {
    pub fn new(posts: Vec<Post>, authors: Vec<Author>) -> Self {
        Self { posts, authors }
    }

    /// Parse site data from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read site data from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

/// A registered author.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    #[serde(
        rename = "displayName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Author {
    pub fn new(id: impl Into<AuthorId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: Some(display_name.into()),
            extra: Map::new(),
        }
    }
}

impl Identified for Author {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A post with its ordered comment thread.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub body: String,
    pub author: AuthorId,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Post {
    /// Build a post whose id is derived from `title`.
    pub fn new(title: impl Into<String>, body: impl Into<String>, author: impl Into<AuthorId>) -> Self {
        let title = title.into();
        Self {
            id: derive_post_id(&title),
            title,
            body: body.into(),
            author: author.into(),
            comments: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = comments;
        self
    }
}

impl Identified for Post {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A comment, addressed by its position in the owning post.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub author: AuthorId,
    pub body: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Comment {
    pub fn new(author: impl Into<AuthorId>, body: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            body: body.into(),
            extra: Map::new(),
        }
    }
}

/// Derive a post id from its title.
///
/// The title is lower-cased and every run of spaces becomes one hyphen, so
/// titles differing only in spacing or case share an id.
///
/// ```
/// use quill_core::model::derive_post_id;
///
/// assert_eq!(derive_post_id("Hello World"), "hello-world");
/// assert_eq!(derive_post_id("Hello  World"), "hello-world");
/// ```
pub fn derive_post_id(title: &str) -> PostId {
    let mut id = String::with_capacity(title.len());
    let mut in_gap = false;
    for ch in title.to_lowercase().chars() {
        if ch == ' ' {
            if !in_gap {
                id.push('-');
            }
            in_gap = true;
        } else {
            id.push(ch);
            in_gap = false;
        }
    }
    id
}

// ---------------------------------------------------------------------------
// Reply payloads
// ---------------------------------------------------------------------------

/// Reply to a post create or update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRef {
    #[serde(rename = "postId")]
    pub post_id: PostId,
}

/// Reply to an author create.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    #[serde(rename = "authorId")]
    pub author_id: AuthorId,
}

/// Reply to a comment create.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRef {
    #[serde(rename = "commentIdx")]
    pub comment_idx: usize,
}
