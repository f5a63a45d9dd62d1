//! Validation pipelines.
//!
//! Each pipeline turns a raw request body into a validated entity, or the
//! [`ErrorCode`] of the first stage that rejected it. Stages always run in the
//! same order, because that order decides which code surfaces when several
//! checks would fail at once:
//!
//! 1. **presence**: the `post` / `author` / `comment` key exists (400)
//! 2. **shape**: required string fields are strings (400)
//! 3. **identity**: the id is free (new) or taken (existing)
//! 4. **reference**: the `author` field names an existing author (401)
//!
//! Pipelines only read the snapshot slices they are handed.

use serde_json::{Map, Value};
use tracing::debug;

use crate::accessors::{contains_id, find_index_by_id};
use crate::error::ErrorCode;
use crate::model::{derive_post_id, Author, AuthorId, Comment, Post, PostId};
use crate::outcome::{ensure, OptionExt, Outcome};

/// Log which stage rejected the input and pass the failure through.
fn stage<T>(entity: &'static str, stage: &'static str, outcome: Outcome<T>) -> Outcome<T> {
    outcome.map_err(|code| {
        debug!(entity, stage, status = code.status(), "validation rejected");
        code
    })
}

// ---------------------------------------------------------------------------
// Shared stages
// ---------------------------------------------------------------------------

/// The value stored under `key` in the request body.
pub fn read_section<'a>(body: &'a Value, key: &str) -> Outcome<&'a Value> {
    body.get(key)
        .filter(|value| !value.is_null())
        .ok_or_code(ErrorCode::BadRequest)
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn extra_fields(fields: &Map<String, Value>, known: &[&str]) -> Map<String, Value> {
    fields
        .iter()
        .filter(|(key, _)| !known.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn is_known_author(author: &Option<AuthorId>, authors: &[Author]) -> bool {
    author.as_deref().is_some_and(|id| contains_id(id, authors))
}

// ---------------------------------------------------------------------------
// Authors
// ---------------------------------------------------------------------------

fn author_shape(section: &Value) -> Outcome<Author> {
    let fields = section.as_object().ok_or_code(ErrorCode::BadRequest)?;
    let display_name = string_field(fields, "displayName").ok_or_code(ErrorCode::BadRequest)?;
    let id = string_field(fields, "id").ok_or_code(ErrorCode::BadRequest)?;
    Ok(Author {
        id,
        display_name: Some(display_name),
        extra: extra_fields(fields, &["id", "displayName"]),
    })
}

fn read_author(body: &Value) -> Outcome<Author> {
    let section = stage("author", "presence", read_section(body, "author"))?;
    stage("author", "shape", author_shape(section))
}

/// Validate an author that must not exist yet.
pub fn read_new_author(authors: &[Author], body: &Value) -> Outcome<Author> {
    let author = read_author(body)?;
    stage(
        "author",
        "identity",
        ensure(author, ErrorCode::BadRequest, |a| !contains_id(&a.id, authors)),
    )
}

/// Validate a replacement for an author that must already exist.
pub fn read_existing_author(authors: &[Author], body: &Value) -> Outcome<Author> {
    let author = read_author(body)?;
    stage(
        "author",
        "identity",
        ensure(author, ErrorCode::NotFound, |a| contains_id(&a.id, authors)),
    )
}

/// `author_id` if it names an existing author.
pub fn existing_author_id(authors: &[Author], author_id: &str) -> Outcome<AuthorId> {
    ensure(author_id.to_owned(), ErrorCode::NotFound, |id| contains_id(id, authors))
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// A post that passed the shape stage. Its author is still unchecked.
#[derive(Clone, Debug, PartialEq)]
pub struct PostDraft {
    pub id: PostId,
    pub title: String,
    pub body: String,
    pub author: Option<AuthorId>,
    pub comments: Vec<Comment>,
    pub extra: Map<String, Value>,
}

fn post_shape(section: &Value) -> Outcome<PostDraft> {
    let fields = section.as_object().ok_or_code(ErrorCode::BadRequest)?;
    let title = string_field(fields, "title").ok_or_code(ErrorCode::BadRequest)?;
    let body = string_field(fields, "body").ok_or_code(ErrorCode::BadRequest)?;
    let comments = match fields.get("comments") {
        None | Some(Value::Null) => Vec::new(),
        Some(raw) => serde_json::from_value::<Vec<Comment>>(raw.clone())
            .map_err(|_| ErrorCode::BadRequest)?,
    };
    Ok(PostDraft {
        id: derive_post_id(&title),
        title,
        body,
        author: string_field(fields, "author"),
        comments,
        extra: extra_fields(fields, &["id", "title", "body", "author", "comments"]),
    })
}

/// The post author and every embedded comment author must exist.
fn post_references(draft: PostDraft, authors: &[Author]) -> Outcome<Post> {
    let draft = ensure(draft, ErrorCode::Unauthorized, |d| {
        is_known_author(&d.author, authors)
            && d.comments.iter().all(|c| contains_id(&c.author, authors))
    })?;
    Ok(Post {
        id: draft.id,
        title: draft.title,
        body: draft.body,
        author: draft.author.ok_or_code(ErrorCode::Unauthorized)?,
        comments: draft.comments,
        extra: draft.extra,
    })
}

fn read_post(body: &Value) -> Outcome<PostDraft> {
    let section = stage("post", "presence", read_section(body, "post"))?;
    stage("post", "shape", post_shape(section))
}

/// Validate a new post: its derived id must be free and its author known.
///
/// The returned post carries the derived id and an empty comment list when
/// none was submitted.
pub fn read_new_post(posts: &[Post], authors: &[Author], body: &Value) -> Outcome<Post> {
    let draft = read_post(body)?;
    let draft = stage(
        "post",
        "identity",
        ensure(draft, ErrorCode::BadRequest, |d| !contains_id(&d.id, posts)),
    )?;
    stage("post", "reference", post_references(draft, authors))
}

/// Validate a replacement post: its derived id must already exist.
///
/// A missing id fails with 400 here, unlike the 404 of direct lookups.
pub fn read_existing_post(posts: &[Post], authors: &[Author], body: &Value) -> Outcome<Post> {
    let draft = read_post(body)?;
    let draft = stage(
        "post",
        "identity",
        ensure(draft, ErrorCode::BadRequest, |d| contains_id(&d.id, posts)),
    )?;
    stage("post", "reference", post_references(draft, authors))
}

/// `post_id` if it names an existing post.
pub fn existing_post_id(posts: &[Post], post_id: &str) -> Outcome<PostId> {
    ensure(post_id.to_owned(), ErrorCode::NotFound, |id| contains_id(id, posts))
}

/// Index of the post named `post_id`.
pub fn post_index(posts: &[Post], post_id: &str) -> Outcome<usize> {
    find_index_by_id(post_id, posts).ok_or_code(ErrorCode::NotFound)
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

fn comment_shape(section: &Value) -> Outcome<(Option<AuthorId>, Comment)> {
    let fields = section.as_object().ok_or_code(ErrorCode::BadRequest)?;
    let body = string_field(fields, "body").ok_or_code(ErrorCode::BadRequest)?;
    let author = string_field(fields, "author");
    let comment = Comment {
        author: author.clone().unwrap_or_default(),
        body,
        extra: extra_fields(fields, &["author", "body"]),
    };
    Ok((author, comment))
}

/// Validate a comment body whose author must exist.
pub fn read_comment(authors: &[Author], body: &Value) -> Outcome<Comment> {
    let section = stage("comment", "presence", read_section(body, "comment"))?;
    let (author, comment) = stage("comment", "shape", comment_shape(section))?;
    stage(
        "comment",
        "reference",
        ensure(comment, ErrorCode::Unauthorized, |_| is_known_author(&author, authors)),
    )
}

/// Parse a route comment index and check it against `comments`.
///
/// Anything that is not a non-negative integer below `comments.len()` is
/// [`ErrorCode::NotFound`].
pub fn comment_index(comments: &[Comment], raw: &str) -> Outcome<usize> {
    let index = raw.trim().parse::<usize>().map_err(|_| ErrorCode::NotFound)?;
    ensure(index, ErrorCode::NotFound, |i| *i < comments.len())
}
