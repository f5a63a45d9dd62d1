//! Request handlers.
//!
//! Each handler pulls route parameters and the JSON body out of the request,
//! calls one [`SiteStore`] operation, and renders the outcome as a [`Reply`].

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use quill_core::SiteStore;
use serde_json::Value;

use crate::reply::Reply;

pub type AppState = Arc<SiteStore>;

/// Parse a request body; anything that is not JSON counts as no body.
fn parse_body(raw: &[u8]) -> Value {
    serde_json::from_slice(raw).unwrap_or(Value::Null)
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

pub async fn get_posts(State(store): State<AppState>) -> Reply {
    Reply::json(store.get_posts())
}

pub async fn add_post(State(store): State<AppState>, body: Bytes) -> Reply {
    Reply::json(store.add_post(&parse_body(&body)))
}

pub async fn get_post(State(store): State<AppState>, Path(post_id): Path<String>) -> Reply {
    Reply::json(store.get_post(&post_id))
}

pub async fn update_post(
    State(store): State<AppState>,
    Path(post_id): Path<String>,
    body: Bytes,
) -> Reply {
    Reply::json(store.update_post(&post_id, &parse_body(&body)))
}

pub async fn delete_post(State(store): State<AppState>, Path(post_id): Path<String>) -> Reply {
    Reply::empty(store.delete_post(&post_id))
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

pub async fn get_comments_for_post(
    State(store): State<AppState>,
    Path(post_id): Path<String>,
) -> Reply {
    Reply::json(store.get_comments_for_post(&post_id))
}

pub async fn add_comment(
    State(store): State<AppState>,
    Path(post_id): Path<String>,
    body: Bytes,
) -> Reply {
    Reply::json(store.add_comment(&post_id, &parse_body(&body)))
}

pub async fn get_comment(
    State(store): State<AppState>,
    Path((post_id, comment_idx)): Path<(String, String)>,
) -> Reply {
    Reply::json(store.get_comment(&post_id, &comment_idx))
}

pub async fn update_comment(
    State(store): State<AppState>,
    Path((post_id, comment_idx)): Path<(String, String)>,
    body: Bytes,
) -> Reply {
    Reply::empty(store.update_comment(&post_id, &comment_idx, &parse_body(&body)))
}

pub async fn delete_comment(
    State(store): State<AppState>,
    Path((post_id, comment_idx)): Path<(String, String)>,
) -> Reply {
    Reply::empty(store.delete_comment(&post_id, &comment_idx))
}

// ---------------------------------------------------------------------------
// Authors
// ---------------------------------------------------------------------------

pub async fn get_authors(State(store): State<AppState>) -> Reply {
    Reply::json(store.get_authors())
}

pub async fn add_author(State(store): State<AppState>, body: Bytes) -> Reply {
    Reply::json(store.add_author(&parse_body(&body)))
}

pub async fn get_author(State(store): State<AppState>, Path(author_id): Path<String>) -> Reply {
    Reply::json(store.get_author(&author_id))
}

pub async fn update_author(State(store): State<AppState>, body: Bytes) -> Reply {
    Reply::empty(store.update_author(&parse_body(&body)))
}

pub async fn delete_author(State(store): State<AppState>, Path(author_id): Path<String>) -> Reply {
    Reply::empty(store.delete_author(&author_id))
}

pub async fn get_posts_for_author(
    State(store): State<AppState>,
    Path(author_id): Path<String>,
) -> Reply {
    Reply::json(store.get_posts_for_author(&author_id))
}

pub async fn get_comments_for_author(
    State(store): State<AppState>,
    Path(author_id): Path<String>,
) -> Reply {
    Reply::json(store.get_comments_for_author(&author_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_parsing() {
        assert_eq!(parse_body(br#"{"post":{}}"#), json!({ "post": {} }));
        assert_eq!(parse_body(b""), Value::Null);
        assert_eq!(parse_body(b"not json"), Value::Null);
    }
}
