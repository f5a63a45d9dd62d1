use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use quill_core::SiteStore;
use tower_http::trace::TraceLayer;

use crate::handler;

/// Build the axum router with every store endpoint.
pub fn build_router(store: Arc<SiteStore>) -> Router {
    Router::new()
        .route("/posts", get(handler::get_posts).post(handler::add_post))
        .route(
            "/posts/:post_id",
            get(handler::get_post)
                .put(handler::update_post)
                .delete(handler::delete_post),
        )
        .route(
            "/posts/:post_id/comments",
            get(handler::get_comments_for_post).post(handler::add_comment),
        )
        .route(
            "/posts/:post_id/comments/:comment_idx",
            get(handler::get_comment)
                .put(handler::update_comment)
                .delete(handler::delete_comment),
        )
        .route("/authors", get(handler::get_authors).post(handler::add_author))
        .route(
            "/authors/:author_id",
            get(handler::get_author)
                .put(handler::update_author)
                .delete(handler::delete_author),
        )
        .route("/authors/:author_id/posts", get(handler::get_posts_for_author))
        .route(
            "/authors/:author_id/comments",
            get(handler::get_comments_for_author),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}
