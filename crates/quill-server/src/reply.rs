//! Rendering of store outcomes into HTTP responses.
//!
//! A failure becomes an empty response whose status is the failure code. A
//! success is a 200 with the value as JSON, or an empty 200 when the
//! operation has nothing to return.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use quill_core::{ErrorCode, Outcome};
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    Empty,
    Body(Value),
    Failure(ErrorCode),
}

impl Reply {
    /// Render a value-producing outcome.
    pub fn json<T: Serialize>(outcome: Outcome<T>) -> Self {
        match outcome.map(serde_json::to_value) {
            Ok(Ok(body)) => Self::Body(body),
            Ok(Err(e)) => {
                tracing::error!("failed to serialize reply: {e}");
                Self::Failure(ErrorCode::Internal)
            }
            Err(code) => Self::Failure(code),
        }
    }

    /// Render an outcome that carries no value.
    pub fn empty(outcome: Outcome<()>) -> Self {
        match outcome {
            Ok(()) => Self::Empty,
            Err(code) => Self::Failure(code),
        }
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Self::Empty => StatusCode::OK.into_response(),
            Self::Body(body) => (StatusCode::OK, Json(body)).into_response(),
            Self::Failure(code) => StatusCode::from_u16(code.status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::PostRef;
    use serde_json::json;

    #[test]
    fn json_success() {
        let reply = Reply::json(Ok(PostRef { post_id: "hi".into() }));
        assert_eq!(reply, Reply::Body(json!({ "postId": "hi" })));
    }

    #[test]
    fn failure_passes_code_through() {
        assert_eq!(
            Reply::json::<PostRef>(Err(ErrorCode::Unauthorized)),
            Reply::Failure(ErrorCode::Unauthorized)
        );
        assert_eq!(Reply::empty(Err(ErrorCode::NotFound)), Reply::Failure(ErrorCode::NotFound));
        assert_eq!(Reply::empty(Ok(())), Reply::Empty);
    }

    #[test]
    fn response_status() {
        assert_eq!(Reply::Empty.into_response().status(), StatusCode::OK);
        assert_eq!(
            Reply::Failure(ErrorCode::Unauthorized).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            Reply::Failure(ErrorCode::Internal).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
