//! HTTP server for the Quill content store.
//!
//! Maps verbs and paths onto [`quill_core::SiteStore`] operations, feeds them
//! the parsed JSON body and route parameters, and renders each outcome as a
//! status code plus optional JSON body.

pub mod config;
pub mod error;
pub mod handler;
pub mod reply;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use reply::Reply;
pub use server::{QuillServer, RunningServer};
