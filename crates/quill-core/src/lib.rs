//! Validation and mutation engine for the Quill content store.
//!
//! Quill keeps posts, their comments, and authors in memory and serves CRUD
//! operations over them. This crate is the transport-free core: every
//! operation validates its input against one snapshot, builds a single
//! mutation, and applies it only when every check passed.
//!
//! # Modules
//!
//! - [`error`]: the [`ErrorCode`] failure track and setup errors
//! - [`outcome`]: [`Outcome`] and its combinators
//! - [`model`]: [`SiteData`], [`Author`], [`Post`], [`Comment`]
//! - [`accessors`]: pure lookups and list rewrites
//! - [`validation`]: per-entity validation pipelines
//! - [`mutation`]: the [`Mutation`] composer
//! - [`integrity`]: whole-dataset invariant check
//! - [`store`]: [`SiteStore`] and its operations
//!
//! # Quick Start
//!
//! ```rust
//! use quill_core::{SiteData, SiteStore};
//! use serde_json::json;
//!
//! let seed = SiteData::from_json_str(r#"{ "authors": [{ "id": "a1" }] }"#).unwrap();
//! let store = SiteStore::new(seed);
//!
//! let reply = store
//!     .add_post(&json!({ "post": { "title": "Hi", "body": "x", "author": "a1" } }))
//!     .unwrap();
//! assert_eq!(reply.post_id, "hi");
//! assert!(store.get_post("hi").unwrap().comments.is_empty());
//! ```

pub mod accessors;
pub mod error;
pub mod integrity;
pub mod model;
pub mod mutation;
pub mod outcome;
pub mod store;
pub mod validation;

pub use error::{ErrorCode, Result, StoreError};
pub use integrity::{IntegrityReport, Violation, ViolationKind};
pub use model::{Author, AuthorId, AuthorRef, Comment, CommentRef, Post, PostId, PostRef, SiteData};
pub use mutation::Mutation;
pub use outcome::{Outcome, OptionExt};
pub use store::SiteStore;
