//! The shared content store and its operations.
//!
//! [`SiteStore`] owns the single [`SiteData`] of a running instance. Every
//! write operation takes the write lock once, validates against that snapshot,
//! builds one [`Mutation`], and only then applies it, so a rejected operation
//! never changes anything and no reader observes a half-applied cascade.

use std::sync::RwLock;

use serde_json::Value;
use tracing::{debug, error};

use crate::accessors::{
    append_to, comments_at, find_by_id, find_index_by_id, read_authors, read_posts, remove_at,
    replace_at,
};
use crate::error::ErrorCode;
use crate::integrity::IntegrityReport;
use crate::model::{Author, AuthorRef, Comment, CommentRef, Post, PostRef, SiteData};
use crate::mutation::{
    append_author, append_post, cascade_delete_author, remove_post, replace_author, replace_post,
    set_comments_of_post, Mutation,
};
use crate::outcome::{ensure, zip, OptionExt, Outcome};
use crate::validation::{
    comment_index, existing_author_id, existing_post_id, post_index, read_comment,
    read_existing_author, read_existing_post, read_new_author, read_new_post,
};

/// In-memory content store shared by every request of one process.
#[derive(Debug, Default)]
pub struct SiteStore {
    data: RwLock<SiteData>,
}

impl SiteStore {
    /// Create a store holding `seed`.
    pub fn new(seed: SiteData) -> Self {
        Self {
            data: RwLock::new(seed),
        }
    }

    /// A copy of the current data.
    pub fn snapshot(&self) -> Outcome<SiteData> {
        self.read(|data| Ok(data.clone()))
    }

    /// Integrity report over the current data.
    pub fn integrity(&self) -> Outcome<IntegrityReport> {
        self.read(|data| Ok(data.check_integrity()))
    }

    fn read<T>(&self, query: impl FnOnce(&SiteData) -> Outcome<T>) -> Outcome<T> {
        let data = self.data.read().map_err(|e| {
            error!("store lock poisoned: {e}");
            ErrorCode::Internal
        })?;
        query(&*data)
    }

    /// Plan a mutation against the current snapshot and apply it if planning
    /// succeeded.
    fn write<T>(
        &self,
        operation: &'static str,
        plan: impl FnOnce(&SiteData) -> Outcome<(Mutation, T)>,
    ) -> Outcome<T> {
        let mut data = self.data.write().map_err(|e| {
            error!("store lock poisoned: {e}");
            ErrorCode::Internal
        })?;
        let (mutation, reply) = plan(&*data).map_err(|code| {
            debug!(operation, status = code.status(), "operation rejected");
            code
        })?;
        debug!(operation, mutation = mutation.label(), "applying mutation");
        let current = std::mem::take(&mut *data);
        *data = mutation.apply(current);
        Ok(reply)
    }

    // -----------------------------------------------------------------------
    // Authors
    // -----------------------------------------------------------------------

    pub fn get_authors(&self) -> Outcome<Vec<Author>> {
        self.read(|data| Ok(read_authors(data).to_vec()))
    }

    pub fn get_author(&self, author_id: &str) -> Outcome<Author> {
        self.read(|data| {
            find_by_id(author_id, read_authors(data))
                .cloned()
                .ok_or_code(ErrorCode::NotFound)
        })
    }

    /// Posts written by `author_id`. Unknown authors simply have none.
    pub fn get_posts_for_author(&self, author_id: &str) -> Outcome<Vec<Post>> {
        self.read(|data| {
            Ok(read_posts(data)
                .iter()
                .filter(|post| post.author == author_id)
                .cloned()
                .collect())
        })
    }

    /// Comments written by `author_id`, across all posts in post order.
    pub fn get_comments_for_author(&self, author_id: &str) -> Outcome<Vec<Comment>> {
        self.read(|data| {
            Ok(read_posts(data)
                .iter()
                .flat_map(|post| post.comments.iter())
                .filter(|comment| comment.author == author_id)
                .cloned()
                .collect())
        })
    }

    pub fn add_author(&self, body: &Value) -> Outcome<AuthorRef> {
        self.write("add-author", |data| {
            let author = read_new_author(&data.authors, body)?;
            let reply = AuthorRef {
                author_id: author.id.clone(),
            };
            Ok((append_author(&data.authors, author), reply))
        })
    }

    /// Replace the author named by the body's `id`.
    ///
    /// The route id plays no part; an unknown body id fails with 404.
    pub fn update_author(&self, body: &Value) -> Outcome<()> {
        self.write("update-author", |data| {
            let author = read_existing_author(&data.authors, body);
            let index = author
                .as_ref()
                .map_err(|code| *code)
                .and_then(|a| find_index_by_id(&a.id, &data.authors).ok_or_code(ErrorCode::NotFound));
            Ok((replace_author(&data.authors, index, author)?, ()))
        })
    }

    /// Remove an author, every post it wrote, and every comment it left.
    pub fn delete_author(&self, author_id: &str) -> Outcome<()> {
        self.write("delete-author", |data| {
            let author_id = existing_author_id(&data.authors, author_id)?;
            Ok((cascade_delete_author(data, &author_id), ()))
        })
    }

    // -----------------------------------------------------------------------
    // Posts
    // -----------------------------------------------------------------------

    pub fn get_posts(&self) -> Outcome<Vec<Post>> {
        self.read(|data| Ok(read_posts(data).to_vec()))
    }

    pub fn get_post(&self, post_id: &str) -> Outcome<Post> {
        self.read(|data| {
            find_by_id(post_id, read_posts(data))
                .cloned()
                .ok_or_code(ErrorCode::NotFound)
        })
    }

    pub fn add_post(&self, body: &Value) -> Outcome<PostRef> {
        self.write("add-post", |data| {
            let post = read_new_post(&data.posts, &data.authors, body)?;
            let reply = PostRef {
                post_id: post.id.clone(),
            };
            Ok((append_post(&data.posts, post), reply))
        })
    }

    /// Replace the post at `post_id`.
    ///
    /// The route id is resolved first (404), then the body is validated; the
    /// body's derived id must name an existing post (400) and be `post_id`
    /// itself (400).
    pub fn update_post(&self, post_id: &str, body: &Value) -> Outcome<PostRef> {
        self.write("update-post", |data| {
            let index = post_index(&data.posts, post_id);
            let post = read_existing_post(&data.posts, &data.authors, body)
                .and_then(|p| ensure(p, ErrorCode::BadRequest, |p| p.id == post_id));
            let reply = post
                .as_ref()
                .map(|p| PostRef {
                    post_id: p.id.clone(),
                })
                .map_err(|code| *code);
            let mutation = replace_post(&data.posts, index, post)?;
            Ok((mutation, reply?))
        })
    }

    pub fn delete_post(&self, post_id: &str) -> Outcome<()> {
        self.write("delete-post", |data| {
            let post_id = existing_post_id(&data.posts, post_id)?;
            Ok((remove_post(&data.posts, &post_id), ()))
        })
    }

    // -----------------------------------------------------------------------
    // Comments
    // -----------------------------------------------------------------------

    pub fn get_comments_for_post(&self, post_id: &str) -> Outcome<Vec<Comment>> {
        self.read(|data| current_comments(&data.posts, post_index(&data.posts, post_id)))
    }

    pub fn get_comment(&self, post_id: &str, comment_idx: &str) -> Outcome<Comment> {
        self.read(|data| {
            let comments = current_comments(&data.posts, post_index(&data.posts, post_id))?;
            let index = comment_index(&comments, comment_idx)?;
            comments.into_iter().nth(index).ok_or_code(ErrorCode::NotFound)
        })
    }

    /// Append a comment; the reply carries its index.
    pub fn add_comment(&self, post_id: &str, body: &Value) -> Outcome<CommentRef> {
        self.write("add-comment", |data| {
            let index = post_index(&data.posts, post_id);
            let current = current_comments(&data.posts, index);
            let comment = read_comment(&data.authors, body);
            let updated = zip(current, comment).map(|(list, c)| append_to(&list, c));
            let reply = updated
                .as_ref()
                .map(|list| CommentRef {
                    comment_idx: list.len() - 1,
                })
                .map_err(|code| *code);
            let mutation = set_comments_of_post(&data.posts, index, updated)?;
            Ok((mutation, reply?))
        })
    }

    pub fn update_comment(&self, post_id: &str, comment_idx: &str, body: &Value) -> Outcome<()> {
        self.write("update-comment", |data| {
            let index = post_index(&data.posts, post_id);
            let current = current_comments(&data.posts, index);
            let target = current
                .as_ref()
                .map_err(|code| *code)
                .and_then(|list| comment_index(list, comment_idx));
            let updated = replace_at(target, read_comment(&data.authors, body), current);
            Ok((set_comments_of_post(&data.posts, index, updated)?, ()))
        })
    }

    /// Remove one comment; later comments shift down by one.
    pub fn delete_comment(&self, post_id: &str, comment_idx: &str) -> Outcome<()> {
        self.write("delete-comment", |data| {
            let index = post_index(&data.posts, post_id);
            let current = current_comments(&data.posts, index);
            let target = current
                .as_ref()
                .map_err(|code| *code)
                .and_then(|list| comment_index(list, comment_idx));
            let updated = zip(current, target).map(|(list, i)| remove_at(i, &list));
            Ok((set_comments_of_post(&data.posts, index, updated)?, ()))
        })
    }
}

fn current_comments(posts: &[Post], index: Outcome<usize>) -> Outcome<Vec<Comment>> {
    index.and_then(|i| comments_at(posts, i)).map(<[Comment]>::to_vec)
}
