//! Mutation composer.
//!
//! A [`Mutation`] is a deferred `SiteData -> SiteData` update. Operations
//! build their mutation from validated inputs and one snapshot, and the store
//! applies it in a single step once validation has fully succeeded. Every
//! update swaps a whole top-level list (`posts` or `authors`).

use std::fmt;

use crate::accessors::{append_to, remove_by_id, replace_at};
use crate::error::ErrorCode;
use crate::model::{Author, Comment, Post, SiteData};
use crate::outcome::{zip, Outcome};

type UpdateFn = Box<dyn FnOnce(SiteData) -> SiteData + Send>;

/// A pending update to [`SiteData`].
pub struct Mutation {
    label: &'static str,
    update: UpdateFn,
}

impl Mutation {
    pub fn new(label: &'static str, update: impl FnOnce(SiteData) -> SiteData + Send + 'static) -> Self {
        Self {
            label,
            update: Box::new(update),
        }
    }

    /// A mutation that changes nothing.
    pub fn identity() -> Self {
        Self::new("identity", |data| data)
    }

    /// Replace the whole post list.
    pub fn set_posts(posts: Vec<Post>) -> Self {
        Self::new("set-posts", move |data| SiteData { posts, ..data })
    }

    /// Replace the whole author list.
    pub fn set_authors(authors: Vec<Author>) -> Self {
        Self::new("set-authors", move |data| SiteData { authors, ..data })
    }

    /// Run `self`, then `next`, as one mutation.
    pub fn then(self, next: Mutation) -> Self {
        let (first, second) = (self.update, next.update);
        Self {
            label: self.label,
            update: Box::new(move |data| second(first(data))),
        }
    }

    /// Fold `mutations` into one, applied in iteration order.
    pub fn compose(label: &'static str, mutations: impl IntoIterator<Item = Mutation>) -> Self {
        let composed = mutations
            .into_iter()
            .fold(Mutation::identity(), Mutation::then);
        Self {
            label,
            update: composed.update,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn apply(self, data: SiteData) -> SiteData {
        (self.update)(data)
    }
}

impl fmt::Debug for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutation").field("label", &self.label).finish()
    }
}

// ---------------------------------------------------------------------------
// Per-operation composers
// ---------------------------------------------------------------------------

pub fn append_author(authors: &[Author], author: Author) -> Mutation {
    Mutation::set_authors(append_to(authors, author))
}

pub fn replace_author(authors: &[Author], index: Outcome<usize>, author: Outcome<Author>) -> Outcome<Mutation> {
    replace_at(index, author, Ok(authors.to_vec())).map(Mutation::set_authors)
}

/// Drop every post by `author_id`, then drop its comments from the rest.
pub fn prune_author_from_posts(posts: &[Post], author_id: &str) -> Vec<Post> {
    posts
        .iter()
        .filter(|post| post.author != author_id)
        .map(|post| Post {
            comments: post
                .comments
                .iter()
                .filter(|comment| comment.author != author_id)
                .cloned()
                .collect(),
            ..post.clone()
        })
        .collect()
}

/// Remove an author together with everything that references it.
///
/// Both list rewrites are computed from the same `snapshot` and applied as a
/// single mutation.
pub fn cascade_delete_author(snapshot: &SiteData, author_id: &str) -> Mutation {
    let authors = remove_by_id(author_id, &snapshot.authors);
    let posts = prune_author_from_posts(&snapshot.posts, author_id);
    Mutation::compose(
        "delete-author",
        [Mutation::set_authors(authors), Mutation::set_posts(posts)],
    )
}

pub fn append_post(posts: &[Post], post: Post) -> Mutation {
    Mutation::set_posts(append_to(posts, post))
}

pub fn replace_post(posts: &[Post], index: Outcome<usize>, post: Outcome<Post>) -> Outcome<Mutation> {
    replace_at(index, post, Ok(posts.to_vec())).map(Mutation::set_posts)
}

pub fn remove_post(posts: &[Post], post_id: &str) -> Mutation {
    Mutation::set_posts(remove_by_id(post_id, posts))
}

/// Write `comments` into the post at `post_index`.
///
/// The new comment list is sequenced before the index, so a failed comment
/// list surfaces first.
pub fn set_comments_of_post(
    posts: &[Post],
    post_index: Outcome<usize>,
    comments: Outcome<Vec<Comment>>,
) -> Outcome<Mutation> {
    let (comments, index) = zip(comments, post_index)?;
    let updated = posts
        .get(index)
        .map(|post| Post {
            comments,
            ..post.clone()
        })
        .ok_or(ErrorCode::Internal);
    replace_post(posts, Ok(index), updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SiteData {
        SiteData::new(
            vec![
                Post::new("By Ann", "x", "a1").with_comments(vec![
                    Comment::new("a2", "bo on ann"),
                    Comment::new("a1", "ann on ann"),
                ]),
                Post::new("By Bo", "y", "a2").with_comments(vec![
                    Comment::new("a1", "ann on bo"),
                    Comment::new("a2", "bo on bo"),
                ]),
            ],
            vec![Author::new("a1", "Ann"), Author::new("a2", "Bo")],
        )
    }

    #[test]
    fn identity_changes_nothing() {
        let data = snapshot();
        assert_eq!(Mutation::identity().apply(data.clone()), data);
    }

    #[test]
    fn set_lists_swap_whole_list() {
        let data = snapshot();
        let out = Mutation::set_authors(Vec::new()).apply(data.clone());
        assert!(out.authors.is_empty());
        assert_eq!(out.posts, data.posts);

        let out = Mutation::set_posts(Vec::new()).apply(data.clone());
        assert!(out.posts.is_empty());
        assert_eq!(out.authors, data.authors);
    }

    #[test]
    fn compose_applies_in_order() {
        let first = Mutation::set_authors(vec![Author::new("x", "X")]);
        let second = Mutation::new("rename", |mut data: SiteData| {
            for author in &mut data.authors {
                author.display_name = Some("renamed".into());
            }
            data
        });
        let out = Mutation::compose("both", [first, second]).apply(SiteData::default());
        assert_eq!(out.authors[0].display_name.as_deref(), Some("renamed"));
    }

    #[test]
    fn cascade_delete_rewrites_posts_and_authors() {
        let data = snapshot();
        let mutation = cascade_delete_author(&data, "a1");
        assert_eq!(mutation.label(), "delete-author");
        let out = mutation.apply(data);

        assert_eq!(out.authors, vec![Author::new("a2", "Bo")]);
        assert_eq!(out.posts.len(), 1);
        assert_eq!(out.posts[0].id, "by-bo");
        assert_eq!(out.posts[0].comments, vec![Comment::new("a2", "bo on bo")]);
    }

    #[test]
    fn replace_post_propagates_failures() {
        let data = snapshot();
        let out = replace_post(&data.posts, Err(ErrorCode::NotFound), Err(ErrorCode::BadRequest));
        assert_eq!(out.unwrap_err(), ErrorCode::NotFound);
    }

    #[test]
    fn set_comments_writes_back_into_post() {
        let data = snapshot();
        let mutation = set_comments_of_post(&data.posts, Ok(1), Ok(Vec::new())).unwrap();
        let out = mutation.apply(data.clone());
        assert!(out.posts[1].comments.is_empty());
        assert_eq!(out.posts[0], data.posts[0]);
    }

    #[test]
    fn set_comments_failure_order() {
        let data = snapshot();
        let out = set_comments_of_post(&data.posts, Err(ErrorCode::NotFound), Err(ErrorCode::Unauthorized));
        assert_eq!(out.unwrap_err(), ErrorCode::Unauthorized);
        let out = set_comments_of_post(&data.posts, Ok(5), Ok(Vec::new()));
        assert_eq!(out.unwrap_err(), ErrorCode::Internal);
    }
}
