//! Whole-dataset integrity check.
//!
//! Operations keep the invariants on their own; this check exists for data
//! that never went through them (seed files) and for tests.

use std::collections::HashSet;

use crate::model::{derive_post_id, SiteData};

/// Result of an integrity check over one [`SiteData`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    pub author_count: usize,
    pub post_count: usize,
    pub comment_count: usize,
    pub violations: Vec<Violation>,
}

impl IntegrityReport {
    /// Returns `true` if no invariant is violated.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns `true` if some author reference does not resolve.
    pub fn has_dangling_references(&self) -> bool {
        self.violations.iter().any(|v| {
            matches!(
                v.kind,
                ViolationKind::DanglingPostAuthor | ViolationKind::DanglingCommentAuthor
            )
        })
    }
}

/// A single broken invariant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    DuplicateAuthorId,
    DuplicatePostId,
    PostIdMismatch,
    DanglingPostAuthor,
    DanglingCommentAuthor,
}

impl SiteData {
    /// Check every invariant and collect all violations.
    pub fn check_integrity(&self) -> IntegrityReport {
        let mut violations = Vec::new();
        let mut author_ids = HashSet::new();

        for author in &self.authors {
            if !author_ids.insert(author.id.as_str()) {
                violations.push(Violation {
                    kind: ViolationKind::DuplicateAuthorId,
                    description: format!("author id {:?} appears more than once", author.id),
                });
            }
        }

        let mut post_ids = HashSet::new();
        let mut comment_count = 0;
        for post in &self.posts {
            if !post_ids.insert(post.id.as_str()) {
                violations.push(Violation {
                    kind: ViolationKind::DuplicatePostId,
                    description: format!("post id {:?} appears more than once", post.id),
                });
            }

            let expected = derive_post_id(&post.title);
            if post.id != expected {
                violations.push(Violation {
                    kind: ViolationKind::PostIdMismatch,
                    description: format!("post id {:?} does not match title (expected {expected:?})", post.id),
                });
            }

            if !author_ids.contains(post.author.as_str()) {
                violations.push(Violation {
                    kind: ViolationKind::DanglingPostAuthor,
                    description: format!("post {:?} references unknown author {:?}", post.id, post.author),
                });
            }

            for (idx, comment) in post.comments.iter().enumerate() {
                comment_count += 1;
                if !author_ids.contains(comment.author.as_str()) {
                    violations.push(Violation {
                        kind: ViolationKind::DanglingCommentAuthor,
                        description: format!(
                            "comment {idx} of post {:?} references unknown author {:?}",
                            post.id, comment.author
                        ),
                    });
                }
            }
        }

        IntegrityReport {
            author_count: self.authors.len(),
            post_count: self.posts.len(),
            comment_count,
            violations,
        }
    }
}
