//! Pure lookups and list updates over a [`SiteData`] snapshot.
//!
//! None of these functions mutate their input; callers write the returned
//! list back through a [`Mutation`](crate::mutation::Mutation).

use crate::error::ErrorCode;
use crate::model::{Author, Comment, Identified, Post, SiteData};
use crate::outcome::Outcome;

pub fn read_posts(data: &SiteData) -> &[Post] {
    &data.posts
}

pub fn read_authors(data: &SiteData) -> &[Author] {
    &data.authors
}

/// Index of the first element whose id equals `id`.
pub fn find_index_by_id<T: Identified>(id: &str, list: &[T]) -> Option<usize> {
    list.iter().position(|item| item.id() == id)
}

/// First element whose id equals `id`.
pub fn find_by_id<'a, T: Identified>(id: &str, list: &'a [T]) -> Option<&'a T> {
    list.iter().find(|item| item.id() == id)
}

pub fn contains_id<T: Identified>(id: &str, list: &[T]) -> bool {
    list.iter().any(|item| item.id() == id)
}

/// Replace the element at `index`.
///
/// The three inputs are sequenced in argument order, so a failed index
/// surfaces before a failed value, and a failed value before a failed list.
/// An index past the end of the list fails with [`ErrorCode::NotFound`].
pub fn replace_at<T>(index: Outcome<usize>, value: Outcome<T>, list: Outcome<Vec<T>>) -> Outcome<Vec<T>> {
    let index = index?;
    let value = value?;
    let mut list = list?;
    let slot = list.get_mut(index).ok_or(ErrorCode::NotFound)?;
    *slot = value;
    Ok(list)
}

/// Copy of `list` without any element whose id equals `id`.
pub fn remove_by_id<T: Identified + Clone>(id: &str, list: &[T]) -> Vec<T> {
    list.iter().filter(|item| item.id() != id).cloned().collect()
}

/// Copy of `list` without the element at `index`.
///
/// Later elements shift down by one.
pub fn remove_at<T: Clone>(index: usize, list: &[T]) -> Vec<T> {
    list.iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, item)| item.clone())
        .collect()
}

/// Copy of `list` with `value` at the end.
pub fn append_to<T: Clone>(list: &[T], value: T) -> Vec<T> {
    let mut out = Vec::with_capacity(list.len() + 1);
    out.extend_from_slice(list);
    out.push(value);
    out
}

/// Comments of the post at `post_index`.
///
/// Callers resolve `post_index` from the same snapshot first, so a miss here
/// means the snapshot and the index disagree: [`ErrorCode::Internal`].
pub fn comments_at(posts: &[Post], post_index: usize) -> Outcome<&[Comment]> {
    posts
        .get(post_index)
        .map(|post| post.comments.as_slice())
        .ok_or(ErrorCode::Internal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authors() -> Vec<Author> {
        vec![Author::new("a1", "Ann"), Author::new("a2", "Bo"), Author::new("a3", "Cy")]
    }

    #[test]
    fn find_by_id_and_index() {
        let list = authors();
        assert_eq!(find_index_by_id("a2", &list), Some(1));
        assert_eq!(find_index_by_id("zz", &list), None);
        assert_eq!(find_by_id("a3", &list).map(|a| a.id.as_str()), Some("a3"));
        assert!(find_by_id("zz", &list).is_none());
        assert!(contains_id("a1", &list));
    }

    #[test]
    fn replace_at_valid_index() {
        let list = authors();
        let updated = replace_at(Ok(1), Ok(Author::new("a2", "Bea")), Ok(list.clone())).unwrap();
        assert_eq!(updated[1].display_name.as_deref(), Some("Bea"));
        assert_eq!(updated.len(), 3);
        // input untouched
        assert_eq!(list[1].display_name.as_deref(), Some("Bo"));
    }

    #[test]
    fn replace_at_failure_order() {
        let out = replace_at::<Author>(
            Err(ErrorCode::NotFound),
            Err(ErrorCode::Unauthorized),
            Err(ErrorCode::Internal),
        );
        assert_eq!(out, Err(ErrorCode::NotFound));

        let out = replace_at::<Author>(Ok(0), Err(ErrorCode::Unauthorized), Err(ErrorCode::Internal));
        assert_eq!(out, Err(ErrorCode::Unauthorized));

        let out = replace_at(Ok(9), Ok(Author::new("x", "X")), Ok(authors()));
        assert_eq!(out, Err(ErrorCode::NotFound));
    }

    #[test]
    fn remove_by_id_drops_all_matches() {
        let mut list = authors();
        list.push(Author::new("a2", "Dup"));
        let out = remove_by_id("a2", &list);
        assert_eq!(out.len(), 2);
        assert!(!contains_id("a2", &out));
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn remove_at_shifts_later_items() {
        let list = vec!['a', 'b', 'c', 'd'];
        assert_eq!(remove_at(2, &list), vec!['a', 'b', 'd']);
        assert_eq!(remove_at(7, &list), list);
    }

    #[test]
    fn append_keeps_order() {
        let out = append_to(&[1, 2], 3);
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn comments_at_unresolvable_index_is_internal() {
        let posts = vec![Post::new("Hi", "x", "a1").with_comments(vec![Comment::new("a1", "c")])];
        assert_eq!(comments_at(&posts, 0).map(|c| c.len()), Ok(1));
        assert_eq!(comments_at(&posts, 1), Err(ErrorCode::Internal));
    }
}
