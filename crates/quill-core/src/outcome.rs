//! Two-track computation helpers.
//!
//! Every store operation is a chain of fallible steps over
//! [`Outcome`]: a step either yields a value or an [`ErrorCode`], and the
//! first failure short-circuits the rest of the chain. The helpers here cover
//! the few combinators std does not provide directly:
//!
//! - [`OptionExt::ok_or_code`] turns an absent value into a failure code
//! - [`ensure`] lifts a predicate over a value into an outcome
//! - [`sequence`] collects a fixed list of independent outcomes
//! - [`zip`] pairs two independent outcomes

use crate::error::ErrorCode;

/// Result of a store operation.
pub type Outcome<T> = std::result::Result<T, ErrorCode>;

/// Conversion from `Option` to [`Outcome`].
pub trait OptionExt<T> {
    /// `Ok(value)` when present, `Err(code)` when absent.
    fn ok_or_code(self, code: ErrorCode) -> Outcome<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_code(self, code: ErrorCode) -> Outcome<T> {
        self.ok_or(code)
    }
}

/// Keep `value` if `predicate` holds for it, fail with `code` otherwise.
pub fn ensure<T>(value: T, code: ErrorCode, predicate: impl FnOnce(&T) -> bool) -> Outcome<T> {
    if predicate(&value) {
        Ok(value)
    } else {
        Err(code)
    }
}

/// Collect independent outcomes in order.
///
/// Succeeds with every value when all succeed; otherwise fails with the first
/// failure in iteration order.
pub fn sequence<T>(outcomes: impl IntoIterator<Item = Outcome<T>>) -> Outcome<Vec<T>> {
    outcomes.into_iter().collect()
}

/// Pair two independent outcomes, reporting the first failure in argument
/// order.
pub fn zip<A, B>(first: Outcome<A>, second: Outcome<B>) -> Outcome<(A, B)> {
    Ok((first?, second?))
}
