/// A zero-based rank into the sorted, duplicate-expanded order of a multiset.
///
/// # Examples
///
/// ```
/// use avl_multiset::{AvlMultiset, Rank};
///
/// let set = AvlMultiset::from([20, 10, 10]);
///
/// assert_eq!(set[Rank(0)], 10);
/// assert_eq!(set[Rank(1)], 10);
/// assert_eq!(set[Rank(2)], 20);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);

/// Errors reported by order-statistic queries.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum OrderStatisticError {
    /// The requested order lies outside `1..=len`.
    #[error("order statistic {k} is out of range for a multiset of {len} elements")]
    OutOfRange {
        /// The 1-indexed order that was requested.
        k: usize,
        /// The number of elements in the multiset, duplicates included.
        len: usize,
    },
}
