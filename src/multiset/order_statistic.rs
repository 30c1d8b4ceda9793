use core::borrow::Borrow;
use core::ops::Index;

use super::AvlMultiset;
use crate::{OrderStatisticError, Rank};

impl<T> AvlMultiset<T> {
    /// Returns the `k`-th smallest element, counting duplicates.
    ///
    /// The order is one-based: `k_order_statistic(1)` is the minimum and
    /// `k_order_statistic(len)` is the maximum. Each value occupies as many consecutive positions as
    /// it has occurrences.
    ///
    /// # Errors
    ///
    /// Returns [`OrderStatisticError::OutOfRange`] if `k` is zero or greater than [`len`], which
    /// includes every `k` on an empty multiset.
    ///
    /// [`len`]: AvlMultiset::len
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::{AvlMultiset, OrderStatisticError};
    ///
    /// let set = AvlMultiset::from([30, 10, 20, 10]);
    /// assert_eq!(set.k_order_statistic(1), Ok(&10));
    /// assert_eq!(set.k_order_statistic(2), Ok(&10));
    /// assert_eq!(set.k_order_statistic(3), Ok(&20));
    /// assert_eq!(
    ///     set.k_order_statistic(5),
    ///     Err(OrderStatisticError::OutOfRange { k: 5, len: 4 })
    /// );
    /// ```
    pub fn k_order_statistic(&self, k: usize) -> Result<&T, OrderStatisticError> {
        let out_of_range = OrderStatisticError::OutOfRange {
            k,
            len: self.len(),
        };
        let rank = k.checked_sub(1).ok_or(out_of_range)?;
        self.raw.get_by_rank(rank).ok_or(out_of_range)
    }

    /// Returns the element at position `rank` in sorted order, counting duplicates.
    ///
    /// The rank is zero-based. Returns `None` if `rank` is out of bounds.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let set = AvlMultiset::from([10, 20, 20, 30]);
    /// assert_eq!(set.get_by_rank(2), Some(&20));
    /// assert!(set.get_by_rank(4).is_none());
    /// ```
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<&T> {
        self.raw.get_by_rank(rank)
    }
}

impl<T: Ord> AvlMultiset<T> {
    /// Returns the number of elements strictly less than `value`.
    ///
    /// If `value` is present, this is the zero-based rank of its first occurrence.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let set = AvlMultiset::from([10, 20, 20, 30]);
    ///
    /// assert_eq!(set.rank_of(&20), 1);
    /// assert_eq!(set.rank_of(&25), 3);
    /// assert_eq!(set.rank_of(&5), 0);
    /// ```
    #[must_use]
    pub fn rank_of<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.rank_of(value)
    }
}

/// Indexes into the multiset by zero-based rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use avl_multiset::{AvlMultiset, Rank};
///
/// let set = AvlMultiset::from([10, 20, 20]);
/// assert_eq!(set[Rank(2)], 20);
/// ```
impl<T> Index<Rank> for AvlMultiset<T> {
    type Output = T;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.get_by_rank(rank.0).expect("index out of bounds")
    }
}
