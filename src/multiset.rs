use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;

use crate::raw::{RawAvlTree, RawIter};

mod order_statistic;

/// An ordered multiset based on an AVL tree.
///
/// Each distinct value is stored in a single node together with its multiplicity, so inserting the
/// same value again only bumps a counter. Every node also caches the height and the total element
/// count (its *weight*) of its subtree, which keeps the tree balanced and lets the multiset answer
/// order-statistic queries such as [`k_order_statistic`] in O(log n).
///
/// It is a logic error for an item to be modified in such a way that the item's ordering relative
/// to any other item, as determined by the [`Ord`] trait, changes while it is in the multiset. This
/// is normally only possible through [`Cell`], [`RefCell`], global state, I/O, or unsafe code.
/// The behavior resulting from such a logic error is not specified, but will be encapsulated to the
/// `AvlMultiset` that observed the logic error and not result in undefined behavior.
///
/// Iterators returned by [`AvlMultiset::iter`] produce their items in ascending order, repeating
/// each value as many times as it was inserted.
///
/// A multiset is not synchronized; sharing one between threads for mutation requires external
/// locking.
///
/// [`k_order_statistic`]: AvlMultiset::k_order_statistic
/// [`Cell`]: core::cell::Cell
/// [`RefCell`]: core::cell::RefCell
///
/// # Examples
///
/// ```
/// use avl_multiset::AvlMultiset;
///
/// let mut votes = AvlMultiset::new();
///
/// votes.insert("yes");
/// votes.insert("no");
/// votes.insert("yes");
///
/// assert_eq!(votes.len(), 3);
/// assert_eq!(votes.count("yes"), 2);
///
/// // Remove a single vote.
/// votes.remove("yes");
/// assert_eq!(votes.count("yes"), 1);
///
/// // Iterate over everything, duplicates included.
/// for vote in &votes {
///     println!("{vote}");
/// }
/// ```
///
/// A `AvlMultiset` with a known list of items can be initialized from an array:
///
/// ```
/// use avl_multiset::AvlMultiset;
///
/// let set = AvlMultiset::from([1, 2, 2, 3]);
/// assert_eq!(set.len(), 4);
/// ```
pub struct AvlMultiset<T> {
    raw: RawAvlTree<T>,
}

/// An iterator over the items of a `AvlMultiset`, duplicates included.
///
/// This `struct` is created by the [`iter`] method on [`AvlMultiset`].
/// See its documentation for more.
///
/// # Examples
///
/// ```
/// use avl_multiset::AvlMultiset;
///
/// let set = AvlMultiset::from([3, 1, 3]);
/// let mut iter = set.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// assert_eq!(iter.next(), Some(&3));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: AvlMultiset::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    inner: RawIter<'a, T>,
}

impl<T> AvlMultiset<T> {
    /// Makes a new, empty `AvlMultiset`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let mut set: AvlMultiset<i32> = AvlMultiset::new();
    /// ```
    #[must_use]
    pub const fn new() -> AvlMultiset<T> {
        AvlMultiset {
            raw: RawAvlTree::new(),
        }
    }

    /// Clears the multiset, removing all elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let mut v = AvlMultiset::new();
    /// v.insert(1);
    /// v.insert(1);
    /// v.clear();
    /// assert!(v.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns a reference to the first element in the multiset, if any.
    /// This element is always the minimum of all elements in the multiset.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let mut set = AvlMultiset::new();
    /// assert_eq!(set.first(), None);
    /// set.insert(2);
    /// set.insert(1);
    /// assert_eq!(set.first(), Some(&1));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.raw.first()
    }

    /// Returns a reference to the last element in the multiset, if any.
    /// This element is always the maximum of all elements in the multiset.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let set = AvlMultiset::from([2, 9, 9, 1]);
    /// assert_eq!(set.last(), Some(&9));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.raw.last()
    }

    /// Gets an iterator that visits the elements in the `AvlMultiset` in ascending order, yielding
    /// each element once per occurrence.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let set = AvlMultiset::from([3, 1, 2, 1]);
    /// let items: Vec<_> = set.iter().copied().collect();
    /// assert_eq!(items, [1, 1, 2, 3]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; amortized O(1) per item.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: RawIter::new(self.raw.root()),
        }
    }

    /// Returns the number of elements in the multiset, duplicates included.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let mut a = AvlMultiset::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1);
    /// a.insert(1);
    /// assert_eq!(a.len(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the multiset contains no elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let mut a = AvlMultiset::new();
    /// assert!(a.is_empty());
    /// a.insert(1);
    /// assert!(!a.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Writes the elements in ascending order to `sink`, each followed by a single space.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `sink`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let set = AvlMultiset::from([2, 1, 2]);
    /// let mut out = String::new();
    /// set.write_sorted(&mut out).unwrap();
    /// assert_eq!(out, "1 2 2 ");
    /// ```
    pub fn write_sorted<W: fmt::Write>(&self, sink: &mut W) -> fmt::Result
    where
        T: fmt::Display,
    {
        for value in self {
            write!(sink, "{value} ")?;
        }
        Ok(())
    }
}

impl<T: Ord> AvlMultiset<T> {
    /// Returns `true` if the multiset contains at least one element equal to the value.
    ///
    /// The value may be any borrowed form of the multiset's element type,
    /// but the ordering on the borrowed form *must* match the
    /// ordering on the element type.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let set = AvlMultiset::from([1, 2, 3]);
    /// assert_eq!(set.contains(&1), true);
    /// assert_eq!(set.contains(&4), false);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.contains(value)
    }

    /// Returns the number of occurrences of the value in the multiset.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let set = AvlMultiset::from([1, 2, 2]);
    /// assert_eq!(set.count(&2), 2);
    /// assert_eq!(set.count(&5), 0);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn count<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.count(value)
    }

    /// Adds one occurrence of a value to the multiset.
    ///
    /// Insertion always succeeds. A value equal to one already present is counted against the
    /// existing element and dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let mut set = AvlMultiset::new();
    ///
    /// set.insert(2);
    /// set.insert(2);
    /// assert_eq!(set.len(), 2);
    /// assert_eq!(set.count(&2), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, value: T) {
        self.raw.insert(value);
    }

    /// Removes one occurrence of the value from the multiset. Returns whether such an element was
    /// present; removing an absent value is a no-op.
    ///
    /// The value may be any borrowed form of the multiset's element type,
    /// but the ordering on the borrowed form *must* match the
    /// ordering on the element type.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let mut set = AvlMultiset::from([2, 2]);
    /// assert_eq!(set.remove(&2), true);
    /// assert_eq!(set.remove(&2), true);
    /// assert_eq!(set.remove(&2), false);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(value)
    }

    /// Removes every occurrence of the value from the multiset. Returns how many were removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let mut set = AvlMultiset::from([1, 2, 2, 2]);
    /// assert_eq!(set.remove_all(&2), 3);
    /// assert_eq!(set.remove_all(&2), 0);
    /// assert_eq!(set.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove_all<Q>(&mut self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove_all(value)
    }
}

impl<T: Hash> Hash for AvlMultiset<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for value in self {
            value.hash(state);
        }
    }
}

impl<T: PartialEq> PartialEq for AvlMultiset<T> {
    fn eq(&self, other: &AvlMultiset<T>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for AvlMultiset<T> {}

impl<T: PartialOrd> PartialOrd for AvlMultiset<T> {
    fn partial_cmp(&self, other: &AvlMultiset<T>) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for AvlMultiset<T> {
    fn cmp(&self, other: &AvlMultiset<T>) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Clone> Clone for AvlMultiset<T> {
    fn clone(&self) -> Self {
        AvlMultiset {
            raw: self.raw.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for AvlMultiset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Formats the elements in ascending order separated by single spaces.
///
/// ```
/// use avl_multiset::AvlMultiset;
///
/// let set = AvlMultiset::from([5, 4, 4]);
/// assert_eq!(set.to_string(), "4 4 5");
/// ```
impl<T: fmt::Display> fmt::Display for AvlMultiset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.iter();
        if let Some(first) = iter.next() {
            write!(f, "{first}")?;
            for value in iter {
                write!(f, " {value}")?;
            }
        }
        Ok(())
    }
}

impl<T> Default for AvlMultiset<T> {
    fn default() -> Self {
        AvlMultiset::new()
    }
}

impl<T: Ord> FromIterator<T> for AvlMultiset<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = AvlMultiset::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for AvlMultiset<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T: 'a + Ord + Copy> Extend<&'a T> for AvlMultiset<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for &value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for AvlMultiset<T> {
    /// Converts a `[T; N]` into a `AvlMultiset<T>`, keeping duplicates.
    ///
    /// ```
    /// use avl_multiset::AvlMultiset;
    ///
    /// let set1 = AvlMultiset::from([1, 2, 3, 4, 4]);
    /// let set2: AvlMultiset<_> = [4, 1, 2, 3, 4].into();
    /// assert_eq!(set1, set2);
    /// ```
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, T> IntoIterator for &'a AvlMultiset<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.clone().collect::<alloc::vec::Vec<_>>()).finish()
    }
}

impl<T> Default for Iter<'_, T> {
    /// Creates an empty `multiset::Iter`.
    ///
    /// ```
    /// # use avl_multiset::multiset;
    /// let iter: multiset::Iter<'_, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        Iter {
            inner: RawIter::new(None),
        }
    }
}
