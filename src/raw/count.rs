use core::num::NonZero;

/// A strictly positive element count.
///
/// Used for both a node's multiplicity and its subtree weight: a live node always holds at least
/// one occurrence, so neither can be zero.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub(crate) struct Count(NonZero<usize>);

impl Count {
    pub(crate) const ONE: Self = Self(NonZero::<usize>::MIN);

    #[inline]
    pub(crate) const fn get(self) -> usize {
        self.0.get()
    }

    /// Builds a count from a total that is known to include at least one occurrence.
    #[inline]
    pub(crate) const fn from_usize(count: usize) -> Self {
        match NonZero::new(count) {
            Some(count) => Self(count),
            None => panic!("`Count::from_usize()` - `count` is zero!"),
        }
    }

    #[inline]
    pub(crate) const fn increment(self) -> Self {
        match self.0.checked_add(1) {
            Some(count) => Self(count),
            None => panic!("`Count::increment()` - count overflow!"),
        }
    }

    /// Returns the count with one occurrence removed, or `None` when it was the last one.
    #[inline]
    pub(crate) const fn decrement(self) -> Option<Self> {
        match NonZero::new(self.0.get() - 1) {
            Some(count) => Some(Self(count)),
            None => None,
        }
    }
}
