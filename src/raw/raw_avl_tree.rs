use alloc::boxed::Box;
use core::borrow::Borrow;
use core::cmp::Ordering::{Equal, Greater, Less};

use log::trace;

use super::node::{Link, Node, rebalance, weight};

/// The core AVL implementation backing `AvlMultiset`.
#[derive(Clone)]
pub(crate) struct RawAvlTree<T> {
    /// The root node, if the tree is non-empty. Its weight is the total element count.
    root: Link<T>,
}

/// How many occurrences a removal takes out of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Removal {
    One,
    All,
}

impl<T> RawAvlTree<T> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            root: None,
        }
    }

    /// Returns the number of elements in the tree, duplicates included.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        weight(&self.root)
    }

    /// Returns true if the tree contains no elements.
    #[inline]
    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drops every node, children before their parent.
    pub(crate) fn clear(&mut self) {
        drop(self.root.take());
    }

    /// Returns a reference to the root node, if any.
    pub(crate) fn root(&self) -> Option<&Node<T>> {
        self.root.as_deref()
    }

    /// Returns the smallest key in the tree.
    pub(crate) fn first(&self) -> Option<&T> {
        let mut current = self.root()?;
        while let Some(left) = current.left() {
            current = left;
        }
        Some(current.key())
    }

    /// Returns the largest key in the tree.
    pub(crate) fn last(&self) -> Option<&T> {
        let mut current = self.root()?;
        while let Some(right) = current.right() {
            current = right;
        }
        Some(current.key())
    }

    /// Gets an element by its rank (0-indexed position in the duplicate-expanded sorted order).
    pub(crate) fn get_by_rank(&self, rank: usize) -> Option<&T> {
        if rank >= self.len() {
            return None;
        }

        let mut current = self.root();
        let mut remaining = rank;

        while let Some(node) = current {
            let left_weight = node.left().map_or(0, Node::weight);
            if remaining < left_weight {
                current = node.left();
            } else if remaining < left_weight + node.count() {
                // The rank falls inside this node's block of duplicates.
                return Some(node.key());
            } else {
                remaining -= left_weight + node.count();
                current = node.right();
            }
        }

        debug_assert!(false, "get_by_rank: tree weight invariant violated - rank {rank} not found");
        None
    }
}

impl<T: Ord> RawAvlTree<T> {
    /// Searches for a key and returns its node if present.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<&Node<T>>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root();
        while let Some(node) = current {
            current = match key.cmp(node.key().borrow()) {
                Less => node.left(),
                Greater => node.right(),
                Equal => return Some(node),
            };
        }
        None
    }

    /// Returns true if the tree contains the specified key.
    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).is_some()
    }

    /// Returns the multiplicity of the specified key.
    pub(crate) fn count<Q>(&self, key: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).map_or(0, Node::count)
    }

    /// Returns the number of elements strictly less than `key`.
    pub(crate) fn rank_of<Q>(&self, key: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut rank = 0;
        let mut current = self.root();
        while let Some(node) = current {
            let left_weight = node.left().map_or(0, Node::weight);
            match key.cmp(node.key().borrow()) {
                Less => current = node.left(),
                Equal => return rank + left_weight,
                Greater => {
                    rank += left_weight + node.count();
                    current = node.right();
                }
            }
        }
        rank
    }

    /// Adds one occurrence of `key`.
    pub(crate) fn insert(&mut self, key: T) {
        self.root = Some(insert(self.root.take(), key));
    }

    /// Removes one occurrence of `key`. Returns true if the key was present.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (root, removed) = remove(self.root.take(), key, Removal::One);
        self.root = root;
        removed > 0
    }

    /// Removes every occurrence of `key`. Returns how many were removed.
    pub(crate) fn remove_all<Q>(&mut self, key: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (root, removed) = remove(self.root.take(), key, Removal::All);
        self.root = root;
        removed
    }
}

/// Inserts `key` below `link` and returns the new subtree root.
fn insert<T: Ord>(link: Link<T>, key: T) -> Box<Node<T>> {
    let Some(mut node) = link else {
        trace!("insert: new node");
        return Node::new(key);
    };

    match key.cmp(&node.key) {
        Equal => {
            // Same shape, one more occurrence.
            node.count = node.count.increment();
            node.weight = node.weight.increment();
            node
        }
        Less => {
            node.left = Some(insert(node.left.take(), key));
            rebalance(node)
        }
        Greater => {
            node.right = Some(insert(node.right.take(), key));
            rebalance(node)
        }
    }
}

/// Removes occurrences of `key` below `link`.
///
/// Returns the new subtree root and the number of occurrences removed. Every ancestor on the search
/// path is rebalanced, so a single removal may rotate at several levels.
fn remove<T, Q>(link: Link<T>, key: &Q, removal: Removal) -> (Link<T>, usize)
where
    T: Borrow<Q>,
    Q: ?Sized + Ord,
{
    let Some(mut node) = link else {
        return (None, 0);
    };

    match key.cmp(node.key.borrow()) {
        Less => {
            let (left, removed) = remove(node.left.take(), key, removal);
            node.left = left;
            (Some(rebalance(node)), removed)
        }
        Greater => {
            let (right, removed) = remove(node.right.take(), key, removal);
            node.right = right;
            (Some(rebalance(node)), removed)
        }
        Equal => {
            if removal == Removal::One
                && let Some(count) = node.count.decrement()
            {
                node.count = count;
                node.update();
                return (Some(node), 1);
            }

            let removed = node.count.get();
            trace!("remove: unlinking node holding {removed} occurrence(s)");
            let subtree = match (node.left.take(), node.right.take()) {
                (None, None) => None,
                (Some(child), None) | (None, Some(child)) => Some(child),
                (Some(left), Some(right)) => {
                    let (right, mut successor) = take_min(right);
                    trace!("remove: promoting in-order successor holding {} occurrence(s)", successor.count.get());
                    successor.left = Some(left);
                    successor.right = right;
                    Some(rebalance(successor))
                }
            };
            (subtree, removed)
        }
    }
}

/// Detaches the leftmost node of `node`'s subtree.
///
/// Returns the rebalanced remainder of the subtree and the detached node. The detached node keeps
/// its key and count; its links are cleared and its cached shape is stale until it is relinked.
fn take_min<T>(mut node: Box<Node<T>>) -> (Link<T>, Box<Node<T>>) {
    match node.left.take() {
        Some(left) => {
            let (left, min) = take_min(left);
            node.left = left;
            (Some(rebalance(node)), min)
        }
        None => {
            let right = node.right.take();
            (right, node)
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    impl<T: Ord + core::fmt::Debug> RawAvlTree<T> {
        /// Validates all AVL invariants. Panics with a descriptive message if any are violated.
        /// This is intended for use in tests to catch tree corruption.
        pub(crate) fn validate_invariants(&self) {
            let mut errors: Vec<String> = Vec::new();
            let (_, total) = Self::validate_node(self.root(), None, None, &mut errors);
            if total != self.len() {
                errors.push(alloc::format!("len mismatch: len={}, counted={}", self.len(), total));
            }
            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        // Returns (height, weight) recomputed from scratch.
        fn validate_node(node: Option<&Node<T>>, lower: Option<&T>, upper: Option<&T>, errors: &mut Vec<String>) -> (i32, usize) {
            let Some(node) = node else {
                return (-1, 0);
            };

            if lower.is_some_and(|lower| node.key() <= lower) || upper.is_some_and(|upper| node.key() >= upper) {
                errors.push(alloc::format!("BST ordering violated at key {:?}", node.key()));
            }

            let (left_height, left_weight) = Self::validate_node(node.left(), lower, Some(node.key()), errors);
            let (right_height, right_weight) = Self::validate_node(node.right(), Some(node.key()), upper, errors);

            let height = 1 + left_height.max(right_height);
            let weight = left_weight + right_weight + node.count();

            if (left_height - right_height).abs() > 1 {
                errors.push(alloc::format!(
                    "AVL balance violated at key {:?}: left height {}, right height {}",
                    node.key(),
                    left_height,
                    right_height
                ));
            }
            if node.height != height {
                errors.push(alloc::format!("height mismatch at key {:?}: cached {}, actual {}", node.key(), node.height, height));
            }
            if node.weight() != weight {
                errors.push(alloc::format!("weight mismatch at key {:?}: cached {}, actual {}", node.key(), node.weight(), weight));
            }
            if node.count() == 0 {
                errors.push(alloc::format!("zero multiplicity at key {:?}", node.key()));
            }

            (height, weight)
        }

        fn height(&self) -> i32 {
            self.root().map_or(-1, |root| root.height)
        }

        fn expanded(&self) -> Vec<&T> {
            fn walk<'a, T>(node: Option<&'a Node<T>>, out: &mut Vec<&'a T>) {
                if let Some(node) = node {
                    walk(node.left(), out);
                    out.extend(core::iter::repeat_n(node.key(), node.count()));
                    walk(node.right(), out);
                }
            }

            let mut out = Vec::new();
            walk(self.root(), &mut out);
            out
        }
    }

    #[test]
    fn ascending_insertions_stay_logarithmic() {
        let mut tree = RawAvlTree::new();
        for key in 0..1023 {
            tree.insert(key);
            tree.validate_invariants();
        }
        // A perfect tree of 1023 nodes has height 9.
        assert_eq!(tree.height(), 9);
        assert_eq!(tree.len(), 1023);
    }

    #[test]
    fn duplicates_share_a_node() {
        let mut tree = RawAvlTree::new();
        for _ in 0..5 {
            tree.insert(42);
        }
        tree.validate_invariants();
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.count(&42), 5);
    }

    #[test]
    fn remove_two_child_node_promotes_successor() {
        let mut tree = RawAvlTree::new();
        for key in [4, 2, 6, 1, 3, 5, 7] {
            tree.insert(key);
        }
        assert_eq!(tree.root().map(Node::key), Some(&4));

        assert!(tree.remove(&4));
        tree.validate_invariants();
        assert_eq!(tree.root().map(Node::key), Some(&5));
        assert_eq!(tree.expanded(), vec![&1, &2, &3, &5, &6, &7]);
    }

    #[test]
    fn successor_keeps_its_multiplicity() {
        let mut tree = RawAvlTree::new();
        for key in [2, 1, 3, 3, 3] {
            tree.insert(key);
        }
        assert!(tree.remove(&2));
        tree.validate_invariants();
        assert_eq!(tree.count(&3), 3);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn removal_rotates_at_several_levels() {
        // Fibonacci-shaped tree: removing the lone leaf on the short side forces a rotation at
        // more than one ancestor.
        let mut tree = RawAvlTree::new();
        for key in [8, 5, 11, 3, 7, 10, 12, 2, 4, 6, 9, 1] {
            tree.insert(key);
        }
        tree.validate_invariants();
        assert_eq!(tree.height(), 4);

        assert!(tree.remove(&12));
        tree.validate_invariants();
        assert_eq!(tree.height(), 3);
        assert_eq!(tree.len(), 11);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut tree: RawAvlTree<i32> = RawAvlTree::new();
        assert!(!tree.remove(&42));
        assert!(tree.is_empty());

        tree.insert(1);
        assert!(!tree.remove(&42));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn remove_all_drops_the_node() {
        let mut tree = RawAvlTree::new();
        for key in [1, 2, 2, 2, 3] {
            tree.insert(key);
        }
        assert_eq!(tree.remove_all(&2), 3);
        assert_eq!(tree.remove_all(&2), 0);
        tree.validate_invariants();
        assert_eq!(tree.expanded(), vec![&1, &3]);
    }

    #[test]
    fn rank_queries_count_duplicates() {
        let mut tree = RawAvlTree::new();
        for key in [5, 1, 5, 3, 5] {
            tree.insert(key);
        }
        assert_eq!(tree.get_by_rank(0), Some(&1));
        assert_eq!(tree.get_by_rank(1), Some(&3));
        assert_eq!(tree.get_by_rank(2), Some(&5));
        assert_eq!(tree.get_by_rank(4), Some(&5));
        assert_eq!(tree.get_by_rank(5), None);

        assert_eq!(tree.rank_of(&0), 0);
        assert_eq!(tree.rank_of(&3), 1);
        assert_eq!(tree.rank_of(&4), 2);
        assert_eq!(tree.rank_of(&5), 2);
        assert_eq!(tree.rank_of(&6), 5);
    }

    #[test]
    fn first_and_last() {
        let mut tree = RawAvlTree::new();
        assert_eq!(tree.first(), None);
        assert_eq!(tree.last(), None);
        for key in [7, 3, 9, 1] {
            tree.insert(key);
        }
        assert_eq!(tree.first(), Some(&1));
        assert_eq!(tree.last(), Some(&9));
    }

    #[test]
    fn clear_empties_tree() {
        let mut tree = RawAvlTree::new();
        for key in 0..100 {
            tree.insert(key % 10);
        }
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(tree.root().is_none());
    }

    // Test operations enum for property testing
    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
        RemoveAll(i32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0i32..200).prop_map(Op::Insert),
            3 => (0i32..200).prop_map(Op::Remove),
            1 => (0i32..200).prop_map(Op::RemoveAll),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn tree_invariants_maintained_after_operations(ops in prop::collection::vec(op_strategy(), 0..500)) {
            let mut tree: RawAvlTree<i32> = RawAvlTree::new();

            for op in ops {
                match op {
                    Op::Insert(key) => tree.insert(key),
                    Op::Remove(key) => {
                        tree.remove(&key);
                    }
                    Op::RemoveAll(key) => {
                        tree.remove_all(&key);
                    }
                }
                tree.validate_invariants();
            }
        }

        #[test]
        fn get_by_rank_correctness(keys in prop::collection::vec(0i32..50, 1..200)) {
            let mut tree: RawAvlTree<i32> = RawAvlTree::new();
            for &key in &keys {
                tree.insert(key);
            }
            let mut expected = keys.clone();
            expected.sort_unstable();

            tree.validate_invariants();

            for (rank, expected_key) in expected.iter().enumerate() {
                prop_assert_eq!(tree.get_by_rank(rank), Some(expected_key), "get_by_rank({}) returned wrong key", rank);
            }
            prop_assert!(tree.get_by_rank(expected.len()).is_none());
        }

        #[test]
        fn rank_of_correctness(keys in prop::collection::vec(0i32..50, 0..200), probe in -5i32..55) {
            let mut tree: RawAvlTree<i32> = RawAvlTree::new();
            for &key in &keys {
                tree.insert(key);
            }
            let expected = keys.iter().filter(|&&key| key < probe).count();
            prop_assert_eq!(tree.rank_of(&probe), expected);
        }

        #[test]
        fn insert_then_remove_restores_len(keys in prop::collection::vec(0i32..100, 0..100), extra in 0i32..100) {
            let mut tree: RawAvlTree<i32> = RawAvlTree::new();
            for &key in &keys {
                tree.insert(key);
            }
            let len = tree.len();
            let contained = tree.contains(&extra);

            tree.insert(extra);
            prop_assert!(tree.remove(&extra));
            tree.validate_invariants();
            prop_assert_eq!(tree.len(), len);
            prop_assert_eq!(tree.contains(&extra), contained);
        }
    }
}
