use alloc::boxed::Box;
use core::cmp::max;

use log::trace;

use super::count::Count;

/// An owning link to a child subtree.
pub(crate) type Link<T> = Option<Box<Node<T>>>;

/// One distinct key together with its multiplicity and the cached shape of its subtree.
#[derive(Clone)]
pub(crate) struct Node<T> {
    pub(super) key: T,
    pub(super) left: Link<T>,
    pub(super) right: Link<T>,
    // 1 + max(height(left), height(right)); an absent subtree has height -1.
    pub(super) height: i32,
    // Occurrences of `key`.
    pub(super) count: Count,
    // Occurrences in the whole subtree: weight(left) + weight(right) + count.
    pub(super) weight: Count,
}

impl<T> Node<T> {
    /// Creates a leaf holding a single occurrence of `key`.
    pub(crate) fn new(key: T) -> Box<Self> {
        Box::new(Self {
            key,
            left: None,
            right: None,
            height: 0,
            count: Count::ONE,
            weight: Count::ONE,
        })
    }

    #[inline]
    pub(crate) fn key(&self) -> &T {
        &self.key
    }

    #[inline]
    pub(crate) fn count(&self) -> usize {
        self.count.get()
    }

    #[inline]
    pub(crate) fn weight(&self) -> usize {
        self.weight.get()
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<&Node<T>> {
        self.left.as_deref()
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<&Node<T>> {
        self.right.as_deref()
    }

    /// Recomputes `height` and `weight` from the children.
    #[inline]
    pub(crate) fn update(&mut self) {
        self.height = 1 + max(height(&self.left), height(&self.right));
        self.weight = Count::from_usize(weight(&self.left) + weight(&self.right) + self.count.get());
    }

    /// `height(left) - height(right)`.
    #[inline]
    pub(crate) fn balance_factor(&self) -> i32 {
        height(&self.left) - height(&self.right)
    }
}

#[inline]
pub(crate) fn height<T>(link: &Link<T>) -> i32 {
    link.as_ref().map_or(-1, |node| node.height)
}

#[inline]
pub(crate) fn weight<T>(link: &Link<T>) -> usize {
    link.as_ref().map_or(0, |node| node.weight.get())
}

/// Promotes the right child to subtree root. Returns the new root.
pub(crate) fn rotate_left<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let Some(mut pivot) = node.right.take() else {
        debug_assert!(false, "rotate_left: missing right child");
        return node;
    };
    node.right = pivot.left.take();
    node.update();
    pivot.left = Some(node);
    pivot.update();
    trace!("rotate_left: new subtree root of weight {}", pivot.weight());
    pivot
}

/// Promotes the left child to subtree root. Returns the new root.
pub(crate) fn rotate_right<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let Some(mut pivot) = node.left.take() else {
        debug_assert!(false, "rotate_right: missing left child");
        return node;
    };
    node.left = pivot.right.take();
    node.update();
    pivot.right = Some(node);
    pivot.update();
    trace!("rotate_right: new subtree root of weight {}", pivot.weight());
    pivot
}

/// Refreshes the bookkeeping of `node` and restores the AVL balance at it.
///
/// The children must already be balanced, with heights differing by at most two. Returns the new
/// subtree root.
pub(crate) fn rebalance<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    node.update();
    match node.balance_factor() {
        2 => {
            // Left-right: straighten the zig-zag first.
            if node.left.as_ref().is_some_and(|left| left.balance_factor() < 0) {
                node.left = node.left.take().map(rotate_left);
            }
            rotate_right(node)
        }
        -2 => {
            // Right-left.
            if node.right.as_ref().is_some_and(|right| right.balance_factor() > 0) {
                node.right = node.right.take().map(rotate_right);
            }
            rotate_left(node)
        }
        factor => {
            debug_assert!((-1..=1).contains(&factor), "rebalance: balance factor {factor} out of reach");
            node
        }
    }
}
