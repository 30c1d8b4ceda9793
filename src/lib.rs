//! An ordered, duplicate-counting multiset for Rust backed by an AVL tree.
//!
//! This crate provides [`AvlMultiset`], a sorted bag of values where each distinct value is stored
//! once together with its multiplicity. Every subtree caches the number of logical elements it
//! holds, so in addition to membership, insertion and removal the multiset answers order-statistic
//! queries in O(log n):
//!
//! - [`k_order_statistic`](AvlMultiset::k_order_statistic) - The k-th smallest element (1-indexed,
//!   duplicates counted)
//! - [`get_by_rank`](AvlMultiset::get_by_rank) - The element at a zero-based sorted position
//! - [`rank_of`](AvlMultiset::rank_of) - The number of elements strictly less than a value
//! - Indexing by [`Rank`] - e.g., `set[Rank(0)]` for the smallest element
//!
//! # Example
//!
//! ```
//! use avl_multiset::{AvlMultiset, Rank};
//!
//! let mut bag = AvlMultiset::new();
//! for value in [5, 6, 4, 4, 6, 6, 5, 4] {
//!     bag.insert(value);
//! }
//!
//! assert_eq!(bag.len(), 8);
//! assert_eq!(bag.count(&4), 3);
//!
//! // 1-indexed, duplicates counted: 4 4 4 5 5 6 6 6
//! assert_eq!(bag.k_order_statistic(4), Ok(&5));
//! assert!(bag.k_order_statistic(9).is_err());
//!
//! // Zero-based rank access
//! assert_eq!(bag[Rank(7)], 6);
//!
//! bag.remove(&6);
//! assert_eq!(bag.to_string(), "4 4 4 5 5 6 6");
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Logarithmic depth** - The AVL discipline keeps every operation O(log n) regardless of
//!   insertion order
//! - **Duplicate aware** - Repeated values share a node; only the multiplicity changes
//! - **O(1) size** - The total element count is the cached weight of the root
//!
//! # Implementation
//!
//! Nodes are boxed and exclusively owned by their parent. Every mutation is a recursive function
//! that consumes a subtree and returns its new root, recomputing height and weight on the way back
//! up and rotating wherever the balance factor leaves `{-1, 0, 1}`.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod order_statistic;
mod raw;

pub mod multiset;

pub use multiset::AvlMultiset;
pub use order_statistic::{OrderStatisticError, Rank};
