//! This crate exposes a family of ordered Binary Search Trees (BSTs)
//! sharing one linked core, mostly for educational purposes.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored elements. The trees here are built from
//! vertices, where each vertex stores one element and links to up to two
//! child vertices and back to its parent. The ordering invariant is:
//!
//! 1. For every vertex, all the vertices in its left subtree have elements
//!    less than *or equal to* its own element.
//! 2. For every vertex, all the vertices in its right subtree have elements
//!    greater than its own element.
//!
//! > Ties routing left makes these trees ordered *multisets*: inserting an
//! > element twice stores it twice, and searches among duplicates find "the
//! > first vertex on the descent path from the root", nothing stronger.
//!
//! Searching takes `O(height)` (where `height` is the longest path from the
//! root vertex to a leaf), so the interesting question is how tall the tree
//! gets. Three answers are provided, each in its own module with the same
//! surface:
//!
//! - [`ordered::Tree`] keeps only the ordering invariant and makes no
//!   height guarantee. It is the one variant that lets callers rotate
//!   subtrees themselves.
//! - [`avl::Tree`] caches a height per vertex and rotates after every
//!   mutation so sibling subtree heights never differ by more than one.
//! - [`redblack::Tree`] colors each vertex red or black and restores the
//!   red-black rules after every mutation.
//!
//! Both balanced variants keep the height in `O(lg N)` for `N` elements.
//!
//! Trees hand out [`vertex::Vertex`] handles: cheap copyable references to
//! a single vertex that can walk to its parent and children and report its
//! height and depth. A handle borrows the tree, so it can never outlive the
//! structure it points into or witness a mutation.
//!
//! # Examples
//!
//! ```
//! use balanced_bst::avl::Tree;
//!
//! let mut tree = Tree::new();
//! for word in ["pear", "apple", "quince", "fig"] {
//!     tree.insert(word);
//! }
//!
//! assert_eq!(tree.len(), 4);
//! assert!(tree.contains(&"fig"));
//!
//! // In-order iteration is sorted.
//! let words: Vec<_> = tree.iter().copied().collect();
//! assert_eq!(words, ["apple", "fig", "pear", "quince"]);
//!
//! tree.remove(&"pear");
//! assert_eq!(tree.len(), 3);
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod avl;
mod error;
pub mod iter;
pub mod ordered;
mod raw;
pub mod redblack;
pub mod vertex;

pub use error::Error;

#[cfg(test)]
mod test;
