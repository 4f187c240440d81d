//! A plain ordered binary search tree, with no rebalancing.
//!
//! This is the base of the family: it keeps the ordering invariant (every
//! element in a vertex's left subtree compares less than or equal to the
//! vertex, every element in the right subtree compares greater — ties route
//! left, so the tree is an ordered *multiset*) but makes no height guarantee.
//! The balanced variants in [`avl`](crate::avl) and
//! [`redblack`](crate::redblack) reuse exactly these mutations and add a
//! fix-up pass on top.
//!
//! Unlike the balanced variants, this tree exposes *working* rotation
//! operations, since there is no balance invariant for them to break.
//!
//! # Examples
//!
//! ```
//! use balanced_bst::ordered::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert!(!tree.contains(&1));
//!
//! tree.insert(1);
//! assert!(tree.contains(&1));
//!
//! // Removing a vertex hands its element back.
//! assert_eq!(tree.remove(&1), Some(1));
//! assert!(!tree.contains(&1));
//! ```

use crate::error::Error;
use crate::iter::Iter;
use crate::raw::RawTree;

/// The vertex handle handed out by [`Tree`]. See [`crate::vertex::Vertex`].
pub type Vertex<'a, T> = crate::vertex::Vertex<'a, T, ()>;

/// An ordered binary search tree without self-balancing.
pub struct Tree<T> {
    raw: RawTree<T, ()>,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    /// Creates a new, empty tree.
    pub fn new() -> Self {
        Self {
            raw: RawTree::new(),
        }
    }

    /// The number of elements in the tree, counting duplicates.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether the tree holds no elements.
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// The height of the tree: -1 when empty, 0 for a single vertex.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_bst::ordered::Tree;
    ///
    /// let mut tree = Tree::new();
    /// assert_eq!(tree.height(), -1);
    ///
    /// tree.insert(1);
    /// assert_eq!(tree.height(), 0);
    /// ```
    pub fn height(&self) -> isize {
        self.raw.height()
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// The root vertex, or [`Error::EmptyTree`] on an empty tree.
    pub fn root(&self) -> Result<Vertex<'_, T>, Error> {
        self.raw.root.0.map(Vertex::new).ok_or(Error::EmptyTree)
    }

    /// An in-order (sorted) iterator over the elements.
    pub fn iter(&self) -> Iter<'_, T, ()> {
        Iter::new(self.raw.root)
    }

    /// Visits every vertex in pre-order (vertex, left subtree, right
    /// subtree).
    pub fn pre_order<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(Vertex<'a, T>),
    {
        self.raw.for_each_pre(&mut |p| visit(Vertex::new(p)));
    }

    /// Visits every vertex in-order (left subtree, vertex, right subtree);
    /// elements are visited in non-decreasing order.
    pub fn in_order<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(Vertex<'a, T>),
    {
        self.raw.for_each_in(&mut |p| visit(Vertex::new(p)));
    }

    /// Visits every vertex in post-order (left subtree, right subtree,
    /// vertex).
    pub fn post_order<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(Vertex<'a, T>),
    {
        self.raw.for_each_post(&mut |p| visit(Vertex::new(p)));
    }

    /// Visits every vertex level by level, left to right.
    pub fn breadth_first<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(Vertex<'a, T>),
    {
        self.raw.for_each_breadth(&mut |p| visit(Vertex::new(p)));
    }
}

impl<T: Ord> Tree<T> {
    /// Inserts `element` at the leaf position found by descending from the
    /// root (ties go left) and returns a handle to the new vertex.
    ///
    /// The handle is only guaranteed meaningful immediately after insertion;
    /// the borrow it carries enforces exactly that.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_bst::ordered::Tree;
    ///
    /// let mut tree = Tree::new();
    /// let vertex = tree.insert(7);
    /// assert_eq!(*vertex.element(), 7);
    /// assert!(!vertex.has_parent()); // it became the root
    /// ```
    pub fn insert(&mut self, element: T) -> Vertex<'_, T> {
        Vertex::new(self.raw.insert(element))
    }

    /// Finds the first vertex holding `element` on the descent path from the
    /// root. Among duplicates no stronger guarantee than "first found by this
    /// descent" is made.
    pub fn search(&self, element: &T) -> Option<Vertex<'_, T>> {
        self.raw.search(element).map(Vertex::new)
    }

    /// Whether some vertex holds `element`.
    pub fn contains(&self, element: &T) -> bool {
        self.raw.search(element).is_some()
    }

    /// Removes the first vertex found holding `element` and returns the
    /// element, or `None` (leaving the tree untouched) when absent.
    ///
    /// A vertex with two children is first reduced: its element is swapped
    /// with its in-order predecessor's (the maximum of the left subtree,
    /// which has at most one child), and the predecessor is spliced out by
    /// promoting its only child.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_bst::ordered::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(2);
    /// tree.insert(1);
    /// tree.insert(3);
    ///
    /// assert_eq!(tree.remove(&2), Some(2));
    /// assert_eq!(tree.remove(&2), None);
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn remove(&mut self, element: &T) -> Option<T> {
        let found = self.raw.search(element)?;
        let target = self.raw.predecessor_swap(found);
        let (element, _, _) = self.raw.splice(target);
        Some(element)
    }

    /// Rotates left around the first vertex holding `element`: its right
    /// child comes up, the vertex goes down to the left. In-order sequence is
    /// preserved. Silently does nothing when the vertex has no right child;
    /// fails with [`Error::NoSuchVertex`] when no vertex holds `element`.
    pub fn rotate_left(&mut self, element: &T) -> Result<(), Error> {
        let node = self.raw.search(element).ok_or(Error::NoSuchVertex)?;
        self.raw.rotate_left(node);
        Ok(())
    }

    /// Mirror image of [`rotate_left`](Self::rotate_left).
    pub fn rotate_right(&mut self, element: &T) -> Result<(), Error> {
        let node = self.raw.search(element).ok_or(Error::NoSuchVertex)?;
        self.raw.rotate_right(node);
        Ok(())
    }
}

impl<T: Clone> Clone for Tree<T> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
        }
    }
}

/// Structural equality: same shape and equal elements vertex by vertex, not
/// just the same element multiset.
impl<T: PartialEq> PartialEq for Tree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Tree<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
