//! Read-only vertex handles.
//!
//! A [`Vertex`] is a cheap, copyable view of one vertex of a tree, borrowed
//! from the tree that owns it. While any handle is alive the tree cannot be
//! mutated, so a handle can never observe a half-rebalanced structure or
//! outlive the vertex it points at.

use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::error::Error;
use crate::raw::{subtree_height, Node};

/// A handle to a single vertex of a tree.
///
/// The `M` parameter is the tree variant's vertex augmentation; it only shows
/// up in the types, and variant modules export their own `Vertex<'a, T>`
/// alias so callers never spell it out.
#[derive(Debug)]
pub struct Vertex<'a, T, M> {
    node: NonNull<Node<T, M>>,
    _tree: PhantomData<&'a Node<T, M>>,
}

impl<T, M> Clone for Vertex<'_, T, M> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T, M> Copy for Vertex<'_, T, M> {}

impl<'a, T, M> Vertex<'a, T, M> {
    pub(crate) fn new(node: NonNull<Node<T, M>>) -> Self {
        Self {
            node,
            _tree: PhantomData,
        }
    }

    pub(crate) fn raw(&self) -> NonNull<Node<T, M>> {
        self.node
    }

    fn node(&self) -> &'a Node<T, M> {
        // SAFETY: the handle borrows the tree for 'a, and the tree cannot be
        // mutated (or dropped) while that borrow lives, so the pointee stays
        // valid and unaliased by any `&mut`.
        unsafe { &*self.node.as_ptr() }
    }

    /// The element stored at this vertex.
    pub fn element(&self) -> &'a T {
        &self.node().element
    }

    /// Whether this vertex has a parent (i.e. is not the root).
    pub fn has_parent(&self) -> bool {
        !self.node().parent.is_empty()
    }

    /// Whether this vertex has a left child.
    pub fn has_left(&self) -> bool {
        !self.node().left.is_empty()
    }

    /// Whether this vertex has a right child.
    pub fn has_right(&self) -> bool {
        !self.node().right.is_empty()
    }

    /// The parent of this vertex, or [`Error::NoSuchVertex`] at the root.
    pub fn parent(&self) -> Result<Self, Error> {
        self.node()
            .parent
            .0
            .map(Self::new)
            .ok_or(Error::NoSuchVertex)
    }

    /// The left child, or [`Error::NoSuchVertex`] if there is none.
    pub fn left(&self) -> Result<Self, Error> {
        self.node().left.0.map(Self::new).ok_or(Error::NoSuchVertex)
    }

    /// The right child, or [`Error::NoSuchVertex`] if there is none.
    pub fn right(&self) -> Result<Self, Error> {
        self.node()
            .right
            .0
            .map(Self::new)
            .ok_or(Error::NoSuchVertex)
    }

    /// Height of the subtree rooted here: 0 for a leaf, computed over the
    /// actual structure (not any cached bookkeeping).
    pub fn height(&self) -> isize {
        subtree_height(crate::raw::Link::to(self.node))
    }

    /// Distance from the root: 0 for the root itself.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.node().parent;
        while let Some(p) = current.0 {
            depth += 1;
            // SAFETY: parent links of a live tree point at live nodes.
            current = unsafe { (*p.as_ptr()).parent };
        }
        depth
    }
}
