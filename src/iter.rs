//! In-order iteration.

use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::raw::{Link, Node};

/// An in-order (sorted) iterator over the elements of a tree.
///
/// Uses an explicit stack of the not-yet-visited left spine instead of
/// recursion, so iteration cost is O(1) amortized per element and the call
/// stack stays flat on degenerate shapes.
pub struct Iter<'a, T, M> {
    stack: Vec<NonNull<Node<T, M>>>,
    current: Link<T, M>,
    _tree: PhantomData<&'a T>,
}

impl<T, M> Iter<'_, T, M> {
    pub(crate) fn new(root: Link<T, M>) -> Self {
        Self {
            stack: Vec::new(),
            current: root,
            _tree: PhantomData,
        }
    }
}

impl<'a, T, M> Iterator for Iter<'a, T, M> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        while let Some(p) = self.current.0 {
            self.stack.push(p);
            self.current = self.current.left();
        }
        let p = self.stack.pop()?;
        // SAFETY: the iterator borrows the tree for 'a, so every stacked
        // pointer stays valid and the tree cannot be mutated under us.
        unsafe {
            self.current = (*p.as_ptr()).right;
            Some(&(*p.as_ptr()).element)
        }
    }
}
