//! The shared ordered-BST core. Every public tree variant wraps a [`RawTree`]
//! and layers its own rebalancing on top of the primitives here: descent
//! insertion (ties routed left), descent search, the predecessor swap, the
//! single-child splice, and the two rotations.
//!
//! Nodes are heap-allocated and linked with raw pointers so that a vertex can
//! hold a back-reference to its parent; ownership is strictly top-down (the
//! tree owns the root, each node owns its children) and the parent link is
//! never followed for cleanup.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::ptr::NonNull;

/// A nullable edge between nodes. This is a separate type (instead of a bare
/// `Option<NonNull<Node>>`) so edges can be copied around and given helper
/// methods without spelling out the pointer plumbing at every use site.
pub(crate) struct Link<T, M>(pub(crate) Option<NonNull<Node<T, M>>>);

impl<T, M> Clone for Link<T, M> {
    fn clone(&self) -> Self {
        Self(self.0)
    }
}
impl<T, M> Copy for Link<T, M> {}

impl<T, M> Link<T, M> {
    pub(crate) fn empty() -> Self {
        Self(None)
    }

    pub(crate) fn to(node: NonNull<Node<T, M>>) -> Self {
        Self(Some(node))
    }

    pub(crate) fn is_empty(self) -> bool {
        self.0.is_none()
    }

    /// The left edge of the linked node, or an empty link.
    pub(crate) fn left(self) -> Self {
        // SAFETY: a non-empty link always points at a live node owned by the
        // tree this link was read from.
        self.0.map_or(Self(None), |p| unsafe { (*p.as_ptr()).left })
    }

    /// The right edge of the linked node, or an empty link.
    pub(crate) fn right(self) -> Self {
        // SAFETY: as in `left`.
        self.0.map_or(Self(None), |p| unsafe { (*p.as_ptr()).right })
    }

    /// The parent edge of the linked node, or an empty link.
    pub(crate) fn parent(self) -> Self {
        // SAFETY: as in `left`.
        self.0.map_or(Self(None), |p| unsafe { (*p.as_ptr()).parent })
    }
}

/// Which child slot of a parent a vertex occupies.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Side {
    Left,
    Right,
}

/// A single vertex: the stored element, the per-variant augmentation `M`
/// (nothing, a cached height, or a color), and its three edges.
pub(crate) struct Node<T, M> {
    pub(crate) element: T,
    pub(crate) meta: M,
    pub(crate) parent: Link<T, M>,
    pub(crate) left: Link<T, M>,
    pub(crate) right: Link<T, M>,
}

impl<T, M> Node<T, M> {
    /// Heap-allocates an isolated node and leaks it into a raw pointer. The
    /// tree that links the node takes over the obligation to free it.
    fn allocate(element: T, meta: M) -> NonNull<Self> {
        NonNull::from(Box::leak(Box::new(Node {
            element,
            meta,
            parent: Link::empty(),
            left: Link::empty(),
            right: Link::empty(),
        })))
    }
}

/// Height of the subtree hanging off `link`, computed recursively: -1 for an
/// empty link, 0 for a leaf.
pub(crate) fn subtree_height<T, M>(link: Link<T, M>) -> isize {
    match link.0 {
        None => -1,
        // SAFETY: non-empty links point at live nodes.
        Some(p) => unsafe {
            1 + subtree_height((*p.as_ptr()).left).max(subtree_height((*p.as_ptr()).right))
        },
    }
}

/// An ordered binary search tree over raw nodes. Maintains the ordering
/// invariant and the element count; knows nothing about balancing.
pub(crate) struct RawTree<T, M> {
    pub(crate) root: Link<T, M>,
    len: usize,
}

impl<T, M> RawTree<T, M> {
    pub(crate) fn new() -> Self {
        Self {
            root: Link::empty(),
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn height(&self) -> isize {
        subtree_height(self.root)
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::new();
    }

    /// Links a new node for `element` at the leaf position found by a descent
    /// from the root, routing ties to the left, and returns it. The caller is
    /// responsible for any rebalancing.
    pub(crate) fn insert(&mut self, element: T) -> NonNull<Node<T, M>>
    where
        T: Ord,
        M: Default,
    {
        let new = Node::allocate(element, M::default());
        let mut current = self.root;
        let mut parent = None;
        let mut went_left = false;

        while let Some(p) = current.0 {
            parent = Some(p);
            // SAFETY: the descent only touches nodes owned by this tree; the
            // new node is not linked yet, so no aliasing with `current`.
            let n = unsafe { &*p.as_ptr() };
            went_left = unsafe {
                matches!(
                    (*new.as_ptr()).element.cmp(&n.element),
                    Ordering::Less | Ordering::Equal
                )
            };
            current = if went_left { n.left } else { n.right };
        }

        match parent {
            None => self.root = Link::to(new),
            // SAFETY: `p` is the last node visited; `new` is freshly
            // allocated and pointed at by nothing else.
            Some(p) => unsafe {
                (*new.as_ptr()).parent = Link::to(p);
                if went_left {
                    (*p.as_ptr()).left = Link::to(new);
                } else {
                    (*p.as_ptr()).right = Link::to(new);
                }
            },
        }

        self.len += 1;
        new
    }

    /// Finds the first node holding `element` on the descent path from the
    /// root. Among duplicates this is "first found by descent", nothing more.
    pub(crate) fn search(&self, element: &T) -> Option<NonNull<Node<T, M>>>
    where
        T: Ord,
    {
        let mut current = self.root;
        while let Some(p) = current.0 {
            // SAFETY: the descent only touches nodes owned by this tree.
            let n = unsafe { &*p.as_ptr() };
            match element.cmp(&n.element) {
                Ordering::Less => current = n.left,
                Ordering::Equal => return Some(p),
                Ordering::Greater => current = n.right,
            }
        }
        None
    }

    /// Reduces a removal target to a node with at most one child. A node that
    /// already qualifies is returned as-is; a node with two children swaps
    /// elements with its in-order predecessor (the maximum of its left
    /// subtree, which has no right child) and the predecessor becomes the
    /// physical removal target.
    pub(crate) fn predecessor_swap(&mut self, node: NonNull<Node<T, M>>) -> NonNull<Node<T, M>> {
        // SAFETY: `node` and everything below it belong to this tree; the
        // predecessor is a strict descendant, so the two element borrows in
        // the swap never alias.
        unsafe {
            let (left, right) = ((*node.as_ptr()).left, (*node.as_ptr()).right);
            match (left.0, right.0) {
                (Some(left), Some(_)) => {
                    let mut pred = left;
                    while let Some(r) = (*pred.as_ptr()).right.0 {
                        pred = r;
                    }
                    std::mem::swap(&mut (*node.as_ptr()).element, &mut (*pred.as_ptr()).element);
                    pred
                }
                _ => node,
            }
        }
    }

    /// Unlinks a node with at most one child by promoting that child (or an
    /// empty link) into its slot, frees the node, and returns its element
    /// together with the parent link and the side the slot was on. The parent
    /// link is where an upward rebalancing walk starts.
    pub(crate) fn splice(&mut self, node: NonNull<Node<T, M>>) -> (T, Link<T, M>, Side) {
        // SAFETY: `node` belongs to this tree and, per the contract, has at
        // most one child. After the relink below nothing references it, so it
        // can be reclaimed exactly once.
        unsafe {
            let (left, right, parent) = {
                let n = &*node.as_ptr();
                (n.left, n.right, n.parent)
            };
            debug_assert!(left.is_empty() || right.is_empty());
            let child = if left.0.is_some() { left } else { right };

            let side = match parent.0 {
                None => {
                    self.root = child;
                    Side::Left
                }
                Some(p) => {
                    let pn = &mut *p.as_ptr();
                    if pn.left.0 == Some(node) {
                        pn.left = child;
                        Side::Left
                    } else {
                        pn.right = child;
                        Side::Right
                    }
                }
            };
            if let Some(c) = child.0 {
                (*c.as_ptr()).parent = parent;
            }

            self.len -= 1;
            let freed = *Box::from_raw(node.as_ptr());
            (freed.element, parent, side)
        }
    }

    /// Rotates left around `node`: its right child becomes the subtree root,
    /// `node` becomes that child's left child, and the child's old left
    /// subtree moves under `node`. No-op (returning `false`) without a right
    /// child. Preserves the in-order sequence.
    pub(crate) fn rotate_left(&mut self, node: NonNull<Node<T, M>>) -> bool {
        // SAFETY: all of `node`, its parent, the pivot and the moved subtree
        // root are distinct live nodes of this tree; each of the four edges
        // is rewritten exactly once.
        unsafe {
            let Some(pivot) = (*node.as_ptr()).right.0 else {
                return false;
            };
            let parent = (*node.as_ptr()).parent;
            let moved = (*pivot.as_ptr()).left;

            (*pivot.as_ptr()).left = Link::to(node);
            (*pivot.as_ptr()).parent = parent;
            (*node.as_ptr()).parent = Link::to(pivot);
            (*node.as_ptr()).right = moved;
            if let Some(m) = moved.0 {
                (*m.as_ptr()).parent = Link::to(node);
            }

            match parent.0 {
                None => self.root = Link::to(pivot),
                Some(p) => {
                    let pn = &mut *p.as_ptr();
                    if pn.right.0 == Some(node) {
                        pn.right = Link::to(pivot);
                    } else {
                        pn.left = Link::to(pivot);
                    }
                }
            }
            true
        }
    }

    /// Mirror image of [`rotate_left`](Self::rotate_left): the left child
    /// comes up, `node` goes down to the right.
    pub(crate) fn rotate_right(&mut self, node: NonNull<Node<T, M>>) -> bool {
        // SAFETY: as in `rotate_left`.
        unsafe {
            let Some(pivot) = (*node.as_ptr()).left.0 else {
                return false;
            };
            let parent = (*node.as_ptr()).parent;
            let moved = (*pivot.as_ptr()).right;

            (*pivot.as_ptr()).right = Link::to(node);
            (*pivot.as_ptr()).parent = parent;
            (*node.as_ptr()).parent = Link::to(pivot);
            (*node.as_ptr()).left = moved;
            if let Some(m) = moved.0 {
                (*m.as_ptr()).parent = Link::to(node);
            }

            match parent.0 {
                None => self.root = Link::to(pivot),
                Some(p) => {
                    let pn = &mut *p.as_ptr();
                    if pn.right.0 == Some(node) {
                        pn.right = Link::to(pivot);
                    } else {
                        pn.left = Link::to(pivot);
                    }
                }
            }
            true
        }
    }

    pub(crate) fn for_each_pre<F>(&self, visit: &mut F)
    where
        F: FnMut(NonNull<Node<T, M>>),
    {
        Self::walk_pre(self.root, visit);
    }

    fn walk_pre<F>(link: Link<T, M>, visit: &mut F)
    where
        F: FnMut(NonNull<Node<T, M>>),
    {
        if let Some(p) = link.0 {
            visit(p);
            Self::walk_pre(link.left(), visit);
            Self::walk_pre(link.right(), visit);
        }
    }

    pub(crate) fn for_each_in<F>(&self, visit: &mut F)
    where
        F: FnMut(NonNull<Node<T, M>>),
    {
        Self::walk_in(self.root, visit);
    }

    fn walk_in<F>(link: Link<T, M>, visit: &mut F)
    where
        F: FnMut(NonNull<Node<T, M>>),
    {
        if let Some(p) = link.0 {
            Self::walk_in(link.left(), visit);
            visit(p);
            Self::walk_in(link.right(), visit);
        }
    }

    pub(crate) fn for_each_post<F>(&self, visit: &mut F)
    where
        F: FnMut(NonNull<Node<T, M>>),
    {
        Self::walk_post(self.root, visit);
    }

    fn walk_post<F>(link: Link<T, M>, visit: &mut F)
    where
        F: FnMut(NonNull<Node<T, M>>),
    {
        if let Some(p) = link.0 {
            Self::walk_post(link.left(), visit);
            Self::walk_post(link.right(), visit);
            visit(p);
        }
    }

    /// Level-by-level traversal, left child before right.
    pub(crate) fn for_each_breadth<F>(&self, visit: &mut F)
    where
        F: FnMut(NonNull<Node<T, M>>),
    {
        let mut queue = VecDeque::new();
        if let Some(root) = self.root.0 {
            queue.push_back(root);
        }
        while let Some(p) = queue.pop_front() {
            visit(p);
            // SAFETY: queued pointers are nodes of this tree.
            unsafe {
                if let Some(l) = (*p.as_ptr()).left.0 {
                    queue.push_back(l);
                }
                if let Some(r) = (*p.as_ptr()).right.0 {
                    queue.push_back(r);
                }
            }
        }
    }

    fn eq_subtree(a: Link<T, M>, b: Link<T, M>) -> bool
    where
        T: PartialEq,
        M: PartialEq,
    {
        match (a.0, b.0) {
            (None, None) => true,
            // SAFETY: non-empty links point at live nodes of their trees.
            (Some(x), Some(y)) => unsafe {
                let x = &*x.as_ptr();
                let y = &*y.as_ptr();
                x.element == y.element
                    && x.meta == y.meta
                    && Self::eq_subtree(x.left, y.left)
                    && Self::eq_subtree(x.right, y.right)
            },
            _ => false,
        }
    }

    fn clone_subtree(link: Link<T, M>, parent: Link<T, M>) -> Link<T, M>
    where
        T: Clone,
        M: Clone,
    {
        match link.0 {
            None => Link::empty(),
            // SAFETY: `link` points into the source tree; the copies are
            // fresh allocations whose parent edges are rebuilt here, so the
            // cloned tree shares nothing with the source.
            Some(p) => unsafe {
                let src = &*p.as_ptr();
                let new = Node::allocate(src.element.clone(), src.meta.clone());
                (*new.as_ptr()).parent = parent;
                (*new.as_ptr()).left = Self::clone_subtree(src.left, Link::to(new));
                (*new.as_ptr()).right = Self::clone_subtree(src.right, Link::to(new));
                Link::to(new)
            },
        }
    }
}

/// Structural equality: same shape, equal elements and equal augmentation at
/// every position.
impl<T: PartialEq, M: PartialEq> PartialEq for RawTree<T, M> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && Self::eq_subtree(self.root, other.root)
    }
}

impl<T: Clone, M: Clone> Clone for RawTree<T, M> {
    fn clone(&self) -> Self {
        Self {
            root: Self::clone_subtree(self.root, Link::empty()),
            len: self.len,
        }
    }
}

impl<T, M> Drop for RawTree<T, M> {
    fn drop(&mut self) {
        // Iterative so a degenerate (pre-balancing) chain can't blow the
        // call stack.
        let mut stack = Vec::new();
        if let Some(root) = self.root.0.take() {
            stack.push(root);
        }
        while let Some(p) = stack.pop() {
            // SAFETY: every node is reachable from the root exactly once and
            // was allocated in `Node::allocate`, so each `from_raw` pairs
            // with exactly one allocation.
            let node = unsafe { Box::from_raw(p.as_ptr()) };
            if let Some(l) = node.left.0 {
                stack.push(l);
            }
            if let Some(r) = node.right.0 {
                stack.push(r);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_in_order(tree: &RawTree<i32, ()>) -> Vec<i32> {
        let mut out = Vec::new();
        tree.for_each_in(&mut |p| out.push(unsafe { (*p.as_ptr()).element }));
        out
    }

    /// Every child's parent edge must point back at the node linking it.
    fn assert_parents(link: Link<i32, ()>, expected: Link<i32, ()>) {
        if let Some(p) = link.0 {
            assert_eq!(link.parent().0, expected.0);
            unsafe {
                assert_parents((*p.as_ptr()).left, link);
                assert_parents((*p.as_ptr()).right, link);
            }
        }
    }

    #[test]
    fn ties_route_left() {
        let mut tree: RawTree<i32, ()> = RawTree::new();
        tree.insert(5);
        let dup = tree.insert(5);
        // The duplicate descends left of the original.
        assert_eq!(tree.root.left().0, Some(dup));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn splice_promotes_only_child() {
        let mut tree: RawTree<i32, ()> = RawTree::new();
        tree.insert(5);
        let two = tree.insert(2);
        tree.insert(1);

        let (element, parent, side) = tree.splice(two);
        assert_eq!(element, 2);
        assert_eq!(parent.0, tree.root.0);
        assert_eq!(side, Side::Left);
        assert_eq!(collect_in_order(&tree), vec![1, 5]);
        assert_parents(tree.root, Link::empty());
    }

    #[test]
    fn splice_root_updates_root() {
        let mut tree: RawTree<i32, ()> = RawTree::new();
        let root = tree.insert(5);
        tree.insert(9);

        let (element, parent, _) = tree.splice(root);
        assert_eq!(element, 5);
        assert!(parent.is_empty());
        assert_eq!(collect_in_order(&tree), vec![9]);
        assert!(tree.root.parent().is_empty());
    }

    #[test]
    fn rotations_preserve_in_order_and_parents() {
        let mut tree: RawTree<i32, ()> = RawTree::new();
        for x in [4, 2, 6, 1, 3, 5, 7] {
            tree.insert(x);
        }
        let root = tree.root.0.unwrap();

        assert!(tree.rotate_left(root));
        assert_eq!(collect_in_order(&tree), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(unsafe { (*tree.root.0.unwrap().as_ptr()).element }, 6);
        assert_parents(tree.root, Link::empty());

        assert!(tree.rotate_right(tree.root.0.unwrap()));
        assert_eq!(collect_in_order(&tree), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(unsafe { (*tree.root.0.unwrap().as_ptr()).element }, 4);
        assert_parents(tree.root, Link::empty());
    }

    #[test]
    fn rotation_without_pivot_is_noop() {
        let mut tree: RawTree<i32, ()> = RawTree::new();
        let root = tree.insert(1);
        assert!(!tree.rotate_right(root));
        assert_eq!(collect_in_order(&tree), vec![1]);
    }

    #[test]
    fn predecessor_swap_picks_max_of_left_subtree() {
        let mut tree: RawTree<i32, ()> = RawTree::new();
        let root = tree.insert(5);
        tree.insert(2);
        tree.insert(8);
        tree.insert(3);

        let pred = tree.predecessor_swap(root);
        // 3 is the in-order predecessor of 5; the elements swapped.
        assert_eq!(unsafe { (*pred.as_ptr()).element }, 5);
        assert_eq!(unsafe { (*root.as_ptr()).element }, 3);
        assert!(unsafe { (*pred.as_ptr()).right.is_empty() });
    }

    #[test]
    fn drop_handles_degenerate_chain() {
        let mut tree: RawTree<i32, ()> = RawTree::new();
        for x in 0..10_000 {
            tree.insert(x);
        }
        drop(tree);
    }
}
