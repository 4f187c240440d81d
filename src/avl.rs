//! An AVL tree: an ordered binary search tree where every vertex's two
//! subtrees differ in height by at most one.
//!
//! Mutations are the plain BST ones from [`ordered`](crate::ordered),
//! followed by a bottom-up walk that refreshes each vertex's cached height
//! and repairs any vertex that went out of balance with one or two
//! rotations. The walk keeps the tree's height at O(log n), so searches,
//! insertions, and removals are all O(log n).
//!
//! Because the balance invariant depends on the exact shape, external
//! rotations are not allowed: [`Tree::rotate_left`] and
//! [`Tree::rotate_right`] always fail with [`Error::UnsupportedRotation`].
//!
//! # Examples
//!
//! ```
//! use balanced_bst::avl::Tree;
//!
//! let mut tree = Tree::new();
//! for x in 1..=7 {
//!     tree.insert(x);
//! }
//!
//! // Ascending insertion would give a plain BST height 6; the AVL tree
//! // stays perfectly balanced here.
//! assert_eq!(tree.height(), 2);
//! assert_eq!(*tree.root().unwrap().element(), 4);
//! ```

use std::ptr::NonNull;

use crate::error::Error;
use crate::iter::Iter;
use crate::raw::{Link, Node, RawTree};

/// Per-vertex bookkeeping for AVL balancing: the cached height of the
/// subtree rooted at the vertex. A freshly inserted leaf has height 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AvlMeta {
    height: isize,
}

/// The vertex handle handed out by [`Tree`]. See [`crate::vertex::Vertex`].
pub type Vertex<'a, T> = crate::vertex::Vertex<'a, T, AvlMeta>;

/// A self-balancing AVL tree.
pub struct Tree<T> {
    raw: RawTree<T, AvlMeta>,
}

/// Cached height of the subtree behind `link`; -1 for an empty link.
fn link_height<T>(link: Link<T, AvlMeta>) -> isize {
    match link.0 {
        // SAFETY: callers only hand in links owned by their tree.
        Some(p) => unsafe { (*p.as_ptr()).meta.height },
        None => -1,
    }
}

/// Recomputes `node`'s cached height from its children's cached heights.
fn update_height<T>(node: NonNull<Node<T, AvlMeta>>) {
    // SAFETY: `node` is owned by the caller's tree; children are distinct
    // nodes, so the reads don't alias the write.
    unsafe {
        let (left, right) = ((*node.as_ptr()).left, (*node.as_ptr()).right);
        (*node.as_ptr()).meta.height = 1 + link_height(left).max(link_height(right));
    }
}

/// Left height minus right height. In balance when in `-1..=1`.
fn balance_of<T>(node: NonNull<Node<T, AvlMeta>>) -> isize {
    // SAFETY: `node` is owned by the caller's tree.
    let (left, right) = unsafe { ((*node.as_ptr()).left, (*node.as_ptr()).right) };
    link_height(left) - link_height(right)
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

    /// The height of the tree: -1 when empty. Read from the root's cached
    /// height, so this is O(1).
    pub fn height(&self) -> isize {
        link_height(self.raw.root)
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
    pub fn iter(&self) -> Iter<'_, T, AvlMeta> {
        Iter::new(self.raw.root)
    }

    /// Visits every vertex in pre-order.
    pub fn pre_order<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(Vertex<'a, T>),
    {
        self.raw.for_each_pre(&mut |p| visit(Vertex::new(p)));
    }

    /// Visits every vertex in-order; elements are visited in non-decreasing
    /// order.
    pub fn in_order<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(Vertex<'a, T>),
    {
        self.raw.for_each_in(&mut |p| visit(Vertex::new(p)));
    }

    /// Visits every vertex in post-order.
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

    /// Walks from `start` to the root, refreshing cached heights and
    /// rotating any vertex whose balance reaches ±2 back into balance.
    ///
    /// A vertex can only be off by exactly 2 here: one BST mutation changes
    /// a subtree height by at most 1, and each repaired vertex is back in
    /// balance before the walk moves up.
    fn rebalance_from(&mut self, start: Link<T, AvlMeta>) {
        let mut current = start;
        while let Some(node) = current.0 {
            update_height(node);
            let balance = balance_of(node);

            if balance == -2 {
                // SAFETY: balance -2 implies a right subtree of height >= 1,
                // so the right child exists.
                let right = unsafe { (*node.as_ptr()).right.0 }
                    .expect("right-heavy vertex must have a right child");
                if balance_of(right) == 1 {
                    // Zig-zag: straighten the right child first.
                    self.raw.rotate_right(right);
                    update_height(right);
                    // SAFETY: a rotation always leaves the pivot with a
                    // parent (its old left child).
                    update_height(unsafe {
                        (*right.as_ptr())
                            .parent
                            .0
                            .expect("rotated vertex must have a parent")
                    });
                }
                self.raw.rotate_left(node);
                update_height(node);
                // SAFETY: as above, the pivot now hangs under its old child.
                update_height(unsafe {
                    (*node.as_ptr())
                        .parent
                        .0
                        .expect("rotated vertex must have a parent")
                });
            } else if balance == 2 {
                // SAFETY: balance 2 implies a left subtree of height >= 1.
                let left = unsafe { (*node.as_ptr()).left.0 }
                    .expect("left-heavy vertex must have a left child");
                if balance_of(left) == -1 {
                    self.raw.rotate_left(left);
                    update_height(left);
                    // SAFETY: as in the mirror case.
                    update_height(unsafe {
                        (*left.as_ptr())
                            .parent
                            .0
                            .expect("rotated vertex must have a parent")
                    });
                }
                self.raw.rotate_right(node);
                update_height(node);
                // SAFETY: as in the mirror case.
                update_height(unsafe {
                    (*node.as_ptr())
                        .parent
                        .0
                        .expect("rotated vertex must have a parent")
                });
            }

            // After a repair `node` sits below the subtree root, so its
            // parent link still leads toward the old position's ancestors.
            // SAFETY: `node` is owned by this tree.
            current = unsafe { (*node.as_ptr()).parent };
        }

        #[cfg(debug_assertions)]
        self.check_balance(self.raw.root);
    }

    #[cfg(debug_assertions)]
    fn check_balance(&self, link: Link<T, AvlMeta>) -> isize {
        let Some(node) = link.0 else { return -1 };
        // SAFETY: the walk only touches nodes owned by this tree.
        let (left, right, cached) = unsafe {
            let n = &*node.as_ptr();
            (n.left, n.right, n.meta.height)
        };
        let lh = self.check_balance(left);
        let rh = self.check_balance(right);
        assert!((lh - rh).abs() <= 1, "balance invariant violated");
        assert_eq!(cached, 1 + lh.max(rh), "cached height out of date");
        cached
    }
}

impl<T: Ord> Tree<T> {
    /// Inserts `element`, rebalances, and returns a handle to the new
    /// vertex.
    ///
    /// The handle is taken before rebalancing moves anything, so it always
    /// refers to the vertex holding the inserted element, wherever the
    /// rotations left it.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_bst::avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1);
    /// tree.insert(2);
    /// let vertex = tree.insert(3);
    ///
    /// // Inserting 3 forced a rotation; 2 is now the root and the new
    /// // vertex its right child.
    /// assert_eq!(*vertex.element(), 3);
    /// assert_eq!(*vertex.parent().unwrap().element(), 2);
    /// ```
    pub fn insert(&mut self, element: T) -> Vertex<'_, T> {
        let new = self.raw.insert(element);
        // SAFETY: `new` was just linked into this tree.
        let parent = unsafe { (*new.as_ptr()).parent };
        self.rebalance_from(parent);
        Vertex::new(new)
    }

    /// Finds the first vertex holding `element` on the descent path from the
    /// root.
    pub fn search(&self, element: &T) -> Option<Vertex<'_, T>> {
        self.raw.search(element).map(Vertex::new)
    }

    /// Whether some vertex holds `element`.
    pub fn contains(&self, element: &T) -> bool {
        self.raw.search(element).is_some()
    }

    /// Removes the first vertex found holding `element`, rebalances, and
    /// returns the element; `None` (leaving the tree untouched) when absent.
    pub fn remove(&mut self, element: &T) -> Option<T> {
        let found = self.raw.search(element)?;
        let target = self.raw.predecessor_swap(found);
        let (element, parent, _) = self.raw.splice(target);
        self.rebalance_from(parent);
        Some(element)
    }

    /// Always fails: rotating an AVL tree from outside would break the
    /// balance invariant its other operations rely on.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_bst::{avl::Tree, Error};
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1);
    /// assert_eq!(tree.rotate_left(&1), Err(Error::UnsupportedRotation));
    /// ```
    pub fn rotate_left(&mut self, _element: &T) -> Result<(), Error> {
        Err(Error::UnsupportedRotation)
    }

    /// Always fails, like [`rotate_left`](Self::rotate_left).
    pub fn rotate_right(&mut self, _element: &T) -> Result<(), Error> {
        Err(Error::UnsupportedRotation)
    }
}

impl<T: Clone> Clone for Tree<T> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
        }
    }
}

/// Structural equality: same shape, equal elements, and equal cached
/// heights vertex by vertex.
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

#[cfg(test)]
mod tests {
    use super::*;

    fn in_order(tree: &Tree<i32>) -> Vec<i32> {
        tree.iter().copied().collect()
    }

    fn breadth(tree: &Tree<i32>) -> Vec<i32> {
        let mut out = Vec::new();
        tree.breadth_first(|v| out.push(*v.element()));
        out
    }

    #[test]
    fn ascending_insertion_stays_balanced() {
        let mut tree = Tree::new();
        for x in 1..=7 {
            tree.insert(x);
        }
        assert_eq!(tree.height(), 2);
        assert_eq!(breadth(&tree), vec![4, 2, 6, 1, 3, 5, 7]);
    }

    #[test]
    fn zig_zag_insertion_double_rotates() {
        let mut tree = Tree::new();
        tree.insert(30);
        tree.insert(10);
        tree.insert(20);
        assert_eq!(breadth(&tree), vec![20, 10, 30]);
        assert_eq!(tree.height(), 1);

        let mut tree = Tree::new();
        tree.insert(10);
        tree.insert(30);
        tree.insert(20);
        assert_eq!(breadth(&tree), vec![20, 10, 30]);
    }

    #[test]
    fn removal_rebalances() {
        let mut tree = Tree::new();
        for x in [4, 2, 6, 1, 3, 5, 7] {
            tree.insert(x);
        }
        // Strip the left side until the right side forces rotations.
        for x in [1, 3, 2] {
            assert_eq!(tree.remove(&x), Some(x));
        }
        assert_eq!(in_order(&tree), vec![4, 5, 6, 7]);
        assert!(tree.height() <= 2);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut tree = Tree::new();
        for x in [2, 1, 3] {
            tree.insert(x);
        }
        let before = tree.clone();
        assert_eq!(tree.remove(&42), None);
        assert_eq!(tree, before);
    }

    #[test]
    fn duplicates_are_kept() {
        let mut tree = Tree::new();
        for x in [5, 5, 5, 5] {
            tree.insert(x);
        }
        assert_eq!(tree.len(), 4);
        assert_eq!(in_order(&tree), vec![5, 5, 5, 5]);
        // Even all-equal insertions stay balanced.
        assert_eq!(tree.height(), 2);

        assert_eq!(tree.remove(&5), Some(5));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn external_rotations_are_rejected() {
        let mut tree = Tree::new();
        tree.insert(1);
        assert_eq!(tree.rotate_left(&1), Err(Error::UnsupportedRotation));
        assert_eq!(tree.rotate_right(&1), Err(Error::UnsupportedRotation));
    }

    #[test]
    fn height_is_logarithmic() {
        let mut tree = Tree::new();
        for x in 0..1000 {
            tree.insert(x);
        }
        // An AVL tree with n vertices has height < 1.44 * log2(n + 1).
        assert!(tree.height() <= 14, "height {} too large", tree.height());
        assert_eq!(tree.len(), 1000);
    }

    #[test]
    fn churn_preserves_invariants() {
        // The debug check in rebalance_from asserts balance after every
        // mutation; this test just drives it hard.
        let mut tree = Tree::new();
        for x in 0..100 {
            tree.insert(x * 37 % 100);
        }
        for x in 0..50 {
            assert!(tree.remove(&(x * 53 % 100)).is_some());
        }
        assert_eq!(tree.len(), 50);
        let sorted = in_order(&tree);
        assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
    }
}

#[cfg(test)]
mod quicktests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::test::quick::Op;

    /// Applies a set of operations to a tree and a counting map.
    /// This way we can ensure that after a random smattering of inserts
    /// and removes we have the same multiset of elements. The debug check
    /// in `rebalance_from` asserts balance along the way.
    fn do_ops<T>(ops: &[Op<T>], tree: &mut Tree<T>, model: &mut BTreeMap<T, usize>)
    where
        T: Ord + Clone + std::fmt::Debug,
    {
        for op in ops {
            match op {
                Op::Insert(x) => {
                    tree.insert(x.clone());
                    *model.entry(x.clone()).or_insert(0) += 1;
                }
                Op::Remove(x) => {
                    let count = model.get(x).copied().unwrap_or(0);
                    if count > 1 {
                        *model.get_mut(x).unwrap() -= 1;
                    } else {
                        model.remove(x);
                    }
                    let expected = (count > 0).then(|| x.clone());
                    assert_eq!(tree.remove(x), expected);
                }
            }
        }
    }

    fn model_elements(model: &BTreeMap<i8, usize>) -> Vec<i8> {
        model
            .iter()
            .flat_map(|(x, n)| std::iter::repeat(*x).take(*n))
            .collect()
    }

    quickcheck::quickcheck! {
        fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
            let mut tree = Tree::new();
            let mut model = BTreeMap::new();

            do_ops(&ops, &mut tree, &mut model);
            tree.len() == model_elements(&model).len()
                && tree.iter().copied().eq(model_elements(&model))
        }
    }

    quickcheck::quickcheck! {
        fn contains(xs: Vec<i8>) -> bool {
            let mut tree = Tree::new();
            for x in &xs {
                tree.insert(*x);
            }

            xs.iter().all(|x| tree.contains(x))
        }
    }
}
