//! A red-black tree: an ordered binary search tree where every vertex
//! carries a color and the coloring obeys five rules.
//!
//! 1. Every vertex is red or black (absent children count as black).
//! 2. The root is black.
//! 3. Every empty subtree position is black.
//! 4. A red vertex has no red child.
//! 5. Every root-to-leaf path crosses the same number of black vertices.
//!
//! Together the rules bound the height at `2 * log2(n + 1)`, so searches,
//! insertions, and removals are all O(log n). Mutations are the plain BST
//! ones from [`ordered`](crate::ordered) followed by a recoloring and
//! rotation pass that restores whichever rule the mutation broke.
//!
//! As with [`avl`](crate::avl), external rotations would break the
//! invariant and are rejected with [`Error::UnsupportedRotation`].
//!
//! # Examples
//!
//! ```
//! use balanced_bst::redblack::{Color, Tree};
//!
//! let mut tree = Tree::new();
//! tree.insert(10);
//! tree.insert(20);
//! tree.insert(30);
//!
//! // Inserting 10, 20, 30 recolors and rotates so 20 becomes the black
//! // root with two red children.
//! let root = tree.root().unwrap();
//! assert_eq!(*root.element(), 20);
//! assert_eq!(root.color(), Color::Black);
//! assert_eq!(root.left().unwrap().color(), Color::Red);
//! ```

use std::ptr::NonNull;

use crate::error::Error;
use crate::iter::Iter;
use crate::raw::{Link, Node, RawTree, Side};

/// The color a vertex carries. New vertices start red so an insertion can
/// never change the number of black vertices on a path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Color {
    /// A red vertex. Both its children must be black.
    #[default]
    Red,
    /// A black vertex. Counts toward the black length of every path
    /// through it.
    Black,
}

/// The vertex handle handed out by [`Tree`]. See [`crate::vertex::Vertex`].
pub type Vertex<'a, T> = crate::vertex::Vertex<'a, T, Color>;

impl<'a, T> crate::vertex::Vertex<'a, T, Color> {
    /// The color of this vertex.
    pub fn color(&self) -> Color {
        // SAFETY: the handle's borrow keeps the tree (and this node) alive
        // and unmodified.
        unsafe { self.raw().as_ref().meta }
    }
}

/// A self-balancing red-black tree.
pub struct Tree<T> {
    raw: RawTree<T, Color>,
}

/// Color behind `link`; an empty link is black.
fn color_of<T>(link: Link<T, Color>) -> Color {
    match link.0 {
        // SAFETY: callers only hand in links owned by their tree.
        Some(p) => unsafe { (*p.as_ptr()).meta },
        None => Color::Black,
    }
}

fn is_red<T>(link: Link<T, Color>) -> bool {
    color_of(link) == Color::Red
}

fn paint<T>(node: NonNull<Node<T, Color>>, color: Color) {
    // SAFETY: `node` is owned by the caller's tree.
    unsafe { (*node.as_ptr()).meta = color };
}

/// Which child slot of `parent` the node `child` occupies.
fn side_of<T>(parent: NonNull<Node<T, Color>>, child: NonNull<Node<T, Color>>) -> Side {
    // SAFETY: `parent` is owned by the caller's tree.
    if unsafe { (*parent.as_ptr()).left.0 } == Some(child) {
        Side::Left
    } else {
        Side::Right
    }
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
    pub fn iter(&self) -> Iter<'_, T, Color> {
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

    /// Repairs a red-red violation at `node` (a freshly inserted red
    /// vertex) by walking up the tree.
    ///
    /// Each round either finishes or moves the violation two levels up:
    /// a black parent means there is nothing to fix; a red uncle is
    /// absorbed by recoloring and the grandparent becomes the new red
    /// vertex under scrutiny; a black uncle is resolved with a recoloring
    /// and one or two rotations, after which the subtree root is black and
    /// the walk stops.
    fn fix_after_insert(&mut self, node: NonNull<Node<T, Color>>) {
        let mut node = node;
        loop {
            // SAFETY: everything touched here hangs off `node`, which this
            // tree owns; rotations and recolorings keep all links consistent.
            unsafe {
                let Some(parent) = (*node.as_ptr()).parent.0 else {
                    paint(node, Color::Black);
                    return;
                };
                if color_of(Link::to(parent)) == Color::Black {
                    return;
                }
                // A red vertex is never the root, so the grandparent exists.
                let grandparent = (*parent.as_ptr())
                    .parent
                    .0
                    .expect("red vertex must have a parent");

                let parent_side = side_of(grandparent, parent);
                let uncle = match parent_side {
                    Side::Left => (*grandparent.as_ptr()).right,
                    Side::Right => (*grandparent.as_ptr()).left,
                };

                if is_red(uncle) {
                    paint(parent, Color::Black);
                    paint(uncle.0.expect("red link is non-empty"), Color::Black);
                    paint(grandparent, Color::Red);
                    node = grandparent;
                    continue;
                }

                // Black uncle. Straighten a zig-zag first: after the rotation
                // the old parent is the lower vertex, so the roles swap.
                let node_side = side_of(parent, node);
                let parent = if node_side != parent_side {
                    match parent_side {
                        Side::Left => self.raw.rotate_left(parent),
                        Side::Right => self.raw.rotate_right(parent),
                    };
                    node
                } else {
                    parent
                };

                paint(parent, Color::Black);
                paint(grandparent, Color::Red);
                match parent_side {
                    Side::Left => self.raw.rotate_right(grandparent),
                    Side::Right => self.raw.rotate_left(grandparent),
                };
                return;
            }
        }
    }

    /// Repairs a black-length deficit in the `side` subtree of the node
    /// behind `parent`, created by splicing out a black vertex there.
    ///
    /// Each round looks at the sibling of the short subtree. A red sibling
    /// is first rotated into the parent position so the short subtree gets
    /// a black sibling. Then: a black sibling with black children donates
    /// its red (pushing the deficit up, or ending it at a red parent); a
    /// red sibling child is rotated over to the short side, evening the
    /// black lengths for good.
    fn fix_deficit(&mut self, parent: Link<T, Color>, side: Side) {
        let mut side = side;
        let mut parent = parent;
        while let Some(p) = parent.0 {
            // SAFETY: the walk only touches nodes owned by this tree;
            // rotations and recolorings keep all links consistent.
            unsafe {
                // The short subtree is one black vertex shorter than its
                // sibling, so the sibling cannot be empty.
                let sibling_link = match side {
                    Side::Left => (*p.as_ptr()).right,
                    Side::Right => (*p.as_ptr()).left,
                };
                let mut sibling = sibling_link
                    .0
                    .expect("short subtree must have a sibling");

                if is_red(Link::to(sibling)) {
                    // Red sibling: rotate it over the parent. The short
                    // subtree keeps its position and gains a black sibling.
                    paint(p, Color::Red);
                    paint(sibling, Color::Black);
                    match side {
                        Side::Left => self.raw.rotate_left(p),
                        Side::Right => self.raw.rotate_right(p),
                    };
                    sibling = match side {
                        Side::Left => (*p.as_ptr()).right.0,
                        Side::Right => (*p.as_ptr()).left.0,
                    }
                    .expect("short subtree must have a sibling");
                }

                let near = match side {
                    Side::Left => (*sibling.as_ptr()).left,
                    Side::Right => (*sibling.as_ptr()).right,
                };
                let far = match side {
                    Side::Left => (*sibling.as_ptr()).right,
                    Side::Right => (*sibling.as_ptr()).left,
                };

                if !is_red(near) && !is_red(far) {
                    // Sibling donates its black weight to the parent.
                    paint(sibling, Color::Red);
                    if is_red(Link::to(p)) {
                        paint(p, Color::Black);
                        return;
                    }
                    // Both subtrees of the parent are now short; push the
                    // deficit one level up.
                    match (*p.as_ptr()).parent.0 {
                        Some(gp) => {
                            side = side_of(gp, p);
                            parent = Link::to(gp);
                        }
                        None => return,
                    }
                    continue;
                }

                let sibling = if !is_red(far) {
                    // Only the near child is red: rotate it over the sibling
                    // so the mirror case below applies.
                    paint(sibling, Color::Red);
                    paint(near.0.expect("red link is non-empty"), Color::Black);
                    match side {
                        Side::Left => self.raw.rotate_right(sibling),
                        Side::Right => self.raw.rotate_left(sibling),
                    };
                    match side {
                        Side::Left => (*p.as_ptr()).right.0,
                        Side::Right => (*p.as_ptr()).left.0,
                    }
                    .expect("short subtree must have a sibling")
                } else {
                    sibling
                };

                // Far child red: the sibling takes over the parent position
                // and its colors even out the black lengths.
                let far = match side {
                    Side::Left => (*sibling.as_ptr()).right,
                    Side::Right => (*sibling.as_ptr()).left,
                };
                paint(sibling, color_of(Link::to(p)));
                paint(p, Color::Black);
                paint(far.0.expect("far child is red here"), Color::Black);
                match side {
                    Side::Left => self.raw.rotate_left(p),
                    Side::Right => self.raw.rotate_right(p),
                };
                return;
            }
        }
    }

    #[cfg(debug_assertions)]
    fn check_coloring(&self) {
        assert_eq!(color_of(self.raw.root), Color::Black, "root must be black");
        self.check_subtree(self.raw.root);
    }

    /// Returns the black length of the subtree, asserting rule 4 and
    /// rule 5 along the way.
    #[cfg(debug_assertions)]
    fn check_subtree(&self, link: Link<T, Color>) -> usize {
        let Some(node) = link.0 else { return 0 };
        // SAFETY: the walk only touches nodes owned by this tree.
        let (left, right) = unsafe { ((*node.as_ptr()).left, (*node.as_ptr()).right) };
        if is_red(link) {
            assert!(
                !is_red(left) && !is_red(right),
                "red vertex with a red child"
            );
        }
        let lb = self.check_subtree(left);
        let rb = self.check_subtree(right);
        assert_eq!(lb, rb, "black lengths diverge");
        lb + usize::from(!is_red(link))
    }
}

impl<T: Ord> Tree<T> {
    /// Inserts `element` as a red leaf, restores the coloring rules, and
    /// returns a handle to the new vertex.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_bst::redblack::{Color, Tree};
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1);
    /// let vertex = tree.insert(2);
    /// assert_eq!(vertex.color(), Color::Red);
    /// ```
    pub fn insert(&mut self, element: T) -> Vertex<'_, T> {
        let new = self.raw.insert(element);
        self.fix_after_insert(new);
        #[cfg(debug_assertions)]
        self.check_coloring();
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

    /// Removes the first vertex found holding `element`, restores the
    /// coloring rules, and returns the element; `None` (leaving the tree
    /// untouched) when absent.
    pub fn remove(&mut self, element: &T) -> Option<T> {
        let found = self.raw.search(element)?;
        let target = self.raw.predecessor_swap(found);
        // SAFETY: `target` is owned by this tree; it is read before the
        // splice frees it.
        let removed_color = unsafe { (*target.as_ptr()).meta };
        let (element, parent, side) = self.raw.splice(target);

        if removed_color == Color::Black {
            // Splicing a black vertex shortens the black length of every
            // path through its slot.
            let slot = match (parent.0, side) {
                (None, _) => self.raw.root,
                // SAFETY: `parent` is owned by this tree.
                (Some(p), Side::Left) => unsafe { (*p.as_ptr()).left },
                (Some(p), Side::Right) => unsafe { (*p.as_ptr()).right },
            };
            match slot.0 {
                // A red vertex was promoted into the slot; recoloring it
                // black restores the length on its own.
                Some(promoted) if is_red(slot) => paint(promoted, Color::Black),
                _ => self.fix_deficit(parent, side),
            }
        }

        #[cfg(debug_assertions)]
        self.check_coloring();
        Some(element)
    }

    /// Always fails: rotating a red-black tree from outside would break the
    /// coloring rules its other operations rely on.
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

/// Structural equality: same shape, equal elements, and equal colors vertex
/// by vertex.
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
