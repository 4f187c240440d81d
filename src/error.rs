//! Crate error type.

use std::error;
use std::fmt;

/// The ways a tree operation can be refused.
///
/// Absence of an element is never an error: `search` and `remove` report it
/// with `None`, `contains` with `false`. The variants here are contract
/// violations or empty-structure accesses, and none of them is transient.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// Rotation was requested on a self-balancing tree. Rotating such a tree
    /// from the outside would silently break the balance invariant it
    /// guarantees, so the entry points exist but always refuse.
    UnsupportedRotation,
    /// The requested vertex (a parent, a child, or a rotation target) does
    /// not exist.
    NoSuchVertex,
    /// The tree is empty, so it has no root to hand out.
    EmptyTree,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedRotation => {
                write!(f, "self-balancing trees cannot be rotated externally")
            }
            Error::NoSuchVertex => write!(f, "no such vertex"),
            Error::EmptyTree => write!(f, "the tree is empty"),
        }
    }
}

impl error::Error for Error {}
