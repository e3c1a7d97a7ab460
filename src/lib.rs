//! Ordered in-memory index built on a binary search tree, kept balanced
//! either as an [AVL][avl] tree or as a [Red-Black][rb] tree.
//!
//! Both flavours share the same search, insert and delete skeleton and
//! the same rotation primitives, the balancing policy is picked at
//! compile time through the `P` type parameter of [`Index`]:
//!
//! ```
//! use balanced_index::{AvlIndex, RbIndex};
//!
//! let mut avl: AvlIndex<u64, &str> = AvlIndex::new("avl");
//! let mut rb: RbIndex<u64, &str> = RbIndex::new("rb");
//! for (key, value) in [(3, "c"), (1, "a"), (2, "b")].iter() {
//!     avl.insert(*key, *value);
//!     rb.insert(*key, *value);
//! }
//! assert_eq!(avl.get(&2), Some(&"b"));
//! assert_eq!(rb.min().unwrap(), (&1, &"a"));
//! assert!(rb.validate().is_ok());
//! ```
//!
//! [avl]: https://en.wikipedia.org/wiki/AVL_tree
//! [rb]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree

mod arena;
mod avl;
mod bst;
mod depth;
mod empty;
mod error;
mod index;
mod iter;
mod rb;
mod rotate;

pub use crate::avl::Avl;
pub use crate::bst::Balance;
pub use crate::depth::Depth;
pub use crate::empty::Empty;
pub use crate::error::Error;
pub use crate::index::{AvlIndex, Index, RbIndex, Stats};
pub use crate::iter::{Iter, Range, Reverse};
pub use crate::rb::{Color, RedBlack};

#[cfg(test)]
mod rb_test;
