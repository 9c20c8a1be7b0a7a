//! Arena-based AVL tree with multiset semantics.
//!
//! Repeated inserts of an equal key collapse into one node with an
//! occurrence count; deletes decrement the count before removing the node.
//! Heights stay within the AVL bound, so search, insert and delete are
//! O(log n).
//!
//! Nodes are kept in a dense `Vec` and link to each other with `Option<u32>`
//! indices instead of pointers, which keeps the parent back-link free of
//! ownership cycles.
//!
//! ```
//! use avl_tree::{AvlError, AvlTree};
//!
//! let mut tree = AvlTree::new();
//! for k in [5, 3, 8, 1, 4, 7, 9, 3] {
//!     tree.insert(k);
//! }
//! assert_eq!(tree.size(), 7);
//! assert_eq!(tree.count(&3), 2);
//! assert_eq!(tree.inorder().copied().collect::<Vec<_>>(), [1, 3, 4, 5, 7, 8, 9]);
//!
//! assert!(tree.delete(&3));
//! assert_eq!(tree.search(&3), Ok(&3));
//! assert!(tree.delete(&3));
//! assert_eq!(tree.search(&3), Err(AvlError::NotFound));
//! ```
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! [`types`] | [`Node`] and [`KeyedNode`] traits |
//! [`avl::types`] | [`AvlNode`] and the [`AvlNodeLike`] balance-factor trait |
//! [`avl::rotate`] | The four rotations and [`rebalance`] |
//! [`avl::util`] | Insert/delete retracing, structural removal, validation |
//! [`avl::iter`] | Stack-based in-order iterator |
//! [`util`] | Link navigation, heights, arena slot reclamation |

pub mod avl;
pub mod error;
pub mod types;
pub mod util;

pub use avl::{rebalance, AvlNode, AvlNodeLike, AvlTree, Inorder};
pub use error::AvlError;
pub use types::{KeyedNode, Node};
pub use util::{first, height, last, max_height, next};
