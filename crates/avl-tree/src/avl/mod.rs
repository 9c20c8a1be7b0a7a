//! AVL tree: node type, rotations, retracing and the public tree.

#[path = "AvlTree.rs"]
pub mod avl_tree;
pub mod iter;
pub mod rotate;
pub mod types;
pub mod util;

pub use avl_tree::AvlTree;
pub use iter::Inorder;
pub use rotate::rebalance;
pub use types::{AvlNode, AvlNodeLike};
pub use util::{assert_avl_tree, insert_left, insert_right, print, remove};
