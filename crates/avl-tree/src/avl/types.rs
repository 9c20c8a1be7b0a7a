use crate::types::{KeyedNode, Node};

/// AVL tree vertex.
#[derive(Clone, Debug)]
pub struct AvlNode<K> {
    pub p: Option<u32>,
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub k: K,
    /// Number of times `k` has been inserted and not yet deleted.
    pub count: u32,
    /// Balance factor, `height(right) - height(left)`.
    pub bf: i32,
}

impl<K> AvlNode<K> {
    pub fn new(k: K) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            k,
            count: 1,
            bf: 0,
        }
    }
}

impl<K> Node for AvlNode<K> {
    fn p(&self) -> Option<u32> {
        self.p
    }

    fn l(&self) -> Option<u32> {
        self.l
    }

    fn r(&self) -> Option<u32> {
        self.r
    }

    fn set_p(&mut self, v: Option<u32>) {
        self.p = v;
    }

    fn set_l(&mut self, v: Option<u32>) {
        self.l = v;
    }

    fn set_r(&mut self, v: Option<u32>) {
        self.r = v;
    }
}

impl<K> KeyedNode for AvlNode<K> {
    type Key = K;

    fn key(&self) -> &K {
        &self.k
    }

    fn count(&self) -> u32 {
        self.count
    }
}

/// AVL-specific node behavior.
pub trait AvlNodeLike: Node {
    fn bf(&self) -> i32;
    fn set_bf(&mut self, bf: i32);
}

impl<K> AvlNodeLike for AvlNode<K> {
    fn bf(&self) -> i32 {
        self.bf
    }

    fn set_bf(&mut self, bf: i32) {
        self.bf = bf;
    }
}
