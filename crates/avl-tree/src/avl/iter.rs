use std::iter::FusedIterator;

use super::types::AvlNode;

/// In-order iterator over the distinct keys of an [`AvlTree`].
///
/// Keeps an explicit stack of pending ancestors, so memory is bounded by the
/// tree height. Each key is yielded once regardless of its occurrence count.
///
/// [`AvlTree`]: super::AvlTree
pub struct Inorder<'a, K> {
    arena: &'a [AvlNode<K>],
    stack: Vec<u32>,
    curr: Option<u32>,
    remaining: usize,
}

impl<'a, K> Inorder<'a, K> {
    pub(crate) fn new(arena: &'a [AvlNode<K>], root: Option<u32>, max_height: usize) -> Self {
        Self {
            arena,
            stack: Vec::with_capacity(max_height),
            curr: root,
            remaining: arena.len(),
        }
    }
}

impl<'a, K> Iterator for Inorder<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        while let Some(i) = self.curr {
            self.stack.push(i);
            self.curr = self.arena[i as usize].l;
        }
        let i = self.stack.pop()?;
        let node = &self.arena[i as usize];
        self.curr = node.r;
        self.remaining -= 1;
        Some(&node.k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Inorder<'_, K> {}

impl<K> FusedIterator for Inorder<'_, K> {}
