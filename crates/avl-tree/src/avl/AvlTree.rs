use std::cmp::Ordering;
use std::fmt;

use crate::error::AvlError;
use crate::util::{first, height, last, max_height, next};

use super::iter::Inorder;
use super::types::AvlNode;
use super::util::{assert_avl_tree, insert_left, insert_right, print, remove};

/// AVL tree with multiset semantics.
///
/// Inserting a key that is already present bumps its occurrence count;
/// deleting it decrements the count and only removes the node once the
/// count reaches zero. [`size`](Self::size) counts distinct keys.
///
/// Nodes live in a dense arena and link to each other by `u32` index.
#[derive(Clone)]
pub struct AvlTree<K, C = fn(&K, &K) -> Ordering>
where
    C: Fn(&K, &K) -> Ordering,
{
    arena: Vec<AvlNode<K>>,
    root: Option<u32>,
    len: usize,
    comparator: C,
}

impl<K: Ord> AvlTree<K, fn(&K, &K) -> Ordering> {
    pub fn new() -> Self {
        Self::with_comparator(K::cmp)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, K::cmp)
    }
}

impl<K: Ord> Default for AvlTree<K, fn(&K, &K) -> Ordering> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C> AvlTree<K, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    /// Creates an empty tree ordered by `comparator`, which must be a strict
    /// total order.
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_capacity_and_comparator(0, comparator)
    }

    pub fn with_capacity_and_comparator(capacity: usize, comparator: C) -> Self {
        Self {
            arena: Vec::with_capacity(capacity),
            root: None,
            len: 0,
            comparator,
        }
    }

    /// Number of distinct keys.
    pub fn size(&self) -> usize {
        self.len
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.len = 0;
    }

    /// Inserts one occurrence of `key`.
    ///
    /// # Panics
    ///
    /// When the key's occurrence count or the number of distinct keys cannot
    /// grow any further; see [`try_insert`](Self::try_insert).
    pub fn insert(&mut self, key: K) {
        if let Err(err) = self.try_insert(key) {
            panic!("cannot insert into AVL tree: {err}");
        }
    }

    /// Inserts one occurrence of `key`, reporting counter exhaustion instead
    /// of panicking. The tree is unchanged on error.
    pub fn try_insert(&mut self, key: K) -> Result<(), AvlError> {
        let Some(mut curr) = self.root else {
            debug_assert_eq!(self.len, 0, "wrong size");
            self.arena.push(AvlNode::new(key));
            self.root = Some(0);
            self.len = 1;
            return Ok(());
        };

        loop {
            let ord = (self.comparator)(&key, &self.arena[curr as usize].k);
            let child = match ord {
                Ordering::Equal => {
                    let node = &mut self.arena[curr as usize];
                    node.count = node.count.checked_add(1).ok_or(AvlError::CountOverflow)?;
                    return Ok(());
                }
                Ordering::Less => self.arena[curr as usize].l,
                Ordering::Greater => self.arena[curr as usize].r,
            };
            match child {
                Some(child) => curr = child,
                None => {
                    let n = self.push(key)?;
                    let root = if ord == Ordering::Less {
                        insert_left(&mut self.arena, n, curr)
                    } else {
                        insert_right(&mut self.arena, n, curr)
                    };
                    self.root = Some(root);
                    self.len += 1;
                    return Ok(());
                }
            }
        }
    }

    fn push(&mut self, key: K) -> Result<u32, AvlError> {
        let idx = u32::try_from(self.arena.len()).map_err(|_| AvlError::CapacityExceeded)?;
        if idx == u32::MAX {
            return Err(AvlError::CapacityExceeded);
        }
        self.arena.push(AvlNode::new(key));
        Ok(idx)
    }

    /// Removes one occurrence of `key`. Returns `false` if the key is absent.
    pub fn delete(&mut self, key: &K) -> bool {
        let Some(root) = self.root else {
            return false;
        };
        let Some(n) = self.find(key) else {
            return false;
        };

        let node = &mut self.arena[n as usize];
        if node.count > 1 {
            node.count -= 1;
            return true;
        }
        if n == root && node.l.is_none() && node.r.is_none() {
            debug_assert_eq!(self.len, 1, "root deletion, but size wrong");
            self.clear();
            return true;
        }

        let (_, root) = remove(&mut self.arena, n);
        debug_assert!(
            root.is_some_and(|r| self.arena[r as usize].p.is_none()),
            "root parent not nil"
        );
        self.root = root;
        self.len -= 1;
        true
    }

    fn find(&self, key: &K) -> Option<u32> {
        let mut curr = self.root;
        while let Some(i) = curr {
            let node = &self.arena[i as usize];
            curr = match (self.comparator)(key, &node.k) {
                Ordering::Equal => return Some(i),
                Ordering::Less => node.l,
                Ordering::Greater => node.r,
            };
        }
        None
    }

    /// Returns the stored key equal to `key`.
    pub fn search(&self, key: &K) -> Result<&K, AvlError> {
        self.find(key)
            .map(|i| &self.arena[i as usize].k)
            .ok_or(AvlError::NotFound)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Occurrences of `key`; `0` when absent.
    pub fn count(&self, key: &K) -> u32 {
        self.find(key).map_or(0, |i| self.arena[i as usize].count)
    }

    /// Sum of the occurrence counts of all keys.
    pub fn total_count(&self) -> u64 {
        self.arena.iter().map(|n| u64::from(n.count)).sum()
    }

    /// Smallest key.
    pub fn first(&self) -> Option<&K> {
        first(&self.arena, self.root).map(|i| &self.arena[i as usize].k)
    }

    /// Largest key.
    pub fn last(&self) -> Option<&K> {
        last(&self.arena, self.root).map(|i| &self.arena[i as usize].k)
    }

    /// Exact height, measured by walking the tree. An empty tree has height
    /// 0, a single node height 1.
    pub fn height(&self) -> usize {
        height(&self.arena, self.root)
    }

    /// Distinct keys in ascending order.
    pub fn inorder(&self) -> Inorder<'_, K> {
        Inorder::new(&self.arena, self.root, max_height(self.len))
    }

    pub fn iter(&self) -> Inorder<'_, K> {
        self.inorder()
    }

    /// Checks every structural invariant, returning the first violation.
    pub fn assert_valid(&self) -> Result<(), String> {
        assert_avl_tree(&self.arena, self.root, &self.comparator)?;

        if self.len != self.arena.len() {
            return Err(format!(
                "Size mismatch: tracked {}, arena holds {}",
                self.len,
                self.arena.len()
            ));
        }

        let mut reachable = 0;
        let mut curr = first(&self.arena, self.root);
        while let Some(i) = curr {
            reachable += 1;
            curr = next(&self.arena, i);
        }
        if reachable != self.arena.len() {
            return Err(format!(
                "Arena holds {} nodes, {reachable} reachable from root",
                self.arena.len()
            ));
        }

        Ok(())
    }

    /// Multi-line dump of the tree shape with balance factors and counts.
    pub fn print(&self) -> String
    where
        K: fmt::Debug,
    {
        print(&self.arena, self.root, "")
    }
}

impl<K, C> fmt::Debug for AvlTree<K, C>
where
    K: fmt::Debug,
    C: Fn(&K, &K) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, K, C> IntoIterator for &'a AvlTree<K, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    type Item = &'a K;
    type IntoIter = Inorder<'a, K>;

    fn into_iter(self) -> Inorder<'a, K> {
        self.inorder()
    }
}

impl<K, C> Extend<K> for AvlTree<K, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord> FromIterator<K> for AvlTree<K, fn(&K, &K) -> Ordering> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_overflow_is_reported_and_tree_unchanged() {
        let mut tree = AvlTree::new();
        tree.insert(7);
        tree.arena[0].count = u32::MAX;

        assert_eq!(tree.try_insert(7), Err(AvlError::CountOverflow));
        assert_eq!(tree.count(&7), u32::MAX);
        assert_eq!(tree.size(), 1);
        assert!(tree.try_insert(8).is_ok());
        tree.assert_valid().unwrap();
    }

    #[test]
    #[should_panic(expected = "COUNT_OVERFLOW")]
    fn insert_panics_on_count_overflow() {
        let mut tree = AvlTree::new();
        tree.insert(7);
        tree.arena[0].count = u32::MAX;
        tree.insert(7);
    }

    #[test]
    fn delete_of_sole_root_clears_arena() {
        let mut tree = AvlTree::new();
        tree.insert("a");
        assert!(tree.delete(&"a"));
        assert!(tree.is_empty());
        assert!(tree.arena.is_empty());
        assert_eq!(tree.root, None);
    }

    #[test]
    fn arena_stays_dense_through_deletes() {
        let mut tree: AvlTree<i32> = (0..100).collect();
        for k in (0..100).filter(|k| k % 3 != 1) {
            assert!(tree.delete(&k));
            assert_eq!(tree.arena.len(), tree.size());
            tree.assert_valid().unwrap();
        }
        let keys: Vec<i32> = tree.iter().copied().collect();
        assert_eq!(keys, (0..100).filter(|k| k % 3 == 1).collect::<Vec<_>>());
    }

    #[test]
    fn validator_reports_size_mismatch() {
        let mut tree: AvlTree<i32> = (0..3).collect();
        tree.len = 5;
        let err = tree.assert_valid().unwrap_err();
        assert!(err.starts_with("Size mismatch"), "{err}");
    }

    #[test]
    fn validator_reports_unreachable_nodes() {
        let mut tree: AvlTree<i32> = (0..3).collect();
        tree.arena.push(AvlNode::new(42));
        tree.len += 1;
        let err = tree.assert_valid().unwrap_err();
        assert!(err.contains("reachable from root"), "{err}");
    }
}
