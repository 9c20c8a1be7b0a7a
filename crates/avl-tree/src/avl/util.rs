use std::cmp::Ordering;
use std::fmt::Debug;

use tracing::trace;

use crate::types::KeyedNode;
use crate::util::{
    first, get_l, get_p, get_r, height, next, reclaim, replace_child, set_l, set_p, set_r,
    up_to_root,
};

use super::rotate::{bf, rebalance, set_bf};
use super::types::AvlNodeLike;

/// Attaches the fresh leaf `n` as the right child of `p` and retraces.
///
/// Returns the root of the whole tree.
pub fn insert_right<N: AvlNodeLike>(arena: &mut [N], n: u32, p: u32) -> u32 {
    debug_assert!(get_r(arena, p).is_none(), "right slot is occupied");
    set_r(arena, p, Some(n));
    set_p(arena, n, Some(p));
    retrace_insert(arena, n)
}

/// Attaches the fresh leaf `n` as the left child of `p` and retraces.
///
/// Returns the root of the whole tree.
pub fn insert_left<N: AvlNodeLike>(arena: &mut [N], n: u32, p: u32) -> u32 {
    debug_assert!(get_l(arena, p).is_none(), "left slot is occupied");
    set_l(arena, p, Some(n));
    set_p(arena, n, Some(p));
    retrace_insert(arena, n)
}

/// Walks up from the freshly attached node `c`, growing balance factors.
///
/// Stops at the first node whose height did not change (balance factor 0,
/// including right after a rotation) or at the root.
fn retrace_insert<N: AvlNodeLike>(arena: &mut [N], mut c: u32) -> u32 {
    loop {
        let mut p = get_p(arena, c).expect("retrace starts below the root");
        let pbf = if get_l(arena, p) == Some(c) {
            bf(arena, p) - 1
        } else {
            bf(arena, p) + 1
        };
        assert!((-2..=2).contains(&pbf), "balance factor invariant");
        set_bf(arena, p, pbf);

        if pbf == 2 || pbf == -2 {
            p = rebalance(arena, p);
        }
        if get_p(arena, p).is_none() || bf(arena, p) == 0 {
            return up_to_root(arena, p);
        }
        c = p;
    }
}

/// Unlinks node `n` from the tree, rebalances, and takes it out of the arena.
///
/// Returns the removed node and the new root (`None` once the tree is
/// empty). Indices of other nodes may change: the last arena slot moves into
/// the freed one.
pub fn remove<N: AvlNodeLike>(arena: &mut Vec<N>, n: u32) -> (N, Option<u32>) {
    let p = get_p(arena, n);
    let l = get_l(arena, n);
    let r = get_r(arena, n);

    let root = match (l, r) {
        (None, None) => p.map(|p| {
            trace!(node = n, "remove leaf");
            let pbf = if get_r(arena, p) == Some(n) {
                bf(arena, p) - 1
            } else {
                bf(arena, p) + 1
            };
            set_bf(arena, p, pbf);
            replace_child(arena, Some(p), n, None);
            retrace_remove(arena, p)
        }),
        (Some(l), None) => {
            trace!(node = n, replacement = l, "remove node without right child");
            set_p(arena, l, p);
            replace_child(arena, p, n, Some(l));
            Some(retrace_remove(arena, l))
        }
        (l, Some(r)) if get_l(arena, r).is_none() => {
            trace!(node = n, replacement = r, "remove node, right child takes its place");
            set_l(arena, r, l);
            if let Some(l) = l {
                set_p(arena, l, Some(r));
            }
            let rbf = bf(arena, n) - 1;
            set_bf(arena, r, rbf);
            set_p(arena, r, p);
            replace_child(arena, p, n, Some(r));
            Some(retrace_remove(arena, r))
        }
        (l, Some(r)) => {
            let s = first(arena, Some(r)).expect("right subtree is not empty");
            let sp = get_p(arena, s).expect("in-order successor has a parent");
            trace!(node = n, successor = s, "remove node, successor takes its place");

            let sr = get_r(arena, s);
            set_l(arena, sp, sr);
            if let Some(sr) = sr {
                set_p(arena, sr, Some(sp));
            }
            let spbf = bf(arena, sp) + 1;
            set_bf(arena, sp, spbf);

            let nbf = bf(arena, n);
            set_bf(arena, s, nbf);
            set_p(arena, s, p);
            replace_child(arena, p, n, Some(s));
            set_l(arena, s, l);
            if let Some(l) = l {
                set_p(arena, l, Some(s));
            }
            set_r(arena, s, Some(r));
            set_p(arena, r, Some(s));

            // The height loss happened below the successor's old parent.
            Some(retrace_remove(arena, sp))
        }
    };

    set_p(arena, n, None);
    set_l(arena, n, None);
    set_r(arena, n, None);
    reclaim(arena, root, n)
}

/// Walks up from `n`, whose subtree just lost height, shrinking balance
/// factors of the ancestors.
///
/// Stops once a node ends at `±1` (its height as seen from above is
/// unchanged) or at the root.
fn retrace_remove<N: AvlNodeLike>(arena: &mut [N], mut n: u32) -> u32 {
    loop {
        let nbf = bf(arena, n);
        if nbf == 2 || nbf == -2 {
            n = rebalance(arena, n);
        }
        let nbf = bf(arena, n);
        assert!(
            (-1..=1).contains(&nbf),
            "node balance factor out of range after rebalance"
        );
        if nbf != 0 {
            break;
        }
        let Some(p) = get_p(arena, n) else {
            break;
        };
        let pbf = if get_l(arena, p) == Some(n) {
            bf(arena, p) + 1
        } else {
            bf(arena, p) - 1
        };
        assert!((-2..=2).contains(&pbf), "balance factor invariant");
        set_bf(arena, p, pbf);
        n = p;
    }
    up_to_root(arena, n)
}

/// Checks parent links, balance factors, occurrence counts and key order of
/// the tree under `root`.
pub fn assert_avl_tree<K, N, C>(arena: &[N], root: Option<u32>, comparator: &C) -> Result<(), String>
where
    N: AvlNodeLike + KeyedNode<Key = K>,
    C: Fn(&K, &K) -> Ordering,
{
    let Some(root) = root else {
        return Ok(());
    };

    if arena[root as usize].p().is_some() {
        return Err("Root has parent".to_string());
    }

    fn validate_links_and_bf<N>(arena: &[N], node: u32) -> Result<(), String>
    where
        N: AvlNodeLike + KeyedNode,
    {
        let l = arena[node as usize].l();
        let r = arena[node as usize].r();

        if let Some(l) = l {
            if arena[l as usize].p() != Some(node) {
                return Err(format!("Broken parent link on left child of node {node}"));
            }
            validate_links_and_bf(arena, l)?;
        }
        if let Some(r) = r {
            if arena[r as usize].p() != Some(node) {
                return Err(format!("Broken parent link on right child of node {node}"));
            }
            validate_links_and_bf(arena, r)?;
        }

        if arena[node as usize].count() == 0 {
            return Err(format!("Node {node} has zero occurrences"));
        }

        let expected_bf = height(arena, r) as i32 - height(arena, l) as i32;
        let actual_bf = arena[node as usize].bf();
        if actual_bf != expected_bf {
            return Err(format!(
                "Balance factor mismatch at node {node}: expected {expected_bf}, got {actual_bf}"
            ));
        }
        if !(-1..=1).contains(&actual_bf) {
            return Err(format!("AVL balance violated at node {node}"));
        }

        Ok(())
    }

    validate_links_and_bf(arena, root)?;

    let mut curr = first(arena, Some(root));
    let mut prev_node: Option<u32> = None;
    while let Some(i) = curr {
        if let Some(prev) = prev_node {
            let cmp = comparator(arena[prev as usize].key(), arena[i as usize].key());
            if cmp != Ordering::Less {
                return Err("Node order violated".to_string());
            }
        }
        prev_node = Some(i);
        curr = next(arena, i);
    }

    Ok(())
}

/// Debug printer for AVL trees.
pub fn print<N>(arena: &[N], node: Option<u32>, tab: &str) -> String
where
    N: AvlNodeLike + KeyedNode,
    N::Key: Debug,
{
    match node {
        None => "∅".to_string(),
        Some(i) => {
            let n = &arena[i as usize];
            let left = print(arena, n.l(), &format!("{tab}  "));
            let right = print(arena, n.r(), &format!("{tab}  "));
            format!(
                "Node[{i}] [bf={}] {{ {:?} x{} }}\n{tab}L={left}\n{tab}R={right}",
                n.bf(),
                n.key(),
                n.count()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avl::AvlNode;

    type Arena = Vec<AvlNode<i32>>;

    fn cmp(a: &i32, b: &i32) -> Ordering {
        a.cmp(b)
    }

    /// Plain BST descent plus AVL attach, without the tree wrapper.
    fn add(arena: &mut Arena, root: Option<u32>, k: i32) -> u32 {
        arena.push(AvlNode::new(k));
        let n = (arena.len() - 1) as u32;
        let Some(mut curr) = root else {
            return n;
        };
        loop {
            if k < arena[curr as usize].k {
                match arena[curr as usize].l {
                    Some(l) => curr = l,
                    None => return insert_left(arena, n, curr),
                }
            } else {
                match arena[curr as usize].r {
                    Some(r) => curr = r,
                    None => return insert_right(arena, n, curr),
                }
            }
        }
    }

    fn build(keys: &[i32]) -> (Arena, u32) {
        let mut arena = Arena::new();
        let mut root = None;
        for &k in keys {
            root = Some(add(&mut arena, root, k));
            assert_avl_tree(&arena, root, &cmp).unwrap();
        }
        (arena, root.unwrap())
    }

    fn index_of(arena: &Arena, k: i32) -> u32 {
        arena.iter().position(|n| n.k == k).unwrap() as u32
    }

    fn keys_in_order(arena: &Arena, root: Option<u32>) -> Vec<i32> {
        let mut out = Vec::new();
        let mut curr = first(arena, root);
        while let Some(i) = curr {
            out.push(arena[i as usize].k);
            curr = next(arena, i);
        }
        out
    }

    fn remove_key(arena: &mut Arena, k: i32) -> Option<u32> {
        let n = index_of(arena, k);
        let (removed, root) = remove(arena, n);
        assert_eq!(removed.k, k);
        assert_avl_tree(arena, root, &cmp).unwrap();
        root
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let (arena, root) = build(&(0..64).collect::<Vec<_>>());
        assert_eq!(height(&arena, Some(root)), 7);
        assert_eq!(keys_in_order(&arena, Some(root)), (0..64).collect::<Vec<_>>());
    }

    #[test]
    fn remove_leaf() {
        let (mut arena, _) = build(&[20, 10, 30, 5]);
        let root = remove_key(&mut arena, 5);
        assert_eq!(keys_in_order(&arena, root), vec![10, 20, 30]);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn remove_leaf_triggers_rotation() {
        let (mut arena, _) = build(&[20, 10, 30, 25]);
        let root = remove_key(&mut arena, 10);
        assert_eq!(arena[root.unwrap() as usize].k, 25);
        assert_eq!(keys_in_order(&arena, root), vec![20, 25, 30]);
    }

    #[test]
    fn remove_node_without_right_child() {
        let (mut arena, _) = build(&[20, 10, 30, 5]);
        let root = remove_key(&mut arena, 10);
        assert_eq!(keys_in_order(&arena, root), vec![5, 20, 30]);
    }

    #[test]
    fn remove_root_without_right_child() {
        let (mut arena, _) = build(&[20, 10]);
        let root = remove_key(&mut arena, 20);
        assert_eq!(arena[root.unwrap() as usize].k, 10);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn remove_node_whose_right_child_has_no_left() {
        let (mut arena, _) = build(&[20, 10, 30, 5, 25, 35, 40]);
        let root = remove_key(&mut arena, 30);
        assert_eq!(keys_in_order(&arena, root), vec![5, 10, 20, 25, 35, 40]);
    }

    #[test]
    fn remove_left_heavy_root_whose_right_child_has_no_left() {
        // Root 20 has bf -1; its right child 30 takes over with bf -2 and the
        // tree must still be rotated at the top.
        let (mut arena, _) = build(&[20, 10, 30, 5]);
        let root = remove_key(&mut arena, 20);
        assert_eq!(arena[root.unwrap() as usize].k, 10);
        assert_eq!(keys_in_order(&arena, root), vec![5, 10, 30]);
    }

    #[test]
    fn remove_with_successor_deep_in_right_subtree() {
        let (mut arena, _) = build(&[20, 10, 30, 5, 15, 25, 40, 27, 50, 28]);
        let root = remove_key(&mut arena, 20);
        assert_eq!(arena[root.unwrap() as usize].k, 25);
        assert_eq!(
            keys_in_order(&arena, root),
            vec![5, 10, 15, 25, 27, 28, 30, 40, 50]
        );
    }

    #[test]
    fn remove_with_successor_that_has_right_child() {
        let (mut arena, _) = build(&[10, 3, 20, 1, 15, 25, 24, 30, 27, 40, 28]);
        let root = remove_key(&mut arena, 25);
        assert_eq!(
            keys_in_order(&arena, root),
            vec![1, 3, 10, 15, 20, 24, 27, 28, 30, 40]
        );
    }

    #[test]
    fn remove_every_key_in_every_position() {
        let keys: Vec<i32> = (0..40).map(|i| (i * 17) % 40).collect();
        for victim in 0..40 {
            let (mut arena, _) = build(&keys);
            let root = remove_key(&mut arena, victim);
            let expected: Vec<i32> = (0..40).filter(|k| *k != victim).collect();
            assert_eq!(keys_in_order(&arena, root), expected);
        }
    }

    #[test]
    fn remove_last_node_empties_tree() {
        let (mut arena, _) = build(&[1]);
        let (removed, root) = remove(&mut arena, 0);
        assert_eq!(removed.k, 1);
        assert_eq!(root, None);
        assert!(arena.is_empty());
    }

    #[test]
    fn validator_reports_wrong_balance_factor() {
        let (mut arena, root) = build(&[2, 1, 3]);
        arena[root as usize].bf = 1;
        let err = assert_avl_tree(&arena, Some(root), &cmp).unwrap_err();
        assert!(err.starts_with("Balance factor mismatch"), "{err}");
    }

    #[test]
    fn validator_reports_broken_parent_link() {
        let (mut arena, root) = build(&[2, 1, 3]);
        let one = index_of(&arena, 1);
        arena[one as usize].p = None;
        let err = assert_avl_tree(&arena, Some(root), &cmp).unwrap_err();
        assert!(err.starts_with("Broken parent link"), "{err}");
    }

    #[test]
    fn print_shows_keys_counts_and_balance() {
        let (arena, root) = build(&[2, 1]);
        let out = print(&arena, Some(root), "");
        assert!(out.starts_with("Node[0] [bf=-1] { 2 x1 }"), "{out}");
        assert!(out.contains("{ 1 x1 }"));
    }
}
