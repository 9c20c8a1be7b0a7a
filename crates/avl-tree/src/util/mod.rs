//! Link-level helpers shared by the AVL code.
//!
//! Everything here only needs the [`Node`] links, never keys or balance
//! factors:
//! - index accessors (`get_*` / `set_*`),
//! - in-order navigation over parent links (`first`, `last`, `next`),
//! - height measurement and the AVL height bound,
//! - arena slot reclamation ([`relocate`]).

pub mod relocate;

use crate::types::Node;

pub use relocate::reclaim;

#[inline]
pub(crate) fn get_p<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].p()
}

#[inline]
pub(crate) fn get_l<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].l()
}

#[inline]
pub(crate) fn get_r<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].r()
}

#[inline]
pub(crate) fn set_p<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_p(v);
}

#[inline]
pub(crate) fn set_l<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_l(v);
}

#[inline]
pub(crate) fn set_r<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_r(v);
}

/// Points `parent`'s child slot that currently holds `old` at `new`.
///
/// Does nothing for `parent == None`; the caller owns the root index.
pub(crate) fn replace_child<N: Node>(
    arena: &mut [N],
    parent: Option<u32>,
    old: u32,
    new: Option<u32>,
) {
    let Some(p) = parent else {
        return;
    };
    if get_l(arena, p) == Some(old) {
        set_l(arena, p, new);
    } else {
        assert_eq!(
            get_r(arena, p),
            Some(old),
            "unhandled parent/child relationship"
        );
        set_r(arena, p, new);
    }
}

/// Leftmost node in the tree.
pub fn first<N: Node>(arena: &[N], root: Option<u32>) -> Option<u32> {
    let mut curr = root?;
    while let Some(l) = get_l(arena, curr) {
        curr = l;
    }
    Some(curr)
}

/// Rightmost node in the tree.
pub fn last<N: Node>(arena: &[N], root: Option<u32>) -> Option<u32> {
    let mut curr = root?;
    while let Some(r) = get_r(arena, curr) {
        curr = r;
    }
    Some(curr)
}

/// In-order successor.
pub fn next<N: Node>(arena: &[N], mut curr: u32) -> Option<u32> {
    if let Some(r) = get_r(arena, curr) {
        return first(arena, Some(r));
    }
    let mut p = get_p(arena, curr);
    while let Some(pi) = p {
        if get_r(arena, pi) == Some(curr) {
            curr = pi;
            p = get_p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

/// Climbs parent links until the node without a parent.
pub fn up_to_root<N: Node>(arena: &[N], mut curr: u32) -> u32 {
    while let Some(p) = get_p(arena, curr) {
        curr = p;
    }
    curr
}

/// Exact height of the subtree under `root`; a single node has height 1.
pub fn height<N: Node>(arena: &[N], root: Option<u32>) -> usize {
    root.map_or(0, |i| {
        1 + height(arena, get_l(arena, i)).max(height(arena, get_r(arena, i)))
    })
}

/// Largest height an AVL tree with `len` nodes can have.
///
/// The sparsest AVL tree of height `h` has `N(h) = N(h-1) + N(h-2) + 1`
/// nodes, so this is the largest `h` with `N(h) <= len`.
pub fn max_height(len: usize) -> usize {
    let mut h = 0;
    let (mut lo, mut hi) = (0usize, 1usize);
    while hi <= len {
        (lo, hi) = (hi, lo.saturating_add(hi).saturating_add(1));
        h += 1;
        if hi == usize::MAX {
            break;
        }
    }
    h
}
