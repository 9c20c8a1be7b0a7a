//! Rotations.
//!
//! Each rotation takes the unbalanced node `X` and returns the new subtree
//! root. It rewires the links inside the rotated subtree and hands `X`'s
//! parent index to the new root; [`rebalance`] then points the parent's child
//! slot at the new root.
//!
//! Balance factors are `height(right) - height(left)` and only the two or
//! three nodes taking part in the rotation are updated.

use tracing::trace;

use crate::util::{get_l, get_p, get_r, replace_child, set_l, set_p, set_r};

use super::types::AvlNodeLike;

#[inline]
pub(crate) fn bf<N: AvlNodeLike>(arena: &[N], i: u32) -> i32 {
    arena[i as usize].bf()
}

#[inline]
pub(crate) fn set_bf<N: AvlNodeLike>(arena: &mut [N], i: u32, v: i32) {
    arena[i as usize].set_bf(v);
}

/// Restores balance at `x`, whose balance factor must be exactly `+2` or
/// `-2`. Returns the node now occupying `x`'s position.
pub fn rebalance<N: AvlNodeLike>(arena: &mut [N], x: u32) -> u32 {
    let p = get_p(arena, x);
    let top = match bf(arena, x) {
        2 => {
            let z = get_r(arena, x).expect("right-heavy node has a right child");
            if bf(arena, z) >= 0 {
                rr_rotate(arena, x)
            } else {
                rl_rotate(arena, x)
            }
        }
        -2 => {
            let z = get_l(arena, x).expect("left-heavy node has a left child");
            if bf(arena, z) <= 0 {
                ll_rotate(arena, x)
            } else {
                lr_rotate(arena, x)
            }
        }
        other => panic!("asked to rebalance node {x} with balance factor {other}"),
    };
    replace_child(arena, p, x, Some(top));
    top
}

/// ```text
///     X (+2)                 Z (-1 | 0)
///    / \                    / \
///   t0  Z (0 | +1)  =>     X   t2
///      / \                / \
///     t1  t2             t0  t1
/// ```
fn rr_rotate<N: AvlNodeLike>(arena: &mut [N], x: u32) -> u32 {
    let z = get_r(arena, x).expect("right child exists");
    let zbf = bf(arena, z);
    debug_assert_ne!(zbf, -1, "right-left shape in right-right rotation");
    trace!(node = x, pivot = z, "right-right rotation");

    let p = get_p(arena, x);
    set_p(arena, z, p);
    set_p(arena, x, Some(z));
    let t1 = get_l(arena, z);
    set_r(arena, x, t1);
    if let Some(t1) = t1 {
        set_p(arena, t1, Some(x));
    }
    set_l(arena, z, Some(x));

    if zbf == 0 {
        // Only reachable from deletion: the subtree keeps its height.
        set_bf(arena, x, 1);
        set_bf(arena, z, -1);
    } else {
        set_bf(arena, x, 0);
        set_bf(arena, z, 0);
    }
    z
}

/// ```text
///        X (-2)            Z (0 | +1)
///       / \               / \
///  Z (-1|0) t2    =>    t0   X
///     / \                   / \
///   t0   t1                t1  t2
/// ```
fn ll_rotate<N: AvlNodeLike>(arena: &mut [N], x: u32) -> u32 {
    let z = get_l(arena, x).expect("left child exists");
    let zbf = bf(arena, z);
    debug_assert_ne!(zbf, 1, "left-right shape in left-left rotation");
    trace!(node = x, pivot = z, "left-left rotation");

    let p = get_p(arena, x);
    set_p(arena, z, p);
    set_p(arena, x, Some(z));
    let t1 = get_r(arena, z);
    set_l(arena, x, t1);
    if let Some(t1) = t1 {
        set_p(arena, t1, Some(x));
    }
    set_r(arena, z, Some(x));

    if zbf == 0 {
        set_bf(arena, x, -1);
        set_bf(arena, z, 1);
    } else {
        set_bf(arena, x, 0);
        set_bf(arena, z, 0);
    }
    z
}

/// ```text
///     X (+2)                    Y (0)
///    / \                       /   \
///   t0  Z (-1)       =>       X     Z
///      / \                   / \   / \
///     Y   t3               t0  t1 t2  t3
///    / \
///   t1  t2
/// ```
fn rl_rotate<N: AvlNodeLike>(arena: &mut [N], x: u32) -> u32 {
    let z = get_r(arena, x).expect("right child exists");
    debug_assert_eq!(bf(arena, z), -1, "right-right shape in right-left rotation");
    let y = get_l(arena, z).expect("right-left grandchild exists");
    trace!(node = x, pivot = y, "right-left rotation");

    let p = get_p(arena, x);
    set_p(arena, y, p);
    set_p(arena, z, Some(y));
    set_p(arena, x, Some(y));

    let t1 = get_l(arena, y);
    let t2 = get_r(arena, y);
    set_r(arena, x, t1);
    if let Some(t1) = t1 {
        set_p(arena, t1, Some(x));
    }
    set_l(arena, z, t2);
    if let Some(t2) = t2 {
        set_p(arena, t2, Some(z));
    }
    set_l(arena, y, Some(x));
    set_r(arena, y, Some(z));

    let (xbf, zbf) = match bf(arena, y) {
        0 => (0, 0),
        -1 => (0, 1),
        1 => (-1, 0),
        other => unreachable!("balance factor {other} for Y in right-left rotation"),
    };
    set_bf(arena, x, xbf);
    set_bf(arena, z, zbf);
    set_bf(arena, y, 0);
    y
}

/// ```text
///        X (-2)                 Y (0)
///       / \                    /   \
///  Z (+1)  t3        =>       Z     X
///     / \                    / \   / \
///   t0   Y                 t0  t1 t2  t3
///       / \
///     t1   t2
/// ```
fn lr_rotate<N: AvlNodeLike>(arena: &mut [N], x: u32) -> u32 {
    let z = get_l(arena, x).expect("left child exists");
    debug_assert_eq!(bf(arena, z), 1, "left-left shape in left-right rotation");
    let y = get_r(arena, z).expect("left-right grandchild exists");
    trace!(node = x, pivot = y, "left-right rotation");

    let p = get_p(arena, x);
    set_p(arena, y, p);
    set_p(arena, z, Some(y));
    set_p(arena, x, Some(y));

    let t1 = get_l(arena, y);
    let t2 = get_r(arena, y);
    set_l(arena, x, t2);
    if let Some(t2) = t2 {
        set_p(arena, t2, Some(x));
    }
    set_r(arena, z, t1);
    if let Some(t1) = t1 {
        set_p(arena, t1, Some(z));
    }
    set_l(arena, y, Some(z));
    set_r(arena, y, Some(x));

    let (xbf, zbf) = match bf(arena, y) {
        0 => (0, 0),
        -1 => (1, 0),
        1 => (0, -1),
        other => unreachable!("balance factor {other} for Y in left-right rotation"),
    };
    set_bf(arena, x, xbf);
    set_bf(arena, z, zbf);
    set_bf(arena, y, 0);
    y
}
