use crate::types::Node;

use super::{get_l, get_p, get_r, set_l, set_p, set_r};

/// Takes the detached node at `hole` out of the arena.
///
/// The arena stays dense: the last node is swapped into `hole` and every link
/// that referred to it (parent's child slot, children's parent, `root`) is
/// rewritten. The node at `hole` must already be unlinked from the tree.
///
/// Returns the removed node and the (possibly renumbered) root.
pub fn reclaim<N: Node>(arena: &mut Vec<N>, root: Option<u32>, hole: u32) -> (N, Option<u32>) {
    debug_assert!(
        arena[hole as usize].p().is_none()
            && arena[hole as usize].l().is_none()
            && arena[hole as usize].r().is_none(),
        "reclaimed node is still linked"
    );

    let removed = arena.swap_remove(hole as usize);
    let moved = arena.len() as u32;
    if moved == hole {
        return (removed, root);
    }

    relink(arena, moved, hole);
    let root = if root == Some(moved) { Some(hole) } else { root };
    (removed, root)
}

/// Rewrites links to a node that moved from slot `from` to slot `to`.
fn relink<N: Node>(arena: &mut [N], from: u32, to: u32) {
    if let Some(p) = get_p(arena, to) {
        if get_l(arena, p) == Some(from) {
            set_l(arena, p, Some(to));
        } else {
            set_r(arena, p, Some(to));
        }
    }
    if let Some(l) = get_l(arena, to) {
        set_p(arena, l, Some(to));
    }
    if let Some(r) = get_r(arena, to) {
        set_p(arena, r, Some(to));
    }
}
