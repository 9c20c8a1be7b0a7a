//! Node trait definitions.
//!
//! Nodes are stored in a [`Vec`]-backed arena and every "pointer" is an
//! `Option<u32>` index into it. Tree-manipulation functions take the arena
//! as `&mut [N]` (or `&mut Vec<N>` when they reclaim slots) and work with
//! indices, so the parent back-link never forms an ownership cycle.

/// Tree links (`p`, `l`, `r`).
///
/// `l` and `r` describe structural ownership; `p` is a back-index used for
/// upward walks only.
pub trait Node {
    fn p(&self) -> Option<u32>;
    fn l(&self) -> Option<u32>;
    fn r(&self) -> Option<u32>;
    fn set_p(&mut self, v: Option<u32>);
    fn set_l(&mut self, v: Option<u32>);
    fn set_r(&mut self, v: Option<u32>);
}

/// Node carrying an ordering key and an occurrence count.
///
/// Repeated inserts of an equal key bump the count instead of adding nodes.
pub trait KeyedNode: Node {
    type Key;

    fn key(&self) -> &Self::Key;
    fn count(&self) -> u32;
}
