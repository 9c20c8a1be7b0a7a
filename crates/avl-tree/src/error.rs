use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AvlError {
    /// The searched key is not stored in the tree.
    #[error("NOT_FOUND")]
    NotFound,
    /// The key's occurrence count is already at `u32::MAX`.
    #[error("COUNT_OVERFLOW")]
    CountOverflow,
    /// No more arena indices are available for new keys.
    #[error("CAPACITY_EXCEEDED")]
    CapacityExceeded,
}
