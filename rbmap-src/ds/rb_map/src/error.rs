/// Result type for fallible map operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by [`RbMap`](crate::RbMap) and its cursors.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// Checked lookup of an absent key, or erasure through a position
    /// that does not denote an entry of this map.
    #[error("index out of bound: {0}")]
    OutOfBound(&'static str),

    /// Use of a position outside its valid range, such as stepping past
    /// the end or dereferencing the end.
    #[error("invalid iterator: {0}")]
    InvalidIterator(&'static str),
}
