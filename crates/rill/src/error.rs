//! Error taxonomy shared by all collection shapes.

use thiserror::Error;

/// Alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by collection operations and change accessors.
///
/// Every fallible operation validates its arguments before touching storage,
/// so an `Err` return always leaves the collection, its change buffer and its
/// dirty flag exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// `try_insert` was called with a key that is already present.
    #[error("key is already present in the collection")]
    DuplicateKey,

    /// A lookup required the key to be present and it was not.
    #[error("key not found in the collection")]
    KeyNotFound,

    /// A list index was outside the valid range for the operation.
    #[error("index {index} is out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A list range did not fit inside the collection.
    #[error("range of {count} starting at {start} exceeds length {len}")]
    InvalidRange {
        start: usize,
        count: usize,
        len: usize,
    },

    /// A typed change accessor was used on the wrong variant.
    #[error("change accessed as {requested} but is {actual}")]
    WrongVariant {
        requested: &'static str,
        actual: &'static str,
    },
}

impl Error {
    pub(crate) fn wrong_variant(requested: &'static str, actual: &'static str) -> Self {
        Error::WrongVariant { requested, actual }
    }
}
