//! Error taxonomy shared by the editor and the renderer.
//!
//! Nothing here is fatal. Every variant degrades to "state did not change"
//! at the point where it is handled.

use thiserror::Error;

/// Top-level error type for Folio operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FolioError {
    /// A page or step index outside the current list.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The rejected index.
        index: usize,
        /// The length of the list at the time of the call.
        len: usize,
    },

    /// The sync transport has no attached receiver.
    #[error("transport unavailable: {0}")]
    TransportUnavailable(String),

    /// A sync message payload could not be decoded.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// The persistence store failed to load or save.
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl FolioError {
    /// Returns `Ok(())` when `index` addresses an element of a list of
    /// length `len`.
    ///
    /// # Errors
    ///
    /// Returns `FolioError::IndexOutOfRange` otherwise.
    pub fn check_index(index: usize, len: usize) -> Result<(), Self> {
        if index < len {
            Ok(())
        } else {
            Err(Self::IndexOutOfRange { index, len })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_index_accepts_last_position() {
        assert!(FolioError::check_index(2, 3).is_ok());
    }

    #[test]
    fn test_check_index_rejects_length_and_empty_list() {
        assert_eq!(
            FolioError::check_index(3, 3),
            Err(FolioError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(
            FolioError::check_index(0, 0),
            Err(FolioError::IndexOutOfRange { index: 0, len: 0 })
        );
    }
}
