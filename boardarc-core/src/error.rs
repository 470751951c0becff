//! Error types for boardarc operations.
//!
//! Every codec and container in the workspace reports failures through
//! [`BoardArcError`]. Decoders never panic on malformed input; they return
//! one of the variants below instead.

use std::io;
use thiserror::Error;

/// The main error type for boardarc operations.
#[derive(Debug, Error)]
pub enum BoardArcError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid magic number in archive header.
    #[error("Invalid magic number: expected {expected:02x?}, found {found:02x?}")]
    InvalidMagic {
        /// Expected magic bytes.
        expected: Vec<u8>,
        /// Actual magic bytes found.
        found: Vec<u8>,
    },

    /// An entry uses a compression type with no encoder (or decoder).
    #[error("Unsupported compression type: {kind}")]
    UnsupportedCompression {
        /// Display form of the compression type.
        kind: String,
    },

    /// Corrupted data in a compressed stream or container.
    #[error("Corrupted data at offset {offset}: {message}")]
    CorruptedData {
        /// Byte offset where corruption was detected.
        offset: u64,
        /// Description of the corruption.
        message: String,
    },

    /// Input ended before the declared output size was reached.
    #[error("Truncated input: need {needed} bytes, have {available}")]
    TruncatedInput {
        /// Number of bytes required to continue.
        needed: usize,
        /// Number of bytes actually available.
        available: usize,
    },

    /// Invalid header or index table.
    #[error("Invalid header: {message}")]
    InvalidHeader {
        /// Description of the header error.
        message: String,
    },

    /// Decoded payload length disagrees with the stored size.
    #[error("Size mismatch: expected {expected} bytes, decoded {actual}")]
    SizeMismatch {
        /// Size recorded in the container.
        expected: usize,
        /// Size actually produced.
        actual: usize,
    },

    /// Entry not found in archive.
    #[error("Entry not found: {name}")]
    EntryNotFound {
        /// Name or index of the missing entry.
        name: String,
    },

    /// A stored string is neither UTF-8 nor Shift_JIS.
    #[error("Encoding error: {message}")]
    EncodingError {
        /// Description of the encoding error.
        message: String,
    },
}

/// Result type alias for boardarc operations.
pub type Result<T> = std::result::Result<T, BoardArcError>;

impl BoardArcError {
    /// Create an invalid magic error.
    pub fn invalid_magic(expected: impl Into<Vec<u8>>, found: impl Into<Vec<u8>>) -> Self {
        Self::InvalidMagic {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an unsupported compression error.
    pub fn unsupported_compression(kind: impl std::fmt::Display) -> Self {
        Self::UnsupportedCompression {
            kind: kind.to_string(),
        }
    }

    /// Create a corrupted data error.
    pub fn corrupted(offset: u64, message: impl Into<String>) -> Self {
        Self::CorruptedData {
            offset,
            message: message.into(),
        }
    }

    /// Create a truncated input error.
    pub fn truncated(needed: usize, available: usize) -> Self {
        Self::TruncatedInput { needed, available }
    }

    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create a size mismatch error.
    pub fn size_mismatch(expected: usize, actual: usize) -> Self {
        Self::SizeMismatch { expected, actual }
    }

    /// Create an entry not found error.
    pub fn entry_not_found(name: impl Into<String>) -> Self {
        Self::EntryNotFound { name: name.into() }
    }

    /// Create an encoding error.
    pub fn encoding_error(message: impl Into<String>) -> Self {
        Self::EncodingError {
            message: message.into(),
        }
    }

    /// Whether this error came from malformed compressed data.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::CorruptedData { .. }
                | Self::TruncatedInput { .. }
                | Self::SizeMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BoardArcError::invalid_magic(b"PAC".to_vec(), vec![0x00, 0x01, 0x02]);
        assert!(err.to_string().contains("Invalid magic"));

        let err = BoardArcError::unsupported_compression("RLE");
        assert!(err.to_string().contains("RLE"));

        let err = BoardArcError::truncated(4, 1);
        assert_eq!(err.to_string(), "Truncated input: need 4 bytes, have 1");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: BoardArcError = io_err.into();
        assert!(matches!(err, BoardArcError::Io(_)));
    }

    #[test]
    fn test_data_error_classification() {
        assert!(BoardArcError::corrupted(0, "bad").is_data_error());
        assert!(BoardArcError::truncated(2, 0).is_data_error());
        assert!(!BoardArcError::unsupported_compression("RLE").is_data_error());
        assert!(!BoardArcError::encoding_error("name").is_data_error());
    }
}
