//! Core traits for block compression.
//!
//! Archive entries are small, fully buffered blobs with a known decoded
//! size, so the codecs here are one-shot transforms over byte slices rather
//! than streaming state machines. Implementations hold no state between
//! calls and are safe to share across threads.

use crate::error::{BoardArcError, Result};

/// A one-shot decompressor.
pub trait Decompressor {
    /// Decompress `input`, producing exactly `output_size` bytes.
    fn decompress(&self, input: &[u8], output_size: usize) -> Result<Vec<u8>>;

    /// Decompress and verify the produced length.
    fn decompress_exact(&self, input: &[u8], output_size: usize) -> Result<Vec<u8>> {
        let output = self.decompress(input, output_size)?;
        if output.len() != output_size {
            return Err(BoardArcError::size_mismatch(output_size, output.len()));
        }
        Ok(output)
    }
}

/// A one-shot compressor.
pub trait Compressor {
    /// Compress all of `input`.
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>>;
}

/// Identity codec for stored entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stored;

impl Decompressor for Stored {
    fn decompress(&self, input: &[u8], output_size: usize) -> Result<Vec<u8>> {
        if input.len() < output_size {
            return Err(BoardArcError::truncated(output_size, input.len()));
        }
        Ok(input[..output_size].to_vec())
    }
}

impl Compressor for Stored {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(input.to_vec())
    }
}

/// Compression level for algorithms that support it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    /// No compression (store only).
    pub const NONE: Self = Self(0);
    /// Fastest compression.
    pub const FAST: Self = Self(1);
    /// Default compression (balanced).
    pub const DEFAULT: Self = Self(6);
    /// Best compression (slowest).
    pub const BEST: Self = Self(9);

    /// Create a custom compression level (0-9).
    pub fn new(level: u8) -> Self {
        Self(level.min(9))
    }

    /// Get the level value.
    pub fn level(&self) -> u8 {
        self.0
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u8> for CompressionLevel {
    fn from(level: u8) -> Self {
        Self::new(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_level() {
        assert_eq!(CompressionLevel::NONE.level(), 0);
        assert_eq!(CompressionLevel::FAST.level(), 1);
        assert_eq!(CompressionLevel::DEFAULT.level(), 6);
        assert_eq!(CompressionLevel::BEST.level(), 9);

        // Test clamping
        assert_eq!(CompressionLevel::new(100).level(), 9);
    }

    #[test]
    fn test_stored_roundtrip() {
        let data = b"board data";
        let packed = Stored.compress(data).unwrap();
        assert_eq!(packed, data);
        assert_eq!(Stored.decompress_exact(&packed, data.len()).unwrap(), data);
    }

    #[test]
    fn test_stored_truncated() {
        assert!(matches!(
            Stored.decompress(b"abc", 5),
            Err(BoardArcError::TruncatedInput { .. })
        ));
    }

    struct ShortCodec;

    impl Decompressor for ShortCodec {
        fn decompress(&self, _input: &[u8], _output_size: usize) -> Result<Vec<u8>> {
            Ok(vec![0; 2])
        }
    }

    #[test]
    fn test_decompress_exact_checks_length() {
        let err = ShortCodec.decompress_exact(&[], 3).unwrap_err();
        assert!(matches!(
            err,
            BoardArcError::SizeMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }
}
