//! # boardarc RLE
//!
//! Run-length decoder for board archive entries (compression tag `5`).
//!
//! Each control byte carries a 7-bit count. With the high bit set, `count`
//! literal bytes follow; with it clear, one byte follows and is repeated
//! `count` times.
//!
//! No encoder exists: archives that store RLE entries can be read but not
//! written back with that compression.
//!
//! ## Example
//!
//! ```rust
//! use boardarc_rle::decompress;
//!
//! let out = decompress(&[0x83, 1, 2, 3, 0x03, 0xFF], 6).unwrap();
//! assert_eq!(out, [1, 2, 3, 0xFF, 0xFF, 0xFF]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

use boardarc_core::error::{BoardArcError, Result};
use boardarc_core::traits::Decompressor;
use boardarc_core::ByteCursor;

/// High bit of a control byte: literal run.
const LITERAL_RUN: u8 = 0x80;

/// A two-byte repeat run yields up to 127 bytes.
const MAX_EXPANSION: usize = 0x7F / 2 + 1;

/// RLE decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct RleDecoder;

impl RleDecoder {
    /// Create a decoder.
    pub fn new() -> Self {
        Self
    }

    /// Decode `input` into exactly `output_size` bytes.
    pub fn decode(&self, input: &[u8], output_size: usize) -> Result<Vec<u8>> {
        let mut cursor = ByteCursor::new(input);
        let mut output =
            Vec::with_capacity(output_size.min(input.len().saturating_mul(MAX_EXPANSION)));

        while output.len() < output_size {
            let offset = cursor.position();
            let control = cursor.read_u8()?;
            let count = (control & !LITERAL_RUN) as usize;

            if output.len() + count > output_size {
                return Err(BoardArcError::corrupted(
                    offset as u64,
                    format!(
                        "run of {} bytes overruns output ({} of {} written)",
                        count,
                        output.len(),
                        output_size
                    ),
                ));
            }

            if control & LITERAL_RUN != 0 {
                output.extend_from_slice(cursor.read_bytes(count)?);
            } else {
                let byte = cursor.read_u8()?;
                output.resize(output.len() + count, byte);
            }
        }

        Ok(output)
    }
}

impl Decompressor for RleDecoder {
    fn decompress(&self, input: &[u8], output_size: usize) -> Result<Vec<u8>> {
        self.decode(input, output_size)
    }
}

/// Decompress RLE data.
pub fn decompress(input: &[u8], output_size: usize) -> Result<Vec<u8>> {
    RleDecoder::new().decode(input, output_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_run() {
        let out = decompress(&[0x83, 0x10, 0x20, 0x30], 3).unwrap();
        assert_eq!(out, [0x10, 0x20, 0x30]);
    }

    #[test]
    fn test_repeat_run() {
        assert_eq!(decompress(&[0x03, 0xFF], 3).unwrap(), [0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_mixed_runs() {
        let input = [0x02, b'-', 0x82, b'o', b'k', 0x7F, 0x00];
        let out = decompress(&input, 4 + 0x7F).unwrap();
        assert_eq!(&out[..4], b"--ok");
        assert!(out[4..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_zero_count_runs_are_skipped() {
        // 0x80 is an empty literal run, 0x00 an empty repeat
        let input = [0x80, 0x00, 0xAA, 0x81, b'x'];
        assert_eq!(decompress(&input, 1).unwrap(), b"x");
    }

    #[test]
    fn test_empty() {
        assert!(decompress(&[], 0).unwrap().is_empty());
    }

    #[test]
    fn test_truncated() {
        let err = decompress(&[0x84, 1, 2], 4).unwrap_err();
        assert!(matches!(err, BoardArcError::TruncatedInput { .. }));

        let err = decompress(&[0x05], 5).unwrap_err();
        assert!(matches!(err, BoardArcError::TruncatedInput { .. }));

        let err = decompress(&[0x01, 0x01], 2).unwrap_err();
        assert!(matches!(err, BoardArcError::TruncatedInput { .. }));
    }

    #[test]
    fn test_huge_declared_size() {
        let err = decompress(&[0x01, 0xAA], 0xFFFF_FFF0).unwrap_err();
        assert!(matches!(err, BoardArcError::TruncatedInput { .. }));
    }

    #[test]
    fn test_overrun_is_corrupt() {
        let err = decompress(&[0x01, 0xAA, 0x05, 0xBB], 3).unwrap_err();
        assert!(matches!(err, BoardArcError::CorruptedData { offset: 2, .. }));
    }

    #[test]
    fn test_trait_object() {
        let decoder: &dyn Decompressor = &RleDecoder::new();
        let out = decoder.decompress_exact(&[0x83, 1, 2, 3, 0x03, 0xFF], 6).unwrap();
        assert_eq!(out, [1, 2, 3, 0xFF, 0xFF, 0xFF]);
    }
}
