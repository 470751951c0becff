//! LZSS decompression.

use crate::params::{LzssParams, MAX_MATCH, WINDOW_SIZE, WINDOW_START};
use boardarc_core::error::{BoardArcError, Result};
use boardarc_core::traits::Decompressor;
use boardarc_core::{ByteCursor, FlagLayout, FlagReader, RingBuffer};

/// Most output one input byte can produce: a two-byte reference copies
/// `MAX_MATCH` bytes.
const MAX_EXPANSION: usize = MAX_MATCH / 2;

/// LZSS decoder.
///
/// Each flag bit selects a literal byte (`1`) or a two-byte reference (`0`)
/// into a 1 KB ring buffer whose write cursor starts at `0x3BE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LzssDecoder {
    params: LzssParams,
}

impl LzssDecoder {
    /// Create a decoder for GameCube board archives.
    pub fn new() -> Self {
        Self::with_params(LzssParams::GAMECUBE)
    }

    /// Create a decoder with custom parameters.
    pub fn with_params(params: LzssParams) -> Self {
        Self { params }
    }

    /// Decode `input` into exactly `output_size` bytes.
    pub fn decode(&self, input: &[u8], output_size: usize) -> Result<Vec<u8>> {
        let mut output =
            Vec::with_capacity(output_size.min(input.len().saturating_mul(MAX_EXPANSION)));
        let mut ring = RingBuffer::with_cursor(WINDOW_SIZE, WINDOW_START, self.params.fill);
        let mut cursor = ByteCursor::new(input);
        let mut flags = FlagReader::new(FlagLayout::LsbByte);

        while output.len() < output_size {
            if flags.next_flag(&mut cursor)? {
                let byte = cursor.read_u8()?;
                ring.write_byte(byte);
                output.push(byte);
            } else {
                let offset = cursor.position();
                let pair = cursor.read_bytes(2)?;
                let (position, length) = LzssParams::unpack_reference([pair[0], pair[1]]);

                if output.len() + length > output_size {
                    return Err(BoardArcError::corrupted(
                        offset as u64,
                        format!(
                            "back-reference of {} bytes overruns output ({} of {} written)",
                            length,
                            output.len(),
                            output_size
                        ),
                    ));
                }

                ring.copy_from(position, length, &mut output);
            }
        }

        Ok(output)
    }
}

impl Decompressor for LzssDecoder {
    fn decompress(&self, input: &[u8], output_size: usize) -> Result<Vec<u8>> {
        self.decode(input, output_size)
    }
}

/// Decompress LZSS data with the GameCube parameters.
pub fn decompress(input: &[u8], output_size: usize) -> Result<Vec<u8>> {
    LzssDecoder::new().decode(input, output_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_literal() {
        // Flag byte 0x01: first unit is a literal
        let out = decompress(&[0x01, 0x41], 1).unwrap();
        assert_eq!(out, [0x41]);
    }

    #[test]
    fn test_empty_output() {
        assert!(decompress(&[], 0).unwrap().is_empty());
    }

    #[test]
    fn test_reference_into_fresh_output() {
        // Literal 'A' lands at 0x3BE; a 5-byte reference from 0x3BE repeats it
        let reference = LzssParams::pack_reference(0x3BE, 5);
        let input = [0x01, b'A', reference[0], reference[1]];
        let out = decompress(&input, 6).unwrap();
        assert_eq!(out, b"AAAAAA");
    }

    #[test]
    fn test_reference_into_initial_fill() {
        // Position 0 is still part of the zero-filled window
        let reference = LzssParams::pack_reference(0, 4);
        let input = [0x00, reference[0], reference[1]];
        assert_eq!(decompress(&input, 4).unwrap(), [0, 0, 0, 0]);

        let spaces = LzssDecoder::with_params(LzssParams::OKUMURA)
            .decode(&input, 4)
            .unwrap();
        assert_eq!(spaces, b"    ");
    }

    #[test]
    fn test_multiple_flag_bytes() {
        // Nine literals need two flag bytes
        let mut input = vec![0xFF];
        input.extend_from_slice(b"abcdefgh");
        input.push(0x01);
        input.push(b'i');
        assert_eq!(decompress(&input, 9).unwrap(), b"abcdefghi");
    }

    #[test]
    fn test_truncated_input() {
        let err = decompress(&[0x03, b'A'], 2).unwrap_err();
        assert!(matches!(err, BoardArcError::TruncatedInput { .. }));

        let err = decompress(&[0x00, 0xBE], 3).unwrap_err();
        assert!(matches!(err, BoardArcError::TruncatedInput { .. }));
    }

    #[test]
    fn test_huge_declared_size() {
        let err = decompress(&[0x01, b'A'], 0xFFFF_FFF0).unwrap_err();
        assert!(matches!(err, BoardArcError::TruncatedInput { .. }));
    }

    #[test]
    fn test_reference_overrun_is_corrupt() {
        let reference = LzssParams::pack_reference(0x3BE, 10);
        let input = [0x01, b'A', reference[0], reference[1]];
        let err = decompress(&input, 4).unwrap_err();
        assert!(matches!(err, BoardArcError::CorruptedData { offset: 2, .. }));
    }
}
