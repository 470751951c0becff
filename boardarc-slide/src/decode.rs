//! Sliding-window decompression.

use crate::params::{HEADER_SIZE, LONG_MAX, MAX_DISTANCE};
use boardarc_core::error::Result;
use boardarc_core::traits::Decompressor;
use boardarc_core::{ByteCursor, FlagLayout, FlagReader};
use log::warn;

/// Upper bound on output per input byte, used to size the first allocation.
const MAX_EXPANSION: usize = LONG_MAX / 2;

/// Sliding-window decoder.
///
/// References copy from the already decoded output rather than from a
/// separate ring buffer, so the decoder keeps no state beyond the output.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlideDecoder;

impl SlideDecoder {
    /// Create a decoder.
    pub fn new() -> Self {
        Self
    }

    /// Decode `input` (header included) into exactly `output_size` bytes.
    ///
    /// The size stored in the header is skipped; `output_size` is
    /// authoritative. References reaching before the start of the output
    /// produce zero bytes.
    pub fn decode(&self, input: &[u8], output_size: usize) -> Result<Vec<u8>> {
        let mut cursor = ByteCursor::new(input);
        cursor.skip(HEADER_SIZE)?;

        let mut output =
            Vec::with_capacity(output_size.min(input.len().saturating_mul(MAX_EXPANSION)));
        let mut flags = FlagReader::new(FlagLayout::MsbWord);
        let mut zero_filled = 0usize;

        while output.len() < output_size {
            if flags.next_flag(&mut cursor)? {
                output.push(cursor.read_u8()?);
                continue;
            }

            let (distance, length) = read_reference(&mut cursor)?;
            let end = (output.len() + length).min(output_size);
            while output.len() < end {
                let pos = output.len();
                let byte = if distance > pos {
                    zero_filled += 1;
                    0
                } else {
                    output[pos - distance]
                };
                output.push(byte);
            }
        }

        if zero_filled > 0 {
            warn!(
                "slide stream referenced {} byte(s) before start of output, zero-filled",
                zero_filled
            );
        }

        Ok(output)
    }
}

/// Read one back-reference as `(distance, length)`.
fn read_reference(cursor: &mut ByteCursor<'_>) -> Result<(usize, usize)> {
    let b1 = cursor.read_u8()? as usize;
    let b2 = cursor.read_u8()? as usize;

    let distance = (((b1 & 0x0F) << 8) | b2) + 1;
    debug_assert!(distance <= MAX_DISTANCE);

    let length = match b1 >> 4 {
        0 => cursor.read_u8()? as usize + 0x12,
        nibble => nibble + 2,
    };

    Ok((distance, length))
}

/// Read the decoded length from a stream header.
pub fn decoded_len(input: &[u8]) -> Result<u32> {
    ByteCursor::new(input).read_u32_be()
}

impl Decompressor for SlideDecoder {
    fn decompress(&self, input: &[u8], output_size: usize) -> Result<Vec<u8>> {
        self.decode(input, output_size)
    }
}

/// Decompress a sliding-window stream.
pub fn decompress(input: &[u8], output_size: usize) -> Result<Vec<u8>> {
    SlideDecoder::new().decode(input, output_size)
}
