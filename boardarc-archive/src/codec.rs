//! Per-entry codec dispatch.
//!
//! Maps a stored [`CompressionType`] to the codec that reads and writes it.
//! Every codec is stateless, so the boxed instances can be shared across
//! threads.

use boardarc_core::error::{BoardArcError, Result};
use boardarc_core::traits::{CompressionLevel, Compressor, Decompressor, Stored};
use boardarc_core::{ByteCursor, CompressionType};
use boardarc_lzss::{LzssDecoder, LzssEncoder};
use boardarc_rle::RleDecoder;
use boardarc_slide::{SlideDecoder, SlideEncoder};
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use log::{trace, warn};
use std::io::{Read, Write};

/// Size of the `(decoded size, zlib length)` prefix of an inflate payload.
pub const INFLATE_PREFIX_SIZE: usize = 8;

/// Boxed decoder usable from any thread.
pub type DynDecompressor = Box<dyn Decompressor + Send + Sync>;

/// Boxed encoder usable from any thread.
pub type DynCompressor = Box<dyn Compressor + Send + Sync>;

/// Inflate entries: a big-endian decoded size, the big-endian length of the
/// zlib stream, then the zlib stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inflate {
    level: CompressionLevel,
}

impl Inflate {
    /// Create an inflate codec compressing at `level`.
    pub fn new(level: CompressionLevel) -> Self {
        Self { level }
    }
}

impl Decompressor for Inflate {
    fn decompress(&self, input: &[u8], output_size: usize) -> Result<Vec<u8>> {
        let mut cursor = ByteCursor::new(input);
        cursor.skip(INFLATE_PREFIX_SIZE)?;
        zlib_decompress(
            &input[INFLATE_PREFIX_SIZE..],
            INFLATE_PREFIX_SIZE as u64,
            output_size,
        )
    }
}

impl Compressor for Inflate {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let stream = zlib_compress(input, self.level)?;
        let mut output = Vec::with_capacity(INFLATE_PREFIX_SIZE + stream.len());
        output.extend_from_slice(&to_u32(input.len())?.to_be_bytes());
        output.extend_from_slice(&to_u32(stream.len())?.to_be_bytes());
        output.extend_from_slice(&stream);
        Ok(output)
    }
}

/// Inflate a zlib stream expected to hold `limit` bytes.
///
/// At most `limit + 1` bytes are produced, enough for the caller to see
/// that a stream is too long. `offset` locates the stream for error reports.
pub fn zlib_decompress(stream: &[u8], offset: u64, limit: usize) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    ZlibDecoder::new(stream)
        .take(limit as u64 + 1)
        .read_to_end(&mut output)
        .map_err(|e| BoardArcError::corrupted(offset, format!("zlib stream: {}", e)))?;
    Ok(output)
}

/// Deflate `input` into a zlib stream.
pub fn zlib_compress(input: &[u8], level: CompressionLevel) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(input.len() / 2),
        Compression::new(u32::from(level.level())),
    );
    encoder.write_all(input)?;
    Ok(encoder.finish()?)
}

/// Narrow a length to the 32-bit fields used by every container header.
pub(crate) fn to_u32(value: usize) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| BoardArcError::invalid_header(format!("{} does not fit in 32 bits", value)))
}

/// Decoder for a compression type, or `None` if it is unknown.
pub fn decoder_for(compression: CompressionType) -> Option<DynDecompressor> {
    match compression {
        CompressionType::None => Some(Box::new(Stored)),
        CompressionType::Lzss => Some(Box::new(LzssDecoder::new())),
        CompressionType::Slide | CompressionType::FlideAlt | CompressionType::Flide => {
            Some(Box::new(SlideDecoder::new()))
        }
        CompressionType::Rle => Some(Box::new(RleDecoder::new())),
        CompressionType::Inflate => Some(Box::new(Inflate::default())),
        CompressionType::Unknown(_) => None,
    }
}

/// Encoder for a compression type, or `None` if it cannot be written.
pub fn encoder_for(compression: CompressionType, level: CompressionLevel) -> Option<DynCompressor> {
    match compression {
        // Uncompressed entries are saved verbatim rather than refused
        CompressionType::None => Some(Box::new(Stored)),
        CompressionType::Lzss => Some(Box::new(LzssEncoder::new())),
        CompressionType::Slide | CompressionType::FlideAlt | CompressionType::Flide => {
            Some(Box::new(SlideEncoder::new()))
        }
        CompressionType::Inflate => Some(Box::new(Inflate::new(level))),
        CompressionType::Rle | CompressionType::Unknown(_) => None,
    }
}

/// Decode one entry payload to exactly `size` bytes.
///
/// Payloads with an unknown tag are returned unchanged.
pub fn decode_payload(compression: CompressionType, payload: &[u8], size: usize) -> Result<Vec<u8>> {
    trace!(
        "decoding {} payload: {} -> {} bytes",
        compression,
        payload.len(),
        size
    );
    match decoder_for(compression) {
        Some(decoder) => decoder.decompress_exact(payload, size),
        None => {
            warn!(
                "unknown compression tag {}, keeping {} raw bytes",
                compression.tag(),
                payload.len()
            );
            Ok(payload.to_vec())
        }
    }
}

/// Encode one entry payload.
pub fn encode_payload(
    compression: CompressionType,
    data: &[u8],
    level: CompressionLevel,
) -> Result<Vec<u8>> {
    let encoder = encoder_for(compression, level)
        .ok_or_else(|| BoardArcError::unsupported_compression(compression))?;
    let payload = encoder.compress(data)?;
    trace!(
        "encoded {} payload: {} -> {} bytes",
        compression,
        data.len(),
        payload.len()
    );
    Ok(payload)
}
