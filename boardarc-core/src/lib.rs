//! # boardarc Core
//!
//! Core components for the boardarc archive library.
//!
//! This crate provides the building blocks shared by every codec and
//! container in the workspace:
//!
//! - [`bitstream`]: Bounds-checked byte cursor and literal/reference flag words
//! - [`ringbuffer`]: Absolute-indexed ring buffer for LZSS decompression
//! - [`crc`]: CRC-32 checksum
//! - [`traits`]: One-shot compression/decompression traits
//! - [`entry`]: Compression type tags
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Container                                           │
//! │     offset-table (.bin) and file-info-table (.pac)      │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec                                               │
//! │     LZSS ring buffer, sliding window, RLE, zlib         │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Core (this crate)                                   │
//! │     ByteCursor, FlagReader, RingBuffer, CRC             │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use boardarc_core::bitstream::ByteCursor;
//! use boardarc_core::crc::Crc32;
//!
//! let data = [0x00, 0x00, 0x00, 0x02, 0xAB];
//! let mut cursor = ByteCursor::new(&data);
//! assert_eq!(cursor.read_u32_be().unwrap(), 2);
//!
//! let crc = Crc32::compute(b"Hello, World!");
//! assert_eq!(crc, 0xEC4AC3D0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod crc;
pub mod entry;
pub mod error;
pub mod ringbuffer;
pub mod traits;

// Re-exports for convenience
pub use bitstream::{ByteCursor, FlagGroupWriter, FlagLayout, FlagReader};
pub use crc::Crc32;
pub use entry::CompressionType;
pub use error::{BoardArcError, Result};
pub use ringbuffer::RingBuffer;
pub use traits::{CompressionLevel, Compressor, Decompressor, Stored};
