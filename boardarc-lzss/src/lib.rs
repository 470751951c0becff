//! # boardarc LZSS
//!
//! Pure Rust implementation of the ring-buffer LZSS codec used by
//! GameCube-era board archives (compression tag `1`).
//!
//! The stream is a sequence of groups: one flag byte (LSB first, `1` =
//! literal) followed by up to eight units. A literal unit is one byte; a
//! reference unit is two bytes holding a 10-bit absolute ring position and
//! a 6-bit length (`+3`). The 1 KB ring buffer starts zero-filled with its
//! write cursor at `0x3BE`.
//!
//! ## Example
//!
//! ```rust
//! use boardarc_lzss::{compress, decompress};
//!
//! let data = b"board board board board";
//! let packed = compress(data).unwrap();
//! let unpacked = decompress(&packed, data.len()).unwrap();
//! assert_eq!(unpacked, data);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod decode;
pub mod encode;
pub mod params;
pub mod tree;

// Re-exports
pub use decode::{LzssDecoder, decompress};
pub use encode::{LzssEncoder, compress};
pub use params::{LzssParams, MAX_MATCH, THRESHOLD, WINDOW_SIZE, WINDOW_START};
pub use tree::MatchTree;
