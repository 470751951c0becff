//! # boardarc Slide
//!
//! Pure Rust implementation of the sliding-window LZ codec used by
//! GameCube-era board archives (compression tags `2`, `3` and `4`).
//!
//! A stream starts with the decoded length as a big-endian `u32`, followed
//! by groups of one big-endian 32-bit codeword (MSB first, `1` = literal)
//! and up to 32 units. References copy from the decoded output itself:
//!
//! | form      | bytes                     | length        | distance          |
//! |-----------|---------------------------|---------------|-------------------|
//! | short     | `LD DD`                   | `L + 2`       | `0xDDD + 1`       |
//! | long      | `0D DD NN`                | `NN + 0x12`   | `0xDDD + 1`       |
//!
//! ## Example
//!
//! ```rust
//! use boardarc_slide::{compress, decompress};
//!
//! let data = b"slide slide slide slide";
//! let packed = compress(data).unwrap();
//! assert_eq!(&packed[..4], &(data.len() as u32).to_be_bytes());
//! assert_eq!(decompress(&packed, data.len()).unwrap(), data);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod decode;
pub mod encode;
pub mod params;

// Re-exports
pub use decode::{SlideDecoder, decoded_len, decompress};
pub use encode::{SlideEncoder, compress};
pub use params::{HEADER_SIZE, LONG_MAX, MAX_DISTANCE, MIN_MATCH, SHORT_MAX, SlideParams};
