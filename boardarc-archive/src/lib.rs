//! # boardarc Archive
//!
//! Container formats for board game data files.
//!
//! - **BIN**: offset table of entries, each with its own codec
//!   (stored, LZSS, sliding-window, RLE, inflate)
//! - **PAC**: file-info table with named, optionally zlib-compressed files
//!
//! ## Example
//!
//! ```rust
//! use boardarc_archive::{ArchiveFormat, BinArchive};
//! use boardarc_core::CompressionType;
//!
//! let mut archive = BinArchive::new("w01.bin");
//! archive.add_entry_with_compression(CompressionType::Lzss, b"board".repeat(20));
//! let bytes = archive.to_bytes().unwrap();
//!
//! assert_eq!(ArchiveFormat::from_magic(&bytes[..16]), ArchiveFormat::Bin);
//!
//! let read = BinArchive::read(&bytes, "w01.bin").unwrap();
//! assert_eq!(read.entries()[0].data(), b"board".repeat(20).as_slice());
//! ```
//!
//! ## Format Detection
//!
//! Use [`detect::ArchiveFormat`] to tell the formats apart from their
//! leading bytes.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod binfile;
pub mod codec;
pub mod detect;
pub mod pac;

// Re-exports
pub use binfile::{BinArchive, BinEntry, BinEntryInfo, BinReader, BinWriter};
pub use codec::{Inflate, decode_payload, encode_payload, zlib_compress, zlib_decompress};
pub use detect::ArchiveFormat;
pub use pac::header::PacHeader;
pub use pac::{PacArchive, PacEntry};
