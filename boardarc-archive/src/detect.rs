//! Archive format auto-detection.
//!
//! PAC archives carry a signature. Offset-table archives do not, so they
//! are recognised by the shape of their table: the first offset must point
//! just past it (optionally after one padding word).

use boardarc_core::error::Result;
use std::io::Read;
use std::path::Path;

/// Bytes needed to tell the formats apart.
pub const MAGIC_LEN: usize = 16;

/// Known archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// Offset-table archive (.bin, .dat).
    Bin,
    /// File-info-table archive (.pac).
    Pac,
    /// Unknown format.
    Unknown,
}

impl ArchiveFormat {
    /// Detect format from the leading bytes of an archive.
    pub fn from_magic(magic: &[u8]) -> Self {
        if magic.starts_with(b"PAC") {
            return Self::Pac;
        }

        if magic.len() >= MAGIC_LEN {
            let count = u64::from(u32::from_be_bytes([magic[0], magic[1], magic[2], magic[3]]));
            let first = u64::from(u32::from_be_bytes([magic[4], magic[5], magic[6], magic[7]]));
            if first == 4 + 4 * count || first == 8 + 4 * count {
                return Self::Bin;
            }
        }

        Self::Unknown
    }

    /// Detect format, also requiring a `.bin`/`.dat` name for offset-table
    /// archives since their check is only structural.
    pub fn detect_with_name(magic: &[u8], file_name: &str) -> Self {
        match Self::from_magic(magic) {
            Self::Bin => {
                let extension = Path::new(file_name)
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("");
                if extension.eq_ignore_ascii_case("bin") || extension.eq_ignore_ascii_case("dat") {
                    Self::Bin
                } else {
                    Self::Unknown
                }
            }
            other => other,
        }
    }

    /// Detect format from a reader.
    pub fn detect<R: Read>(reader: &mut R) -> Result<(Self, Vec<u8>)> {
        let mut magic = Vec::with_capacity(MAGIC_LEN);
        reader.take(MAGIC_LEN as u64).read_to_end(&mut magic)?;

        let format = Self::from_magic(&magic);
        Ok((format, magic))
    }

    /// Get the typical file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Bin => "bin",
            Self::Pac => "pac",
            Self::Unknown => "",
        }
    }
}

impl std::fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bin => write!(f, "BIN"),
            Self::Pac => write!(f, "PAC"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}
