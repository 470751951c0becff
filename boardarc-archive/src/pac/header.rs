//! PAC header and file-info records.

use boardarc_core::error::{BoardArcError, Result};
use boardarc_core::ByteCursor;

/// First three bytes of every PAC archive.
pub const PAC_MAGIC: &[u8; 3] = b"PAC";

/// Signature written for new archives.
pub const DEFAULT_SIGNATURE: u32 = u32::from_be_bytes(*b"PAC ");

/// Size of the fixed header (17 words).
pub const HEADER_SIZE: usize = 17 * 4;

/// Size of one file-info record (12 words).
pub const RECORD_SIZE: usize = 12 * 4;

/// PAC archive header.
///
/// Fields the reader does not interpret are kept so that a save writes
/// them back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacHeader {
    /// Full signature word (`"PAC"` plus one byte).
    pub signature: u32,
    /// Header size as stored.
    pub header_size: u32,
    /// Word after the header size.
    pub padding: u32,
    /// Size of the file-info table.
    pub file_info_size: u32,
    /// Size of the whole archive.
    pub total_size: u32,
    /// Size of the language block.
    pub language_size: u32,
    /// Unknown.
    pub unknown1: u32,
    /// Unknown.
    pub unknown2: u32,
    /// Number of files.
    pub file_count: u32,
    /// Four reserved words.
    pub reserved: [u32; 4],
    /// Offset of the language block.
    pub language_offset: u32,
    /// Offset of the file-info table.
    pub file_info_offset: u32,
    /// Offset of the string table.
    pub string_table_offset: u32,
    /// Offset of the first file's data.
    pub first_file_offset: u32,
}

impl Default for PacHeader {
    fn default() -> Self {
        Self {
            signature: DEFAULT_SIGNATURE,
            header_size: HEADER_SIZE as u32,
            padding: 0,
            file_info_size: 0,
            total_size: 0,
            language_size: 0,
            unknown1: 0,
            unknown2: 0,
            file_count: 0,
            reserved: [0; 4],
            language_offset: 0,
            file_info_offset: 0,
            string_table_offset: 0,
            first_file_offset: 0,
        }
    }
}

impl PacHeader {
    /// Read the header at the start of `data`.
    pub fn read(data: &[u8]) -> Result<Self> {
        if !data.starts_with(PAC_MAGIC) {
            let found = data.get(..PAC_MAGIC.len()).unwrap_or(data);
            return Err(BoardArcError::invalid_magic(PAC_MAGIC.to_vec(), found.to_vec()));
        }

        let mut c = ByteCursor::new(data);
        Ok(Self {
            signature: c.read_u32_be()?,
            header_size: c.read_u32_be()?,
            padding: c.read_u32_be()?,
            file_info_size: c.read_u32_be()?,
            total_size: c.read_u32_be()?,
            language_size: c.read_u32_be()?,
            unknown1: c.read_u32_be()?,
            unknown2: c.read_u32_be()?,
            file_count: c.read_u32_be()?,
            reserved: [
                c.read_u32_be()?,
                c.read_u32_be()?,
                c.read_u32_be()?,
                c.read_u32_be()?,
            ],
            language_offset: c.read_u32_be()?,
            file_info_offset: c.read_u32_be()?,
            string_table_offset: c.read_u32_be()?,
            first_file_offset: c.read_u32_be()?,
        })
    }

    /// Serialize the header.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let words = [
            self.signature,
            self.header_size,
            self.padding,
            self.file_info_size,
            self.total_size,
            self.language_size,
            self.unknown1,
            self.unknown2,
            self.file_count,
            self.reserved[0],
            self.reserved[1],
            self.reserved[2],
            self.reserved[3],
            self.language_offset,
            self.file_info_offset,
            self.string_table_offset,
            self.first_file_offset,
        ];
        let mut out = [0u8; HEADER_SIZE];
        for (chunk, word) in out.chunks_exact_mut(4).zip(words) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        out
    }
}

/// One file-info record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileRecord {
    /// Offset of the zero-terminated name.
    pub name_offset: u32,
    /// Hash of the name.
    pub name_hash: u32,
    /// Offset of the zero-terminated extension.
    pub extension_offset: u32,
    /// Hash of the extension.
    pub extension_hash: u32,
    /// Offset of the stored data.
    pub data_offset: u32,
    /// Decoded size.
    pub data_size: u32,
    /// Stored size; differs from `data_size` when zlib-compressed.
    pub compressed_size: u32,
    /// Second copy of the stored size.
    pub compressed_size2: u32,
    /// Compression flags as stored.
    pub compression_flags: u32,
}

impl FileRecord {
    /// Read a record from `cursor`.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let name_offset = cursor.read_u32_be()?;
        let name_hash = cursor.read_u32_be()?;
        let extension_offset = cursor.read_u32_be()?;
        let extension_hash = cursor.read_u32_be()?;
        let data_offset = cursor.read_u32_be()?;
        let data_size = cursor.read_u32_be()?;
        let compressed_size = cursor.read_u32_be()?;
        let compressed_size2 = cursor.read_u32_be()?;
        cursor.skip(8)?;
        let compression_flags = cursor.read_u32_be()?;
        cursor.skip(4)?;

        Ok(Self {
            name_offset,
            name_hash,
            extension_offset,
            extension_hash,
            data_offset,
            data_size,
            compressed_size,
            compressed_size2,
            compression_flags,
        })
    }

    /// Whether the stored data is zlib-compressed.
    pub fn is_compressed(&self) -> bool {
        self.data_size != self.compressed_size
    }

    /// Append the record to `out`.
    pub fn write(&self, out: &mut Vec<u8>) {
        let words = [
            self.name_offset,
            self.name_hash,
            self.extension_offset,
            self.extension_hash,
            self.data_offset,
            self.data_size,
            self.compressed_size,
            self.compressed_size2,
            0,
            0,
            self.compression_flags,
            0,
        ];
        for word in words {
            out.extend_from_slice(&word.to_be_bytes());
        }
    }
}

/// Round `value` up to a multiple of `align` (a power of two).
pub(crate) fn align_up(value: usize, align: usize) -> usize {
    (value + align - 1) & !(align - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        let header = PacHeader {
            signature: u32::from_be_bytes(*b"PAC\x01"),
            unknown1: 0xDEAD_BEEF,
            reserved: [1, 2, 3, 4],
            file_count: 7,
            ..PacHeader::default()
        };
        let bytes = header.to_bytes();
        assert_eq!(&bytes[..4], b"PAC\x01");
        assert_eq!(PacHeader::read(&bytes).unwrap(), header);
    }

    #[test]
    fn test_header_bad_magic() {
        let err = PacHeader::read(b"ZIP\0").unwrap_err();
        assert!(matches!(err, BoardArcError::InvalidMagic { .. }));
    }

    #[test]
    fn test_header_truncated() {
        let err = PacHeader::read(b"PAC \0\0\0\0").unwrap_err();
        assert!(matches!(err, BoardArcError::TruncatedInput { .. }));
    }

    #[test]
    fn test_record_roundtrip() {
        let record = FileRecord {
            name_offset: 0x100,
            name_hash: 0x1234_5678,
            extension_offset: 0x108,
            extension_hash: 0x9ABC_DEF0,
            data_offset: 0x200,
            data_size: 64,
            compressed_size: 20,
            compressed_size2: 20,
            compression_flags: 1,
        };
        let mut out = Vec::new();
        record.write(&mut out);
        assert_eq!(out.len(), RECORD_SIZE);

        let mut cursor = ByteCursor::new(&out);
        let read = FileRecord::read(&mut cursor).unwrap();
        assert_eq!(read, record);
        assert!(read.is_compressed());
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(0, 16), 0);
        assert_eq!(align_up(1, 16), 16);
        assert_eq!(align_up(68, 16), 80);
        assert_eq!(align_up(80, 16), 80);
    }
}
