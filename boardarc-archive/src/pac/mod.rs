//! PAC archives.
//!
//! A fixed header points at a language block, a table of 48-byte file
//! records, a table of zero-terminated names and extensions, and the file
//! data. A file whose stored size differs from its decoded size is a zlib
//! stream.
//!
//! Saving lays the sections out again in that order, each aligned to
//! [`DATA_ALIGNMENT`]. Header words and record fields with no known meaning
//! are written back as read.

pub mod header;

use crate::codec::{to_u32, zlib_compress, zlib_decompress};
use boardarc_core::error::{BoardArcError, Result};
use boardarc_core::traits::CompressionLevel;
use boardarc_core::{ByteCursor, Crc32};
use encoding_rs::SHIFT_JIS;
use header::{FileRecord, HEADER_SIZE, PacHeader, RECORD_SIZE, align_up};
use log::{debug, trace};
use std::collections::HashMap;
use std::io::Write;

/// Alignment of every section and file written by [`PacArchive::to_bytes`].
pub const DATA_ALIGNMENT: usize = 16;

/// One file in a PAC archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacEntry {
    /// File name.
    pub name: String,
    /// File extension.
    pub extension: String,
    /// Stored hash of the name.
    pub name_hash: u32,
    /// Stored hash of the extension.
    pub extension_hash: u32,
    /// Compression flags as stored.
    pub compression_flags: u32,
    /// Store the data zlib-compressed.
    pub compressed: bool,
    data: Vec<u8>,
}

impl PacEntry {
    /// Create an entry.
    ///
    /// The hash the game itself stores is unknown, so new entries get the
    /// CRC-32 of the name and extension. Entries read from an archive keep
    /// their stored hashes.
    pub fn new(name: &str, extension: &str, data: Vec<u8>, compressed: bool) -> Self {
        Self {
            name: name.to_string(),
            extension: extension.to_string(),
            name_hash: Crc32::compute(name.as_bytes()),
            extension_hash: Crc32::compute(extension.as_bytes()),
            compression_flags: 0,
            compressed,
            data,
        }
    }

    /// Name joined with the extension.
    pub fn full_name(&self) -> String {
        if self.extension.is_empty() {
            self.name.clone()
        } else if self.extension.starts_with('.') {
            format!("{}{}", self.name, self.extension)
        } else {
            format!("{}.{}", self.name, self.extension)
        }
    }

    /// Decoded data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the entry, returning its data.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Editable PAC archive.
#[derive(Debug, Clone, Default)]
pub struct PacArchive {
    header: PacHeader,
    language: Vec<u8>,
    entries: Vec<PacEntry>,
    zlib_level: CompressionLevel,
}

fn slice_at(data: &[u8], offset: u32, len: u32) -> Result<&[u8]> {
    ByteCursor::at(data, offset as usize)?.read_bytes(len as usize)
}

/// Read a zero-terminated string: UTF-8, else Shift_JIS.
fn read_string(data: &[u8], offset: u32) -> Result<String> {
    let tail = data
        .get(offset as usize..)
        .ok_or_else(|| BoardArcError::truncated(offset as usize, data.len()))?;
    let bytes = match tail.iter().position(|&b| b == 0) {
        Some(end) => &tail[..end],
        None => {
            return Err(BoardArcError::corrupted(
                u64::from(offset),
                "unterminated string",
            ));
        }
    };

    if let Ok(s) = std::str::from_utf8(bytes) {
        return Ok(s.to_string());
    }

    let (decoded, _, had_errors) = SHIFT_JIS.decode(bytes);
    if had_errors {
        return Err(BoardArcError::encoding_error(format!(
            "string at {:#x} is neither UTF-8 nor Shift_JIS",
            offset
        )));
    }
    Ok(decoded.into_owned())
}

impl PacArchive {
    /// Create an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and decode a whole archive.
    pub fn read(data: &[u8]) -> Result<Self> {
        let header = PacHeader::read(data)?;

        let language = if header.language_size > 0 {
            slice_at(data, header.language_offset, header.language_size)?.to_vec()
        } else {
            Vec::new()
        };

        let mut cursor = ByteCursor::at(data, header.file_info_offset as usize)?;
        let count = header.file_count as usize;
        let mut entries = Vec::with_capacity(count.min(cursor.remaining() / RECORD_SIZE));

        for _ in 0..count {
            let record = FileRecord::read(&mut cursor)?;
            let name = read_string(data, record.name_offset)?;
            let extension = read_string(data, record.extension_offset)?;
            let stored = slice_at(data, record.data_offset, record.compressed_size)?;

            let compressed = record.is_compressed();
            let payload = if compressed {
                let out = zlib_decompress(
                    stored,
                    u64::from(record.data_offset),
                    record.data_size as usize,
                )?;
                if out.len() != record.data_size as usize {
                    return Err(BoardArcError::size_mismatch(
                        record.data_size as usize,
                        out.len(),
                    ));
                }
                out
            } else {
                stored.to_vec()
            };

            trace!(
                "pac entry {}.{}: {} bytes at {:#x}, compressed: {}",
                name,
                extension,
                record.data_size,
                record.data_offset,
                compressed
            );

            entries.push(PacEntry {
                name,
                extension,
                name_hash: record.name_hash,
                extension_hash: record.extension_hash,
                compression_flags: record.compression_flags,
                compressed,
                data: payload,
            });
        }

        debug!(
            "pac archive: {} entries, {} byte language block",
            entries.len(),
            language.len()
        );

        Ok(Self {
            header,
            language,
            entries,
            zlib_level: CompressionLevel::default(),
        })
    }

    /// Header as last read or written.
    pub fn header(&self) -> &PacHeader {
        &self.header
    }

    /// Opaque language block.
    pub fn language_block(&self) -> &[u8] {
        &self.language
    }

    /// Replace the language block.
    pub fn set_language_block(&mut self, language: Vec<u8>) {
        self.language = language;
    }

    /// Get entries in table order.
    pub fn entries(&self) -> &[PacEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find an entry by name, with or without its extension.
    pub fn get(&self, name: &str) -> Option<&PacEntry> {
        self.entries
            .iter()
            .find(|e| e.name == name || e.full_name() == name)
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.entries
            .iter()
            .position(|e| e.name == name || e.full_name() == name)
            .ok_or_else(|| BoardArcError::entry_not_found(name))
    }

    /// Set the zlib level used for compressed entries on save.
    pub fn set_zlib_level(&mut self, level: CompressionLevel) {
        self.zlib_level = level;
    }

    /// Append an entry.
    pub fn add_entry(&mut self, entry: PacEntry) {
        self.entries.push(entry);
    }

    /// Remove the entry called `name`.
    pub fn remove_entry(&mut self, name: &str) -> Result<PacEntry> {
        let index = self.position(name)?;
        Ok(self.entries.remove(index))
    }

    /// Replace the data of the entry called `name`.
    pub fn replace_data(&mut self, name: &str, data: Vec<u8>) -> Result<()> {
        let index = self.position(name)?;
        self.entries[index].data = data;
        Ok(())
    }

    /// Bytes to store for `entry` and whether they are compressed.
    fn stored_form(&self, entry: &PacEntry) -> Result<(Vec<u8>, bool)> {
        if !entry.compressed {
            return Ok((entry.data.clone(), false));
        }
        let stream = zlib_compress(&entry.data, self.zlib_level)?;
        if stream.len() == entry.data.len() {
            // Equal sizes read back as uncompressed
            debug!("pac entry {} stored raw", entry.full_name());
            return Ok((entry.data.clone(), false));
        }
        Ok((stream, true))
    }

    /// Encode the archive.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let stored = self
            .entries
            .iter()
            .map(|e| self.stored_form(e))
            .collect::<Result<Vec<_>>>()?;

        // String table, shared between entries
        let mut strings = Vec::new();
        let mut string_offsets: HashMap<&str, usize> = HashMap::new();
        for entry in &self.entries {
            for s in [entry.name.as_str(), entry.extension.as_str()] {
                string_offsets.entry(s).or_insert_with(|| {
                    let offset = strings.len();
                    strings.extend_from_slice(s.as_bytes());
                    strings.push(0);
                    offset
                });
            }
        }

        let language_offset = align_up(HEADER_SIZE, DATA_ALIGNMENT);
        let file_info_offset = align_up(language_offset + self.language.len(), DATA_ALIGNMENT);
        let file_info_size = self.entries.len() * RECORD_SIZE;
        let string_table_offset = align_up(file_info_offset + file_info_size, DATA_ALIGNMENT);
        let first_file_offset = align_up(string_table_offset + strings.len(), DATA_ALIGNMENT);

        let mut records = Vec::with_capacity(file_info_size);
        let mut data_offset = first_file_offset;
        for (entry, (bytes, _)) in self.entries.iter().zip(&stored) {
            let name_offset = string_table_offset + string_offsets[entry.name.as_str()];
            let extension_offset = string_table_offset + string_offsets[entry.extension.as_str()];
            let compressed_size = to_u32(bytes.len())?;

            FileRecord {
                name_offset: to_u32(name_offset)?,
                name_hash: entry.name_hash,
                extension_offset: to_u32(extension_offset)?,
                extension_hash: entry.extension_hash,
                data_offset: to_u32(data_offset)?,
                data_size: to_u32(entry.data.len())?,
                compressed_size,
                compressed_size2: compressed_size,
                compression_flags: entry.compression_flags,
            }
            .write(&mut records);

            data_offset = align_up(data_offset + bytes.len(), DATA_ALIGNMENT);
        }
        let total_size = data_offset;

        let header = PacHeader {
            file_info_size: to_u32(file_info_size)?,
            total_size: to_u32(total_size)?,
            language_size: to_u32(self.language.len())?,
            file_count: to_u32(self.entries.len())?,
            language_offset: to_u32(language_offset)?,
            file_info_offset: to_u32(file_info_offset)?,
            string_table_offset: to_u32(string_table_offset)?,
            first_file_offset: to_u32(first_file_offset)?,
            ..self.header.clone()
        };

        let mut output = Vec::with_capacity(total_size);
        output.extend_from_slice(&header.to_bytes());
        output.resize(language_offset, 0);
        output.extend_from_slice(&self.language);
        output.resize(file_info_offset, 0);
        output.extend_from_slice(&records);
        output.resize(string_table_offset, 0);
        output.extend_from_slice(&strings);
        output.resize(first_file_offset, 0);
        for (bytes, _) in &stored {
            output.extend_from_slice(bytes);
            output.resize(align_up(output.len(), DATA_ALIGNMENT), 0);
        }

        debug!(
            "pac archive saved: {} entries, {} bytes",
            self.entries.len(),
            output.len()
        );
        Ok(output)
    }

    /// Encode the archive into `writer`. Nothing is written on error.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<W> {
        let bytes = self.to_bytes()?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PacArchive {
        let mut pac = PacArchive::new();
        pac.add_entry(PacEntry::new("board", "bin", b"board data ".repeat(30), true));
        pac.add_entry(PacEntry::new("icon", "tpl", vec![1, 2, 3], false));
        pac.add_entry(PacEntry::new("empty", "bin", Vec::new(), false));
        pac
    }

    #[test]
    fn test_roundtrip() {
        let pac = sample();
        let bytes = pac.to_bytes().unwrap();
        assert_eq!(&bytes[..3], b"PAC");

        let read = PacArchive::read(&bytes).unwrap();
        assert_eq!(read.entries(), pac.entries());
        assert_eq!(read.header().file_count, 3);
        assert_eq!(read.header().total_size as usize, bytes.len());
    }

    #[test]
    fn test_layout_is_aligned() {
        let bytes = sample().to_bytes().unwrap();
        let header = PacHeader::read(&bytes).unwrap();
        for offset in [
            header.language_offset,
            header.file_info_offset,
            header.string_table_offset,
            header.first_file_offset,
        ] {
            assert_eq!(offset as usize % DATA_ALIGNMENT, 0);
        }
        assert_eq!(header.file_info_size as usize, 3 * RECORD_SIZE);
    }

    #[test]
    fn test_compressed_flag() {
        let bytes = sample().to_bytes().unwrap();
        let header = PacHeader::read(&bytes).unwrap();
        let mut cursor = ByteCursor::at(&bytes, header.file_info_offset as usize).unwrap();

        let board = FileRecord::read(&mut cursor).unwrap();
        assert!(board.is_compressed());
        assert!(board.compressed_size < board.data_size);
        assert_eq!(board.compressed_size, board.compressed_size2);

        let icon = FileRecord::read(&mut cursor).unwrap();
        assert!(!icon.is_compressed());
        assert_eq!(icon.data_size, 3);

        // Extension strings are shared
        let empty = FileRecord::read(&mut cursor).unwrap();
        assert_eq!(empty.extension_offset, board.extension_offset);
    }

    #[test]
    fn test_preserves_unknown_fields() {
        let mut pac = sample();
        pac.header.unknown1 = 0x1111_2222;
        pac.header.unknown2 = 0x3333_4444;
        pac.header.reserved = [5, 6, 7, 8];
        pac.header.signature = u32::from_be_bytes(*b"PAC\x02");
        pac.set_language_block(b"en\0fr\0de\0".to_vec());
        pac.entries[1].compression_flags = 0x40;
        pac.entries[1].name_hash = 0xCAFE_F00D;

        let read = PacArchive::read(&pac.to_bytes().unwrap()).unwrap();
        assert_eq!(read.header().unknown1, 0x1111_2222);
        assert_eq!(read.header().unknown2, 0x3333_4444);
        assert_eq!(read.header().reserved, [5, 6, 7, 8]);
        assert_eq!(read.header().signature, u32::from_be_bytes(*b"PAC\x02"));
        assert_eq!(read.language_block(), b"en\0fr\0de\0");
        assert_eq!(read.entries()[1].compression_flags, 0x40);
        assert_eq!(read.entries()[1].name_hash, 0xCAFE_F00D);
    }

    #[test]
    fn test_new_entry_hashes() {
        let entry = PacEntry::new("123456789", "", Vec::new(), false);
        assert_eq!(entry.name_hash, 0xCBF4_3926);
        assert_eq!(entry.extension_hash, 0);
        assert_eq!(entry.full_name(), "123456789");
        assert_eq!(PacEntry::new("a", ".b", Vec::new(), false).full_name(), "a.b");
    }

    #[test]
    fn test_edit() {
        let mut pac = sample();
        assert!(pac.get("icon").is_some());
        assert!(pac.get("icon.tpl").is_some());

        pac.replace_data("icon.tpl", vec![9; 40]).unwrap();
        let removed = pac.remove_entry("board").unwrap();
        assert_eq!(removed.full_name(), "board.bin");

        let read = PacArchive::read(&pac.to_bytes().unwrap()).unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read.entries()[0].data(), &[9; 40]);
        assert!(matches!(
            pac.remove_entry("board"),
            Err(BoardArcError::EntryNotFound { .. })
        ));
    }

    #[test]
    fn test_shift_jis_name() {
        // "ボード" in Shift_JIS
        let sjis = [0x83, 0x7B, 0x81, 0x5B, 0x83, 0x68, 0x00];
        assert_eq!(read_string(&sjis, 0).unwrap(), "ボード");
        assert!(read_string(b"abc", 0).is_err());
        assert!(matches!(
            read_string(&[b'a', 0xFF, 0xFF, 0x00], 0),
            Err(BoardArcError::EncodingError { .. })
        ));
        assert!(read_string(b"abc\0", 10).is_err());
    }

    #[test]
    fn test_bad_record_offsets() {
        let mut bytes = sample().to_bytes().unwrap();
        let header = PacHeader::read(&bytes).unwrap();
        // Point the first record's data past the end
        let field = header.file_info_offset as usize + 16;
        bytes[field..field + 4].copy_from_slice(&0xFFFF_0000u32.to_be_bytes());
        assert!(PacArchive::read(&bytes).is_err());
    }

    #[test]
    fn test_inflate_stops_at_data_size() {
        let mut bytes = sample().to_bytes().unwrap();
        let header = PacHeader::read(&bytes).unwrap();
        // Declare 10 decoded bytes for the 330-byte compressed entry
        let field = header.file_info_offset as usize + 20;
        bytes[field..field + 4].copy_from_slice(&10u32.to_be_bytes());

        let err = PacArchive::read(&bytes).unwrap_err();
        assert!(matches!(
            err,
            BoardArcError::SizeMismatch {
                expected: 10,
                actual: 11
            }
        ));
    }
}
