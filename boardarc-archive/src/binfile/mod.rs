//! Offset-table board archives (`.bin`).
//!
//! ```text
//! u32 count
//! u32 offsets[count]
//! at each offset:
//!     u32 decoded size
//!     u32 compression tag
//!     payload, up to the next offset (or end of file)
//! ```
//!
//! All integers are big-endian. Entries carry no names; see [`names`].
//!
//! [`BinReader`] indexes an archive and decodes entries on demand.
//! [`BinArchive`] decodes everything up front and supports editing.
//! [`BinWriter`] builds a new archive.

pub mod names;

use crate::codec::{decode_payload, encode_payload, to_u32};
use boardarc_core::error::{BoardArcError, Result};
use boardarc_core::traits::CompressionLevel;
use boardarc_core::{ByteCursor, CompressionType};
use log::debug;
use std::io::Write;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Size of the `(decoded size, tag)` header in front of every payload.
pub const ENTRY_HEADER_SIZE: usize = 8;

/// Location and compression of one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinEntryInfo {
    /// Position in the offset table.
    pub index: usize,
    /// Offset of the entry header.
    pub offset: usize,
    /// Size of the decoded data.
    pub decoded_size: u32,
    /// Compression of the payload.
    pub compression: CompressionType,
    /// Size of the payload after the entry header.
    pub payload_size: usize,
}

impl BinEntryInfo {
    fn payload_range(&self) -> std::ops::Range<usize> {
        let start = self.offset + ENTRY_HEADER_SIZE;
        start..start + self.payload_size
    }
}

/// Lazy reader over an in-memory archive.
#[derive(Debug, Clone)]
pub struct BinReader<'a> {
    data: &'a [u8],
    entries: Vec<BinEntryInfo>,
}

impl<'a> BinReader<'a> {
    /// Parse the offset table and entry headers.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);
        let count = cursor.read_u32_be()? as usize;

        let table_end = count
            .checked_mul(4)
            .and_then(|n| n.checked_add(4))
            .ok_or_else(|| BoardArcError::invalid_header("entry count overflows"))?;
        if table_end > data.len() {
            return Err(BoardArcError::truncated(table_end, data.len()));
        }

        let offsets = (0..count)
            .map(|_| cursor.read_u32_be().map(|o| o as usize))
            .collect::<Result<Vec<_>>>()?;

        let mut entries = Vec::with_capacity(count);
        for (index, &offset) in offsets.iter().enumerate() {
            let end = offsets.get(index + 1).copied().unwrap_or(data.len());
            if offset < table_end || end > data.len() || end < offset + ENTRY_HEADER_SIZE {
                return Err(BoardArcError::corrupted(
                    (4 + 4 * index) as u64,
                    format!(
                        "entry {} spans {:#x}..{:#x} in a {:#x}-byte archive",
                        index,
                        offset,
                        end,
                        data.len()
                    ),
                ));
            }

            let mut header = ByteCursor::at(data, offset)?;
            let decoded_size = header.read_u32_be()?;
            let compression = CompressionType::from_tag(header.read_u32_be()?);

            entries.push(BinEntryInfo {
                index,
                offset,
                decoded_size,
                compression,
                payload_size: end - offset - ENTRY_HEADER_SIZE,
            });
        }

        debug!(
            "bin archive: {} entries, table ends at {:#x}, {} bytes",
            count,
            table_end,
            data.len()
        );

        Ok(Self { data, entries })
    }

    /// Get entries.
    pub fn entries(&self) -> &[BinEntryInfo] {
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

    fn info(&self, index: usize) -> Result<&BinEntryInfo> {
        self.entries
            .get(index)
            .ok_or_else(|| BoardArcError::entry_not_found(format!("#{}", index)))
    }

    /// Raw payload of entry `index`, still compressed.
    pub fn payload(&self, index: usize) -> Result<&'a [u8]> {
        let range = self.info(index)?.payload_range();
        Ok(&self.data[range])
    }

    /// Decode entry `index`.
    pub fn extract(&self, index: usize) -> Result<Vec<u8>> {
        let info = self.info(index)?;
        decode_payload(
            info.compression,
            &self.data[info.payload_range()],
            info.decoded_size as usize,
        )
    }

    /// Decode every entry, failing on the first bad one.
    #[cfg(not(feature = "parallel"))]
    pub fn extract_all(&self) -> Result<Vec<Vec<u8>>> {
        (0..self.entries.len()).map(|i| self.extract(i)).collect()
    }

    /// Decode every entry in parallel, failing if any entry is bad.
    #[cfg(feature = "parallel")]
    pub fn extract_all(&self) -> Result<Vec<Vec<u8>>> {
        (0..self.entries.len())
            .into_par_iter()
            .map(|i| self.extract(i))
            .collect()
    }
}

/// A decoded archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinEntry {
    name: String,
    compression: CompressionType,
    data: Vec<u8>,
}

impl BinEntry {
    /// Descriptive name, regenerated whenever the archive changes.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compression used when the archive is saved.
    pub fn compression(&self) -> CompressionType {
        self.compression
    }

    /// Decoded data (raw payload for unknown compression tags).
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the entry, returning its data.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Editable offset-table archive.
#[derive(Debug, Clone)]
pub struct BinArchive {
    stem: String,
    entries: Vec<BinEntry>,
    zlib_level: CompressionLevel,
}

impl BinArchive {
    /// Create an empty archive. `file_name` only feeds entry names.
    pub fn new(file_name: &str) -> Self {
        Self {
            stem: names::file_stem(file_name).to_string(),
            entries: Vec::new(),
            zlib_level: CompressionLevel::default(),
        }
    }

    /// Read and decode a whole archive.
    ///
    /// Either every entry decodes or an error is returned.
    pub fn read(data: &[u8], file_name: &str) -> Result<Self> {
        let reader = BinReader::new(data)?;
        let decoded = reader.extract_all()?;

        let mut archive = Self::new(file_name);
        archive.entries = reader
            .entries()
            .iter()
            .zip(decoded)
            .map(|(info, data)| BinEntry {
                name: String::new(),
                compression: info.compression,
                data,
            })
            .collect();
        archive.update_names();
        Ok(archive)
    }

    /// Archive name the entry names are derived from.
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Get entries in on-disk order.
    pub fn entries(&self) -> &[BinEntry] {
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

    /// Find an entry by name.
    pub fn get(&self, name: &str) -> Option<&BinEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.entries
            .iter()
            .position(|e| e.name == name)
            .ok_or_else(|| BoardArcError::entry_not_found(name))
    }

    /// Set the zlib level used for inflate entries on save.
    pub fn set_zlib_level(&mut self, level: CompressionLevel) {
        self.zlib_level = level;
    }

    /// Append an entry, taking its compression from `name`'s suffixes
    /// (`.lz`, `.s`, `.fs`, `.fsa`, `.z`).
    pub fn add_entry(&mut self, name: &str, data: Vec<u8>) -> &BinEntry {
        self.add_entry_with_compression(CompressionType::from_file_name(name), data)
    }

    /// Append an entry with an explicit compression.
    pub fn add_entry_with_compression(
        &mut self,
        compression: CompressionType,
        data: Vec<u8>,
    ) -> &BinEntry {
        let index = self.entries.len();
        self.entries.push(BinEntry {
            name: String::new(),
            compression,
            data,
        });
        self.update_names();
        &self.entries[index]
    }

    /// Remove the entry called `name`. Later entries are renamed.
    pub fn remove_entry(&mut self, name: &str) -> Result<BinEntry> {
        let index = self.position(name)?;
        let entry = self.entries.remove(index);
        self.update_names();
        Ok(entry)
    }

    /// Replace the data of the entry called `name`.
    pub fn replace_data(&mut self, name: &str, data: Vec<u8>) -> Result<&BinEntry> {
        let index = self.position(name)?;
        self.entries[index].data = data;
        self.update_names();
        Ok(&self.entries[index])
    }

    /// Change the compression the entry called `name` is saved with.
    pub fn set_compression(
        &mut self,
        name: &str,
        compression: CompressionType,
    ) -> Result<&BinEntry> {
        let index = self.position(name)?;
        self.entries[index].compression = compression;
        self.update_names();
        Ok(&self.entries[index])
    }

    /// Rename the archive, regenerating every entry name.
    pub fn rename_base(&mut self, file_name: &str) {
        self.stem = names::file_stem(file_name).to_string();
        self.update_names();
    }

    fn update_names(&mut self) {
        for (index, entry) in self.entries.iter_mut().enumerate() {
            entry.name = names::entry_name(&self.stem, index, entry.compression, &entry.data);
        }
    }

    /// Encode the archive.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let items: Vec<(CompressionType, &[u8])> = self
            .entries
            .iter()
            .map(|e| (e.compression, e.data.as_slice()))
            .collect();
        build(&items, self.zlib_level)
    }

    /// Encode the archive into `writer`. Nothing is written on error.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<W> {
        let bytes = self.to_bytes()?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(writer)
    }
}

/// Offset-table archive writer.
///
/// Entries are buffered and encoded by [`finish`](Self::finish); the inner
/// writer sees nothing until every entry has encoded successfully.
pub struct BinWriter<W: Write> {
    writer: W,
    entries: Vec<(CompressionType, Vec<u8>)>,
    zlib_level: CompressionLevel,
}

impl<W: Write> BinWriter<W> {
    /// Create a new writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            entries: Vec::new(),
            zlib_level: CompressionLevel::default(),
        }
    }

    /// Set the zlib level used for inflate entries.
    pub fn set_zlib_level(&mut self, level: CompressionLevel) {
        self.zlib_level = level;
    }

    /// Queue an entry.
    ///
    /// Fails immediately for compression types that cannot be written.
    pub fn add_entry(&mut self, compression: CompressionType, data: &[u8]) -> Result<()> {
        if !compression.has_encoder() {
            return Err(BoardArcError::unsupported_compression(compression));
        }
        self.entries.push((compression, data.to_vec()));
        Ok(())
    }

    /// Encode all entries, write the archive and return the inner writer.
    pub fn finish(mut self) -> Result<W> {
        let items: Vec<(CompressionType, &[u8])> = self
            .entries
            .iter()
            .map(|(c, d)| (*c, d.as_slice()))
            .collect();
        let bytes = build(&items, self.zlib_level)?;
        self.writer.write_all(&bytes)?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(not(feature = "parallel"))]
fn encode_all(items: &[(CompressionType, &[u8])], level: CompressionLevel) -> Result<Vec<Vec<u8>>> {
    items
        .iter()
        .map(|&(compression, data)| encode_payload(compression, data, level))
        .collect()
}

#[cfg(feature = "parallel")]
fn encode_all(items: &[(CompressionType, &[u8])], level: CompressionLevel) -> Result<Vec<Vec<u8>>> {
    items
        .par_iter()
        .map(|&(compression, data)| encode_payload(compression, data, level))
        .collect()
}

/// Encode every entry, then lay out the table and payloads.
fn build(items: &[(CompressionType, &[u8])], level: CompressionLevel) -> Result<Vec<u8>> {
    if let Some(&(compression, _)) = items.iter().find(|(c, _)| !c.has_encoder()) {
        return Err(BoardArcError::unsupported_compression(compression));
    }

    let payloads = encode_all(items, level)?;

    let table_size = 4 + 4 * items.len();
    let total = table_size
        + payloads
            .iter()
            .map(|p| ENTRY_HEADER_SIZE + p.len())
            .sum::<usize>();

    let mut output = Vec::with_capacity(total);
    output.extend_from_slice(&to_u32(items.len())?.to_be_bytes());
    output.resize(table_size, 0);

    for (index, (&(compression, data), payload)) in items.iter().zip(&payloads).enumerate() {
        let offset = to_u32(output.len())?;
        let slot = 4 + 4 * index;
        output[slot..slot + 4].copy_from_slice(&offset.to_be_bytes());

        output.extend_from_slice(&to_u32(data.len())?.to_be_bytes());
        output.extend_from_slice(&compression.tag().to_be_bytes());
        output.extend_from_slice(payload);
    }

    debug!(
        "bin archive saved: {} entries, {} bytes",
        items.len(),
        output.len()
    );
    Ok(output)
}
