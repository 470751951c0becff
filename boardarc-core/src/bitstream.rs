//! Byte cursors and flag-word handling for the LZ-family codecs.
//!
//! The codecs in this workspace interleave *flag words* with payload bytes:
//! every flag bit tells the decoder whether the next unit is a literal byte
//! or a back-reference. Two layouts are in use:
//!
//! - [`FlagLayout::LsbByte`]: one flag byte per 8 units, consumed from the
//!   least significant bit (LZSS ring-buffer codec).
//! - [`FlagLayout::MsbWord`]: one big-endian 32-bit codeword per 32 units,
//!   consumed from the most significant bit (sliding-window codec).
//!
//! In both layouts a set bit means "literal".
//!
//! # Example
//!
//! ```
//! use boardarc_core::bitstream::{ByteCursor, FlagGroupWriter, FlagLayout, FlagReader};
//!
//! let mut writer = FlagGroupWriter::new(FlagLayout::LsbByte);
//! writer.push(true, &[b'A']);
//! writer.push(false, &[0x10, 0x00]);
//! let encoded = writer.finish();
//! assert_eq!(encoded, [0x01, b'A', 0x10, 0x00]);
//!
//! let mut cursor = ByteCursor::new(&encoded);
//! let mut flags = FlagReader::new(FlagLayout::LsbByte);
//! assert!(flags.next_flag(&mut cursor).unwrap());
//! assert_eq!(cursor.read_u8().unwrap(), b'A');
//! assert!(!flags.next_flag(&mut cursor).unwrap());
//! ```

use crate::error::{BoardArcError, Result};

/// A bounds-checked forward cursor over an in-memory byte slice.
///
/// Every read that would run past the end of the slice fails with
/// [`BoardArcError::TruncatedInput`].
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Create a cursor positioned at `position`.
    pub fn at(data: &'a [u8], position: usize) -> Result<Self> {
        if position > data.len() {
            return Err(BoardArcError::truncated(position, data.len()));
        }
        Ok(Self { data, position })
    }

    /// Current read position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes left.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Check if all bytes have been consumed.
    pub fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Total length of the underlying slice.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn ensure(&self, count: usize) -> Result<()> {
        if self.remaining() < count {
            return Err(BoardArcError::truncated(
                self.position + count,
                self.data.len(),
            ));
        }
        Ok(())
    }

    /// Read one byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        let byte = self.data[self.position];
        self.position += 1;
        Ok(byte)
    }

    /// Read a big-endian `u32`.
    #[inline]
    pub fn read_u32_be(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read `count` bytes as a borrowed slice.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        self.ensure(count)?;
        let slice = &self.data[self.position..self.position + count];
        self.position += count;
        Ok(slice)
    }

    /// Skip `count` bytes.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.ensure(count)?;
        self.position += count;
        Ok(())
    }
}

/// Flag word layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagLayout {
    /// 8 flags per byte, LSB first.
    LsbByte,
    /// 32 flags per big-endian word, MSB first.
    MsbWord,
}

impl FlagLayout {
    /// Number of units covered by one flag word.
    pub fn units(&self) -> u32 {
        match self {
            Self::LsbByte => 8,
            Self::MsbWord => 32,
        }
    }

    #[inline]
    fn bit_mask(&self, index: u32) -> u32 {
        match self {
            Self::LsbByte => 1 << index,
            Self::MsbWord => 0x8000_0000 >> index,
        }
    }
}

/// Pulls flag bits out of a compressed stream, refilling on demand.
#[derive(Debug, Clone)]
pub struct FlagReader {
    layout: FlagLayout,
    word: u32,
    consumed: u32,
}

impl FlagReader {
    /// Create a reader that loads its first word on the first call.
    pub fn new(layout: FlagLayout) -> Self {
        Self {
            layout,
            word: 0,
            consumed: layout.units(),
        }
    }

    /// Read the next flag, loading a new word from `cursor` when exhausted.
    ///
    /// Returns `true` for a literal unit.
    #[inline]
    pub fn next_flag(&mut self, cursor: &mut ByteCursor<'_>) -> Result<bool> {
        if self.consumed == self.layout.units() {
            self.word = match self.layout {
                FlagLayout::LsbByte => u32::from(cursor.read_u8()?),
                FlagLayout::MsbWord => cursor.read_u32_be()?,
            };
            self.consumed = 0;
        }
        let bit = self.word & self.layout.bit_mask(self.consumed) != 0;
        self.consumed += 1;
        Ok(bit)
    }
}

/// Groups encoded units behind their flag word.
///
/// Units are buffered until a full group is collected, then the flag word
/// followed by the buffered payload bytes is appended to the output.
#[derive(Debug, Clone)]
pub struct FlagGroupWriter {
    layout: FlagLayout,
    output: Vec<u8>,
    pending: Vec<u8>,
    flags: u32,
    units: u32,
}

impl FlagGroupWriter {
    /// Create an empty writer.
    pub fn new(layout: FlagLayout) -> Self {
        Self::with_output(layout, Vec::new())
    }

    /// Create a writer that appends to an existing buffer (e.g. after a header).
    pub fn with_output(layout: FlagLayout, output: Vec<u8>) -> Self {
        Self {
            layout,
            output,
            pending: Vec::with_capacity(layout.units() as usize * 3),
            flags: 0,
            units: 0,
        }
    }

    /// Append one unit: `literal` sets its flag bit, `bytes` is its payload.
    pub fn push(&mut self, literal: bool, bytes: &[u8]) {
        if literal {
            self.flags |= self.layout.bit_mask(self.units);
        }
        self.pending.extend_from_slice(bytes);
        self.units += 1;
        if self.units == self.layout.units() {
            self.flush_group();
        }
    }

    fn flush_group(&mut self) {
        match self.layout {
            FlagLayout::LsbByte => self.output.push(self.flags as u8),
            FlagLayout::MsbWord => self.output.extend_from_slice(&self.flags.to_be_bytes()),
        }
        self.output.append(&mut self.pending);
        self.flags = 0;
        self.units = 0;
    }

    /// Flush a partial group and return the encoded stream.
    pub fn finish(mut self) -> Vec<u8> {
        if self.units > 0 {
            self.flush_group();
        }
        self.output
    }
}
