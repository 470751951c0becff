//! LZSS stream parameters.
//!
//! The bit layout of a back-reference (10-bit ring position, 6-bit length)
//! fixes the window and match sizes; only the initial fill byte differs
//! between titles.

/// Size of the ring buffer.
pub const WINDOW_SIZE: usize = 1024;

/// Maximum match length (`0x3F + THRESHOLD`).
pub const MAX_MATCH: usize = 66;

/// Minimum match length for a back-reference.
pub const THRESHOLD: usize = 3;

/// Initial write cursor in the ring buffer (`0x3BE`).
pub const WINDOW_START: usize = WINDOW_SIZE - MAX_MATCH;

/// LZSS parameters shared by the encoder and decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LzssParams {
    /// Byte the ring buffer is filled with before decoding starts.
    pub fill: u8,
}

impl LzssParams {
    /// GameCube board archives: zero-filled ring buffer.
    pub const GAMECUBE: Self = Self { fill: 0 };

    /// Classic LZSS as published by Okumura: space-filled ring buffer.
    pub const OKUMURA: Self = Self { fill: b' ' };

    /// Create parameters with a custom fill byte.
    pub fn new(fill: u8) -> Self {
        Self { fill }
    }

    /// Split a back-reference into its two stream bytes.
    pub fn pack_reference(position: usize, length: usize) -> [u8; 2] {
        debug_assert!(position < WINDOW_SIZE);
        debug_assert!((THRESHOLD..=MAX_MATCH).contains(&length));
        [
            (position & 0xFF) as u8,
            (((position >> 2) & 0xC0) | ((length - THRESHOLD) & 0x3F)) as u8,
        ]
    }

    /// Decode a back-reference into `(ring position, length)`.
    pub fn unpack_reference(bytes: [u8; 2]) -> (usize, usize) {
        let position = (((bytes[1] & 0xC0) as usize) << 2) | bytes[0] as usize;
        let length = (bytes[1] & 0x3F) as usize + THRESHOLD;
        (position, length)
    }
}

impl Default for LzssParams {
    fn default() -> Self {
        Self::GAMECUBE
    }
}
