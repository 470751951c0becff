//! Sliding-window stream parameters and reference packing.

/// Size of the big-endian decoded-length header in front of the stream.
pub const HEADER_SIZE: usize = 4;

/// Longest backward distance a reference can encode (12 bits, 1-based).
pub const MAX_DISTANCE: usize = 0x1000;

/// Longest match the two-byte form can hold (`0xF + 2`).
pub const SHORT_MAX: usize = 0x11;

/// Longest match the three-byte form can hold (`0xFF + 0x12`).
pub const LONG_MAX: usize = 0x111;

/// Shortest match worth a reference.
pub const MIN_MATCH: usize = 3;

/// Encoder parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideParams {
    /// How far back the match search looks (at most [`MAX_DISTANCE`]).
    pub lookback: usize,
    /// Longest match the search will report (at most [`LONG_MAX`]).
    pub max_match: usize,
    /// Try the next position before committing to a match.
    pub lookahead: bool,
}

impl SlideParams {
    /// Matches the encoder the games shipped with.
    pub const GAMECUBE: Self = Self {
        lookback: MAX_DISTANCE,
        max_match: LONG_MAX,
        lookahead: true,
    };

    /// Plain greedy parse, no one-byte lookahead.
    pub const GREEDY: Self = Self {
        lookback: MAX_DISTANCE,
        max_match: LONG_MAX,
        lookahead: false,
    };

    /// Create parameters, clamping to what the stream format can express.
    pub fn new(lookback: usize, max_match: usize, lookahead: bool) -> Self {
        Self {
            lookback: lookback.clamp(1, MAX_DISTANCE),
            max_match: max_match.clamp(MIN_MATCH, LONG_MAX),
            lookahead,
        }
    }
}

impl Default for SlideParams {
    fn default() -> Self {
        Self::GAMECUBE
    }
}

/// Encode a back-reference.
///
/// `distance` is the 1-based backward distance and `length` the match
/// length. Returns the packed bytes and how many of them are used.
pub fn pack_reference(distance: usize, length: usize) -> ([u8; 3], usize) {
    debug_assert!((1..=MAX_DISTANCE).contains(&distance));
    debug_assert!((MIN_MATCH..=LONG_MAX).contains(&length));

    let dist = distance - 1;
    if length > SHORT_MAX {
        // Zero length nibble escapes to a third length byte
        ([(dist >> 8) as u8, dist as u8, (length - 0x12) as u8], 3)
    } else {
        ([(((length - 2) << 4) | (dist >> 8)) as u8, dist as u8, 0], 2)
    }
}
