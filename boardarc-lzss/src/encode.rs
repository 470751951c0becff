//! LZSS compression (encoding).
//!
//! Greedy longest-match parse driven by [`MatchTree`]. Units are emitted in
//! groups of eight behind an LSB-first flag byte.

use crate::params::{LzssParams, MAX_MATCH, THRESHOLD, WINDOW_SIZE, WINDOW_START};
use crate::tree::MatchTree;
use boardarc_core::error::Result;
use boardarc_core::traits::Compressor;
use boardarc_core::{FlagGroupWriter, FlagLayout};

/// LZSS encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct LzssEncoder {
    params: LzssParams,
}

impl LzssEncoder {
    /// Create an encoder for GameCube board archives.
    pub fn new() -> Self {
        Self::with_params(LzssParams::GAMECUBE)
    }

    /// Create an encoder with custom parameters.
    pub fn with_params(params: LzssParams) -> Self {
        Self { params }
    }

    /// Encode `input`. Empty input encodes to an empty stream.
    pub fn encode(&self, input: &[u8]) -> Vec<u8> {
        if input.is_empty() {
            return Vec::new();
        }

        let mut tree = MatchTree::new(self.params.fill);
        let mut writer = FlagGroupWriter::new(FlagLayout::LsbByte);
        let mut next = 0usize;

        let mut s = 0usize;
        let mut r = WINDOW_START;

        // Fill the lookahead at the end of the window
        let mut len = 0usize;
        while len < MAX_MATCH && next < input.len() {
            tree.set_byte(r + len, input[next]);
            next += 1;
            len += 1;
        }

        // Seed the trees with the fill-byte strings just before the lookahead
        for i in 1..=MAX_MATCH {
            tree.insert(r - i);
        }
        tree.insert(r);

        loop {
            // The match can run past the end of the input
            if tree.match_length > len {
                tree.match_length = len;
            }

            if tree.match_length < THRESHOLD {
                tree.match_length = 1;
                writer.push(true, &[tree.text[r]]);
            } else {
                let pair = LzssParams::pack_reference(tree.match_position, tree.match_length);
                writer.push(false, &pair);
            }

            let last_match_length = tree.match_length;
            let mut i = 0;
            while i < last_match_length && next < input.len() {
                tree.delete(s);
                tree.set_byte(s, input[next]);
                next += 1;
                s = (s + 1) % WINDOW_SIZE;
                r = (r + 1) % WINDOW_SIZE;
                tree.insert(r);
                i += 1;
            }

            // Input exhausted: drain the lookahead
            while i < last_match_length {
                i += 1;
                tree.delete(s);
                s = (s + 1) % WINDOW_SIZE;
                r = (r + 1) % WINDOW_SIZE;
                len -= 1;
                if len != 0 {
                    tree.insert(r);
                }
            }

            if len == 0 {
                break;
            }
        }

        writer.finish()
    }
}

impl Compressor for LzssEncoder {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(self.encode(input))
    }
}

/// Compress data with the GameCube parameters.
pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
    Ok(LzssEncoder::new().encode(input))
}
