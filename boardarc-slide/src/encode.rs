//! Sliding-window compression (encoding).
//!
//! Brute-force longest-match search over the lookback window with a
//! one-byte lookahead: when the match starting one byte later is at least
//! two bytes longer, the current byte goes out as a literal and the later
//! match is used next.

use crate::params::{MIN_MATCH, SlideParams, pack_reference};
use boardarc_core::error::{BoardArcError, Result};
use boardarc_core::traits::Compressor;
use boardarc_core::{FlagGroupWriter, FlagLayout};

/// A candidate back-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Match {
    position: usize,
    length: usize,
}

impl Match {
    const LITERAL: Self = Self {
        position: 0,
        length: 1,
    };
}

/// Match finder holding the deferred lookahead result between calls.
struct MatchFinder<'a> {
    input: &'a [u8],
    params: SlideParams,
    deferred: Option<Match>,
}

impl<'a> MatchFinder<'a> {
    fn new(input: &'a [u8], params: SlideParams) -> Self {
        Self {
            input,
            params,
            deferred: None,
        }
    }

    /// Choose what to emit at `pos`.
    fn next(&mut self, pos: usize) -> Match {
        if let Some(deferred) = self.deferred.take() {
            return deferred;
        }

        let current = self.longest_match(pos);
        if self.params.lookahead && current.length >= MIN_MATCH {
            let next = self.longest_match(pos + 1);
            if next.length >= current.length + 2 {
                self.deferred = Some(next);
                return Match::LITERAL;
            }
        }
        current
    }

    /// Longest match for `pos`; the earliest position wins ties.
    fn longest_match(&self, pos: usize) -> Match {
        let input = self.input;
        let limit = (input.len() - pos).min(self.params.max_match);
        let start = pos.saturating_sub(self.params.lookback);
        let mut best = Match::LITERAL;

        for i in start..pos {
            if best.length >= limit {
                break;
            }
            // Cannot beat the current best unless this byte matches too
            if input[i + best.length] != input[pos + best.length] {
                continue;
            }

            let mut j = 0;
            while j < limit && input[i + j] == input[pos + j] {
                j += 1;
            }

            if j > best.length {
                best = Match {
                    position: i,
                    length: j,
                };
            }
        }

        // A two-byte reference costs as much as two literals
        if best.length == 2 {
            best = Match::LITERAL;
        }
        best
    }
}

/// Sliding-window encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlideEncoder {
    params: SlideParams,
}

impl SlideEncoder {
    /// Create an encoder matching the shipped games.
    pub fn new() -> Self {
        Self::with_params(SlideParams::GAMECUBE)
    }

    /// Create an encoder with custom parameters.
    pub fn with_params(params: SlideParams) -> Self {
        Self { params }
    }

    /// Encode `input`, including the 4-byte decoded-length header.
    pub fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut header = Vec::with_capacity(input.len() / 2 + 8);
        header.extend_from_slice(&size_header(input.len())?);

        let mut writer = FlagGroupWriter::with_output(FlagLayout::MsbWord, header);
        let mut finder = MatchFinder::new(input, self.params);
        let mut pos = 0;

        while pos < input.len() {
            let m = finder.next(pos);
            if m.length < MIN_MATCH {
                writer.push(true, &[input[pos]]);
                pos += 1;
            } else {
                let (bytes, used) = pack_reference(pos - m.position, m.length);
                writer.push(false, &bytes[..used]);
                pos += m.length;
            }
        }

        Ok(writer.finish())
    }
}

/// Big-endian decoded-length header.
fn size_header(len: usize) -> Result<[u8; 4]> {
    let len = u32::try_from(len).map_err(|_| {
        BoardArcError::invalid_header(format!("{} bytes does not fit the size header", len))
    })?;
    Ok(len.to_be_bytes())
}

impl Compressor for SlideEncoder {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        self.encode(input)
    }
}

/// Compress data with the shipped encoder settings.
pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
    SlideEncoder::new().encode(input)
}
