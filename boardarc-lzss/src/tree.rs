//! Binary search trees for LZSS longest-match search.
//!
//! Every ring position is a node keyed by the `MAX_MATCH` bytes starting at
//! that position. There is one tree per leading byte value, so 256 roots
//! live past the end of the node range. Nodes are plain indices into flat
//! `left`/`right`/`parent` arrays; `NIL` marks an absent link.

use crate::params::{MAX_MATCH, WINDOW_SIZE};

/// Sentinel index meaning "no node".
pub const NIL: usize = WINDOW_SIZE;

/// First root slot; root for byte `c` is `ROOT_BASE + c`.
const ROOT_BASE: usize = WINDOW_SIZE + 1;

/// Node slots: ring positions, `NIL`, then 256 roots.
const NODE_SLOTS: usize = WINDOW_SIZE + 257;

/// Search trees plus the text window they index.
#[derive(Debug, Clone)]
pub struct MatchTree {
    /// Ring buffer with `MAX_MATCH - 1` extra bytes mirroring its start.
    pub(crate) text: Vec<u8>,
    left: Vec<usize>,
    right: Vec<usize>,
    parent: Vec<usize>,
    /// Ring position of the longest match found by the last insert.
    pub(crate) match_position: usize,
    /// Length of the longest match found by the last insert.
    pub(crate) match_length: usize,
}

impl MatchTree {
    /// Create empty trees over a window filled with `fill`.
    pub fn new(fill: u8) -> Self {
        Self {
            text: vec![fill; WINDOW_SIZE + MAX_MATCH - 1],
            left: vec![NIL; NODE_SLOTS],
            right: vec![NIL; NODE_SLOTS],
            parent: vec![NIL; NODE_SLOTS],
            match_position: 0,
            match_length: 0,
        }
    }

    /// Store a byte at ring position `pos`, keeping the mirror in sync.
    #[inline]
    pub fn set_byte(&mut self, pos: usize, byte: u8) {
        self.text[pos] = byte;
        if pos < MAX_MATCH - 1 {
            self.text[pos + WINDOW_SIZE] = byte;
        }
    }

    /// Ring position of the longest match found by the last insert.
    pub fn match_position(&self) -> usize {
        self.match_position
    }

    /// Length of the longest match found by the last insert.
    pub fn match_length(&self) -> usize {
        self.match_length
    }

    /// Byte at ring position `pos`.
    pub fn byte(&self, pos: usize) -> u8 {
        self.text[pos]
    }

    /// Whether ring position `pos` is currently linked into a tree.
    pub fn contains(&self, pos: usize) -> bool {
        self.parent[pos] != NIL
    }

    /// Insert the string at `r` and record the longest match.
    ///
    /// If an existing node matches all `MAX_MATCH` bytes it is replaced by
    /// `r`, since `r` leaves the window later.
    pub fn insert(&mut self, r: usize) {
        let mut cmp: i32 = 1;
        let mut p = ROOT_BASE + self.text[r] as usize;
        self.right[r] = NIL;
        self.left[r] = NIL;
        self.match_length = 0;

        loop {
            if cmp >= 0 {
                if self.right[p] != NIL {
                    p = self.right[p];
                } else {
                    self.right[p] = r;
                    self.parent[r] = p;
                    return;
                }
            } else if self.left[p] != NIL {
                p = self.left[p];
            } else {
                self.left[p] = r;
                self.parent[r] = p;
                return;
            }

            let mut i = 1;
            while i < MAX_MATCH {
                cmp = i32::from(self.text[r + i]) - i32::from(self.text[p + i]);
                if cmp != 0 {
                    break;
                }
                i += 1;
            }

            if i > self.match_length {
                self.match_position = p;
                self.match_length = i;
                if i >= MAX_MATCH {
                    break;
                }
            }
        }

        // Full-length match: r takes over p's place in the tree
        self.parent[r] = self.parent[p];
        self.left[r] = self.left[p];
        self.right[r] = self.right[p];
        let (lp, rp) = (self.left[p], self.right[p]);
        self.parent[lp] = r;
        self.parent[rp] = r;
        self.replace_child(p, r);
        self.parent[p] = NIL;
    }

    /// Unlink the node at `p` (no-op if it is not in a tree).
    pub fn delete(&mut self, p: usize) {
        if self.parent[p] == NIL {
            return;
        }

        let q = if self.right[p] == NIL {
            self.left[p]
        } else if self.left[p] == NIL {
            self.right[p]
        } else {
            let mut q = self.left[p];
            if self.right[q] != NIL {
                // Rightmost node of the left subtree
                while self.right[q] != NIL {
                    q = self.right[q];
                }
                let (qp, ql) = (self.parent[q], self.left[q]);
                self.right[qp] = ql;
                self.parent[ql] = qp;
                self.left[q] = self.left[p];
                let lp = self.left[p];
                self.parent[lp] = q;
            }
            self.right[q] = self.right[p];
            let rp = self.right[p];
            self.parent[rp] = q;
            q
        };

        self.parent[q] = self.parent[p];
        self.replace_child(p, q);
        self.parent[p] = NIL;
    }

    /// Point `p`'s parent at `replacement` instead of `p`.
    #[inline]
    fn replace_child(&mut self, p: usize, replacement: usize) {
        let pp = self.parent[p];
        if self.right[pp] == p {
            self.right[pp] = replacement;
        } else {
            self.left[pp] = replacement;
        }
    }
}
