//! Ring buffer (sliding window) for LZSS decompression.
//!
//! Unlike distance-based LZ77 windows, the LZSS streams in board archives
//! address the window by *absolute* ring position: a back-reference names
//! the slot to start copying from, and the write cursor starts at a fixed
//! offset rather than at zero.

/// A fixed-size circular buffer indexed by absolute position.
///
/// All positions are reduced modulo the capacity, so callers can advance
/// indices freely and let the buffer wrap them.
#[derive(Debug, Clone)]
pub struct RingBuffer {
    /// The underlying buffer.
    buffer: Vec<u8>,
    /// Current write position (next byte will be written here).
    position: usize,
    /// Mask for efficient modulo (capacity - 1).
    mask: usize,
}

impl RingBuffer {
    /// Create a zero-filled ring buffer with the write cursor at 0.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not a power of 2 or is zero.
    pub fn new(capacity: usize) -> Self {
        Self::with_cursor(capacity, 0, 0)
    }

    /// Create a ring buffer filled with `fill`, with the write cursor at `start`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not a power of 2 or is zero.
    pub fn with_cursor(capacity: usize, start: usize, fill: u8) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");
        assert!(
            capacity.is_power_of_two(),
            "Capacity must be a power of 2, got {}",
            capacity
        );

        Self {
            buffer: vec![fill; capacity],
            position: start & (capacity - 1),
            mask: capacity - 1,
        }
    }

    /// Get the capacity of the buffer.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Get the current write position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Write a single byte at the cursor and advance it.
    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.buffer[self.position] = byte;
        self.position = (self.position + 1) & self.mask;
    }

    /// Write multiple bytes to the buffer.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.write_byte(byte);
        }
    }

    /// Read the byte at an absolute ring index (wrapped).
    #[inline]
    pub fn read_at(&self, index: usize) -> u8 {
        self.buffer[index & self.mask]
    }

    /// Copy `length` bytes starting at absolute ring index `start`.
    ///
    /// Each byte is written back at the cursor before the next one is read,
    /// so a source range that overlaps the cursor repeats freshly written
    /// data. Copied bytes are appended to `output`.
    pub fn copy_from(&mut self, start: usize, length: usize, output: &mut Vec<u8>) {
        output.reserve(length);
        let mut src = start;
        for _ in 0..length {
            let byte = self.read_at(src);
            self.write_byte(byte);
            output.push(byte);
            src = src.wrapping_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ringbuffer_basic() {
        let mut ring = RingBuffer::new(8);
        ring.write_bytes(b"Hello");

        assert_eq!(ring.position(), 5);
        assert_eq!(ring.read_at(0), b'H');
        assert_eq!(ring.read_at(4), b'o');
        assert_eq!(ring.read_at(5), 0);
    }

    #[test]
    fn test_ringbuffer_wrap() {
        let mut ring = RingBuffer::new(4);
        ring.write_bytes(b"ABCDEF");

        assert_eq!(ring.position(), 2);
        assert_eq!(ring.read_at(0), b'E');
        assert_eq!(ring.read_at(1), b'F');
        assert_eq!(ring.read_at(2), b'C');
        // Indices past capacity wrap
        assert_eq!(ring.read_at(5), b'F');
    }

    #[test]
    fn test_ringbuffer_start_offset() {
        let mut ring = RingBuffer::with_cursor(1024, 0x3BE, 0);
        assert_eq!(ring.position(), 0x3BE);
        ring.write_byte(b'Z');
        assert_eq!(ring.read_at(0x3BE), b'Z');
        assert_eq!(ring.position(), 0x3BF);
    }

    #[test]
    fn test_copy_from_overlap() {
        // "AB" then copy 6 from the slot of 'A' -> "ABABAB"
        let mut ring = RingBuffer::new(32);
        ring.write_bytes(b"AB");

        let mut output = Vec::new();
        ring.copy_from(0, 6, &mut output);
        assert_eq!(output, b"ABABAB");
        assert_eq!(ring.position(), 8);
    }

    #[test]
    fn test_copy_from_wraps_source() {
        let mut ring = RingBuffer::with_cursor(8, 6, 0);
        ring.write_bytes(b"XYZ"); // slots 6, 7, 0

        let mut output = Vec::new();
        ring.copy_from(6, 3, &mut output);
        assert_eq!(output, b"XYZ");
    }

    #[test]
    fn test_copy_from_initial_fill() {
        let mut ring = RingBuffer::with_cursor(16, 8, 0);
        let mut output = Vec::new();
        ring.copy_from(0, 4, &mut output);
        assert_eq!(output, [0, 0, 0, 0]);
    }

    #[test]
    #[should_panic(expected = "power of 2")]
    fn test_non_power_of_two_panics() {
        let _ = RingBuffer::new(100);
    }
}
