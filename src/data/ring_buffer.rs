//! Bounded transcript of the raw, unprocessed stream.
//!
//! Every accepted message is appended here verbatim before classification, so the export
//! path can hand out the exact text the device or simulator produced. The buffer is a
//! sliding window over characters, not lines: once full, each new character pushes out the
//! oldest one, and the content is always a suffix of everything written since the last
//! clear.

use ringbuf::{HeapRb, Rb};

/// Fixed-capacity character window backed by a heap ring buffer.
pub struct RawRingBuffer {
    inner: HeapRb<char>,
    capacity: usize,
}

impl RawRingBuffer {
    /// Create an empty buffer keeping at most `capacity` characters.
    ///
    /// A zero capacity is bumped to one; the configuration layer rejects zero before it
    /// gets here.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: HeapRb::new(capacity),
            capacity,
        }
    }

    /// Append text, discarding the oldest characters beyond capacity.
    pub fn append(&mut self, text: &str) {
        // Only the tail of an oversized chunk can survive.
        let skip = text.chars().count().saturating_sub(self.capacity);
        for ch in text.chars().skip(skip) {
            self.inner.push_overwrite(ch);
        }
    }

    /// Copy of the current window, oldest character first.
    pub fn snapshot(&self) -> String {
        self.inner.iter().collect()
    }

    /// Number of characters currently held.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of characters kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Empties the window.
    pub fn clear(&mut self) {
        self.inner = HeapRb::new(self.capacity);
    }
}

impl std::fmt::Debug for RawRingBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawRingBuffer")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
