//! Append-only input buffer for incremental decoding.

/// An owned, append-only byte arena with a read cursor.
///
/// Bytes before the cursor are consumed. They stay in memory until
/// [`StreamBuffer::truncate`] drops them, so a caller can decode a value,
/// commit its length with [`StreamBuffer::advance`] and compact later.
///
/// Invariant: `cursor <= len`.
#[derive(Debug, Default, Clone)]
pub struct StreamBuffer {
    data: Vec<u8>,
    x: usize,
}

impl StreamBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `chunk` to the tail. The cursor does not move.
    pub fn append(&mut self, chunk: &[u8]) {
        self.data.extend_from_slice(chunk);
    }

    /// Replaces the whole content with `data` and rewinds the cursor.
    pub fn reset(&mut self, data: &[u8]) {
        self.data.clear();
        self.data.extend_from_slice(data);
        self.x = 0;
    }

    /// Unconsumed bytes, starting at the cursor.
    pub fn unread(&self) -> &[u8] {
        &self.data[self.x..]
    }

    /// Number of unconsumed bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.x
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.x
    }

    /// Total number of bytes held, consumed or not.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Marks `n` more bytes as consumed.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `n` bytes remain.
    pub fn advance(&mut self, n: usize) {
        assert!(n <= self.remaining(), "advance past end of stream buffer");
        self.x += n;
    }

    /// Drops consumed bytes and rewinds the cursor to zero.
    ///
    /// Returns the number of bytes dropped.
    pub fn truncate(&mut self) -> usize {
        let consumed = self.x;
        if consumed == self.data.len() {
            self.data.clear();
        } else if consumed > 0 {
            self.data.drain(..consumed);
        }
        self.x = 0;
        consumed
    }
}
