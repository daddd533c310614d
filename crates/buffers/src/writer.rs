//! Growable output buffer for encoders.

const DEFAULT_CHUNK: usize = 4 * 1024;
const MIN_CHUNK: usize = 16;

/// Output buffer with a flush mark.
///
/// Bytes written since the last [`Writer::flush`] are *pending*. An encoder
/// can remember [`Writer::pending`] before a nested value and cut back to it
/// with [`Writer::rollback`] if that value turns out to be unencodable.
///
/// ```
/// use msgpack_buffers::Writer;
///
/// let mut out = Writer::new();
/// out.u8u16(0xcd, 0x0100);
/// let mark = out.pending();
/// out.u8(0xc1);
/// out.rollback(mark);
/// assert_eq!(out.flush(), [0xcd, 0x01, 0x00]);
/// ```
#[derive(Debug, Clone)]
pub struct Writer {
    bytes: Vec<u8>,
    flushed: usize,
    pos: usize,
    chunk: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    pub fn new() -> Self {
        Self::with_alloc_size(DEFAULT_CHUNK)
    }

    /// Writer that reallocates in blocks of at least `chunk` bytes.
    pub fn with_alloc_size(chunk: usize) -> Self {
        let chunk = chunk.max(MIN_CHUNK);
        Self {
            bytes: vec![0; chunk],
            flushed: 0,
            pos: 0,
            chunk,
        }
    }

    /// Makes room for `n` more bytes after the cursor.
    ///
    /// On reallocation only the pending region is carried over; flushed bytes
    /// are gone by then.
    pub fn ensure_capacity(&mut self, n: usize) {
        if self.bytes.len() - self.pos >= n {
            return;
        }
        let pending = self.pending();
        let needed = pending + n;
        let size = if needed <= self.chunk {
            self.chunk
        } else {
            needed * 2
        };
        let mut bytes = vec![0; size];
        bytes[..pending].copy_from_slice(&self.bytes[self.flushed..self.pos]);
        self.bytes = bytes;
        self.flushed = 0;
        self.pos = pending;
    }

    /// Bytes written since the last flush.
    pub fn pending(&self) -> usize {
        self.pos - self.flushed
    }

    /// Cuts the pending region back to its first `len` bytes.
    ///
    /// Lengths stay valid across reallocation, cursor offsets would not.
    pub fn rollback(&mut self, len: usize) {
        self.pos = self.flushed + len.min(self.pending());
    }

    /// Takes the pending bytes.
    pub fn flush(&mut self) -> Vec<u8> {
        let out = self.bytes[self.flushed..self.pos].to_vec();
        self.flushed = self.pos;
        out
    }

    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.put(&[val]);
    }

    #[inline]
    pub fn u16(&mut self, val: u16) {
        self.put(&val.to_be_bytes());
    }

    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.put(&val.to_be_bytes());
    }

    #[inline]
    pub fn u64(&mut self, val: u64) {
        self.put(&val.to_be_bytes());
    }

    /// Marker byte, then one byte.
    pub fn u8u8(&mut self, marker: u8, val: u8) {
        self.put(&[marker, val]);
    }

    /// Marker byte, then a big-endian u16.
    pub fn u8u16(&mut self, marker: u8, val: u16) {
        self.tagged(marker, &val.to_be_bytes());
    }

    /// Marker byte, then a big-endian u32.
    pub fn u8u32(&mut self, marker: u8, val: u32) {
        self.tagged(marker, &val.to_be_bytes());
    }

    /// Marker byte, then a big-endian u64.
    pub fn u8u64(&mut self, marker: u8, val: u64) {
        self.tagged(marker, &val.to_be_bytes());
    }

    pub fn u8f32(&mut self, marker: u8, val: f32) {
        self.u8u32(marker, val.to_bits());
    }

    pub fn u8f64(&mut self, marker: u8, val: f64) {
        self.u8u64(marker, val.to_bits());
    }

    pub fn buf(&mut self, buf: &[u8]) {
        self.put(buf);
    }

    /// Writes `s` as UTF-8 and returns its byte length.
    pub fn utf8(&mut self, s: &str) -> usize {
        self.put(s.as_bytes());
        s.len()
    }

    #[inline]
    fn tagged(&mut self, marker: u8, body: &[u8]) {
        self.ensure_capacity(1 + body.len());
        self.bytes[self.pos] = marker;
        self.bytes[self.pos + 1..self.pos + 1 + body.len()].copy_from_slice(body);
        self.pos += 1 + body.len();
    }

    #[inline]
    fn put(&mut self, src: &[u8]) {
        self.ensure_capacity(src.len());
        self.bytes[self.pos..self.pos + src.len()].copy_from_slice(src);
        self.pos += src.len();
    }
}
