//! Bounds-checked binary reader with cursor tracking.

use std::str;

use crate::BufferError;

/// A binary reader over a byte slice.
///
/// Every read is bounds-checked. A read that runs past the end fails with
/// [`BufferError::InsufficientData`] carrying the size of that read and the
/// number of bytes left, and leaves the cursor where it was.
///
/// # Example
///
/// ```
/// use msgpack_buffers::{BufferError, Reader};
///
/// let data = [0x01, 0x02, 0x03];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.u8(), Ok(0x01));
/// assert_eq!(reader.u16(), Ok(0x0203));
/// assert_eq!(
///     reader.u32(),
///     Err(BufferError::InsufficientData { needed: 4, have: 0 })
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of unread bytes.
    pub fn size(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Checks that `n` more bytes are available from the current cursor.
    #[inline]
    pub fn check(&self, n: usize) -> Result<(), BufferError> {
        let have = self.size();
        if n > have {
            Err(BufferError::InsufficientData { needed: n, have })
        } else {
            Ok(())
        }
    }

    /// Peeks at the current byte without advancing.
    pub fn peek(&self) -> Result<u8, BufferError> {
        self.check(1)?;
        Ok(self.data[self.pos])
    }

    #[inline]
    fn take<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.buf(N)?);
        Ok(out)
    }

    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        self.check(1)?;
        let val = self.data[self.pos];
        self.pos += 1;
        Ok(val)
    }

    #[inline]
    pub fn i8(&mut self) -> Result<i8, BufferError> {
        self.u8().map(|b| b as i8)
    }

    #[inline]
    pub fn u16(&mut self) -> Result<u16, BufferError> {
        self.take().map(u16::from_be_bytes)
    }

    #[inline]
    pub fn i16(&mut self) -> Result<i16, BufferError> {
        self.take().map(i16::from_be_bytes)
    }

    #[inline]
    pub fn u32(&mut self) -> Result<u32, BufferError> {
        self.take().map(u32::from_be_bytes)
    }

    #[inline]
    pub fn i32(&mut self) -> Result<i32, BufferError> {
        self.take().map(i32::from_be_bytes)
    }

    #[inline]
    pub fn u64(&mut self) -> Result<u64, BufferError> {
        self.take().map(u64::from_be_bytes)
    }

    #[inline]
    pub fn i64(&mut self) -> Result<i64, BufferError> {
        self.take().map(i64::from_be_bytes)
    }

    #[inline]
    pub fn f32(&mut self) -> Result<f32, BufferError> {
        self.take().map(f32::from_be_bytes)
    }

    #[inline]
    pub fn f64(&mut self) -> Result<f64, BufferError> {
        self.take().map(f64::from_be_bytes)
    }

    /// Reads `size` raw bytes and advances the cursor.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.check(size)?;
        let start = self.pos;
        self.pos += size;
        Ok(&self.data[start..self.pos])
    }

    /// Reads a UTF-8 string of `size` bytes.
    ///
    /// On invalid UTF-8 the cursor is not advanced.
    pub fn utf8(&mut self, size: usize) -> Result<&'a str, BufferError> {
        self.check(size)?;
        let s = str::from_utf8(&self.data[self.pos..self.pos + size])
            .map_err(|_| BufferError::InvalidUtf8)?;
        self.pos += size;
        Ok(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8() {
        let data = [0x01, 0x02, 0x03];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.u8(), Ok(0x01));
        assert_eq!(reader.u8(), Ok(0x02));
        assert_eq!(reader.u8(), Ok(0x03));
        assert_eq!(
            reader.u8(),
            Err(BufferError::InsufficientData { needed: 1, have: 0 })
        );
    }

    #[test]
    fn test_signed_reads() {
        let data = [0xff, 0xff, 0xfe, 0xff, 0xff, 0xff, 0x80];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.i8(), Ok(-1));
        assert_eq!(reader.i16(), Ok(-2));
        assert_eq!(reader.i32(), Ok(-128));
    }

    #[test]
    fn test_64_bit_reads() {
        let data = [
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x80, 0, 0, 0, 0, 0, 0, 0,
        ];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.u64(), Ok(u64::MAX));
        assert_eq!(reader.i64(), Ok(i64::MIN));
    }

    #[test]
    fn test_floats() {
        let mut data = Vec::new();
        data.extend_from_slice(&1.5f32.to_be_bytes());
        data.extend_from_slice(&(-0.25f64).to_be_bytes());
        let mut reader = Reader::new(&data);
        assert_eq!(reader.f32(), Ok(1.5));
        assert_eq!(reader.f64(), Ok(-0.25));
    }

    #[test]
    fn test_short_read_reports_size_and_keeps_cursor() {
        let data = [0xff; 7];
        let mut reader = Reader::new(&data);
        assert_eq!(
            reader.u64(),
            Err(BufferError::InsufficientData { needed: 8, have: 7 })
        );
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.size(), 7);
    }

    #[test]
    fn test_buf_and_peek() {
        let data = [1, 2, 3, 4, 5];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.peek(), Ok(1));
        assert_eq!(reader.buf(3), Ok(&[1u8, 2, 3][..]));
        assert_eq!(reader.peek(), Ok(4));
        assert_eq!(
            reader.buf(3),
            Err(BufferError::InsufficientData { needed: 3, have: 2 })
        );
    }

    #[test]
    fn test_utf8() {
        let data = "héllo".as_bytes();
        let mut reader = Reader::new(data);
        assert_eq!(reader.utf8(data.len()), Ok("héllo"));
    }

    #[test]
    fn test_utf8_invalid() {
        let data = [0xc3, 0x28];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.utf8(2), Err(BufferError::InvalidUtf8));
        assert_eq!(reader.position(), 0);
    }
}
