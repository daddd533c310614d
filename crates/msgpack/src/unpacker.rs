//! [`BufferUnpacker`]: incremental MessagePack decoder.
//!
//! Bytes are appended to an owned [`StreamBuffer`]; values are pulled out with
//! [`BufferUnpacker::unpack`] or [`BufferUnpacker::try_unpack`]. Each value is
//! decoded by a one-shot recursive descent over the unread bytes and only
//! committed once it is complete, so running out of input never moves the
//! cursor.

use std::sync::Arc;

use msgpack_buffers::{Reader, StreamBuffer};
use num_bigint::BigInt;
use tracing::trace;

use crate::constants::*;
use crate::error::UnpackError;
use crate::options::{BigIntMode, UnpackerOptions};
use crate::transformer::TransformerCollection;
use crate::value::{Extension, Value};

/// Streaming MessagePack decoder.
///
/// One instance reads one ordered byte stream; every operation takes
/// `&mut self`.
///
/// # Example
///
/// ```
/// use msgpack_codec::{BufferUnpacker, Value};
///
/// let mut unpacker = BufferUnpacker::new();
/// unpacker.append(b"\x92\x01");
/// assert_eq!(unpacker.try_unpack().unwrap(), Vec::<Value>::new());
/// unpacker.append(b"\x02\xc3");
/// assert_eq!(
///     unpacker.try_unpack().unwrap(),
///     vec![Value::from(vec![Value::from(1), Value::from(2)]), Value::Bool(true)]
/// );
/// ```
#[derive(Debug, Default)]
pub struct BufferUnpacker {
    buffer: StreamBuffer,
    options: UnpackerOptions,
    transformers: Option<Arc<TransformerCollection>>,
}

impl BufferUnpacker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: UnpackerOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn with_transformers(mut self, transformers: Arc<TransformerCollection>) -> Self {
        self.transformers = Some(transformers);
        self
    }

    pub fn options(&self) -> &UnpackerOptions {
        &self.options
    }

    pub fn transformers(&self) -> Option<&Arc<TransformerCollection>> {
        self.transformers.as_ref()
    }

    pub fn set_transformers(&mut self, transformers: Arc<TransformerCollection>) -> &mut Self {
        self.transformers = Some(transformers);
        self
    }

    /// Number of buffered bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buffer.remaining()
    }

    /// Appends `data` to the buffer. Nothing is decoded.
    pub fn append(&mut self, data: &[u8]) -> &mut Self {
        self.buffer.append(data);
        self
    }

    /// Drops all buffered bytes.
    pub fn reset(&mut self) -> &mut Self {
        self.reset_with(&[])
    }

    /// Replaces the buffer with `data`, cursor at its start.
    pub fn reset_with(&mut self, data: &[u8]) -> &mut Self {
        self.buffer.reset(data);
        self
    }

    /// Decodes exactly one value at the cursor and advances past it.
    ///
    /// On any error the cursor stays where it was.
    pub fn unpack(&mut self) -> Result<Value, UnpackError> {
        let (value, consumed) = self.decode_one()?;
        self.buffer.advance(consumed);
        Ok(value)
    }

    /// Decodes every complete value currently buffered.
    ///
    /// Stops without error at the first value that needs more bytes; its
    /// partial bytes are kept for the next call. Consumed bytes are dropped
    /// from the buffer afterwards. Malformed input fails the whole call.
    pub fn try_unpack(&mut self) -> Result<Vec<Value>, UnpackError> {
        let mut values = Vec::new();
        while self.buffer.remaining() > 0 {
            match self.decode_one() {
                Ok((value, consumed)) => {
                    self.buffer.advance(consumed);
                    values.push(value);
                }
                Err(err) if err.is_insufficient_data() => break,
                Err(err) => return Err(err),
            }
        }
        let dropped = self.buffer.truncate();
        trace!(
            values = values.len(),
            dropped,
            buffered = self.buffer.remaining(),
            "try_unpack"
        );
        Ok(values)
    }

    fn decode_one(&self) -> Result<(Value, usize), UnpackError> {
        let mut decoder = Decoder {
            reader: Reader::new(self.buffer.unread()),
            options: &self.options,
            transformers: self.transformers.as_deref(),
        };
        let value = decoder.read_any(0)?;
        Ok((value, decoder.reader.position()))
    }
}

struct Decoder<'a, 'o> {
    reader: Reader<'a>,
    options: &'o UnpackerOptions,
    transformers: Option<&'o TransformerCollection>,
}

impl Decoder<'_, '_> {
    fn read_any(&mut self, depth: usize) -> Result<Value, UnpackError> {
        let byte = self.reader.u8()?;
        match byte {
            0x00..=POSITIVE_FIXINT_MAX => Ok(Value::from(byte)),
            0x80..=0x8f => self.read_map((byte & 0x0f) as usize, depth),
            0x90..=0x9f => self.read_array((byte & 0x0f) as usize, depth),
            0xa0..=0xbf => self.read_str((byte & 0x1f) as usize),
            NIL => Ok(Value::Nil),
            RESERVED => Err(UnpackError::UnknownCode(byte)),
            FALSE => Ok(Value::Bool(false)),
            TRUE => Ok(Value::Bool(true)),
            BIN8 => {
                let n = self.reader.u8()? as usize;
                self.read_bin(n)
            }
            BIN16 => {
                let n = self.reader.u16()? as usize;
                self.read_bin(n)
            }
            BIN32 => {
                let n = self.reader.u32()? as usize;
                self.read_bin(n)
            }
            EXT8 => {
                let n = self.reader.u8()? as usize;
                self.read_ext(n)
            }
            EXT16 => {
                let n = self.reader.u16()? as usize;
                self.read_ext(n)
            }
            EXT32 => {
                let n = self.reader.u32()? as usize;
                self.read_ext(n)
            }
            FLOAT32 => Ok(Value::Float32(self.reader.f32()?)),
            FLOAT64 => Ok(Value::Float64(self.reader.f64()?)),
            UINT8 => Ok(Value::from(self.reader.u8()?)),
            UINT16 => Ok(Value::from(self.reader.u16()?)),
            UINT32 => Ok(Value::from(self.reader.u32()?)),
            UINT64 => {
                let n = self.reader.u64()?;
                self.read_u64(n)
            }
            INT8 => Ok(Value::from(self.reader.i8()?)),
            INT16 => Ok(Value::from(self.reader.i16()?)),
            INT32 => Ok(Value::from(self.reader.i32()?)),
            INT64 => Ok(Value::from(self.reader.i64()?)),
            FIXEXT1 => self.read_ext(1),
            FIXEXT2 => self.read_ext(2),
            FIXEXT4 => self.read_ext(4),
            FIXEXT8 => self.read_ext(8),
            FIXEXT16 => self.read_ext(16),
            STR8 => {
                let n = self.reader.u8()? as usize;
                self.read_str(n)
            }
            STR16 => {
                let n = self.reader.u16()? as usize;
                self.read_str(n)
            }
            STR32 => {
                let n = self.reader.u32()? as usize;
                self.read_str(n)
            }
            ARRAY16 => {
                let n = self.reader.u16()? as usize;
                self.read_array(n, depth)
            }
            ARRAY32 => {
                let n = self.reader.u32()? as usize;
                self.read_array(n, depth)
            }
            MAP16 => {
                let n = self.reader.u16()? as usize;
                self.read_map(n, depth)
            }
            MAP32 => {
                let n = self.reader.u32()? as usize;
                self.read_map(n, depth)
            }
            NEGATIVE_FIXINT..=0xff => Ok(Value::from(byte as i8)),
        }
    }

    fn read_u64(&self, n: u64) -> Result<Value, UnpackError> {
        if n <= i64::MAX as u64 {
            return Ok(Value::from(n));
        }
        match self.options.bigint_mode {
            BigIntMode::Throw => Err(UnpackError::IntegerOverflow(n)),
            BigIntMode::AsDecimalString => Ok(Value::Str(n.to_string())),
            BigIntMode::AsArbitraryPrecision => Ok(Value::BigInt(BigInt::from(n))),
        }
    }

    fn read_str(&mut self, size: usize) -> Result<Value, UnpackError> {
        Ok(Value::Str(self.reader.utf8(size)?.to_owned()))
    }

    fn read_bin(&mut self, size: usize) -> Result<Value, UnpackError> {
        Ok(Value::Bin(self.reader.buf(size)?.to_vec()))
    }

    fn read_ext(&mut self, size: usize) -> Result<Value, UnpackError> {
        let tag = self.reader.i8()?;
        let payload = self.reader.buf(size)?;
        match self.transformers.and_then(|coll| coll.unpack_lookup(tag)) {
            Some(transformer) => {
                transformer
                    .unpack(payload)
                    .map_err(|err| UnpackError::Transform {
                        tag,
                        reason: err.reason,
                    })
            }
            None => Ok(Value::Ext(Extension::new(tag, payload))),
        }
    }

    fn enter(&self, depth: usize) -> Result<usize, UnpackError> {
        let depth = depth + 1;
        if depth > self.options.max_depth {
            return Err(UnpackError::DepthLimitExceeded(self.options.max_depth));
        }
        Ok(depth)
    }

    fn read_array(&mut self, size: usize, depth: usize) -> Result<Value, UnpackError> {
        let depth = self.enter(depth)?;
        // Every element takes at least one byte.
        let mut items = Vec::with_capacity(size.min(self.reader.size()));
        for _ in 0..size {
            items.push(self.read_any(depth)?);
        }
        Ok(Value::Array(items))
    }

    fn read_map(&mut self, size: usize, depth: usize) -> Result<Value, UnpackError> {
        let depth = self.enter(depth)?;
        let mut pairs = Vec::with_capacity(size.min(self.reader.size() / 2));
        for _ in 0..size {
            let key = self.read_any(depth)?;
            let val = self.read_any(depth)?;
            pairs.push((key, val));
        }
        Ok(Value::Map(pairs))
    }
}
