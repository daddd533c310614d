//! [`Packer`]: encodes [`Value`]s into MessagePack bytes.
//!
//! Dispatch order for every value, nested ones included: registered
//! transformers first, then the core scalar rules, then containers. Every
//! length header uses the smallest form that fits.

use std::sync::Arc;

use msgpack_buffers::Writer;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use tracing::debug;

use crate::constants::*;
use crate::error::PackingError;
use crate::transformer::TransformerCollection;
use crate::value::{IntRepr, Value};

/// Initial allocation for the writer backing a single `pack` call.
const PACK_ALLOC_SIZE: usize = 256;

/// MessagePack encoder.
///
/// Holds no per-call state; a shared `&Packer` can be used from several
/// threads as long as its transformer collection is not edited meanwhile.
#[derive(Debug, Clone, Default)]
pub struct Packer {
    transformers: Option<Arc<TransformerCollection>>,
}

impl Packer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transformers(mut self, transformers: Arc<TransformerCollection>) -> Self {
        self.transformers = Some(transformers);
        self
    }

    pub fn transformers(&self) -> Option<&Arc<TransformerCollection>> {
        self.transformers.as_ref()
    }

    pub fn set_transformers(&mut self, transformers: Arc<TransformerCollection>) -> &mut Self {
        self.transformers = Some(transformers);
        self
    }

    /// Encodes `value`. On failure no bytes are returned.
    pub fn pack(&self, value: &Value) -> Result<Vec<u8>, PackingError> {
        let mut writer = Writer::with_alloc_size(PACK_ALLOC_SIZE);
        self.pack_into(&mut writer, value)?;
        Ok(writer.flush())
    }

    /// Encodes `value` into `writer`.
    ///
    /// On failure the writer is rolled back to where it was before the call.
    pub fn pack_into(&self, writer: &mut Writer, value: &Value) -> Result<(), PackingError> {
        let mark = writer.pending();
        self.write_any(writer, value).inspect_err(|err| {
            debug!(error = %err, "packing failed");
            writer.rollback(mark);
        })
    }

    fn write_any(&self, writer: &mut Writer, value: &Value) -> Result<(), PackingError> {
        if let Some(ext) = self
            .transformers
            .as_deref()
            .and_then(|coll| coll.pack_lookup(value))
        {
            return Self::write_ext(writer, ext.tag, &ext.payload);
        }

        match value {
            Value::Nil => Self::write_nil(writer),
            Value::Bool(b) => Self::write_bool(writer, *b),
            Value::Integer(n) => match n.repr() {
                IntRepr::Pos(u) => Self::write_uint(writer, u),
                IntRepr::Neg(i) => Self::write_int(writer, i),
            },
            Value::Float32(f) => Self::write_f32(writer, *f),
            Value::Float64(f) => Self::write_f64(writer, *f),
            Value::BigInt(n) => Self::write_bigint(writer, n)?,
            Value::Str(s) => Self::write_str(writer, s)?,
            Value::Bin(b) => Self::write_bin(writer, b)?,
            Value::Array(items) => {
                Self::write_array_header(writer, items.len())?;
                for item in items {
                    self.write_any(writer, item)?;
                }
            }
            Value::Map(pairs) => {
                Self::write_map_header(writer, pairs.len())?;
                for (key, val) in pairs {
                    self.write_any(writer, key)?;
                    self.write_any(writer, val)?;
                }
            }
            Value::Ext(ext) => Self::write_ext(writer, ext.tag, &ext.payload)?,
            Value::Custom(_) => return Err(PackingError::UnsupportedType("custom")),
        }
        Ok(())
    }

    pub fn write_nil(writer: &mut Writer) {
        writer.u8(NIL);
    }

    pub fn write_bool(writer: &mut Writer, b: bool) {
        writer.u8(if b { TRUE } else { FALSE });
    }

    /// Writes a non-negative integer in its smallest form.
    pub fn write_uint(writer: &mut Writer, num: u64) {
        if num <= POSITIVE_FIXINT_MAX as u64 {
            writer.u8(num as u8);
        } else if num <= 0xff {
            writer.u8u8(UINT8, num as u8);
        } else if num <= 0xffff {
            writer.u8u16(UINT16, num as u16);
        } else if num <= 0xffff_ffff {
            writer.u8u32(UINT32, num as u32);
        } else {
            writer.u8u64(UINT64, num);
        }
    }

    /// Writes a signed integer in its smallest form. Non-negative values use
    /// the unsigned families.
    pub fn write_int(writer: &mut Writer, num: i64) {
        if num >= 0 {
            Self::write_uint(writer, num as u64);
        } else if num >= -0x20 {
            writer.u8(num as i8 as u8);
        } else if num >= i8::MIN as i64 {
            writer.u8u8(INT8, num as i8 as u8);
        } else if num >= i16::MIN as i64 {
            writer.u8u16(INT16, num as i16 as u16);
        } else if num >= i32::MIN as i64 {
            writer.u8u32(INT32, num as i32 as u32);
        } else {
            writer.u8u64(INT64, num as u64);
        }
    }

    fn write_bigint(writer: &mut Writer, num: &BigInt) -> Result<(), PackingError> {
        if let Some(u) = num.to_u64() {
            Self::write_uint(writer, u);
        } else if let Some(i) = num.to_i64() {
            Self::write_int(writer, i);
        } else {
            return Err(PackingError::IntegerOutOfRange(num.to_string()));
        }
        Ok(())
    }

    pub fn write_f32(writer: &mut Writer, float: f32) {
        writer.u8f32(FLOAT32, float);
    }

    pub fn write_f64(writer: &mut Writer, float: f64) {
        writer.u8f64(FLOAT64, float);
    }

    pub fn write_str_header(writer: &mut Writer, length: usize) -> Result<(), PackingError> {
        if length <= FIXSTR_MAX_LEN {
            writer.u8(FIXSTR | length as u8);
        } else if length <= 0xff {
            writer.u8u8(STR8, length as u8);
        } else if length <= 0xffff {
            writer.u8u16(STR16, length as u16);
        } else {
            writer.u8u32(STR32, checked_u32(length)?);
        }
        Ok(())
    }

    pub fn write_str(writer: &mut Writer, s: &str) -> Result<(), PackingError> {
        Self::write_str_header(writer, s.len())?;
        writer.utf8(s);
        Ok(())
    }

    pub fn write_bin_header(writer: &mut Writer, length: usize) -> Result<(), PackingError> {
        if length <= 0xff {
            writer.u8u8(BIN8, length as u8);
        } else if length <= 0xffff {
            writer.u8u16(BIN16, length as u16);
        } else {
            writer.u8u32(BIN32, checked_u32(length)?);
        }
        Ok(())
    }

    pub fn write_bin(writer: &mut Writer, buf: &[u8]) -> Result<(), PackingError> {
        Self::write_bin_header(writer, buf.len())?;
        writer.buf(buf);
        Ok(())
    }

    pub fn write_array_header(writer: &mut Writer, length: usize) -> Result<(), PackingError> {
        if length <= FIXCOLLECTION_MAX_LEN {
            writer.u8(FIXARRAY | length as u8);
        } else if length <= 0xffff {
            writer.u8u16(ARRAY16, length as u16);
        } else {
            writer.u8u32(ARRAY32, checked_u32(length)?);
        }
        Ok(())
    }

    pub fn write_map_header(writer: &mut Writer, length: usize) -> Result<(), PackingError> {
        if length <= FIXCOLLECTION_MAX_LEN {
            writer.u8(FIXMAP | length as u8);
        } else if length <= 0xffff {
            writer.u8u16(MAP16, length as u16);
        } else {
            writer.u8u32(MAP32, checked_u32(length)?);
        }
        Ok(())
    }

    pub fn write_ext_header(
        writer: &mut Writer,
        tag: i8,
        length: usize,
    ) -> Result<(), PackingError> {
        match length {
            1 => writer.u8(FIXEXT1),
            2 => writer.u8(FIXEXT2),
            4 => writer.u8(FIXEXT4),
            8 => writer.u8(FIXEXT8),
            16 => writer.u8(FIXEXT16),
            _ if length <= 0xff => writer.u8u8(EXT8, length as u8),
            _ if length <= 0xffff => writer.u8u16(EXT16, length as u16),
            _ => writer.u8u32(EXT32, checked_u32(length)?),
        }
        writer.u8(tag as u8);
        Ok(())
    }

    pub fn write_ext(writer: &mut Writer, tag: i8, payload: &[u8]) -> Result<(), PackingError> {
        Self::write_ext_header(writer, tag, payload.len())?;
        writer.buf(payload);
        Ok(())
    }
}

fn checked_u32(length: usize) -> Result<u32, PackingError> {
    u32::try_from(length).map_err(|_| PackingError::LengthOverflow(length))
}
