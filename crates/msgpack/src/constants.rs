//! MessagePack marker constants.

/// One-byte MessagePack markers without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MsgPackMarker {
    Nil = 0xc0,
    /// Never valid on the wire.
    Reserved = 0xc1,
    False = 0xc2,
    True = 0xc3,
}

pub const NIL: u8 = MsgPackMarker::Nil as u8;
pub const RESERVED: u8 = MsgPackMarker::Reserved as u8;
pub const FALSE: u8 = MsgPackMarker::False as u8;
pub const TRUE: u8 = MsgPackMarker::True as u8;

pub const POSITIVE_FIXINT_MAX: u8 = 0x7f;
pub const FIXMAP: u8 = 0x80;
pub const FIXARRAY: u8 = 0x90;
pub const FIXSTR: u8 = 0xa0;
pub const NEGATIVE_FIXINT: u8 = 0xe0;

pub const BIN8: u8 = 0xc4;
pub const BIN16: u8 = 0xc5;
pub const BIN32: u8 = 0xc6;
pub const EXT8: u8 = 0xc7;
pub const EXT16: u8 = 0xc8;
pub const EXT32: u8 = 0xc9;
pub const FLOAT32: u8 = 0xca;
pub const FLOAT64: u8 = 0xcb;
pub const UINT8: u8 = 0xcc;
pub const UINT16: u8 = 0xcd;
pub const UINT32: u8 = 0xce;
pub const UINT64: u8 = 0xcf;
pub const INT8: u8 = 0xd0;
pub const INT16: u8 = 0xd1;
pub const INT32: u8 = 0xd2;
pub const INT64: u8 = 0xd3;
pub const FIXEXT1: u8 = 0xd4;
pub const FIXEXT2: u8 = 0xd5;
pub const FIXEXT4: u8 = 0xd6;
pub const FIXEXT8: u8 = 0xd7;
pub const FIXEXT16: u8 = 0xd8;
pub const STR8: u8 = 0xd9;
pub const STR16: u8 = 0xda;
pub const STR32: u8 = 0xdb;
pub const ARRAY16: u8 = 0xdc;
pub const ARRAY32: u8 = 0xdd;
pub const MAP16: u8 = 0xde;
pub const MAP32: u8 = 0xdf;

/// Largest payload a fixstr header can describe.
pub const FIXSTR_MAX_LEN: usize = 0x1f;
/// Largest element/pair count a fixarray/fixmap header can describe.
pub const FIXCOLLECTION_MAX_LEN: usize = 0x0f;
