//! MessagePack codec.
//!
//! - [`Packer`] turns a [`Value`] into bytes, choosing the smallest wire form
//!   for every integer and length header.
//! - [`BufferUnpacker`] decodes values out of an incrementally filled buffer
//!   and tells "need more input" apart from malformed input.
//! - [`TransformerCollection`] maps application types to and from extension
//!   values for both sides.
//!
//! ```
//! use msgpack_codec::{BufferUnpacker, Packer, Value};
//!
//! let value = Value::from(vec![Value::from(1), Value::from("bar")]);
//! let bytes = Packer::new().pack(&value).unwrap();
//! assert_eq!(bytes, b"\x92\x01\xa3bar");
//!
//! let mut unpacker = BufferUnpacker::new();
//! unpacker.append(&bytes);
//! assert_eq!(unpacker.unpack().unwrap(), value);
//! ```

mod constants;
mod error;
mod json;
mod options;
mod packer;
mod transformer;
mod unpacker;
mod util;
mod value;

pub use constants::MsgPackMarker;
pub use error::{PackingError, TransformError, UnpackError};
pub use json::{BIN_URI_START, MSGPACK_EXT_START};
pub use options::{BigIntMode, UnpackerOptions, DEFAULT_MAX_DEPTH};
pub use packer::Packer;
pub use transformer::{TransformerCollection, TypeTransformer};
pub use unpacker::BufferUnpacker;
pub use util::{pack, unpack};
pub use value::{ApplicationValue, CustomValue, Extension, Integer, Value};

pub use msgpack_buffers::Writer;
pub use num_bigint::BigInt;
