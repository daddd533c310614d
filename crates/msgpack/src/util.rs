//! One-shot helpers for callers that do not need transformers or streaming.

use crate::{BufferUnpacker, Packer, PackingError, UnpackError, Value};

/// Encodes `value` with a default [`Packer`].
pub fn pack(value: &Value) -> Result<Vec<u8>, PackingError> {
    Packer::new().pack(value)
}

/// Decodes the first value in `blob` with default options.
///
/// Bytes after the first value are ignored.
pub fn unpack(blob: &[u8]) -> Result<Value, UnpackError> {
    BufferUnpacker::new().reset_with(blob).unpack()
}
