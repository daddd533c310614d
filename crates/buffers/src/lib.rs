//! Byte buffers used by the MessagePack codec.
//!
//! - [`Writer`]: auto-growing output buffer with big-endian primitives.
//! - [`Reader`]: bounds-checked cursor over a byte slice that reports how
//!   many bytes a failed read needed.
//! - [`StreamBuffer`]: owned, append-only input arena with a read cursor.

mod reader;
mod stream;
mod writer;

pub use reader::Reader;
pub use stream::StreamBuffer;
pub use writer::Writer;

use thiserror::Error;

/// Error type for buffer reads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// A read of `needed` bytes was attempted with only `have` available.
    #[error("not enough data: need {needed}, have {have}")]
    InsufficientData { needed: usize, have: usize },
    #[error("invalid UTF-8")]
    InvalidUtf8,
}
