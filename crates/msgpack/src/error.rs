//! Packing and unpacking error types.

use msgpack_buffers::BufferError;
use thiserror::Error;

/// Error type for packing. Always fatal to the whole `pack` call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PackingError {
    /// No core rule and no registered transformer handles the value.
    /// Carries the name of the offending value kind.
    #[error("Unsupported type.")]
    UnsupportedType(&'static str),
    /// A str/bin/array/map/ext length does not fit a 32-bit header.
    #[error("length {0} exceeds the MessagePack 32-bit limit")]
    LengthOverflow(usize),
    /// A big integer outside the int64/uint64 wire range.
    #[error("integer {0} is outside the MessagePack 64-bit range")]
    IntegerOutOfRange(String),
}

/// Error type for unpacking.
///
/// [`UnpackError::InsufficientData`] is the only recoverable variant: append
/// more bytes and retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnpackError {
    /// The next indivisible read needs `needed` bytes, only `have` are left.
    #[error("Not enough data to unpack: need {needed}, have {have}.")]
    InsufficientData { needed: usize, have: usize },
    #[error("Unknown code: 0x{0:02x}.")]
    UnknownCode(u8),
    /// uint64 above `i64::MAX` while the big-int mode is `Throw`.
    #[error("The value is too large: {0}.")]
    IntegerOverflow(u64),
    #[error("invalid UTF-8 in str payload")]
    InvalidUtf8,
    #[error("nesting depth exceeds the limit of {0}")]
    DepthLimitExceeded(usize),
    /// A registered transformer rejected an extension payload.
    #[error("extension type {tag}: {reason}")]
    Transform { tag: i8, reason: String },
}

impl UnpackError {
    /// `true` when the input was cut short rather than malformed.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, UnpackError::InsufficientData { .. })
    }
}

impl From<BufferError> for UnpackError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::InsufficientData { needed, have } => {
                UnpackError::InsufficientData { needed, have }
            }
            BufferError::InvalidUtf8 => UnpackError::InvalidUtf8,
        }
    }
}

/// Failure reported by a transformer decoding its own payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct TransformError {
    pub reason: String,
}

impl TransformError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
