//! Unpacker configuration.

use serde::{Deserialize, Serialize};

/// Default maximum container nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// How a uint64 above `i64::MAX` is rendered on decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BigIntMode {
    /// Fail with [`crate::UnpackError::IntegerOverflow`].
    #[default]
    Throw,
    /// Render as [`crate::Value::Str`] holding the decimal digits.
    AsDecimalString,
    /// Render as [`crate::Value::BigInt`].
    AsArbitraryPrecision,
}

/// Options fixed at [`crate::BufferUnpacker`] construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnpackerOptions {
    pub bigint_mode: BigIntMode,
    pub max_depth: usize,
}

impl Default for UnpackerOptions {
    fn default() -> Self {
        Self {
            bigint_mode: BigIntMode::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl UnpackerOptions {
    pub fn bigint_mode(mut self, mode: BigIntMode) -> Self {
        self.bigint_mode = mode;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}
