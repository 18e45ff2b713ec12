//! Type conversion errors.

use thiserror::Error;

use crate::value::SqlValue;

/// Errors raised when a raw value cannot be projected onto a Rust type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// No conversion path exists between the two types.
    #[error("Don't know how to convert '{source_type}' to {target}")]
    Unsupported {
        /// Type label of the raw value.
        source_type: &'static str,
        /// Requested Rust type.
        target: &'static str,
    },

    /// The raw value is not of a type the strict read accepts.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Requested Rust type.
        expected: &'static str,
        /// Description of what was found instead.
        actual: String,
    },

    /// The value does not fit in the requested type.
    #[error("value {value} is out of range for {target}")]
    OutOfRange {
        /// Rendered value.
        value: String,
        /// Requested Rust type.
        target: &'static str,
    },

    /// Text could not be parsed as the requested type.
    #[error("cannot parse '{value}' as {target}: {reason}")]
    Parse {
        /// The text that failed to parse.
        value: String,
        /// Requested Rust type.
        target: &'static str,
        /// Parser message.
        reason: String,
    },
}

impl TypeError {
    pub(crate) fn unsupported(value: &SqlValue, target: &'static str) -> Self {
        Self::Unsupported {
            source_type: value.type_name(),
            target,
        }
    }

    pub(crate) fn mismatch(value: &SqlValue, expected: &'static str) -> Self {
        Self::TypeMismatch {
            expected,
            actual: value.type_name().to_string(),
        }
    }

    pub(crate) fn out_of_range(value: impl ToString, target: &'static str) -> Self {
        Self::OutOfRange {
            value: value.to_string(),
            target,
        }
    }
}
