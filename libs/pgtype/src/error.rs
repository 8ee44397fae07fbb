//! Error types for value conversion.

use std::string::FromUtf8Error;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = PgTypeError> = std::result::Result<T, E>;

/// Errors that can occur when converting values.
#[derive(Debug, Error)]
pub enum PgTypeError {
    /// The input has the wrong number of bytes or characters.
    #[error("invalid length for {target}: {actual}")]
    LengthMismatch { target: &'static str, actual: usize },

    /// The hex digits of a text form could not be decoded.
    #[error("cannot parse uuid: {0}")]
    ParseFailure(#[from] hex::FromHexError),

    /// The ingestion source has no defined conversion.
    #[error("cannot convert {0} to uuid")]
    UnsupportedSourceType(&'static str),

    /// The driver cell has no defined conversion.
    #[error("cannot scan {0}")]
    UnsupportedScanType(&'static str),

    /// The destination cannot receive the value.
    #[error("cannot assign uuid to {0}")]
    UnsupportedConversion(&'static str),

    /// The destination cannot represent NULL.
    #[error("cannot assign NULL to {0}")]
    NullAssignment(&'static str),

    /// A text encoder produced bytes that are not UTF-8.
    #[error("text encoding is not valid utf-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),

    /// An error raised by a caller-supplied decoder.
    #[error(transparent)]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl PgTypeError {
    /// Wraps an arbitrary error raised by a decoder or resolver.
    pub fn custom<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        PgTypeError::Custom(err.into())
    }

    /// Returns true if this error indicates a wrong input length.
    pub fn is_length_mismatch(&self) -> bool {
        matches!(self, PgTypeError::LengthMismatch { .. })
    }

    /// Returns true if this error indicates a source or destination without a conversion.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            PgTypeError::UnsupportedSourceType(_)
                | PgTypeError::UnsupportedScanType(_)
                | PgTypeError::UnsupportedConversion(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_message() {
        let err = PgTypeError::LengthMismatch {
            target: "uuid",
            actual: 35,
        };
        assert_eq!(err.to_string(), "invalid length for uuid: 35");
        assert!(err.is_length_mismatch());
        assert!(!err.is_unsupported());
    }

    #[test]
    fn test_custom_is_transparent() {
        let err = PgTypeError::custom("decoder exploded");
        assert_eq!(err.to_string(), "decoder exploded");
    }
}
