/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Error types for the WireFix FIX protocol engine.
//!
//! This module provides a unified error hierarchy using `thiserror` for typed,
//! domain-specific errors across all WireFix operations.
//!
//! Incomplete data is deliberately NOT an error anywhere in this hierarchy:
//! the framing layer signals "need more data" with `Ok(None)` and the message
//! decoder simply stops walking, so callers retry once more bytes arrive.

use thiserror::Error;

/// Result type alias using [`FixError`] as the error type.
pub type Result<T> = std::result::Result<T, FixError>;

/// Top-level error type for all WireFix operations.
#[derive(Debug, Error)]
pub enum FixError {
    /// Error during message decoding.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Error during frame extraction.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// Error during message encoding.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Error in session layer operations.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// I/O error from underlying transport.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors reported by the message decoder through the visitor callback.
///
/// Each value is delivered together with the byte offset at which it was
/// detected. None of these abort the owning connection by themselves; the
/// visitor decides whether decoding output is still trustworthy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Tag/value delimiter '=' not found after the current offset.
    #[error("tag value delimiter '=' not found")]
    TagDelimiterNotFound,

    /// Field delimiter SOH not found after the current offset.
    #[error("field delimiter SOH not found")]
    FieldDelimiterNotFound,

    /// First field is not a recognized BeginString.
    #[error("message must start with begin string 8=FIX. or 8=FIXT.")]
    InvalidBeginString,

    /// BodyLength (9) is not the second field in the message.
    #[error("body length (9) should be the second field in the message")]
    BodyLengthMisplaced,

    /// BodyLength value is malformed or out of the sane range.
    #[error("invalid body length value: {reason}")]
    InvalidBodyLength {
        /// Description of why the value is invalid.
        reason: String,
    },

    /// Declared BodyLength does not match the measured body span.
    #[error("body length mismatch: declared {declared}, actual {actual}")]
    BodyLengthMismatch {
        /// BodyLength value carried in the message.
        declared: usize,
        /// Byte count measured between body start and the CheckSum tag.
        actual: usize,
    },

    /// Checksum mismatch between calculated and declared values.
    #[error("checksum mismatch: calculated {calculated}, declared {declared}")]
    ChecksumMismatch {
        /// Calculated checksum value.
        calculated: u8,
        /// Declared checksum value in the message.
        declared: u8,
    },

    /// Tag bytes do not form a valid integer.
    #[error("invalid tag format: {0}")]
    InvalidTag(String),

    /// Field value cannot be interpreted as the requested type.
    #[error("invalid field value for tag {tag}: {reason}")]
    InvalidFieldValue {
        /// The tag number of the field.
        tag: u32,
        /// Description of why the value is invalid.
        reason: String,
    },

    /// Invalid UTF-8 in a string field.
    #[error("invalid utf-8 in field: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Classification of a [`FrameError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameErrorKind {
    /// The byte stream does not frame as FIX at the current cursor.
    Framing,
    /// A complete frame was extracted but failed its integrity checks.
    Integrity,
}

/// Errors that occur while extracting one complete frame from the stream.
///
/// A [`FrameError`] is terminal for the span it was detected on: the framing
/// layer will not attempt to reinterpret a corrupted span as a valid message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Frame does not start with a recognized BeginString prefix.
    #[error("frame should begin with 8=FIX. or 8=FIXT.")]
    InvalidBeginString,

    /// BodyLength (9) is not the second field in the frame.
    #[error("body length (9) should be the second field in the frame")]
    MissingBodyLength,

    /// BodyLength digits are malformed.
    #[error("invalid body length value")]
    InvalidBodyLength,

    /// End of the BodyLength field not found within the digit budget.
    #[error("end of body length field not found within {searched} bytes")]
    BodyLengthUnterminated {
        /// Bytes searched before giving up.
        searched: usize,
    },

    /// Frame length exceeds the configured maximum.
    #[error("frame too long: {length} bytes exceeds maximum {max}")]
    FrameTooLong {
        /// Total expected frame length in bytes.
        length: usize,
        /// Configured maximum frame length.
        max: usize,
    },

    /// Trailer does not carry the checksum field at the expected position.
    #[error("missing checksum field (10) at end of frame")]
    MissingChecksum,

    /// Checksum value is not three decimal digits.
    #[error("invalid checksum format")]
    InvalidChecksum,

    /// Checksum mismatch between calculated and declared values.
    #[error("checksum mismatch: calculated {calculated}, declared {declared}")]
    ChecksumMismatch {
        /// Calculated checksum value.
        calculated: u8,
        /// Declared checksum value in the frame.
        declared: u8,
    },

    /// The stream was poisoned by an earlier framing or integrity error.
    #[error("stream corrupted by an earlier framing error")]
    Corrupted,

    /// I/O error from the underlying transport.
    #[error("io error: {0}")]
    Io(String),
}

impl FrameError {
    /// Returns whether this error is a framing or an integrity failure.
    #[must_use]
    pub const fn kind(&self) -> FrameErrorKind {
        match self {
            Self::MissingChecksum | Self::InvalidChecksum | Self::ChecksumMismatch { .. } => {
                FrameErrorKind::Integrity
            }
            _ => FrameErrorKind::Framing,
        }
    }
}

impl From<std::io::Error> for FrameError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Errors that occur during FIX message encoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A wildcard field value reached the wire-output path.
    #[error("wildcard value for tag {tag} cannot be encoded")]
    WildcardValue {
        /// The tag number of the offending field.
        tag: u32,
    },

    /// Missing required field during encoding.
    #[error("missing required field: tag {tag}")]
    MissingRequiredField {
        /// The tag number of the missing field.
        tag: u32,
    },

    /// Invalid field value for encoding.
    #[error("invalid field value for tag {tag}: {reason}")]
    InvalidFieldValue {
        /// The tag number of the field.
        tag: u32,
        /// Description of why the value is invalid.
        reason: String,
    },
}

/// Errors in FIX session layer operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Session is not in the correct state for the operation.
    #[error("invalid session state: expected {expected}, current {current}")]
    InvalidState {
        /// Expected state for the operation.
        expected: String,
        /// Current session state.
        current: String,
    },

    /// Sequence number gap detected.
    #[error("sequence gap detected: expected {expected}, received {received}")]
    SequenceGap {
        /// Expected sequence number.
        expected: u64,
        /// Received sequence number.
        received: u64,
    },

    /// Sequence number too low (possible duplicate).
    #[error("sequence too low: expected >= {expected}, received {received}")]
    SequenceTooLow {
        /// Minimum expected sequence number.
        expected: u64,
        /// Received sequence number.
        received: u64,
    },

    /// Session configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::ChecksumMismatch {
            calculated: 100,
            declared: 200,
        };
        assert_eq!(
            err.to_string(),
            "checksum mismatch: calculated 100, declared 200"
        );
    }

    #[test]
    fn test_frame_error_kind() {
        assert_eq!(
            FrameError::InvalidBeginString.kind(),
            FrameErrorKind::Framing
        );
        assert_eq!(
            FrameError::FrameTooLong {
                length: 10_000,
                max: 9999
            }
            .kind(),
            FrameErrorKind::Framing
        );
        assert_eq!(
            FrameError::ChecksumMismatch {
                calculated: 1,
                declared: 2
            }
            .kind(),
            FrameErrorKind::Integrity
        );
        assert_eq!(FrameError::MissingChecksum.kind(), FrameErrorKind::Integrity);
    }

    #[test]
    fn test_fix_error_from_decode() {
        let decode_err = DecodeError::TagDelimiterNotFound;
        let fix_err: FixError = decode_err.into();
        assert!(matches!(
            fix_err,
            FixError::Decode(DecodeError::TagDelimiterNotFound)
        ));
    }

    #[test]
    fn test_session_error_display() {
        let err = SessionError::SequenceGap {
            expected: 5,
            received: 10,
        };
        assert_eq!(
            err.to_string(),
            "sequence gap detected: expected 5, received 10"
        );
    }
}
