/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Visitor-driven FIX message decoder.
//!
//! [`MessageDecoder::decode`] walks one complete message's tag=value pairs
//! left to right, enforcing the structural rules of the standard header and
//! trailer:
//!
//! - BeginString (8) must be the first field and carry a `FIX.`/`FIXT.`
//!   prefix.
//! - BodyLength (9) must be the second field; its value counts the bytes
//!   between its own separator and the separator immediately preceding the
//!   CheckSum tag and must fall within a sane range.
//! - CheckSum (10) must agree with a fresh computation over all preceding
//!   bytes.
//!
//! Fields and violations are reported through [`MessageVisitor`]; the
//! decoder itself never aborts the connection. Structural errors (missing
//! delimiter, misplaced or inconsistent BodyLength) stop the walk. A
//! checksum mismatch is reported but, by default, does NOT stop it - the
//! checksum field is still emitted and the visitor decides what to do.
//! Callers wanting a strict abort use [`halt_on_checksum_mismatch`].
//!
//! [`halt_on_checksum_mismatch`]: MessageDecoder::with_halt_on_checksum_mismatch

use crate::checksum::{calculate_checksum, parse_checksum};
use crate::scan;
use wirefix_core::error::DecodeError;
use wirefix_core::tags;

/// Minimum sane BodyLength value: a body can't be smaller than `35=X<SOH>`.
pub const MIN_BODY_LENGTH: usize = 5;

/// Maximum sane BodyLength value (1 MiB).
pub const MAX_BODY_LENGTH: usize = 1024 * 1024;

/// BodyLength values are expected to fit in this many digits.
const MAX_BODY_LENGTH_DIGITS: usize = 4;

const BEGIN_STRING_PREFIX: &[u8] = b"8=FIX.";
const BEGIN_STRING_PREFIX_FIXT: &[u8] = b"8=FIXT.";
const CHECKSUM_PREFIX: &[u8] = b"10=";

/// Capability interface consumed by [`MessageDecoder`].
///
/// Implementors assemble messages, count fields, or veto further processing;
/// the decoder only reports what it sees.
pub trait MessageVisitor {
    /// Called for every successfully parsed tag=value pair.
    ///
    /// The tag starts at `tag_offset` and spans `tag_len` bytes; the value
    /// starts at `tag_offset + tag_len + 1` and spans `value_len` bytes.
    fn on_field(&mut self, buffer: &[u8], tag_offset: usize, tag_len: usize, value_len: usize);

    /// Called for every structural or integrity violation, with the byte
    /// offset at which it was detected.
    fn on_error(&mut self, offset: usize, error: DecodeError);
}

/// Walks tag=value pairs of one complete message and reports to a visitor.
///
/// Stateless per call; cheap to construct and reuse across messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageDecoder {
    halt_on_checksum_mismatch: bool,
}

impl MessageDecoder {
    /// Creates a decoder with the default lenient checksum policy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            halt_on_checksum_mismatch: false,
        }
    }

    /// Sets whether a checksum mismatch stops field enumeration.
    ///
    /// Off by default: the mismatch is reported and the walk continues
    /// through the checksum field.
    #[must_use]
    pub const fn with_halt_on_checksum_mismatch(mut self, halt: bool) -> Self {
        self.halt_on_checksum_mismatch = halt;
        self
    }

    /// Decodes `buffer`, reporting fields and violations to `visitor`.
    ///
    /// Returns when the buffer is exhausted, a halting violation is found,
    /// or the declared BodyLength exceeds the bytes available (in which case
    /// the caller retries with more data; nothing is reported).
    pub fn decode<V: MessageVisitor>(&self, buffer: &[u8], visitor: &mut V) {
        let mut declared_body_length = 0usize;
        let mut body_start = 0usize;
        let mut tag_offset = 0usize;
        let mut field_index = 0usize;

        while tag_offset < buffer.len() {
            let Some(equals_at) = scan::find_equals(buffer, tag_offset) else {
                visitor.on_error(tag_offset, DecodeError::TagDelimiterNotFound);
                break;
            };
            let tag_len = equals_at - tag_offset;
            let value_offset = equals_at + 1;

            let Some(soh_at) = scan::find_soh(buffer, value_offset) else {
                visitor.on_error(value_offset, DecodeError::FieldDelimiterNotFound);
                break;
            };
            let value_len = soh_at - value_offset;

            if field_index == 0 {
                if !scan::starts_with_at(buffer, tag_offset, BEGIN_STRING_PREFIX)
                    && !scan::starts_with_at(buffer, tag_offset, BEGIN_STRING_PREFIX_FIXT)
                {
                    visitor.on_error(tag_offset, DecodeError::InvalidBeginString);
                    break;
                }
            } else if field_index == 1 {
                if !scan::starts_with_at(buffer, tag_offset, b"9=") {
                    visitor.on_error(tag_offset, DecodeError::BodyLengthMisplaced);
                    break;
                }
                if value_len > MAX_BODY_LENGTH_DIGITS {
                    // reported but not halting; the range check below decides
                    visitor.on_error(
                        tag_offset,
                        DecodeError::InvalidBodyLength {
                            reason: format!(
                                "value has {value_len} digits, expected at most {MAX_BODY_LENGTH_DIGITS}"
                            ),
                        },
                    );
                }
                let value_bytes = &buffer[value_offset..soh_at];
                let Some(parsed) = scan::parse_uint(value_bytes) else {
                    visitor.on_error(
                        tag_offset,
                        DecodeError::InvalidBodyLength {
                            reason: "value is not an unsigned integer".to_string(),
                        },
                    );
                    break;
                };
                declared_body_length = parsed as usize;
                if !(MIN_BODY_LENGTH..=MAX_BODY_LENGTH).contains(&declared_body_length) {
                    visitor.on_error(
                        tag_offset,
                        DecodeError::InvalidBodyLength {
                            reason: format!(
                                "{declared_body_length} outside [{MIN_BODY_LENGTH}, {MAX_BODY_LENGTH}]"
                            ),
                        },
                    );
                    break;
                }
                if declared_body_length > buffer.len() {
                    // not an error: wait for more data
                    break;
                }
            }

            if scan::starts_with_at(buffer, tag_offset, CHECKSUM_PREFIX) {
                let actual_body_length = tag_offset - body_start;
                if declared_body_length != actual_body_length {
                    visitor.on_error(
                        tag_offset,
                        DecodeError::BodyLengthMismatch {
                            declared: declared_body_length,
                            actual: actual_body_length,
                        },
                    );
                    break;
                }
                let calculated = calculate_checksum(&buffer[..tag_offset]);
                match parse_checksum(&buffer[value_offset..soh_at]) {
                    Some(declared) if declared == calculated => {}
                    Some(declared) => {
                        visitor.on_error(
                            tag_offset,
                            DecodeError::ChecksumMismatch {
                                calculated,
                                declared,
                            },
                        );
                        if self.halt_on_checksum_mismatch {
                            break;
                        }
                    }
                    None => {
                        visitor.on_error(
                            tag_offset,
                            DecodeError::InvalidFieldValue {
                                tag: tags::CHECK_SUM,
                                reason: "checksum value must be exactly 3 digits".to_string(),
                            },
                        );
                        if self.halt_on_checksum_mismatch {
                            break;
                        }
                    }
                }
            }

            visitor.on_field(buffer, tag_offset, tag_len, value_len);

            tag_offset += tag_len + 1 + value_len + 1;

            // body content begins right after the BodyLength field's separator
            if field_index == 1 {
                body_start = tag_offset;
            }
            field_index += 1;
        }
    }
}
