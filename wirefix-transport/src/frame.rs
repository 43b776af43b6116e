/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Frame extraction from an accumulating byte stream.
//!
//! [`FrameDecoder`] identifies the span of exactly one complete FIX message
//! in a buffer that may hold partial messages, several messages, or garbage.
//! Each call re-evaluates from the buffer's read cursor and either yields a
//! frame, asks for more data (`Ok(None)`), or reports the stream as corrupt.
//!
//! The implicit state progression per frame is: awaiting minimum bytes ->
//! awaiting the BodyLength field -> awaiting the full body -> frame ready.
//! Any framing or integrity failure poisons the decoder: the stream is no
//! longer trustworthy at its cursor and every further call returns
//! [`FrameError::Corrupted`].
//!
//! The decoder never blocks and never delivers a partial frame. Bytes ahead
//! of a recognized frame are left in the buffer for the next call, so
//! several back-to-back messages arriving in one read are yielded one frame
//! per call.

use bytes::BytesMut;
use tracing::warn;
use wirefix_core::error::FrameError;
use wirefix_tagvalue::checksum::{calculate_checksum, parse_checksum};
use wirefix_tagvalue::scan;

/// Default maximum wire length of a single frame.
pub const DEFAULT_MAX_FRAME_LENGTH: usize = 9999;

/// Bytes that must be buffered before framing is attempted; enough to hold
/// the BeginString and the start of the BodyLength field.
const MIN_HEADER_BYTES: usize = 12;

/// BodyLength digits are searched within this budget.
const MAX_BODY_LENGTH_DIGITS: usize = 5;

/// Wire width of the trailer: `10=NNN<SOH>`.
const TRAILER_LENGTH: usize = 7;

const BEGIN_STRING_PREFIX: &[u8] = b"8=FIX.";
const BEGIN_STRING_PREFIX_FIXT: &[u8] = b"8=FIXT.";
const CHECKSUM_PREFIX: &[u8] = b"10=";

/// Extracts complete FIX frames from an accumulating buffer.
///
/// One decoder exists per connection and is owned by that connection's
/// single processing context; it holds no buffer of its own, the caller's
/// `BytesMut` is the frame buffer and its consumed prefix is discarded on
/// every yielded frame.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    /// Maximum total frame length in bytes.
    max_frame_length: usize,
    /// Set once a framing or integrity error has been returned.
    corrupted: bool,
}

impl FrameDecoder {
    /// Creates a decoder with [`DEFAULT_MAX_FRAME_LENGTH`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_frame_length: DEFAULT_MAX_FRAME_LENGTH,
            corrupted: false,
        }
    }

    /// Sets the maximum total frame length.
    #[must_use]
    pub const fn with_max_frame_length(mut self, max: usize) -> Self {
        self.max_frame_length = max;
        self
    }

    /// Returns the configured maximum frame length.
    #[must_use]
    pub const fn max_frame_length(&self) -> usize {
        self.max_frame_length
    }

    /// Returns true if an earlier error has poisoned this stream.
    #[must_use]
    pub const fn is_corrupted(&self) -> bool {
        self.corrupted
    }

    /// Attempts to extract one complete frame from `src`.
    ///
    /// # Returns
    /// - `Ok(Some(frame))` - a validated frame; its bytes are consumed
    /// - `Ok(None)` - need more data; nothing is consumed
    ///
    /// # Errors
    /// Any `FrameError` is terminal for the stream; subsequent calls return
    /// [`FrameError::Corrupted`].
    pub fn decode(&mut self, src: &mut BytesMut) -> Result<Option<BytesMut>, FrameError> {
        if self.corrupted {
            return Err(FrameError::Corrupted);
        }
        match self.try_decode(src) {
            Ok(frame) => Ok(frame),
            Err(err) => {
                self.corrupted = true;
                warn!(error = %err, buffered = src.len(), "rejecting inbound frame");
                Err(err)
            }
        }
    }

    fn try_decode(&self, src: &mut BytesMut) -> Result<Option<BytesMut>, FrameError> {
        // Not enough yet to hold BeginString plus the BodyLength tag.
        if src.len() <= MIN_HEADER_BYTES {
            return Ok(None);
        }

        if !scan::starts_with_at(src, 0, BEGIN_STRING_PREFIX)
            && !scan::starts_with_at(src, 0, BEGIN_STRING_PREFIX_FIXT)
        {
            return Err(FrameError::InvalidBeginString);
        }

        // End of tag 8's value.
        let Some(first_soh) = scan::find_soh(src, 0) else {
            if src.len() > MIN_HEADER_BYTES + MAX_BODY_LENGTH_DIGITS {
                return Err(FrameError::BodyLengthUnterminated {
                    searched: src.len(),
                });
            }
            return Ok(None);
        };

        // BodyLength (9) must be the second field.
        let length_tag_at = first_soh + 1;
        if src.len() < length_tag_at + 2 {
            return Ok(None);
        }
        if !scan::starts_with_at(src, length_tag_at, b"9=") {
            return Err(FrameError::MissingBodyLength);
        }

        // Read the digits, bounded to the digit budget plus the separator.
        let digits_at = length_tag_at + 2;
        let window_end = src.len().min(digits_at + MAX_BODY_LENGTH_DIGITS + 1);
        let Some(length_soh) = scan::find_soh(&src[..window_end], digits_at) else {
            if src.len() > digits_at + MAX_BODY_LENGTH_DIGITS {
                return Err(FrameError::BodyLengthUnterminated {
                    searched: MAX_BODY_LENGTH_DIGITS,
                });
            }
            return Ok(None);
        };
        let body_length = scan::parse_uint(&src[digits_at..length_soh])
            .ok_or(FrameError::InvalidBodyLength)? as usize;

        // BodyLength counts from after its own separator up to the CheckSum tag.
        let body_at = length_soh + 1;
        let total_length = body_at + body_length + TRAILER_LENGTH;
        if total_length > self.max_frame_length {
            return Err(FrameError::FrameTooLong {
                length: total_length,
                max: self.max_frame_length,
            });
        }

        if src.len() < total_length {
            src.reserve(total_length - src.len());
            return Ok(None);
        }

        // The span is complete: the trailer must carry a correct checksum.
        let checksum_at = total_length - TRAILER_LENGTH;
        if !scan::starts_with_at(src, checksum_at, CHECKSUM_PREFIX) {
            return Err(FrameError::MissingChecksum);
        }
        let declared = parse_checksum(&src[checksum_at + 3..checksum_at + 6])
            .ok_or(FrameError::InvalidChecksum)?;
        let calculated = calculate_checksum(&src[..checksum_at]);
        if calculated != declared {
            return Err(FrameError::ChecksumMismatch {
                calculated,
                declared,
            });
        }

        Ok(Some(src.split_to(total_length)))
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Best-effort extraction of MsgSeqNum (34) from a frame that cannot be
/// parsed normally, so a host can still report which sequence number a
/// corrupt frame carried.
#[must_use]
pub fn extract_seq_num(bytes: &[u8]) -> Option<u64> {
    let tag_at = memchr::memmem::find(bytes, b"\x0134=")?;
    let value_at = tag_at + 4;
    let value_end = scan::find_soh(bytes, value_at)?;
    scan::parse_uint(&bytes[value_at..value_end])
}
