/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! FIX message encoder.
//!
//! The encoder accumulates body fields in tag=value format and stamps
//! BeginString (8), BodyLength (9), and CheckSum (10) when the message is
//! finished, so outbound bytes always leave with a consistent length and
//! checksum.

use crate::checksum::{calculate_checksum, format_checksum};
use crate::scan::SOH;
use bytes::{BufMut, BytesMut};
use wirefix_core::error::EncodeError;
use wirefix_core::field::Field;
use wirefix_core::message::FixMessage;
use wirefix_core::tags;

/// FIX message encoder.
///
/// Fields appended through `put_*` form the message body, starting with
/// MsgType (35) by convention; [`Encoder::finish`] wraps the body in the
/// standard header and trailer.
#[derive(Debug)]
pub struct Encoder {
    /// Buffer for the message body (between BodyLength and CheckSum).
    body: BytesMut,
    /// The BeginString value (e.g. "FIX.4.4").
    begin_string: String,
}

impl Encoder {
    /// Creates a new encoder with the specified BeginString.
    #[must_use]
    pub fn new(begin_string: impl Into<String>) -> Self {
        Self {
            body: BytesMut::with_capacity(256),
            begin_string: begin_string.into(),
        }
    }

    /// Appends a field with a string value.
    #[inline]
    pub fn put_str(&mut self, tag: u32, value: &str) {
        self.put_raw(tag, value.as_bytes());
    }

    /// Appends a field with a signed integer value.
    #[inline]
    pub fn put_int(&mut self, tag: u32, value: i64) {
        let mut buf = itoa::Buffer::new();
        self.put_raw(tag, buf.format(value).as_bytes());
    }

    /// Appends a field with an unsigned integer value.
    #[inline]
    pub fn put_uint(&mut self, tag: u32, value: u64) {
        let mut buf = itoa::Buffer::new();
        self.put_raw(tag, buf.format(value).as_bytes());
    }

    /// Appends a field with a boolean value (Y/N).
    #[inline]
    pub fn put_bool(&mut self, tag: u32, value: bool) {
        self.put_raw(tag, if value { b"Y" } else { b"N" });
    }

    /// Appends a field with a single character value.
    #[inline]
    pub fn put_char(&mut self, tag: u32, value: char) {
        let mut buf = [0u8; 4];
        let s = value.encode_utf8(&mut buf);
        self.put_raw(tag, s.as_bytes());
    }

    /// Appends an owned [`Field`].
    ///
    /// # Errors
    /// Returns `EncodeError::WildcardValue` for wildcard fields, which exist
    /// only for matching and must never reach the wire.
    pub fn put_field(&mut self, field: &Field) -> Result<(), EncodeError> {
        let value = field
            .value()
            .as_bytes()
            .ok_or(EncodeError::WildcardValue { tag: field.tag() })?;
        self.put_raw(field.tag(), value);
        Ok(())
    }

    /// Appends a field with raw value bytes.
    #[inline]
    pub fn put_raw(&mut self, tag: u32, value: &[u8]) {
        let mut tag_buf = itoa::Buffer::new();
        self.body.put_slice(tag_buf.format(tag).as_bytes());
        self.body.put_u8(b'=');
        self.body.put_slice(value);
        self.body.put_u8(SOH);
    }

    /// Finalizes the message and returns the complete encoded bytes.
    ///
    /// Prepends `8=<BeginString><SOH>9=<BodyLength><SOH>`, then appends
    /// `10=<NNN><SOH>` computed over everything before it.
    #[must_use]
    pub fn finish(self) -> BytesMut {
        let body_len = self.body.len();

        let mut message = BytesMut::with_capacity(self.begin_string.len() + body_len + 24);
        message.put_slice(b"8=");
        message.put_slice(self.begin_string.as_bytes());
        message.put_u8(SOH);
        message.put_slice(b"9=");
        let mut len_buf = itoa::Buffer::new();
        message.put_slice(len_buf.format(body_len).as_bytes());
        message.put_u8(SOH);
        message.put_slice(&self.body);

        let checksum = calculate_checksum(&message);
        message.put_slice(b"10=");
        message.put_slice(&format_checksum(checksum));
        message.put_u8(SOH);

        message
    }

    /// Returns the current body length in bytes.
    #[inline]
    #[must_use]
    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    /// Clears the encoder for reuse with the same BeginString.
    #[inline]
    pub fn clear(&mut self) {
        self.body.clear();
    }
}

/// Serializes a [`FixMessage`] to wire format.
///
/// The message must carry a BeginString (8) field. Any stored BodyLength (9)
/// or CheckSum (10) fields are ignored and regenerated, so a decoded message
/// re-encodes to consistent bytes and an outbound message never ships a stale
/// length or checksum.
///
/// # Errors
/// Returns `EncodeError::MissingRequiredField` when BeginString is absent and
/// `EncodeError::WildcardValue` if any field carries the wildcard value.
pub fn encode_message(msg: &FixMessage) -> Result<BytesMut, EncodeError> {
    let begin_string = msg
        .get_field(tags::BEGIN_STRING)
        .ok_or(EncodeError::MissingRequiredField {
            tag: tags::BEGIN_STRING,
        })?;
    let begin_string = begin_string
        .value()
        .as_bytes()
        .ok_or(EncodeError::WildcardValue {
            tag: tags::BEGIN_STRING,
        })?;
    let begin_string =
        std::str::from_utf8(begin_string).map_err(|_| EncodeError::InvalidFieldValue {
            tag: tags::BEGIN_STRING,
            reason: "begin string must be valid utf-8".to_string(),
        })?;

    let mut encoder = Encoder::new(begin_string);
    for field in msg.fields() {
        match field.tag() {
            tags::BEGIN_STRING | tags::BODY_LENGTH | tags::CHECK_SUM => {}
            _ => encoder.put_field(field)?,
        }
    }
    Ok(encoder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::parse_checksum;

    #[test]
    fn test_encoder_basic() {
        let mut encoder = Encoder::new("FIX.4.4");
        encoder.put_str(35, "0");

        let message = encoder.finish();
        let msg_str = String::from_utf8_lossy(&message);

        assert!(msg_str.starts_with("8=FIX.4.4\x019=5\x01"));
        assert!(msg_str.contains("35=0\x01"));
        assert!(msg_str.ends_with('\x01'));
    }

    #[test]
    fn test_encoder_stamps_correct_checksum() {
        let mut encoder = Encoder::new("FIX.4.4");
        encoder.put_str(35, "A");
        encoder.put_uint(34, 1);

        let message = encoder.finish();
        let trailer_start = message.len() - 7;
        assert_eq!(&message[trailer_start..trailer_start + 3], b"10=");

        let declared = parse_checksum(&message[trailer_start + 3..trailer_start + 6]).unwrap();
        let calculated = calculate_checksum(&message[..trailer_start]);
        assert_eq!(declared, calculated);
    }

    #[test]
    fn test_encoder_typed_fields() {
        let mut encoder = Encoder::new("FIX.4.4");
        encoder.put_int(98, 0);
        encoder.put_uint(108, 30);
        encoder.put_bool(141, true);
        encoder.put_char(54, '1');

        let message = encoder.finish();
        let msg_str = String::from_utf8_lossy(&message);

        assert!(msg_str.contains("98=0\x01"));
        assert!(msg_str.contains("108=30\x01"));
        assert!(msg_str.contains("141=Y\x01"));
        assert!(msg_str.contains("54=1\x01"));
    }

    #[test]
    fn test_encoder_rejects_wildcard_field() {
        let mut encoder = Encoder::new("FIX.4.4");
        let err = encoder.put_field(&Field::wildcard(35)).unwrap_err();
        assert_eq!(err, EncodeError::WildcardValue { tag: 35 });
    }

    #[test]
    fn test_encoder_clear() {
        let mut encoder = Encoder::new("FIX.4.4");
        encoder.put_str(35, "0");
        assert!(encoder.body_len() > 0);

        encoder.clear();
        assert_eq!(encoder.body_len(), 0);
    }

    #[test]
    fn test_encode_message_regenerates_length_and_checksum() {
        let mut msg = FixMessage::new();
        msg.push_field(Field::new(8, "FIX.4.4"));
        // stale values that must be ignored
        msg.push_field(Field::new(9, "9999"));
        msg.push_field(Field::new(35, "A"));
        msg.push_field(Field::new(10, "000"));

        let bytes = encode_message(&msg).unwrap();
        let msg_str = String::from_utf8_lossy(&bytes);
        assert!(msg_str.starts_with("8=FIX.4.4\x019=5\x0135=A\x0110="));

        let trailer_start = bytes.len() - 7;
        let declared = parse_checksum(&bytes[trailer_start + 3..trailer_start + 6]).unwrap();
        assert_eq!(declared, calculate_checksum(&bytes[..trailer_start]));
    }

    #[test]
    fn test_encode_message_requires_begin_string() {
        let mut msg = FixMessage::new();
        msg.push_field(Field::new(35, "A"));

        let err = encode_message(&msg).unwrap_err();
        assert_eq!(err, EncodeError::MissingRequiredField { tag: 8 });
    }
}
