/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Message model for FIX protocol.
//!
//! This module provides:
//! - [`MsgType`]: Enumeration of session-level FIX message types
//! - [`FixMessage`]: Ordered, owned field collection
//! - [`MessageSelector`] / [`FieldSelector`]: message classification hooks
//!
//! A decoded `FixMessage` always carries BeginString (8) first, BodyLength
//! (9) second, and CheckSum (10) last. An outbound message under
//! construction starts empty; BodyLength and CheckSum are computed at encode
//! time, never stored by hand.

use crate::field::Field;
use crate::tags;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Session-level FIX message types.
///
/// The application-message catalog is out of scope for this engine core;
/// anything beyond the administrative set round-trips as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MsgType {
    /// Heartbeat (0).
    #[default]
    Heartbeat,
    /// Test Request (1).
    TestRequest,
    /// Resend Request (2).
    ResendRequest,
    /// Reject (3).
    Reject,
    /// Sequence Reset (4).
    SequenceReset,
    /// Logout (5).
    Logout,
    /// Logon (A).
    Logon,
    /// Any other message type, preserved verbatim.
    Custom(String),
}

impl std::str::FromStr for MsgType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "0" => Self::Heartbeat,
            "1" => Self::TestRequest,
            "2" => Self::ResendRequest,
            "3" => Self::Reject,
            "4" => Self::SequenceReset,
            "5" => Self::Logout,
            "A" => Self::Logon,
            other => Self::Custom(other.to_string()),
        })
    }
}

impl MsgType {
    /// Returns the wire representation of this message type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Heartbeat => "0",
            Self::TestRequest => "1",
            Self::ResendRequest => "2",
            Self::Reject => "3",
            Self::SequenceReset => "4",
            Self::Logout => "5",
            Self::Logon => "A",
            Self::Custom(s) => s.as_str(),
        }
    }

    /// Returns true if this is an administrative message.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An ordered collection of FIX fields.
///
/// Lookup is by tag; tag uniqueness across header, body, and trailer is
/// assumed (repeating groups are out of scope for this core).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixMessage {
    fields: SmallVec<[Field; 16]>,
}

impl FixMessage {
    /// Creates an empty message.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fields: SmallVec::new(),
        }
    }

    /// Appends a field, preserving insertion order.
    pub fn push_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Sets a field value: replaces the existing field with the same tag in
    /// place, or appends when the tag is not yet present.
    pub fn set_field(&mut self, field: Field) {
        match self.fields.iter_mut().find(|f| f.tag() == field.tag()) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    /// Gets the first field with the given tag.
    #[must_use]
    pub fn get_field(&self, tag: u32) -> Option<&Field> {
        self.fields.iter().find(|f| f.tag() == tag)
    }

    /// Gets a field value as a string.
    #[must_use]
    pub fn get_field_str(&self, tag: u32) -> Option<&str> {
        self.get_field(tag).and_then(|f| f.as_str().ok())
    }

    /// Returns true if a field with the given tag is present.
    #[must_use]
    pub fn contains(&self, tag: u32) -> bool {
        self.get_field(tag).is_some()
    }

    /// Returns an iterator over all fields in order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Returns the number of fields in the message.
    #[inline]
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the message has no fields.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the BeginString value, when present.
    #[must_use]
    pub fn begin_string(&self) -> Option<&str> {
        self.get_field_str(tags::BEGIN_STRING)
    }

    /// Returns the parsed MsgType (35), when present.
    #[must_use]
    pub fn msg_type(&self) -> Option<MsgType> {
        self.get_field_str(tags::MSG_TYPE)
            .map(|s| s.parse().expect("MsgType parse is infallible"))
    }
}

impl FromIterator<Field> for FixMessage {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Capability interface for classifying messages.
pub trait MessageSelector {
    /// Returns true if the message is selected.
    fn is_selected(&self, msg: &FixMessage) -> bool;
}

/// Selects messages carrying a matching field.
///
/// With a concrete field, both tag and value bytes must match. With a
/// wildcard field ([`Field::wildcard`]), any message containing the tag is
/// selected regardless of its value.
#[derive(Debug, Clone)]
pub struct FieldSelector {
    field: Field,
}

impl FieldSelector {
    /// Creates a selector matching the given field exactly.
    #[must_use]
    pub fn new(field: Field) -> Self {
        Self { field }
    }

    /// Creates a selector matching any value for `tag`.
    #[must_use]
    pub fn tag_only(tag: u32) -> Self {
        Self {
            field: Field::wildcard(tag),
        }
    }
}

impl MessageSelector for FieldSelector {
    fn is_selected(&self, msg: &FixMessage) -> bool {
        msg.get_field(self.field.tag())
            .is_some_and(|found| self.field.matches(found))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msg_type_round_trip() {
        assert_eq!("0".parse::<MsgType>().unwrap(), MsgType::Heartbeat);
        assert_eq!("A".parse::<MsgType>().unwrap(), MsgType::Logon);
        assert_eq!(MsgType::Logon.as_str(), "A");
        assert_eq!(MsgType::Logout.as_str(), "5");
    }

    #[test]
    fn test_msg_type_custom() {
        let custom: MsgType = "D".parse().unwrap();
        assert!(matches!(custom, MsgType::Custom(_)));
        assert_eq!(custom.as_str(), "D");
        assert!(!custom.is_admin());
        assert!(MsgType::Heartbeat.is_admin());
    }

    #[test]
    fn test_message_ordering_and_lookup() {
        let mut msg = FixMessage::new();
        msg.push_field(Field::new(8, "FIX.4.4"));
        msg.push_field(Field::new(35, "A"));
        msg.push_field(Field::new(49, "SENDER"));

        assert_eq!(msg.field_count(), 3);
        assert_eq!(msg.begin_string(), Some("FIX.4.4"));
        assert_eq!(msg.msg_type(), Some(MsgType::Logon));
        assert_eq!(msg.get_field_str(49), Some("SENDER"));
        assert!(msg.get_field(56).is_none());

        let tags: Vec<u32> = msg.fields().map(Field::tag).collect();
        assert_eq!(tags, vec![8, 35, 49]);
    }

    #[test]
    fn test_set_field_replaces_in_place() {
        let mut msg = FixMessage::new();
        msg.push_field(Field::new(35, "A"));
        msg.push_field(Field::new(49, "SENDER"));

        msg.set_field(Field::new(35, "5"));
        assert_eq!(msg.field_count(), 2);
        assert_eq!(msg.msg_type(), Some(MsgType::Logout));
        // order preserved
        let tags: Vec<u32> = msg.fields().map(Field::tag).collect();
        assert_eq!(tags, vec![35, 49]);

        msg.set_field(Field::uint(34, 7));
        assert_eq!(msg.field_count(), 3);
    }

    #[test]
    fn test_field_selector_exact() {
        let msg: FixMessage = [Field::new(35, "A"), Field::new(49, "SENDER")]
            .into_iter()
            .collect();

        assert!(FieldSelector::new(Field::new(35, "A")).is_selected(&msg));
        assert!(!FieldSelector::new(Field::new(35, "D")).is_selected(&msg));
        assert!(!FieldSelector::new(Field::new(56, "SENDER")).is_selected(&msg));
    }

    #[test]
    fn test_field_selector_tag_only() {
        let msg: FixMessage = [Field::new(35, "A"), Field::new(49, "SENDER")]
            .into_iter()
            .collect();

        assert!(FieldSelector::tag_only(35).is_selected(&msg));
        assert!(FieldSelector::tag_only(49).is_selected(&msg));
        assert!(!FieldSelector::tag_only(56).is_selected(&msg));
    }
}
