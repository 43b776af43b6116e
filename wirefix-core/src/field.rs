/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Field types for FIX protocol messages.
//!
//! This module provides:
//! - [`FieldTag`]: Type-safe wrapper for FIX field tag numbers
//! - [`FieldValue`]: Field value bytes, or the wildcard used for matching
//! - [`Field`]: An owned tag/value pair, the unit of a [`FixMessage`]
//!
//! [`FixMessage`]: crate::message::FixMessage

use crate::error::DecodeError;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// FIX field tag number.
///
/// Tags are positive integers that identify fields within a FIX message.
/// Standard tags are defined in the FIX specification (1-5000 range),
/// while user-defined tags use the 5001+ range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct FieldTag(u32);

impl FieldTag {
    /// Creates a new field tag.
    ///
    /// # Arguments
    /// * `tag` - The tag number (must be > 0)
    #[inline]
    #[must_use]
    pub const fn new(tag: u32) -> Self {
        Self(tag)
    }

    /// Returns the raw tag number.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns true if this is a standard FIX tag (1-5000).
    #[inline]
    #[must_use]
    pub const fn is_standard(self) -> bool {
        self.0 >= 1 && self.0 <= 5000
    }
}

impl From<u32> for FieldTag {
    fn from(tag: u32) -> Self {
        Self(tag)
    }
}

impl From<FieldTag> for u32 {
    fn from(tag: FieldTag) -> Self {
        tag.0
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Value of a FIX field.
///
/// `Bytes` carries the actual wire bytes of the value. `Any` is a wildcard
/// used only when matching fields against each other (see
/// [`FieldSelector`](crate::message::FieldSelector)); it never appears in a
/// decoded message and the encoder rejects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Concrete value bytes, without delimiters.
    Bytes(Bytes),
    /// Matches any value for the field's tag.
    Any,
}

impl FieldValue {
    /// Returns the value bytes, or `None` for the wildcard.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            Self::Any => None,
        }
    }

    /// Returns true if this is the wildcard value.
    #[inline]
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl From<Bytes> for FieldValue {
    fn from(b: Bytes) -> Self {
        Self::Bytes(b)
    }
}

impl From<&[u8]> for FieldValue {
    fn from(b: &[u8]) -> Self {
        Self::Bytes(Bytes::copy_from_slice(b))
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Bytes(Bytes::copy_from_slice(s.as_bytes()))
    }
}

/// An owned FIX field: a tag paired with its value bytes.
///
/// Two fields are equal iff tag and value bytes match exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    tag: u32,
    value: FieldValue,
}

impl Field {
    /// Creates a field from a tag and any value convertible to bytes.
    #[must_use]
    pub fn new(tag: u32, value: impl Into<FieldValue>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }

    /// Creates a wildcard field that matches any value for `tag`.
    ///
    /// Wildcard fields are for matching only and cannot be encoded.
    #[must_use]
    pub const fn wildcard(tag: u32) -> Self {
        Self {
            tag,
            value: FieldValue::Any,
        }
    }

    /// Creates a field carrying an unsigned integer value.
    #[must_use]
    pub fn uint(tag: u32, value: u64) -> Self {
        Self::new(tag, value.to_string().as_str())
    }

    /// Creates a field carrying a signed integer value.
    #[must_use]
    pub fn int(tag: u32, value: i64) -> Self {
        Self::new(tag, value.to_string().as_str())
    }

    /// Creates a field carrying a boolean value (FIX 'Y'/'N').
    #[must_use]
    pub fn boolean(tag: u32, value: bool) -> Self {
        Self::new(tag, if value { "Y" } else { "N" })
    }

    /// Returns the field tag.
    #[inline]
    #[must_use]
    pub const fn tag(&self) -> u32 {
        self.tag
    }

    /// Returns the field value.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Returns true if this field carries the wildcard value.
    #[inline]
    #[must_use]
    pub const fn is_wildcard(&self) -> bool {
        self.value.is_any()
    }

    /// Returns true if `other` is selected by this field.
    ///
    /// Tags must match; a wildcard value on `self` matches any value.
    #[must_use]
    pub fn matches(&self, other: &Field) -> bool {
        self.tag == other.tag && (self.value.is_any() || self.value == other.value)
    }

    /// Returns the value as a string slice.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidFieldValue` for wildcards and
    /// `DecodeError::InvalidUtf8` if the value is not valid UTF-8.
    pub fn as_str(&self) -> Result<&str, DecodeError> {
        let bytes = self
            .value
            .as_bytes()
            .ok_or_else(|| DecodeError::InvalidFieldValue {
                tag: self.tag,
                reason: "wildcard value has no bytes".to_string(),
            })?;
        std::str::from_utf8(bytes).map_err(DecodeError::from)
    }

    /// Parses the value as the specified type.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidFieldValue` if parsing fails.
    pub fn parse<T: std::str::FromStr>(&self) -> Result<T, DecodeError> {
        let s = self.as_str()?;
        s.parse().map_err(|_| DecodeError::InvalidFieldValue {
            tag: self.tag,
            reason: format!("failed to parse '{}' as {}", s, std::any::type_name::<T>()),
        })
    }

    /// Returns the value as a u64.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidFieldValue` if the value is not a valid integer.
    pub fn as_u64(&self) -> Result<u64, DecodeError> {
        self.parse()
    }

    /// Returns the value as a bool (FIX uses 'Y'/'N').
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidFieldValue` if the value is not 'Y' or 'N'.
    pub fn as_bool(&self) -> Result<bool, DecodeError> {
        match self.value.as_bytes() {
            Some(b"Y") => Ok(true),
            Some(b"N") => Ok(false),
            _ => Err(DecodeError::InvalidFieldValue {
                tag: self.tag,
                reason: "expected 'Y' or 'N'".to_string(),
            }),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            FieldValue::Bytes(b) => write!(f, "{}={}", self.tag, String::from_utf8_lossy(b)),
            FieldValue::Any => write!(f, "{}=*", self.tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_tag() {
        let tag = FieldTag::new(35);
        assert_eq!(tag.value(), 35);
        assert!(tag.is_standard());
        assert!(!FieldTag::new(5001).is_standard());
    }

    #[test]
    fn test_field_equality() {
        assert_eq!(Field::new(49, "SENDER"), Field::new(49, "SENDER"));
        assert_ne!(Field::new(49, "SENDER"), Field::new(49, "TARGET"));
        assert_ne!(Field::new(49, "SENDER"), Field::new(56, "SENDER"));
    }

    #[test]
    fn test_field_typed_constructors() {
        assert_eq!(Field::uint(34, 42).as_str().unwrap(), "42");
        assert_eq!(Field::int(98, 0).as_str().unwrap(), "0");
        assert!(Field::boolean(141, true).as_bool().unwrap());
        assert!(!Field::boolean(141, false).as_bool().unwrap());
    }

    #[test]
    fn test_field_wildcard_matching() {
        let any = Field::wildcard(35);
        assert!(any.is_wildcard());
        assert!(any.matches(&Field::new(35, "A")));
        assert!(any.matches(&Field::new(35, "D")));
        assert!(!any.matches(&Field::new(34, "A")));

        let exact = Field::new(35, "A");
        assert!(exact.matches(&Field::new(35, "A")));
        assert!(!exact.matches(&Field::new(35, "D")));
    }

    #[test]
    fn test_field_wildcard_has_no_bytes() {
        let any = Field::wildcard(35);
        assert!(any.as_str().is_err());
        assert!(any.value().as_bytes().is_none());
    }

    #[test]
    fn test_field_as_u64() {
        assert_eq!(Field::new(34, "12345").as_u64().unwrap(), 12345);
        assert!(Field::new(34, "abc").as_u64().is_err());
    }

    #[test]
    fn test_field_invalid_utf8() {
        let field = Field::new(1, &[0xFF, 0xFE][..]);
        assert!(field.as_str().is_err());
    }
}
