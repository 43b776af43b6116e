/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Core value types for FIX protocol operations.
//!
//! This module provides:
//! - [`SeqNum`]: Sequence number wrapper
//! - [`Timestamp`]: FIX-formatted timestamp with nanosecond precision
//! - [`CompId`]: Component identifier (SenderCompID, TargetCompID)
//! - [`Clock`]: Injectable time source for deterministic header population

use arrayvec::ArrayString;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length for CompID strings in bytes.
pub const COMP_ID_MAX_LEN: usize = 32;

/// FIX message sequence number.
///
/// Sequence numbers are unsigned 64-bit integers that identify messages
/// within a FIX session. They start at 1 and increment for each message sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct SeqNum(u64);

impl SeqNum {
    /// Creates a new sequence number.
    #[inline]
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw sequence number value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns the next sequence number.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Checks if this sequence number is valid (>= 1).
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 >= 1
    }
}

impl Default for SeqNum {
    fn default() -> Self {
        Self(1)
    }
}

impl From<u64> for SeqNum {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<SeqNum> for u64 {
    fn from(seq: SeqNum) -> Self {
        seq.0
    }
}

impl fmt::Display for SeqNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// FIX protocol timestamp with nanosecond precision.
///
/// SendingTime (52) and related fields are formatted as
/// `YYYYMMDD-HH:MM:SS.sss`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    /// Nanoseconds since Unix epoch (1970-01-01 00:00:00 UTC).
    nanos_since_epoch: u64,
}

impl Timestamp {
    /// Creates a timestamp from nanoseconds since Unix epoch.
    #[inline]
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self {
            nanos_since_epoch: nanos,
        }
    }

    /// Creates a timestamp from milliseconds since Unix epoch.
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self {
            nanos_since_epoch: millis * 1_000_000,
        }
    }

    /// Returns the current UTC timestamp.
    #[inline]
    #[must_use]
    pub fn now() -> Self {
        let dt = Utc::now();
        Self {
            nanos_since_epoch: dt.timestamp_nanos_opt().unwrap_or(0) as u64,
        }
    }

    /// Returns nanoseconds since Unix epoch.
    #[inline]
    #[must_use]
    pub const fn as_nanos(self) -> u64 {
        self.nanos_since_epoch
    }

    /// Returns milliseconds since Unix epoch.
    #[inline]
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.nanos_since_epoch / 1_000_000
    }

    /// Converts to a chrono `DateTime<Utc>`.
    #[must_use]
    pub fn to_datetime(self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.nanos_since_epoch as i64)
    }

    /// Formats the timestamp in FIX format with millisecond precision.
    ///
    /// Format: `YYYYMMDD-HH:MM:SS.sss`
    #[must_use]
    pub fn format_millis(self) -> ArrayString<21> {
        let dt = self.to_datetime();
        let mut buf = ArrayString::new();
        let _ = std::fmt::write(
            &mut buf,
            format_args!("{}", dt.format("%Y%m%d-%H:%M:%S%.3f")),
        );
        buf
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self {
            nanos_since_epoch: dt.timestamp_nanos_opt().unwrap_or(0) as u64,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_millis())
    }
}

/// Injectable time source.
///
/// Session header population reads the clock through this trait so outbound
/// message construction is deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current timestamp.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time source backed by the system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

/// Component identifier for FIX sessions.
///
/// Used for SenderCompID (tag 49), TargetCompID (tag 56), and related fields.
/// Maximum length is 32 characters as per FIX specification.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct CompId(ArrayString<COMP_ID_MAX_LEN>);

impl CompId {
    /// Creates a new CompId from a string slice.
    ///
    /// # Returns
    /// `Some(CompId)` if the string fits within the maximum length, `None` otherwise.
    #[must_use]
    pub fn new(s: &str) -> Option<Self> {
        ArrayString::from(s).ok().map(Self)
    }

    /// Returns the CompId as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the length of the CompId in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the CompId is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for CompId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CompId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CompId {
    type Err = arrayvec::CapacityError<()>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArrayString::try_from(s)
            .map(Self)
            .map_err(|_| arrayvec::CapacityError::new(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_num_operations() {
        let seq = SeqNum::new(5);
        assert_eq!(seq.value(), 5);
        assert_eq!(seq.next().value(), 6);
        assert!(seq.is_valid());
        assert!(!SeqNum::new(0).is_valid());
    }

    #[test]
    fn test_seq_num_default() {
        assert_eq!(SeqNum::default().value(), 1);
    }

    #[test]
    fn test_timestamp_conversions() {
        let ts = Timestamp::from_millis(1000);
        assert_eq!(ts.as_millis(), 1000);
        assert_eq!(ts.as_nanos(), 1_000_000_000);
    }

    #[test]
    fn test_timestamp_format() {
        let ts = Timestamp::from_millis(0);
        let formatted = ts.format_millis();
        assert_eq!(formatted.as_str(), "19700101-00:00:00.000");
    }

    #[test]
    fn test_fixed_clock_is_deterministic() {
        let clock = FixedClock(Timestamp::from_millis(86_400_000));
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().format_millis().as_str(), "19700102-00:00:00.000");
    }

    #[test]
    fn test_comp_id() {
        let id = CompId::new("SENDER").unwrap();
        assert_eq!(id.as_str(), "SENDER");
        assert_eq!(id.len(), 6);
        assert!(!id.is_empty());
    }

    #[test]
    fn test_comp_id_too_long() {
        let long_str = "A".repeat(COMP_ID_MAX_LEN + 1);
        assert!(CompId::new(&long_str).is_none());
    }
}
