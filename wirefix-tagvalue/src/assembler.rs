/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Visitor that assembles an owned [`FixMessage`] from decode events.
//!
//! The assembler copies field values out of the decode buffer, so the
//! resulting message outlives the frame it was parsed from. Reported
//! violations are collected rather than acted on; the owning connection
//! decides whether a message with errors is usable.

use crate::decoder::MessageVisitor;
use crate::scan;
use wirefix_core::error::DecodeError;
use wirefix_core::field::Field;
use wirefix_core::message::FixMessage;

/// Collects decode events into a [`FixMessage`] plus any reported errors.
#[derive(Debug, Default)]
pub struct MessageAssembler {
    message: FixMessage,
    errors: Vec<(usize, DecodeError)>,
}

impl MessageAssembler {
    /// Creates an empty assembler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if any violation was reported during decoding.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns the reported violations with their byte offsets.
    #[must_use]
    pub fn errors(&self) -> &[(usize, DecodeError)] {
        &self.errors
    }

    /// Returns the assembled message, or the first reported error.
    ///
    /// # Errors
    /// Returns the first `DecodeError` reported by the decoder.
    pub fn into_message(self) -> Result<FixMessage, DecodeError> {
        match self.errors.into_iter().next() {
            Some((_, error)) => Err(error),
            None => Ok(self.message),
        }
    }

    /// Returns the assembled message and all reported errors, leaving the
    /// accept/reject decision to the caller.
    #[must_use]
    pub fn into_parts(self) -> (FixMessage, Vec<(usize, DecodeError)>) {
        (self.message, self.errors)
    }
}

impl MessageVisitor for MessageAssembler {
    fn on_field(&mut self, buffer: &[u8], tag_offset: usize, tag_len: usize, value_len: usize) {
        let tag_bytes = &buffer[tag_offset..tag_offset + tag_len];
        let Some(tag) = scan::parse_tag(tag_bytes) else {
            self.errors.push((
                tag_offset,
                DecodeError::InvalidTag(String::from_utf8_lossy(tag_bytes).into_owned()),
            ));
            return;
        };
        let value_offset = tag_offset + tag_len + 1;
        self.message.push_field(Field::new(
            tag,
            &buffer[value_offset..value_offset + value_len],
        ));
    }

    fn on_error(&mut self, offset: usize, error: DecodeError) {
        self.errors.push((offset, error));
    }
}
