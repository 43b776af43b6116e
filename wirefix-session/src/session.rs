/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Per-connection session state and outbound message construction.
//!
//! A [`Session`] owns the configuration, sequence counters, and lifecycle
//! state for one FIX conversation. It constructs administrative messages
//! with a fully populated standard header; sending them is the transport
//! collaborator's job. Time is read through the injected [`Clock`] so
//! construction is deterministic under test.

use crate::config::SessionConfig;
use crate::sequence::{SequenceManager, SequenceResult};
use crate::state::SessionState;
use bytes::BytesMut;
use tracing::{debug, info};
use wirefix_core::error::{FixError, SessionError};
use wirefix_core::field::Field;
use wirefix_core::message::{FixMessage, MsgType};
use wirefix_core::tags;
use wirefix_core::types::Clock;
use wirefix_tagvalue::encoder::encode_message;

/// Per-connection FIX session.
///
/// Owned exclusively by its connection's processing context; never shared
/// across connections.
pub struct Session {
    config: SessionConfig,
    sequence: SequenceManager,
    clock: Box<dyn Clock>,
    state: SessionState,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("sequence", &self.sequence)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates a session in the [`SessionState::Disconnected`] state.
    #[must_use]
    pub fn new(config: SessionConfig, clock: impl Clock + 'static) -> Self {
        Self {
            config,
            sequence: SequenceManager::new(),
            clock: Box::new(clock),
            state: SessionState::Disconnected,
        }
    }

    /// Returns the session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the sequence manager.
    #[must_use]
    pub fn sequence(&self) -> &SequenceManager {
        &self.sequence
    }

    /// Creates a message of the given type with a populated standard header:
    /// BeginString, MsgType, SenderCompID, TargetCompID, an allocated
    /// MsgSeqNum, and SendingTime from the injected clock.
    ///
    /// BodyLength and CheckSum are finalized at encode time.
    #[must_use]
    pub fn create_message(&self, msg_type: &MsgType) -> FixMessage {
        let mut msg = FixMessage::new();
        msg.set_field(Field::new(
            tags::BEGIN_STRING,
            self.config.begin_string.as_str(),
        ));
        msg.set_field(Field::new(tags::MSG_TYPE, msg_type.as_str()));
        msg.set_field(Field::new(
            tags::SENDER_COMP_ID,
            self.config.sender_comp_id.as_str(),
        ));
        msg.set_field(Field::new(
            tags::TARGET_COMP_ID,
            self.config.target_comp_id.as_str(),
        ));
        msg.set_field(Field::uint(
            tags::MSG_SEQ_NUM,
            self.sequence.allocate_sender_seq().value(),
        ));
        msg.set_field(Field::new(
            tags::SENDING_TIME,
            self.clock.now().format_millis().as_str(),
        ));
        msg
    }

    /// Constructs the Logon message and moves to [`SessionState::LogonSent`].
    ///
    /// Sets EncryptMethod (98) to 0 (no encryption) and HeartBtInt (108)
    /// from the configuration; when reset-on-logon is configured, both
    /// sequence counters are reset first and ResetSeqNumFlag (141) is set.
    /// Constructing the message does not send it.
    ///
    /// # Errors
    /// `SessionError::InvalidState` unless the session is disconnected.
    pub fn build_logon(&mut self) -> Result<FixMessage, SessionError> {
        self.expect_state(SessionState::Disconnected)?;

        if self.config.reset_on_logon {
            self.sequence.reset();
        }

        let mut msg = self.create_message(&MsgType::Logon);
        msg.set_field(Field::int(tags::ENCRYPT_METHOD, 0));
        msg.set_field(Field::uint(
            tags::HEART_BT_INT,
            self.config.heartbeat_interval_secs(),
        ));
        if self.config.reset_on_logon {
            msg.set_field(Field::boolean(tags::RESET_SEQ_NUM_FLAG, true));
        }

        info!(
            sender = %self.config.sender_comp_id,
            target = %self.config.target_comp_id,
            reset = self.config.reset_on_logon,
            "constructing Logon message"
        );
        self.state = SessionState::LogonSent;
        Ok(msg)
    }

    /// Constructs the Logon message and serializes it with finalized
    /// BodyLength and CheckSum, ready for a transport write.
    ///
    /// # Errors
    /// Propagates state and encoding failures.
    pub fn logon_bytes(&mut self) -> Result<BytesMut, FixError> {
        let msg = self.build_logon()?;
        Ok(encode_message(&msg)?)
    }

    /// Constructs the Logout message and moves to [`SessionState::LogoutSent`].
    ///
    /// # Errors
    /// `SessionError::InvalidState` unless the session is active.
    pub fn build_logout(&mut self) -> Result<FixMessage, SessionError> {
        self.expect_state(SessionState::Active)?;
        let msg = self.create_message(&MsgType::Logout);
        debug!(sender = %self.config.sender_comp_id, "constructing Logout message");
        self.state = SessionState::LogoutSent;
        Ok(msg)
    }

    /// Records the counterparty's Logon acknowledgement.
    ///
    /// # Errors
    /// `SessionError::InvalidState` unless a Logon is outstanding.
    pub fn on_logon_ack(&mut self) -> Result<(), SessionError> {
        self.expect_state(SessionState::LogonSent)?;
        self.state = SessionState::Active;
        Ok(())
    }

    /// Records the counterparty's Logout acknowledgement.
    ///
    /// # Errors
    /// `SessionError::InvalidState` unless a Logout is outstanding.
    pub fn on_logout_ack(&mut self) -> Result<(), SessionError> {
        self.expect_state(SessionState::LogoutSent)?;
        self.state = SessionState::Disconnected;
        Ok(())
    }

    /// Drops back to [`SessionState::Disconnected`] from any state, e.g. on
    /// transport failure.
    pub fn disconnect(&mut self) {
        self.state = SessionState::Disconnected;
    }

    /// Classifies an inbound MsgSeqNum without consuming it.
    #[must_use]
    pub fn validate_incoming(&self, seq: u64) -> SequenceResult {
        self.sequence.validate_incoming(seq)
    }

    /// Accepts an inbound MsgSeqNum, advancing the expected counter.
    ///
    /// # Errors
    /// `SessionError::SequenceGap` / `SessionError::SequenceTooLow` when the
    /// number does not match; the counter is left untouched in that case.
    pub fn accept_incoming(&self, seq: u64) -> Result<(), SessionError> {
        self.sequence.validate_incoming(seq).into_result()?;
        self.sequence.increment_target_seq();
        Ok(())
    }

    fn expect_state(&self, expected: SessionState) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                expected: expected.to_string(),
                current: self.state.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wirefix_core::types::{CompId, FixedClock, Timestamp};
    use wirefix_tagvalue::assembler::MessageAssembler;
    use wirefix_tagvalue::decoder::MessageDecoder;

    fn test_config() -> SessionConfig {
        SessionConfig::new(
            CompId::new("CLIENT").unwrap(),
            CompId::new("BROKER").unwrap(),
            "FIX.4.4",
        )
        .with_heartbeat_interval(Duration::from_secs(30))
    }

    fn test_clock() -> FixedClock {
        FixedClock(Timestamp::from_millis(0))
    }

    #[test]
    fn test_create_message_header_population() {
        let session = Session::new(test_config(), test_clock());
        let msg = session.create_message(&MsgType::Heartbeat);

        assert_eq!(msg.get_field_str(8), Some("FIX.4.4"));
        assert_eq!(msg.get_field_str(35), Some("0"));
        assert_eq!(msg.get_field_str(49), Some("CLIENT"));
        assert_eq!(msg.get_field_str(56), Some("BROKER"));
        assert_eq!(msg.get_field_str(34), Some("1"));
        assert_eq!(msg.get_field_str(52), Some("19700101-00:00:00.000"));
    }

    #[test]
    fn test_sequence_advances_per_message() {
        let session = Session::new(test_config(), test_clock());
        assert_eq!(
            session.create_message(&MsgType::Heartbeat).get_field_str(34),
            Some("1")
        );
        assert_eq!(
            session.create_message(&MsgType::Heartbeat).get_field_str(34),
            Some("2")
        );
    }

    #[test]
    fn test_build_logon_with_reset() {
        let config = test_config().with_reset_on_logon(true);
        let mut session = Session::new(config, test_clock());
        // pretend some traffic happened before the reset
        session.sequence().set_sender_seq(40);

        let msg = session.build_logon().unwrap();
        assert_eq!(msg.get_field_str(35), Some("A"));
        assert_eq!(msg.get_field_str(98), Some("0"));
        assert_eq!(msg.get_field_str(108), Some("30"));
        assert_eq!(msg.get_field_str(141), Some("Y"));
        // counters were reset before allocation
        assert_eq!(msg.get_field_str(34), Some("1"));
        assert_eq!(session.state(), SessionState::LogonSent);
    }

    #[test]
    fn test_build_logon_without_reset_omits_flag() {
        let mut session = Session::new(test_config(), test_clock());
        let msg = session.build_logon().unwrap();

        assert_eq!(msg.get_field_str(98), Some("0"));
        assert_eq!(msg.get_field_str(108), Some("30"));
        assert!(!msg.contains(141));
    }

    #[test]
    fn test_logon_bytes_round_trip() {
        let config = test_config().with_reset_on_logon(true);
        let mut session = Session::new(config, test_clock());
        let wire = session.logon_bytes().unwrap();

        // decoding the serialized logon must reproduce the fields with zero
        // reported errors, proving BodyLength and CheckSum were finalized
        let mut assembler = MessageAssembler::new();
        MessageDecoder::new().decode(&wire, &mut assembler);
        assert!(!assembler.has_errors());

        let decoded = assembler.into_message().unwrap();
        assert_eq!(decoded.msg_type(), Some(MsgType::Logon));
        assert_eq!(decoded.get_field_str(98), Some("0"));
        assert_eq!(decoded.get_field_str(108), Some("30"));
        assert_eq!(decoded.get_field_str(141), Some("Y"));

        let tags: Vec<u32> = decoded.fields().map(Field::tag).collect();
        assert_eq!(tags.first(), Some(&8));
        assert_eq!(tags.get(1), Some(&9));
        assert_eq!(tags.last(), Some(&10));
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut session = Session::new(test_config(), test_clock());
        assert!(session.state().is_disconnected());

        session.build_logon().unwrap();
        assert_eq!(session.state(), SessionState::LogonSent);

        session.on_logon_ack().unwrap();
        assert!(session.state().is_active());

        session.build_logout().unwrap();
        assert_eq!(session.state(), SessionState::LogoutSent);

        session.on_logout_ack().unwrap();
        assert!(session.state().is_disconnected());
    }

    #[test]
    fn test_logon_rejected_when_not_disconnected() {
        let mut session = Session::new(test_config(), test_clock());
        session.build_logon().unwrap();

        let err = session.build_logon().unwrap_err();
        assert!(matches!(err, SessionError::InvalidState { .. }));
    }

    #[test]
    fn test_accept_incoming_sequence() {
        let session = Session::new(test_config(), test_clock());
        session.accept_incoming(1).unwrap();
        session.accept_incoming(2).unwrap();

        assert_eq!(
            session.accept_incoming(5),
            Err(SessionError::SequenceGap {
                expected: 3,
                received: 5
            })
        );
        // a rejected message leaves the expected counter untouched
        session.accept_incoming(3).unwrap();
    }
}
