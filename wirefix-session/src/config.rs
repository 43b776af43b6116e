/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Session configuration.
//!
//! Configuration is a plain injected structure; no file format or CLI
//! belongs to this core.

use std::time::Duration;
use wirefix_core::error::SessionError;
use wirefix_core::types::CompId;

/// Default maximum wire length of a single inbound frame.
pub const DEFAULT_MAX_FRAME_LENGTH: usize = 9999;

/// Configuration for a FIX session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Sender CompID (tag 49).
    pub sender_comp_id: CompId,
    /// Target CompID (tag 56).
    pub target_comp_id: CompId,
    /// FIX version BeginString (e.g. "FIX.4.4").
    pub begin_string: String,
    /// Heartbeat interval negotiated at logon (tag 108).
    pub heartbeat_interval: Duration,
    /// Whether to reset sequence numbers on logon (tag 141).
    pub reset_on_logon: bool,
    /// Maximum total frame length accepted from the counterparty.
    pub max_frame_length: usize,
}

impl SessionConfig {
    /// Creates a configuration with required fields and defaults for the rest.
    #[must_use]
    pub fn new(
        sender_comp_id: CompId,
        target_comp_id: CompId,
        begin_string: impl Into<String>,
    ) -> Self {
        Self {
            sender_comp_id,
            target_comp_id,
            begin_string: begin_string.into(),
            heartbeat_interval: Duration::from_secs(30),
            reset_on_logon: false,
            max_frame_length: DEFAULT_MAX_FRAME_LENGTH,
        }
    }

    /// Sets the heartbeat interval.
    #[must_use]
    pub const fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    /// Sets whether to reset sequence numbers on logon.
    #[must_use]
    pub const fn with_reset_on_logon(mut self, reset: bool) -> Self {
        self.reset_on_logon = reset;
        self
    }

    /// Sets the maximum frame length.
    #[must_use]
    pub const fn with_max_frame_length(mut self, max: usize) -> Self {
        self.max_frame_length = max;
        self
    }

    /// Returns the heartbeat interval in whole seconds, as carried by tag 108.
    #[must_use]
    pub fn heartbeat_interval_secs(&self) -> u64 {
        self.heartbeat_interval.as_secs()
    }
}

/// Builder for session configuration.
#[derive(Debug, Default)]
pub struct SessionConfigBuilder {
    sender_comp_id: Option<CompId>,
    target_comp_id: Option<CompId>,
    begin_string: Option<String>,
    heartbeat_interval: Option<Duration>,
    reset_on_logon: bool,
    max_frame_length: Option<usize>,
}

impl SessionConfigBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sender CompID.
    #[must_use]
    pub fn sender_comp_id(mut self, id: CompId) -> Self {
        self.sender_comp_id = Some(id);
        self
    }

    /// Sets the target CompID.
    #[must_use]
    pub fn target_comp_id(mut self, id: CompId) -> Self {
        self.target_comp_id = Some(id);
        self
    }

    /// Sets the FIX version.
    #[must_use]
    pub fn begin_string(mut self, version: impl Into<String>) -> Self {
        self.begin_string = Some(version.into());
        self
    }

    /// Sets the heartbeat interval.
    #[must_use]
    pub const fn heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = Some(interval);
        self
    }

    /// Sets whether to reset on logon.
    #[must_use]
    pub const fn reset_on_logon(mut self, reset: bool) -> Self {
        self.reset_on_logon = reset;
        self
    }

    /// Sets the maximum frame length.
    #[must_use]
    pub const fn max_frame_length(mut self, max: usize) -> Self {
        self.max_frame_length = Some(max);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    /// Returns `SessionError::Configuration` when a required field is missing.
    pub fn build(self) -> Result<SessionConfig, SessionError> {
        let sender = self
            .sender_comp_id
            .ok_or_else(|| SessionError::Configuration("sender_comp_id is required".to_string()))?;
        let target = self
            .target_comp_id
            .ok_or_else(|| SessionError::Configuration("target_comp_id is required".to_string()))?;
        let begin_string = self.begin_string.unwrap_or_else(|| "FIX.4.4".to_string());

        let mut config = SessionConfig::new(sender, target, begin_string);
        if let Some(interval) = self.heartbeat_interval {
            config.heartbeat_interval = interval;
        }
        config.reset_on_logon = self.reset_on_logon;
        if let Some(max) = self.max_frame_length {
            config.max_frame_length = max;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_new() {
        let sender = CompId::new("SENDER").unwrap();
        let target = CompId::new("TARGET").unwrap();
        let config = SessionConfig::new(sender, target, "FIX.4.4");

        assert_eq!(config.sender_comp_id.as_str(), "SENDER");
        assert_eq!(config.target_comp_id.as_str(), "TARGET");
        assert_eq!(config.begin_string, "FIX.4.4");
        assert_eq!(config.heartbeat_interval, Duration::from_secs(30));
        assert!(!config.reset_on_logon);
        assert_eq!(config.max_frame_length, DEFAULT_MAX_FRAME_LENGTH);
    }

    #[test]
    fn test_session_config_builder() {
        let config = SessionConfigBuilder::new()
            .sender_comp_id(CompId::new("SENDER").unwrap())
            .target_comp_id(CompId::new("TARGET").unwrap())
            .begin_string("FIX.4.2")
            .heartbeat_interval(Duration::from_secs(60))
            .reset_on_logon(true)
            .max_frame_length(65536)
            .build()
            .unwrap();

        assert_eq!(config.begin_string, "FIX.4.2");
        assert_eq!(config.heartbeat_interval_secs(), 60);
        assert!(config.reset_on_logon);
        assert_eq!(config.max_frame_length, 65536);
    }

    #[test]
    fn test_session_config_builder_missing_required() {
        let err = SessionConfigBuilder::new()
            .sender_comp_id(CompId::new("SENDER").unwrap())
            .build()
            .unwrap_err();
        assert!(matches!(err, SessionError::Configuration(_)));
    }
}
