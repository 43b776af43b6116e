/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Session lifecycle state.
//!
//! ```text
//! Disconnected -> (build Logon) -> LogonSent -> (Logon ack) -> Active
//! Active -> (build Logout) -> LogoutSent -> (Logout ack) -> Disconnected
//! ```
//!
//! Timers (logon timeout, heartbeat scheduling) are an external
//! collaborator's responsibility; this type only records where the
//! handshake stands.

use std::fmt;

/// Operational state of a FIX session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No logon exchanged; nothing may be sent except a Logon.
    #[default]
    Disconnected,
    /// Logon constructed and handed to the transport; awaiting the
    /// counterparty's Logon.
    LogonSent,
    /// Handshake complete; application messages may flow.
    Active,
    /// Logout constructed; awaiting the counterparty's Logout.
    LogoutSent,
}

impl SessionState {
    /// Returns true if the handshake has completed.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns true if no session is established or pending.
    #[must_use]
    pub const fn is_disconnected(self) -> bool {
        matches!(self, Self::Disconnected)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "Disconnected",
            Self::LogonSent => "LogonSent",
            Self::Active => "Active",
            Self::LogoutSent => "LogoutSent",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_disconnected() {
        assert!(SessionState::default().is_disconnected());
        assert!(!SessionState::default().is_active());
    }

    #[test]
    fn test_display() {
        assert_eq!(SessionState::LogonSent.to_string(), "LogonSent");
        assert_eq!(SessionState::Active.to_string(), "Active");
    }
}
