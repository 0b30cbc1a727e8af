//! The session state machine.

use std::fmt;

use cardlink_transport::PeerState;

use crate::SessionError;

/// Where the session is in its connection lifecycle.
///
/// ```text
///   Idle ──(Connecting)──→ Connecting ──(Connected)──→ Connected
///                              │                           │
///                              └──(NotConnected)──┐        │ (NotConnected)
///                                                 ▼        ▼
///                                               NotConnected
///                                                    │
///                              Connecting ←──(Connecting, new cycle)
/// ```
///
/// Every transition is caused by a transport report; the session never
/// moves on its own. A report equal to the current state is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No session has been attempted yet.
    #[default]
    Idle,
    /// A peer accepted discovery; the handshake is running.
    Connecting,
    /// Linked to exactly one peer. The only state that allows sends.
    Connected,
    /// The tracked peer is gone. A new discovery cycle starts over at
    /// `Connecting`.
    NotConnected,
}

impl SessionState {
    /// Applies a transport report.
    ///
    /// Returns `Ok(Some(next))` when the state changes, `Ok(None)` when the
    /// report repeats the current state.
    ///
    /// # Errors
    /// [`SessionError::InvalidTransition`] for any move the lifecycle above
    /// doesn't allow.
    pub fn on_peer_state(
        self,
        reported: PeerState,
    ) -> Result<Option<SessionState>, SessionError> {
        use PeerState as P;
        use SessionState as S;

        match (self, reported) {
            (S::Idle | S::NotConnected, P::Connecting) => Ok(Some(S::Connecting)),
            (S::Connecting, P::Connected) => Ok(Some(S::Connected)),
            (S::Connecting | S::Connected, P::NotConnected) => {
                Ok(Some(S::NotConnected))
            }
            (S::Connecting, P::Connecting)
            | (S::Connected, P::Connected)
            | (S::NotConnected, P::NotConnected) => Ok(None),
            (from, to) => Err(SessionError::InvalidTransition { from, to }),
        }
    }

    /// Whether a peer is being tracked in this state.
    pub fn has_peer(self) -> bool {
        matches!(self, Self::Connecting | Self::Connected)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::NotConnected => "not connected",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(states: &[PeerState]) -> Result<SessionState, SessionError> {
        states.iter().try_fold(SessionState::Idle, |current, &reported| {
            Ok(current.on_peer_state(reported)?.unwrap_or(current))
        })
    }

    #[test]
    fn test_default_is_idle() {
        assert_eq!(SessionState::default(), SessionState::Idle);
    }

    #[test]
    fn test_full_lifecycle_reaches_not_connected() {
        let end = apply(&[
            PeerState::Connecting,
            PeerState::Connected,
            PeerState::NotConnected,
        ])
        .unwrap();
        assert_eq!(end, SessionState::NotConnected);
    }

    #[test]
    fn test_handshake_failure_goes_to_not_connected() {
        let next = SessionState::Connecting
            .on_peer_state(PeerState::NotConnected)
            .unwrap();
        assert_eq!(next, Some(SessionState::NotConnected));
    }

    #[test]
    fn test_new_cycle_after_not_connected() {
        let next = SessionState::NotConnected
            .on_peer_state(PeerState::Connecting)
            .unwrap();
        assert_eq!(next, Some(SessionState::Connecting));
    }

    #[test]
    fn test_repeated_report_is_suppressed() {
        for state in [
            (SessionState::Connecting, PeerState::Connecting),
            (SessionState::Connected, PeerState::Connected),
            (SessionState::NotConnected, PeerState::NotConnected),
        ] {
            assert_eq!(state.0.on_peer_state(state.1).unwrap(), None);
        }
    }

    #[test]
    fn test_idle_cannot_skip_connecting() {
        for reported in [PeerState::Connected, PeerState::NotConnected] {
            assert!(matches!(
                SessionState::Idle.on_peer_state(reported),
                Err(SessionError::InvalidTransition { from: SessionState::Idle, to }) if to == reported
            ));
        }
    }

    #[test]
    fn test_connected_cannot_go_back_to_connecting() {
        assert!(SessionState::Connected
            .on_peer_state(PeerState::Connecting)
            .is_err());
    }

    #[test]
    fn test_not_connected_cannot_jump_to_connected() {
        assert!(SessionState::NotConnected
            .on_peer_state(PeerState::Connected)
            .is_err());
    }

    #[test]
    fn test_has_peer() {
        assert!(!SessionState::Idle.has_peer());
        assert!(SessionState::Connecting.has_peer());
        assert!(SessionState::Connected.has_peer());
        assert!(!SessionState::NotConnected.has_peer());
    }
}
