//! In-process transport: two endpoints joined by channels.
//!
//! The link is driven explicitly with [`MemoryTransport::connect`],
//! [`MemoryTransport::disconnect`] and [`MemoryTransport::fail_handshake`],
//! which emit the same state events a real transport would, on both sides.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use crate::{
    PeerId, PeerState, PeerTransport, SendMode, TransportError,
    TransportEvent, TransportEvents,
};

#[derive(Debug, Default)]
struct LinkState {
    connected: bool,
}

/// One end of an in-process peer link.
#[derive(Debug)]
pub struct MemoryTransport {
    local: PeerId,
    remote: PeerId,
    link: Arc<Mutex<LinkState>>,
    own_events: mpsc::UnboundedSender<TransportEvent>,
    remote_events: mpsc::UnboundedSender<TransportEvent>,
}

impl MemoryTransport {
    /// Creates two linked endpoints, initially disconnected.
    ///
    /// The first endpoint belongs to `a`, the second to `b`.
    pub fn pair(
        a: PeerId,
        b: PeerId,
    ) -> ((Self, TransportEvents), (Self, TransportEvents)) {
        let link = Arc::new(Mutex::new(LinkState::default()));
        let (a_tx, a_events) = TransportEvents::channel();
        let (b_tx, b_events) = TransportEvents::channel();

        let a_end = Self {
            local: a.clone(),
            remote: b.clone(),
            link: Arc::clone(&link),
            own_events: a_tx.clone(),
            remote_events: b_tx.clone(),
        };
        let b_end = Self {
            local: b,
            remote: a,
            link,
            own_events: b_tx,
            remote_events: a_tx,
        };
        ((a_end, a_events), (b_end, b_events))
    }

    /// The peer on the other end of this link.
    pub fn remote_peer(&self) -> &PeerId {
        &self.remote
    }

    /// Brings the link up: both sides see `Connecting` then `Connected`.
    ///
    /// Does nothing if the link is already up.
    pub async fn connect(&self) {
        let mut link = self.link.lock().await;
        if link.connected {
            return;
        }
        self.notify_both(PeerState::Connecting);
        link.connected = true;
        self.notify_both(PeerState::Connected);
        tracing::debug!(local = %self.local, remote = %self.remote, "memory link up");
    }

    /// Takes the link down: both sides see `NotConnected`.
    ///
    /// Does nothing if the link is already down.
    pub async fn disconnect(&self) {
        let mut link = self.link.lock().await;
        if !link.connected {
            return;
        }
        link.connected = false;
        self.notify_both(PeerState::NotConnected);
        tracing::debug!(local = %self.local, remote = %self.remote, "memory link down");
    }

    /// Simulates a handshake that starts and then fails: both sides see
    /// `Connecting` then `NotConnected`, and the link stays down.
    pub async fn fail_handshake(&self) {
        let link = self.link.lock().await;
        if link.connected {
            return;
        }
        self.notify_both(PeerState::Connecting);
        self.notify_both(PeerState::NotConnected);
    }

    fn notify_both(&self, state: PeerState) {
        // A dropped event stream just means nobody is listening anymore.
        let _ = self.own_events.send(TransportEvent::PeerStateChanged {
            peer: self.remote.clone(),
            state,
        });
        let _ = self.remote_events.send(TransportEvent::PeerStateChanged {
            peer: self.local.clone(),
            state,
        });
    }
}

impl PeerTransport for MemoryTransport {
    type Error = TransportError;

    async fn send(
        &self,
        peer: &PeerId,
        data: &[u8],
        _mode: SendMode,
    ) -> Result<(), Self::Error> {
        let link = self.link.lock().await;
        if !link.connected {
            return Err(TransportError::ConnectionClosed(
                "memory link is down".into(),
            ));
        }
        if *peer != self.remote {
            return Err(TransportError::UnknownPeer(peer.clone()));
        }
        self.remote_events
            .send(TransportEvent::DataReceived {
                peer: self.local.clone(),
                data: data.to_vec(),
            })
            .map_err(|_| {
                TransportError::ConnectionClosed("remote endpoint dropped".into())
            })
    }

    async fn connected_peers(&self) -> Vec<PeerId> {
        if self.link.lock().await.connected {
            vec![self.remote.clone()]
        } else {
            Vec::new()
        }
    }

    fn local_peer(&self) -> &PeerId {
        &self.local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> ((MemoryTransport, TransportEvents), (MemoryTransport, TransportEvents)) {
        MemoryTransport::pair(PeerId::new("a#0001"), PeerId::new("b#0002"))
    }

    fn state_of(event: Option<TransportEvent>) -> PeerState {
        match event {
            Some(TransportEvent::PeerStateChanged { state, .. }) => state,
            other => panic!("expected state event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connect_emits_connecting_then_connected_on_both_sides() {
        let ((a, mut a_events), (_b, mut b_events)) = endpoints();

        a.connect().await;

        assert_eq!(state_of(a_events.try_recv()), PeerState::Connecting);
        assert_eq!(state_of(a_events.try_recv()), PeerState::Connected);
        assert_eq!(state_of(b_events.try_recv()), PeerState::Connecting);
        assert_eq!(state_of(b_events.try_recv()), PeerState::Connected);
    }

    #[tokio::test]
    async fn test_connect_twice_emits_once() {
        let ((a, mut a_events), _b) = endpoints();
        a.connect().await;
        a.connect().await;

        a_events.try_recv();
        a_events.try_recv();
        assert!(a_events.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_connected_peers_tracks_link() {
        let ((a, _), (b, _)) = endpoints();
        assert!(a.connected_peers().await.is_empty());

        a.connect().await;
        assert_eq!(a.connected_peers().await, vec![PeerId::new("b#0002")]);
        assert_eq!(b.connected_peers().await, vec![PeerId::new("a#0001")]);

        b.disconnect().await;
        assert!(a.connected_peers().await.is_empty());
    }

    #[tokio::test]
    async fn test_send_delivers_to_remote_events() {
        let ((a, _), (b, mut b_events)) = endpoints();
        a.connect().await;
        // Drain state events.
        b_events.try_recv();
        b_events.try_recv();

        a.send(b.local_peer(), b"card", SendMode::Reliable)
            .await
            .expect("send should succeed");

        assert_eq!(
            b_events.try_recv(),
            Some(TransportEvent::DataReceived {
                peer: PeerId::new("a#0001"),
                data: b"card".to_vec(),
            })
        );
    }

    #[tokio::test]
    async fn test_send_while_down_returns_connection_closed() {
        let ((a, _), (b, _)) = endpoints();

        let result = a.send(b.local_peer(), b"x", SendMode::Reliable).await;

        assert!(matches!(result, Err(TransportError::ConnectionClosed(_))));
    }

    #[tokio::test]
    async fn test_send_to_stranger_returns_unknown_peer() {
        let ((a, _), _b) = endpoints();
        a.connect().await;

        let stranger = PeerId::new("z#ffff");
        let result = a.send(&stranger, b"x", SendMode::Reliable).await;

        assert!(matches!(result, Err(TransportError::UnknownPeer(p)) if p == stranger));
    }

    #[tokio::test]
    async fn test_fail_handshake_emits_connecting_then_not_connected() {
        let ((a, mut a_events), _b) = endpoints();

        a.fail_handshake().await;

        assert_eq!(state_of(a_events.try_recv()), PeerState::Connecting);
        assert_eq!(state_of(a_events.try_recv()), PeerState::NotConnected);
        assert!(a.connected_peers().await.is_empty());
    }
}
