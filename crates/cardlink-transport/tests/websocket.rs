//! Integration tests for the WebSocket peer link.
//!
//! These spin up a real advertiser and browser on loopback and verify the
//! hello exchange, data flow in both directions, and the state events each
//! side reports when the link closes.

#[cfg(feature = "websocket")]
mod websocket {
    use std::time::Duration;

    use cardlink_transport::{
        PeerId, PeerState, PeerTransport, SendMode, TransportEvent,
        TransportEvents, WebSocketPeerTransport,
    };

    const SERVICE: &str = "multi-peer-chat";

    /// Waits (bounded) for the next event on a stream.
    async fn next_event(events: &mut TransportEvents) -> TransportEvent {
        tokio::time::timeout(Duration::from_secs(5), events.recv())
            .await
            .expect("event should arrive in time")
            .expect("event stream should be open")
    }

    async fn next_state(events: &mut TransportEvents) -> (PeerId, PeerState) {
        match next_event(events).await {
            TransportEvent::PeerStateChanged { peer, state } => (peer, state),
            other => panic!("expected a state change, got {other:?}"),
        }
    }

    async fn advertiser() -> (WebSocketPeerTransport, TransportEvents, String) {
        let (host, events) = WebSocketPeerTransport::advertise(
            "127.0.0.1:0",
            PeerId::new("host#0001"),
            SERVICE,
        )
        .await
        .expect("should bind");
        let addr = host.local_addr().expect("advertiser has an address").to_string();
        (host, events, addr)
    }

    #[tokio::test]
    async fn test_browse_and_exchange_data() {
        let (host, mut host_events, addr) = advertiser().await;

        let (guest, mut guest_events) = WebSocketPeerTransport::browse(
            &addr,
            PeerId::new("guest#0002"),
            SERVICE,
        )
        .await
        .expect("should connect");

        // Guest learns the host id from the hello reply.
        assert_eq!(
            next_state(&mut guest_events).await,
            (PeerId::new("host#0001"), PeerState::Connecting)
        );
        assert_eq!(
            next_state(&mut guest_events).await,
            (PeerId::new("host#0001"), PeerState::Connected)
        );

        // Host sees the guest come through the same states.
        assert_eq!(
            next_state(&mut host_events).await,
            (PeerId::new("guest#0002"), PeerState::Connecting)
        );
        assert_eq!(
            next_state(&mut host_events).await,
            (PeerId::new("guest#0002"), PeerState::Connected)
        );

        assert_eq!(guest.connected_peers().await, vec![PeerId::new("host#0001")]);
        assert_eq!(host.connected_peers().await, vec![PeerId::new("guest#0002")]);

        // --- Guest sends, host receives ---
        guest
            .send(&PeerId::new("host#0001"), b"from guest", SendMode::Reliable)
            .await
            .expect("send should succeed");
        assert_eq!(
            next_event(&mut host_events).await,
            TransportEvent::DataReceived {
                peer: PeerId::new("guest#0002"),
                data: b"from guest".to_vec(),
            }
        );

        // --- Host sends, guest receives ---
        host.send(&PeerId::new("guest#0002"), b"from host", SendMode::Reliable)
            .await
            .expect("send should succeed");
        assert_eq!(
            next_event(&mut guest_events).await,
            TransportEvent::DataReceived {
                peer: PeerId::new("host#0001"),
                data: b"from host".to_vec(),
            }
        );
    }

    #[tokio::test]
    async fn test_disconnect_reports_not_connected_on_both_sides() {
        let (host, mut host_events, addr) = advertiser().await;
        let (guest, mut guest_events) = WebSocketPeerTransport::browse(
            &addr,
            PeerId::new("guest#0002"),
            SERVICE,
        )
        .await
        .expect("should connect");
        next_state(&mut guest_events).await;
        next_state(&mut guest_events).await;
        next_state(&mut host_events).await;
        next_state(&mut host_events).await;

        guest.disconnect().await.expect("close should succeed");

        assert_eq!(
            next_state(&mut host_events).await,
            (PeerId::new("guest#0002"), PeerState::NotConnected)
        );
        assert_eq!(
            next_state(&mut guest_events).await,
            (PeerId::new("host#0001"), PeerState::NotConnected)
        );
        assert!(host.connected_peers().await.is_empty());
        assert!(guest.connected_peers().await.is_empty());
    }

    #[tokio::test]
    async fn test_browse_with_wrong_service_type_fails() {
        let (_host, mut host_events, addr) = advertiser().await;

        let result = WebSocketPeerTransport::browse(
            &addr,
            PeerId::new("guest#0002"),
            "other-service",
        )
        .await;

        assert!(result.is_err(), "mismatched service type must not link");
        // The advertiser saw a handshake that started and failed.
        assert_eq!(
            next_state(&mut host_events).await,
            (PeerId::new("guest#0002"), PeerState::Connecting)
        );
        assert_eq!(
            next_state(&mut host_events).await,
            (PeerId::new("guest#0002"), PeerState::NotConnected)
        );
    }

    #[tokio::test]
    async fn test_send_to_unknown_peer_fails() {
        let (_host, _host_events, addr) = advertiser().await;
        let (guest, _guest_events) = WebSocketPeerTransport::browse(
            &addr,
            PeerId::new("guest#0002"),
            SERVICE,
        )
        .await
        .expect("should connect");

        let result = guest
            .send(&PeerId::new("stranger#ffff"), b"x", SendMode::Reliable)
            .await;

        assert!(result.is_err());
    }

    /// Browses in with `id` and drains both sides' Connecting/Connected.
    async fn link(
        addr: &str,
        id: &str,
        host_events: &mut TransportEvents,
    ) -> (WebSocketPeerTransport, TransportEvents) {
        let (guest, mut guest_events) =
            WebSocketPeerTransport::browse(addr, PeerId::new(id), SERVICE)
                .await
                .expect("should connect");
        next_state(&mut guest_events).await;
        next_state(&mut guest_events).await;
        assert_eq!(
            next_state(host_events).await,
            (PeerId::new(id), PeerState::Connecting)
        );
        assert_eq!(
            next_state(host_events).await,
            (PeerId::new(id), PeerState::Connected)
        );
        (guest, guest_events)
    }

    #[tokio::test]
    async fn test_idle_client_does_not_block_browse() {
        let (_host, mut host_events, addr) = advertiser().await;
        let _idle = tokio::net::TcpStream::connect(&addr)
            .await
            .expect("tcp connect should succeed");

        // Well under the handshake timeout: the idle socket must not be
        // in the way at all.
        let (guest, _guest_events) =
            tokio::time::timeout(Duration::from_secs(3), link(&addr, "guest#0002", &mut host_events))
                .await
                .expect("browse should not wait on the idle client");

        assert_eq!(guest.connected_peers().await, vec![PeerId::new("host#0001")]);
    }

    #[tokio::test]
    async fn test_second_browser_is_refused_while_linked() {
        let (host, mut host_events, addr) = advertiser().await;
        let (guest, _guest_events) = link(&addr, "guest#0002", &mut host_events).await;

        let late = WebSocketPeerTransport::browse(
            &addr,
            PeerId::new("late#0003"),
            SERVICE,
        )
        .await;
        assert!(late.is_err(), "a linked advertiser must refuse a second peer");

        // The first link is untouched, and the refused peer left no
        // state events behind on the host.
        guest
            .send(&PeerId::new("host#0001"), b"still here", SendMode::Reliable)
            .await
            .expect("first link should still work");
        assert_eq!(
            next_event(&mut host_events).await,
            TransportEvent::DataReceived {
                peer: PeerId::new("guest#0002"),
                data: b"still here".to_vec(),
            }
        );
        assert_eq!(host.connected_peers().await, vec![PeerId::new("guest#0002")]);
    }

    #[tokio::test]
    async fn test_browse_after_disconnect_links_again() {
        let (host, mut host_events, addr) = advertiser().await;
        let (guest, mut guest_events) = link(&addr, "guest#0002", &mut host_events).await;

        guest.disconnect().await.expect("close should succeed");
        assert_eq!(
            next_state(&mut guest_events).await,
            (PeerId::new("host#0001"), PeerState::NotConnected)
        );
        assert_eq!(
            next_state(&mut host_events).await,
            (PeerId::new("guest#0002"), PeerState::NotConnected)
        );

        let (again, _again_events) = link(&addr, "guest#0003", &mut host_events).await;

        assert_eq!(host.connected_peers().await, vec![PeerId::new("guest#0003")]);
        assert_eq!(again.connected_peers().await, vec![PeerId::new("host#0001")]);
    }
}
