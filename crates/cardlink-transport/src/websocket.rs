//! WebSocket peer link using `tokio-tungstenite`.
//!
//! One device advertises (listens), the other browses (dials the
//! advertiser's address). Right after the WebSocket upgrade both sides
//! exchange a text hello of the form `"{service_type}/{peer_id}"`: the
//! browser speaks first, the advertiser answers. A service type mismatch
//! fails the handshake. After that, binary frames carry payloads.
//!
//! Only one peer is linked at a time; further dials are refused.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

use crate::{
    PeerId, PeerState, PeerTransport, SendMode, TransportError,
    TransportEvent, TransportEvents,
};

/// How long either side waits for the other's hello.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

type WsStream = WebSocketStream<TcpStream>;

struct Link {
    peer: PeerId,
    sink: SplitSink<WsStream, Message>,
}

/// State shared between the transport handle and its background tasks.
#[derive(Clone)]
struct Shared {
    local: PeerId,
    service_type: String,
    link: Arc<Mutex<Option<Link>>>,
    events: mpsc::UnboundedSender<TransportEvent>,
}

impl Shared {
    fn new(
        local: PeerId,
        service_type: &str,
    ) -> (Self, TransportEvents) {
        let (events_tx, events) = TransportEvents::channel();
        let shared = Self {
            local,
            service_type: service_type.to_string(),
            link: Arc::new(Mutex::new(None)),
            events: events_tx,
        };
        (shared, events)
    }

    fn notify(&self, peer: &PeerId, state: PeerState) {
        let _ = self.events.send(TransportEvent::PeerStateChanged {
            peer: peer.clone(),
            state,
        });
    }

    /// Stores the link, reports `Connected`, and starts forwarding frames.
    ///
    /// Takes the link slot already locked, so the check that it is free
    /// and the install happen as one step.
    fn install(&self, slot: &mut Option<Link>, peer: PeerId, ws: WsStream) {
        let (sink, stream) = ws.split();
        *slot = Some(Link {
            peer: peer.clone(),
            sink,
        });
        tracing::info!(%peer, "peer connected");
        self.notify(&peer, PeerState::Connected);
        tokio::spawn(read_loop(stream, peer, self.clone()));
    }
}

/// A WebSocket-based [`PeerTransport`] linking this device to one peer.
pub struct WebSocketPeerTransport {
    shared: Shared,
    local_addr: Option<SocketAddr>,
    acceptor: Option<JoinHandle<()>>,
}

impl WebSocketPeerTransport {
    /// Listens on `addr` and waits for one peer to dial in.
    pub async fn advertise(
        addr: &str,
        local: PeerId,
        service_type: &str,
    ) -> Result<(Self, TransportEvents), TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::ConnectFailed)?;
        let local_addr = listener
            .local_addr()
            .map_err(TransportError::ConnectFailed)?;
        tracing::info!(%local_addr, service_type, %local, "advertising");

        let (shared, events) = Shared::new(local, service_type);
        let acceptor = tokio::spawn(accept_loop(listener, shared.clone()));

        Ok((
            Self {
                shared,
                local_addr: Some(local_addr),
                acceptor: Some(acceptor),
            },
            events,
        ))
    }

    /// Dials an advertiser at `addr` and completes the hello exchange.
    ///
    /// On success the returned event stream already holds `Connecting`
    /// and `Connected` for the advertiser.
    pub async fn browse(
        addr: &str,
        local: PeerId,
        service_type: &str,
    ) -> Result<(Self, TransportEvents), TransportError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(TransportError::ConnectFailed)?;
        let (mut ws, _) =
            tokio_tungstenite::client_async(format!("ws://{addr}"), stream)
                .await
                .map_err(|e| TransportError::HandshakeFailed(e.to_string()))?;

        ws.send(Message::text(hello_line(service_type, &local)))
            .await
            .map_err(|e| TransportError::SendFailed(io_error(e)))?;
        let reply = read_hello(&mut ws).await?;
        let (service, peer) = parse_hello(&reply)?;
        if service != service_type {
            return Err(TransportError::HandshakeFailed(format!(
                "service type mismatch: expected {service_type}, got {service}"
            )));
        }

        let (shared, events) = Shared::new(local, service_type);
        {
            let mut slot = shared.link.lock().await;
            shared.notify(&peer, PeerState::Connecting);
            shared.install(&mut slot, peer, ws);
        }

        Ok((
            Self {
                shared,
                local_addr: None,
                acceptor: None,
            },
            events,
        ))
    }

    /// The listening address, for an advertising transport.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Closes the link to the current peer, if any.
    ///
    /// This side reports `NotConnected` right away; the peer reports it
    /// when the close frame arrives.
    pub async fn disconnect(&self) -> Result<(), TransportError> {
        let mut slot = self.shared.link.lock().await;
        let Some(mut link) = slot.take() else {
            return Ok(());
        };
        tracing::info!(peer = %link.peer, "closing peer link");
        self.shared.notify(&link.peer, PeerState::NotConnected);
        link.sink
            .close()
            .await
            .map_err(|e| TransportError::SendFailed(io_error(e)))
    }
}

impl Drop for WebSocketPeerTransport {
    fn drop(&mut self) {
        if let Some(acceptor) = self.acceptor.take() {
            acceptor.abort();
        }
    }
}

impl PeerTransport for WebSocketPeerTransport {
    type Error = TransportError;

    async fn send(
        &self,
        peer: &PeerId,
        data: &[u8],
        _mode: SendMode,
    ) -> Result<(), Self::Error> {
        // WebSocket frames are always reliable and ordered.
        let mut guard = self.shared.link.lock().await;
        let link = guard.as_mut().ok_or_else(|| {
            TransportError::ConnectionClosed("no peer connected".into())
        })?;
        if link.peer != *peer {
            return Err(TransportError::UnknownPeer(peer.clone()));
        }
        link.sink
            .send(Message::binary(data.to_vec()))
            .await
            .map_err(|e| TransportError::SendFailed(io_error(e)))
    }

    async fn connected_peers(&self) -> Vec<PeerId> {
        self.shared
            .link
            .lock()
            .await
            .as_ref()
            .map(|link| vec![link.peer.clone()])
            .unwrap_or_default()
    }

    fn local_peer(&self) -> &PeerId {
        &self.shared.local
    }
}

// ---------------------------------------------------------------------------
// Background tasks
// ---------------------------------------------------------------------------

async fn accept_loop(listener: TcpListener, shared: Shared) {
    loop {
        let (stream, addr) = match listener.accept().await {
            Ok(pair) => pair,
            Err(e) => {
                tracing::error!(error = %e, "accept failed");
                continue;
            }
        };

        if shared.link.lock().await.is_some() {
            tracing::info!(%addr, "refusing peer, session already linked");
            continue;
        }

        // Each handshake runs on its own task so a silent client can't
        // hold up the next one.
        let shared = shared.clone();
        tokio::spawn(async move {
            if let Err(e) = accept_peer(stream, &shared).await {
                tracing::warn!(%addr, error = %e, "peer handshake failed");
            }
        });
    }
}

async fn accept_peer(
    stream: TcpStream,
    shared: &Shared,
) -> Result<(), TransportError> {
    let mut ws = tokio::time::timeout(
        HANDSHAKE_TIMEOUT,
        tokio_tungstenite::accept_async(stream),
    )
    .await
    .map_err(|_| TransportError::HandshakeFailed("upgrade timed out".into()))?
    .map_err(|e| TransportError::HandshakeFailed(e.to_string()))?;

    let hello = read_hello(&mut ws).await?;
    let (service, peer) = parse_hello(&hello)?;

    // Held until the link is installed or the handshake is abandoned, so
    // two concurrent handshakes can't both claim the session.
    let mut slot = shared.link.lock().await;
    if let Some(current) = slot.as_ref() {
        return Err(TransportError::HandshakeFailed(format!(
            "already linked to {}, refusing {peer}",
            current.peer
        )));
    }
    shared.notify(&peer, PeerState::Connecting);

    if service != shared.service_type {
        shared.notify(&peer, PeerState::NotConnected);
        let _ = ws.close(None).await;
        return Err(TransportError::HandshakeFailed(format!(
            "service type mismatch: expected {}, got {service}",
            shared.service_type
        )));
    }

    let reply = hello_line(&shared.service_type, &shared.local);
    if let Err(e) = ws.send(Message::text(reply)).await {
        shared.notify(&peer, PeerState::NotConnected);
        return Err(TransportError::SendFailed(io_error(e)));
    }

    shared.install(&mut slot, peer, ws);
    Ok(())
}

async fn read_loop(
    mut stream: SplitStream<WsStream>,
    peer: PeerId,
    shared: Shared,
) {
    while let Some(msg) = stream.next().await {
        match msg {
            Ok(Message::Binary(data)) => {
                let _ = shared.events.send(TransportEvent::DataReceived {
                    peer: peer.clone(),
                    data: data.to_vec(),
                });
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => continue, // text/ping/pong/frame
            Err(e) => {
                tracing::debug!(%peer, error = %e, "websocket read failed");
                break;
            }
        }
    }

    // Whoever clears the slot reports `NotConnected`, under the lock, so
    // it is ordered before any later peer's `Connecting`. A local
    // `disconnect()` has already done both.
    let mut slot = shared.link.lock().await;
    if slot.as_ref().is_some_and(|l| l.peer == peer) {
        *slot = None;
        tracing::info!(%peer, "peer disconnected");
        shared.notify(&peer, PeerState::NotConnected);
    }
}

// ---------------------------------------------------------------------------
// Hello
// ---------------------------------------------------------------------------

fn hello_line(service_type: &str, local: &PeerId) -> String {
    format!("{service_type}/{local}")
}

fn parse_hello(line: &str) -> Result<(&str, PeerId), TransportError> {
    match line.split_once('/') {
        Some((service, peer)) if !service.is_empty() && !peer.is_empty() => {
            Ok((service, PeerId::new(peer)))
        }
        _ => Err(TransportError::HandshakeFailed(format!(
            "malformed hello: {line:?}"
        ))),
    }
}

async fn read_hello(ws: &mut WsStream) -> Result<String, TransportError> {
    let next = tokio::time::timeout(HANDSHAKE_TIMEOUT, ws.next())
        .await
        .map_err(|_| TransportError::HandshakeFailed("hello timed out".into()))?;

    match next {
        Some(Ok(Message::Text(text))) => Ok(text.as_str().to_owned()),
        Some(Ok(_)) => Err(TransportError::HandshakeFailed(
            "expected a text hello".into(),
        )),
        Some(Err(e)) => Err(TransportError::ReceiveFailed(io_error(e))),
        None => Err(TransportError::ConnectionClosed(
            "closed during hello".into(),
        )),
    }
}

fn io_error(e: tokio_tungstenite::tungstenite::Error) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::BrokenPipe, e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hello_splits_service_and_peer() {
        let (service, peer) = parse_hello("multi-peer-chat/Alice#00ff").unwrap();
        assert_eq!(service, "multi-peer-chat");
        assert_eq!(peer, PeerId::new("Alice#00ff"));
    }

    #[test]
    fn test_parse_hello_peer_may_contain_slash() {
        let (_, peer) = parse_hello("svc/a/b#0001").unwrap();
        assert_eq!(peer.as_str(), "a/b#0001");
    }

    #[test]
    fn test_parse_hello_missing_separator_returns_error() {
        assert!(matches!(
            parse_hello("no-separator"),
            Err(TransportError::HandshakeFailed(_))
        ));
    }

    #[test]
    fn test_parse_hello_empty_peer_returns_error() {
        assert!(parse_hello("svc/").is_err());
    }

    #[test]
    fn test_hello_line_format() {
        let line = hello_line("svc", &PeerId::new("Bob#0002"));
        assert_eq!(line, "svc/Bob#0002");
    }
}
