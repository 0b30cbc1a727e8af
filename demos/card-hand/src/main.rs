use std::time::Duration;

use cardlink::prelude::*;

// ---------------------------------------------------------------------------
// Console UI
// ---------------------------------------------------------------------------

/// Prints what a real card table would draw.
struct ConsoleUi {
    name: &'static str,
}

impl SessionObserver for ConsoleUi {
    fn on_connection_state_changed(&self, event: &ConnectionEvent) {
        tracing::info!(ui = self.name, peer = %event.peer().display_name(), "status: {}", event.state());
    }

    fn on_card_received(&self, card: &Card, is_front: bool) {
        tracing::info!(ui = self.name, image = card.face_image(is_front), "card arrived: {card}");
    }

    fn on_card_send_succeeded(&self, card: &Card) {
        tracing::info!(ui = self.name, "card left the table: {card}");
    }

    fn on_card_send_failed(&self, card: &Card, error: &SendError) {
        tracing::warn!(ui = self.name, %error, "could not send {card}");
    }

    fn on_peer_disconnected_clear_all(&self) {
        tracing::info!(ui = self.name, "peer left, table cleared");
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

async fn until_connected<T: PeerTransport, O: SessionObserver>(handle: &CardLinkHandle<T, O>) {
    while handle.state().await != SessionState::Connected {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::main]
async fn main() -> Result<(), CardlinkError> {
    init_logging("card_hand=info,cardlink=info");

    let host = CardLink::builder()
        .display_name("dealer")
        .advertise("127.0.0.1:0", ConsoleUi { name: "dealer" })
        .await?;
    let dealer = host.handle();
    let addr = dealer
        .transport()
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or_default();
    tokio::spawn(host.run());

    let guest = CardLink::builder()
        .display_name("player")
        .browse(&addr, ConsoleUi { name: "player" })
        .await?;
    let player = guest.handle();
    tokio::spawn(guest.run());

    until_connected(&dealer).await;
    until_connected(&player).await;

    let catalog = Catalog::standard();
    let ace = catalog.find(Suit::Heart, Rank::ACE);
    let queen = catalog.find(Suit::Spade, Rank::QUEEN);
    dealer.send_card(ace.id, true).await?;
    dealer.send_card(queen.id, false).await?;
    tokio::time::sleep(Duration::from_millis(100)).await;

    if let Some(face_up) = player.flip(queen.id).await {
        tracing::info!(face_up, "player turned over {queen}");
    }
    player.send_card(ace.id, true).await?;
    tokio::time::sleep(Duration::from_millis(100)).await;

    tracing::info!(dealer = dealer.hand().await.len(), player = player.hand().await.len(), "cards on each table");

    player.transport().disconnect().await?;
    tokio::time::sleep(Duration::from_millis(100)).await;
    tracing::info!(dealer = %dealer.state().await, player = %player.state().await, "done");

    Ok(())
}
