//! The card transfer message: the only payload peers exchange.
//!
//! On the wire it is a closed record with exactly two keys:
//!
//! ```text
//! { "id": 51, "isFront": true }
//! ```
//!
//! Both keys are required and no other key is accepted. There is no
//! version field; changing the shape is a breaking change for both peers.

use cardlink_catalog::{CardId, DECK_SIZE};
use serde::{Deserialize, Serialize};

use crate::{Codec, ProtocolError};

/// Which card moved to the peer, and which way up it should land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CardTransferMessage {
    /// Catalog id of the card.
    #[serde(rename = "id")]
    pub card_id: CardId,

    /// `true` if the recipient should show the face, `false` for the back.
    #[serde(rename = "isFront")]
    pub is_front: bool,
}

impl CardTransferMessage {
    /// Creates a message for the given card and facing.
    pub fn new(card_id: CardId, is_front: bool) -> Self {
        Self { card_id, is_front }
    }

    /// Checks protocol rules that the schema alone can't express.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidMessage`] if the card id is not a
    /// catalog key.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        let in_range = usize::try_from(self.card_id.0)
            .is_ok_and(|index| index < DECK_SIZE);
        if in_range {
            Ok(())
        } else {
            Err(ProtocolError::InvalidMessage(format!(
                "card id {} is outside the catalog (0..{DECK_SIZE})",
                self.card_id
            )))
        }
    }

    /// Validates and encodes the message with `codec`.
    pub fn encode(&self, codec: &impl Codec) -> Result<Vec<u8>, ProtocolError> {
        self.validate()?;
        codec.encode(self)
    }

    /// Decodes a message with `codec` and validates it.
    ///
    /// # Errors
    /// [`ProtocolError::Decode`] if the bytes don't match the two-key
    /// schema, [`ProtocolError::InvalidMessage`] if the card id is out of
    /// range.
    pub fn decode(codec: &impl Codec, data: &[u8]) -> Result<Self, ProtocolError> {
        let msg: Self = codec.decode(data)?;
        msg.validate()?;
        Ok(msg)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    //! The wire shape matters more than the Rust shape here: a peer built
    //! from another codebase only sees the JSON.

    use super::*;
    use crate::JsonCodec;

    fn decode(json: &str) -> Result<CardTransferMessage, ProtocolError> {
        CardTransferMessage::decode(&JsonCodec, json.as_bytes())
    }

    #[test]
    fn test_message_json_format() {
        let msg = CardTransferMessage::new(CardId(51), true);
        let json: serde_json::Value = serde_json::to_value(msg).unwrap();

        assert_eq!(json, serde_json::json!({ "id": 51, "isFront": true }));
    }

    #[test]
    fn test_round_trip_every_card_and_facing() {
        for id in 0..DECK_SIZE as u32 {
            for is_front in [true, false] {
                let msg = CardTransferMessage::new(CardId(id), is_front);
                let bytes = msg.encode(&JsonCodec).unwrap();
                let decoded = CardTransferMessage::decode(&JsonCodec, &bytes).unwrap();
                assert_eq!((decoded.card_id, decoded.is_front), (CardId(id), is_front));
            }
        }
    }

    #[test]
    fn test_decode_accepts_keys_in_any_order() {
        let msg = decode(r#"{"isFront": false, "id": 3}"#).unwrap();
        assert_eq!(msg, CardTransferMessage::new(CardId(3), false));
    }

    #[test]
    fn test_decode_missing_is_front_returns_decode_error() {
        assert!(matches!(decode(r#"{"id": 3}"#), Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_missing_id_returns_decode_error() {
        assert!(matches!(decode(r#"{"isFront": true}"#), Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_extra_field_returns_decode_error() {
        let result = decode(r#"{"id": 3, "isFront": true, "user": "x"}"#);
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_duplicate_key_returns_decode_error() {
        let result = decode(r#"{"id": 3, "id": 4, "isFront": true}"#);
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_wrong_types_return_decode_error() {
        assert!(decode(r#"{"id": "3", "isFront": true}"#).is_err());
        assert!(decode(r#"{"id": 3, "isFront": 1}"#).is_err());
        assert!(decode(r#"{"id": -1, "isFront": true}"#).is_err());
    }

    #[test]
    fn test_decode_out_of_range_id_returns_invalid_message() {
        for json in [r#"{"id": 52, "isFront": true}"#, r#"{"id": 999, "isFront": true}"#] {
            assert!(
                matches!(decode(json), Err(ProtocolError::InvalidMessage(_))),
                "{json} should be rejected"
            );
        }
    }

    #[test]
    fn test_decode_garbage_returns_decode_error() {
        assert!(matches!(
            CardTransferMessage::decode(&JsonCodec, b"\x00\x01garbage"),
            Err(ProtocolError::Decode(_))
        ));
    }

    #[test]
    fn test_encode_out_of_range_id_is_refused() {
        let msg = CardTransferMessage::new(CardId(52), true);
        assert!(matches!(
            msg.encode(&JsonCodec),
            Err(ProtocolError::InvalidMessage(_))
        ));
    }
}
