use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use log::warn;
use serde_json::Value;

use crate::error::{BingoError, Result};
use crate::model::{Card, CARD_EVENT_COUNT};

/// Encodes the card's 24 non-free labels, row-major, as URL-safe base64 of a JSON array.
pub fn encode_share_code(card: &Card) -> Result<String> {
    let events = card.events();
    if events.len() != CARD_EVENT_COUNT {
        return Err(BingoError::InvalidShareCode(format!(
            "expected {} events, got {}",
            CARD_EVENT_COUNT,
            events.len()
        )));
    }
    let json = serde_json::to_string(&events)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn decode_bytes(code: &str) -> Option<Vec<u8>> {
    [&URL_SAFE_NO_PAD, &URL_SAFE, &STANDARD, &STANDARD_NO_PAD]
        .into_iter()
        .find_map(|engine| engine.decode(code).ok())
}

/// Decodes a share code back to its 24 labels; `None` for anything malformed.
pub fn decode_share_code(code: &str) -> Option<Vec<String>> {
    let code = code.trim();
    if code.is_empty() {
        return None;
    }
    let Some(bytes) = decode_bytes(code) else {
        warn!(target: "share_code", "Share code is not valid base64");
        return None;
    };
    let value: Value = match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(e) => {
            warn!(target: "share_code", "Share code is not valid JSON: {}", e);
            return None;
        }
    };
    let Value::Array(entries) = value else {
        warn!(target: "share_code", "Decoded data is not an array");
        return None;
    };
    if entries.len() != CARD_EVENT_COUNT {
        warn!(
            target: "share_code",
            "Expected {} events, got {}",
            CARD_EVENT_COUNT,
            entries.len()
        );
        return None;
    }
    let events: Option<Vec<String>> = entries
        .into_iter()
        .map(|entry| match entry {
            Value::String(event) if !event.is_empty() => Some(event),
            _ => None,
        })
        .collect();
    if events.is_none() {
        warn!(target: "share_code", "Decoded events contain invalid entries");
    }
    events
}
