//! Subscribe wire format: PubNub v2 envelopes decoded into core events.

use serde::Deserialize;

use csf_core::{
    domain::{ChatMessage, PresenceEvent},
    router::InboundEvent,
    Result,
};

/// Subscribe cursor (timetoken + region). The default starts at timetoken 0,
/// which asks the origin for a fresh cursor without replaying history.
#[derive(Clone, Debug)]
pub struct SubscribeCursor {
    pub timetoken: String,
    pub region: Option<i64>,
}

impl Default for SubscribeCursor {
    fn default() -> Self {
        Self {
            timetoken: "0".to_string(),
            region: None,
        }
    }
}

/// One subscribe round's worth of decoded events plus the next cursor.
#[derive(Clone, Debug)]
pub struct SubscribeBatch {
    pub cursor: SubscribeCursor,
    pub events: Vec<InboundEvent>,
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(rename = "t")]
    cursor: WireCursor,
    #[serde(rename = "m", default)]
    messages: Vec<WireEnvelope>,
}

#[derive(Deserialize)]
struct WireCursor {
    #[serde(rename = "t")]
    timetoken: String,
    #[serde(rename = "r")]
    region: Option<i64>,
}

#[derive(Deserialize)]
struct WireEnvelope {
    #[serde(rename = "c")]
    channel: String,
    #[serde(rename = "d")]
    data: serde_json::Value,
}

/// Decode one subscribe response. Envelopes on the presence companion channel
/// parse as presence events, the rest as chat messages; payloads that fit
/// neither are logged and skipped rather than failing the round.
pub fn decode_subscribe_response(
    raw: &serde_json::Value,
    presence_channel: &str,
) -> Result<SubscribeBatch> {
    let resp: WireResponse = serde_json::from_value(raw.clone())?;

    let mut events = Vec::new();
    for envelope in resp.messages {
        match decode_envelope(&envelope, presence_channel) {
            Some(event) => events.push(event),
            None => {
                tracing::debug!(channel = %envelope.channel, "skipping undecodable envelope")
            }
        }
    }

    Ok(SubscribeBatch {
        cursor: SubscribeCursor {
            timetoken: resp.cursor.timetoken,
            region: resp.cursor.region,
        },
        events,
    })
}

fn decode_envelope(envelope: &WireEnvelope, presence_channel: &str) -> Option<InboundEvent> {
    if envelope.channel == presence_channel {
        let event: PresenceEvent = serde_json::from_value(envelope.data.clone()).ok()?;
        return Some(InboundEvent::Presence(event));
    }

    let message: ChatMessage = serde_json::from_value(envelope.data.clone()).ok()?;
    Some(InboundEvent::Message(message))
}
