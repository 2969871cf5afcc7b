use std::sync::Arc;

use crate::{
    domain::{contact_address, ChatMessage, SmsInstruction},
    ports::{KeyValueStore, SmsGateway},
    Result,
};

/// Translates one chat message into zero-or-more SMS instructions, one per
/// currently-unreachable participant. Read-only with respect to the
/// destination set.
pub struct FallbackDispatcher {
    store: Arc<dyn KeyValueStore>,
    gateway: Arc<dyn SmsGateway>,
    key: String,
    sms_channel: String,
}

impl FallbackDispatcher {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        gateway: Arc<dyn SmsGateway>,
        key: impl Into<String>,
        sms_channel: impl Into<String>,
    ) -> Self {
        Self {
            store,
            gateway,
            key: key.into(),
            sms_channel: sms_channel.into(),
        }
    }

    /// Fan the message out to every destination currently in the set.
    ///
    /// An empty set is the steady state when everyone is present: zero
    /// publishes, Ok. A failed publish is dropped after a warning — no retry,
    /// and it never fails the triggering event.
    pub async fn dispatch(&self, message: &ChatMessage) -> Result<()> {
        let destinations = self.store.get(&self.key).await?.unwrap_or_default();
        tracing::debug!(destinations = ?destinations, "sending fallback sms");

        let sender = message.sender.handle();
        for uuid in &destinations {
            let sms = SmsInstruction {
                to: contact_address(uuid).to_string(),
                text: sms_text(sender, &message.text, &deep_link(&message.chat_room, uuid)),
            };
            if let Err(e) = self.gateway.publish_sms(&self.sms_channel, &sms).await {
                tracing::warn!(to = %sms.to, error = %e, "sms publish failed");
            }
        }

        Ok(())
    }
}

/// Chat-room URL augmented with a `uuid` query parameter identifying the
/// returning participant. Spaces in the identity are `+`-encoded; the param
/// is appended with `?`, or `&` when the URL already carries a query string.
pub fn deep_link(room_url: &str, identity: &str) -> String {
    let separator = if room_url.contains('?') { '&' } else { '?' };
    format!("{room_url}{separator}uuid={}", identity.replace(' ', "+"))
}

fn sms_text(sender: &str, text: &str, link: &str) -> String {
    format!("{sender} sent you a message: \"{text}\". You can leave this chat at: {link}")
}
