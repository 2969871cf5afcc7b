use serde::{Deserialize, Serialize};

/// Delimiter joining a display handle to a contact address in a participant
/// identity. Handles may themselves contain it; contact addresses must not,
/// so the *last* occurrence is the split point.
pub const IDENTITY_DELIMITER: char = '@';

/// Composite participant identity: `<handle>@<contact address>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display handle: everything before the last delimiter.
    pub fn handle(&self) -> &str {
        display_handle(&self.0)
    }

    /// Contact address (phone number): everything after the last delimiter.
    pub fn contact_address(&self) -> &str {
        contact_address(&self.0)
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything before the last delimiter. An identity without a delimiter
/// degrades to the whole string rather than failing.
pub fn display_handle(identity: &str) -> &str {
    match identity.rfind(IDENTITY_DELIMITER) {
        Some(at) => &identity[..at],
        None => identity,
    }
}

/// Everything after the last delimiter; whole string when absent.
pub fn contact_address(identity: &str) -> &str {
    match identity.rfind(IDENTITY_DELIMITER) {
        Some(at) => &identity[at + 1..],
        None => identity,
    }
}

/// Presence-channel transition kinds. Anything else deserializes as `Other`
/// and is ignored mutation-wise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceAction {
    Join,
    Leave,
    Timeout,
    #[serde(other)]
    Other,
}

/// One presence transition, as delivered on the presence companion channel.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PresenceEvent {
    pub action: PresenceAction,
    pub uuid: ParticipantId,
}

/// One chat publish. Wire field names follow the chat app's payloads.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Chat room URL the deep link is built from.
    pub chat_room: String,
    pub sender: ParticipantId,
    pub text: String,
}

/// Outbound SMS send instruction, published to the SMS gateway channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsInstruction {
    pub to: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_last_delimiter() {
        assert_eq!(display_handle("alice@+15551234567"), "alice");
        assert_eq!(contact_address("alice@+15551234567"), "+15551234567");
    }

    #[test]
    fn handle_may_contain_the_delimiter() {
        assert_eq!(display_handle("a@b@+15551234567"), "a@b");
        assert_eq!(contact_address("a@b@+15551234567"), "+15551234567");
    }

    #[test]
    fn missing_delimiter_degrades_to_whole_string() {
        assert_eq!(display_handle("carol"), "carol");
        assert_eq!(contact_address("carol"), "carol");
    }

    #[test]
    fn chat_message_wire_names() {
        let msg: ChatMessage = serde_json::from_str(
            r#"{"chatRoom":"https://chat/room1","sender":"bob@+15557654321","text":"hi"}"#,
        )
        .unwrap();
        assert_eq!(msg.chat_room, "https://chat/room1");
        assert_eq!(msg.sender.handle(), "bob");
        assert_eq!(msg.text, "hi");
    }

    #[test]
    fn presence_action_unknown_maps_to_other() {
        let ev: PresenceEvent =
            serde_json::from_str(r#"{"action":"state-change","uuid":"u@+1"}"#).unwrap();
        assert_eq!(ev.action, PresenceAction::Other);

        let ev: PresenceEvent = serde_json::from_str(r#"{"action":"timeout","uuid":"u@+1"}"#).unwrap();
        assert_eq!(ev.action, PresenceAction::Timeout);
    }
}
