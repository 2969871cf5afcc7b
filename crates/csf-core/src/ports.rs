use async_trait::async_trait;

use crate::{domain::SmsInstruction, Result};

/// Key-value persistence port.
///
/// The destination set crosses invocations through this store; values are
/// ordered sequences of participant-identity strings. `get`/`set` are plain
/// last-writer-wins operations — there is no compare-and-swap at this
/// boundary, so callers that need atomicity must serialize their writes.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<String>>>;
    async fn set(&self, key: &str, value: Vec<String>) -> Result<()>;
}

/// Outbound publish port for SMS send instructions.
///
/// Implementations enqueue the instruction onto a well-known channel consumed
/// by the SMS provider; delivery is fire-and-forget from the router's side.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn publish_sms(&self, channel: &str, sms: &SmsInstruction) -> Result<()>;
}
