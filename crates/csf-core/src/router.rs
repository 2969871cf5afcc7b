use crate::{
    dispatch::FallbackDispatcher,
    domain::{ChatMessage, PresenceEvent},
    presence::DestinationSetManager,
};

/// Acknowledgment returned to the event host. Only "continue/accept" exists;
/// there is no reject or drop path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ack;

/// One inbound envelope from the event transport, already decoded.
#[derive(Clone, Debug)]
pub enum InboundEvent {
    Presence(PresenceEvent),
    Message(ChatMessage),
}

/// Routes decoded envelopes to the presence manager or the dispatcher.
pub struct Router {
    manager: DestinationSetManager,
    dispatcher: FallbackDispatcher,
}

impl Router {
    pub fn new(manager: DestinationSetManager, dispatcher: FallbackDispatcher) -> Self {
        Self {
            manager,
            dispatcher,
        }
    }

    /// Handle one event. Handler failures are logged and swallowed: the event
    /// is acknowledged whether or not its side effects landed.
    pub async fn handle(&self, event: &InboundEvent) -> Ack {
        let outcome = match event {
            InboundEvent::Presence(ev) => self.manager.apply(ev).await,
            InboundEvent::Message(msg) => self.dispatcher.dispatch(msg).await,
        };
        if let Err(e) = outcome {
            tracing::error!(error = %e, "event handler failed");
        }
        Ack
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ParticipantId, PresenceAction, SmsInstruction};
    use crate::ports::{KeyValueStore, SmsGateway};
    use crate::store::memory::MemoryStore;
    use crate::{Error, Result};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    const KEY: &str = "smsDestinations";

    #[derive(Default)]
    struct FakeGateway {
        published: Mutex<Vec<SmsInstruction>>,
    }

    #[async_trait]
    impl SmsGateway for FakeGateway {
        async fn publish_sms(&self, _channel: &str, sms: &SmsInstruction) -> Result<()> {
            self.published.lock().unwrap().push(sms.clone());
            Ok(())
        }
    }

    fn router(store: Arc<MemoryStore>, gateway: Arc<FakeGateway>) -> Router {
        Router::new(
            DestinationSetManager::new(store.clone(), KEY),
            FallbackDispatcher::new(store, gateway, KEY, "infobip_sms"),
        )
    }

    #[tokio::test]
    async fn presence_then_message_flows_through_the_persisted_set() {
        let store = Arc::new(MemoryStore::default());
        let gateway = Arc::new(FakeGateway::default());
        let r = router(store, gateway.clone());

        r.handle(&InboundEvent::Presence(PresenceEvent {
            action: PresenceAction::Timeout,
            uuid: ParticipantId("alice@+15551234567".to_string()),
        }))
        .await;

        r.handle(&InboundEvent::Message(ChatMessage {
            chat_room: "https://chat/room1".to_string(),
            sender: ParticipantId("bob@+15557654321".to_string()),
            text: "hi".to_string(),
        }))
        .await;

        let published = gateway.published.lock().unwrap().clone();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].to, "+15551234567");
    }

    struct FailingStore;

    #[async_trait]
    impl KeyValueStore for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<Vec<String>>> {
            Err(Error::Store("unavailable".to_string()))
        }

        async fn set(&self, _key: &str, _value: Vec<String>) -> Result<()> {
            Err(Error::Store("unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn handler_failure_still_acknowledges() {
        let store = Arc::new(FailingStore);
        let gateway = Arc::new(FakeGateway::default());
        let r = Router::new(
            DestinationSetManager::new(store.clone(), KEY),
            FallbackDispatcher::new(store, gateway, KEY, "infobip_sms"),
        );

        let ack = r
            .handle(&InboundEvent::Presence(PresenceEvent {
                action: PresenceAction::Timeout,
                uuid: ParticipantId("alice@+1".to_string()),
            }))
            .await;
        assert_eq!(ack, Ack);
    }
}
