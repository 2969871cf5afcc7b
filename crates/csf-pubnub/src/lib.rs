//! PubNub HTTP adapter.
//!
//! This crate implements the `csf-core` SmsGateway over PubNub's publish API
//! and feeds inbound chat/presence envelopes from the v2 long-poll subscribe
//! API. Nothing else in the workspace speaks HTTP.

use std::time::Duration;

use async_trait::async_trait;

use csf_core::{config::Config, domain::SmsInstruction, errors::Error, ports::SmsGateway, Result};

pub mod envelope;
pub mod feed;

use envelope::{SubscribeBatch, SubscribeCursor};

#[derive(Clone)]
pub struct PubNubClient {
    http: reqwest::Client,
    origin: String,
    publish_key: String,
    subscribe_key: String,
    client_uuid: String,
    chat_channel: String,
    presence_channel: String,
    subscribe_timeout: Duration,
    publish_timeout: Duration,
    resubscribe_backoff: Duration,
}

impl PubNubClient {
    pub fn new(cfg: &Config) -> Self {
        // No default timeout on the client itself: the subscribe long-poll and
        // the publish call get their own per-request deadlines.
        let http = reqwest::Client::builder()
            .build()
            .expect("reqwest client build");

        Self {
            http,
            origin: cfg.origin.clone(),
            publish_key: cfg.publish_key.clone(),
            subscribe_key: cfg.subscribe_key.clone(),
            client_uuid: cfg.client_uuid.clone(),
            chat_channel: cfg.chat_channel.clone(),
            presence_channel: cfg.presence_channel(),
            subscribe_timeout: cfg.subscribe_timeout,
            publish_timeout: cfg.publish_timeout,
            resubscribe_backoff: cfg.resubscribe_backoff,
        }
    }

    /// Chat channel plus its presence companion, as the subscribe path wants
    /// them.
    pub fn channel_list(&self) -> String {
        format!(
            "{},{}",
            urlencoding::encode(&self.chat_channel),
            urlencoding::encode(&self.presence_channel)
        )
    }

    fn subscribe_url(&self, cursor: &SubscribeCursor) -> String {
        let mut url = format!(
            "{}/v2/subscribe/{}/{}/0?uuid={}&tt={}",
            self.origin,
            self.subscribe_key,
            self.channel_list(),
            urlencoding::encode(&self.client_uuid),
            cursor.timetoken,
        );
        if let Some(region) = cursor.region {
            url.push_str(&format!("&tr={region}"));
        }
        url
    }

    fn publish_url(&self, channel: &str, payload: &str) -> String {
        format!(
            "{}/publish/{}/{}/0/{}/0/{}?uuid={}",
            self.origin,
            self.publish_key,
            self.subscribe_key,
            urlencoding::encode(channel),
            urlencoding::encode(payload),
            urlencoding::encode(&self.client_uuid),
        )
    }

    /// One long-poll subscribe round: decoded envelopes plus the next cursor.
    pub async fn subscribe_once(&self, cursor: &SubscribeCursor) -> Result<SubscribeBatch> {
        let resp = self
            .http
            .get(self.subscribe_url(cursor))
            .timeout(self.subscribe_timeout)
            .send()
            .await
            .map_err(|e| Error::Gateway(format!("pubnub subscribe error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Gateway(format!(
                "pubnub subscribe failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let raw: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| Error::Gateway(format!("pubnub subscribe json error: {e}")))?;

        envelope::decode_subscribe_response(&raw, &self.presence_channel)
    }

    pub(crate) fn resubscribe_backoff(&self) -> Duration {
        self.resubscribe_backoff
    }
}

#[async_trait]
impl SmsGateway for PubNubClient {
    async fn publish_sms(&self, channel: &str, sms: &SmsInstruction) -> Result<()> {
        let payload = serde_json::to_string(sms)?;

        let resp = self
            .http
            .get(self.publish_url(channel, &payload))
            .timeout(self.publish_timeout)
            .send()
            .await
            .map_err(|e| Error::Gateway(format!("pubnub publish error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Gateway(format!(
                "pubnub publish failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            publish_key: "pub-key".to_string(),
            subscribe_key: "sub-key".to_string(),
            chat_channel: "chat-channel".to_string(),
            sms_channel: "infobip_sms".to_string(),
            destination_key: "smsDestinations".to_string(),
            client_uuid: "sms-fallback-router".to_string(),
            origin: "https://ps.pndsn.com".to_string(),
            subscribe_timeout: Duration::from_secs(310),
            publish_timeout: Duration::from_secs(10),
            resubscribe_backoff: Duration::from_secs(3),
            state_file: None,
        }
    }

    #[test]
    fn subscribe_url_carries_both_channels_and_the_cursor() {
        let client = PubNubClient::new(&test_config());
        let url = client.subscribe_url(&SubscribeCursor {
            timetoken: "17000000000000000".to_string(),
            region: Some(12),
        });
        assert_eq!(
            url,
            "https://ps.pndsn.com/v2/subscribe/sub-key/chat-channel,chat-channel-pnpres/0\
             ?uuid=sms-fallback-router&tt=17000000000000000&tr=12"
        );
    }

    #[test]
    fn publish_url_percent_encodes_the_payload() {
        let client = PubNubClient::new(&test_config());
        let url = client.publish_url("infobip_sms", r#"{"to":"+1","text":"hi there"}"#);
        assert!(url.starts_with("https://ps.pndsn.com/publish/pub-key/sub-key/0/infobip_sms/0/"));
        assert!(url.contains("%7B%22to%22%3A%22%2B1%22%2C%22text%22%3A%22hi%20there%22%7D"));
    }
}
