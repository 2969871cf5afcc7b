use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{errors::Error, Result};

/// Typed configuration for the router, loaded from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    // PubNub keyset
    pub publish_key: String,
    pub subscribe_key: String,

    // Channel and persistence layout
    pub chat_channel: String,
    pub sms_channel: String,
    pub destination_key: String,

    // Transport knobs
    pub client_uuid: String,
    pub origin: String,
    pub subscribe_timeout: Duration,
    pub publish_timeout: Duration,
    pub resubscribe_backoff: Duration,

    // Local state file; None runs on the in-memory store.
    pub state_file: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let publish_key = env_str("CSF_PUBLISH_KEY").and_then(non_empty).ok_or_else(|| {
            Error::Config("CSF_PUBLISH_KEY environment variable is required".to_string())
        })?;
        let subscribe_key = env_str("CSF_SUBSCRIBE_KEY").and_then(non_empty).ok_or_else(|| {
            Error::Config("CSF_SUBSCRIBE_KEY environment variable is required".to_string())
        })?;

        let chat_channel = env_str("CSF_CHAT_CHANNEL")
            .and_then(non_empty)
            .unwrap_or_else(|| "chat-channel".to_string());
        let sms_channel = env_str("CSF_SMS_CHANNEL")
            .and_then(non_empty)
            .unwrap_or_else(|| "infobip_sms".to_string());
        let destination_key = env_str("CSF_DESTINATION_KEY")
            .and_then(non_empty)
            .unwrap_or_else(|| "smsDestinations".to_string());

        let client_uuid = env_str("CSF_CLIENT_UUID")
            .and_then(non_empty)
            .unwrap_or_else(|| "sms-fallback-router".to_string());
        let origin = env_str("CSF_ORIGIN")
            .and_then(non_empty)
            .unwrap_or_else(|| "https://ps.pndsn.com".to_string());

        // Long-poll reads can legitimately hang for minutes; the publish call
        // should not.
        let subscribe_timeout =
            Duration::from_millis(env_u64("CSF_SUBSCRIBE_TIMEOUT_MS").unwrap_or(310_000));
        let publish_timeout =
            Duration::from_millis(env_u64("CSF_PUBLISH_TIMEOUT_MS").unwrap_or(10_000));
        let resubscribe_backoff =
            Duration::from_millis(env_u64("CSF_RESUBSCRIBE_BACKOFF_MS").unwrap_or(3_000));

        let state_file = env_path("CSF_STATE_FILE");

        Ok(Self {
            publish_key,
            subscribe_key,
            chat_channel,
            sms_channel,
            destination_key,
            client_uuid,
            origin,
            subscribe_timeout,
            publish_timeout,
            resubscribe_backoff,
            state_file,
        })
    }

    /// Presence companion channel of the chat channel.
    pub fn presence_channel(&self) -> String {
        format!("{}-pnpres", self.chat_channel)
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).map(PathBuf::from)
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}
