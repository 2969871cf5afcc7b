use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use csf_core::{
    config::Config,
    dispatch::FallbackDispatcher,
    ports::KeyValueStore,
    presence::DestinationSetManager,
    router::Router,
    store::{file::JsonFileStore, memory::MemoryStore},
};
use csf_pubnub::PubNubClient;

#[tokio::main]
async fn main() -> Result<(), csf_core::Error> {
    csf_core::logging::init("csf")?;

    let cfg = Arc::new(Config::load()?);
    tracing::info!(
        chat_channel = %cfg.chat_channel,
        sms_channel = %cfg.sms_channel,
        "csf started"
    );

    let store: Arc<dyn KeyValueStore> = match &cfg.state_file {
        Some(path) => {
            tracing::info!(path = %path.display(), "using file-backed destination store");
            Arc::new(JsonFileStore::new(path.clone()))
        }
        None => {
            tracing::info!("using in-memory destination store");
            Arc::new(MemoryStore::default())
        }
    };

    let client = Arc::new(PubNubClient::new(&cfg));
    let router = Arc::new(Router::new(
        DestinationSetManager::new(store.clone(), cfg.destination_key.clone()),
        FallbackDispatcher::new(
            store,
            client.clone(),
            cfg.destination_key.clone(),
            cfg.sms_channel.clone(),
        ),
    ));

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "failed to listen for shutdown signal");
            }
            shutdown.cancel();
        });
    }

    csf_pubnub::feed::run(client, router, shutdown)
        .await
        .map_err(|e| csf_core::Error::Gateway(format!("subscribe loop failed: {e}")))?;

    Ok(())
}
