//! Subscribe loop: pulls envelopes from PubNub and hands them to the router.

use std::sync::Arc;

use csf_core::router::Router;
use tokio_util::sync::CancellationToken;

use crate::{envelope::SubscribeCursor, PubNubClient};

/// Run the long-poll subscribe loop until the token is cancelled.
///
/// Transport errors back off briefly and resubscribe with the same cursor.
/// Events are handled strictly in arrival order, one at a time — that is what
/// keeps destination-set writes single-writer in a deployed router.
pub async fn run(
    client: Arc<PubNubClient>,
    router: Arc<Router>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let mut cursor = SubscribeCursor::default();
    tracing::info!(channels = %client.channel_list(), "subscribe loop started");

    loop {
        let round = tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!("subscribe loop stopped");
                return Ok(());
            }
            res = client.subscribe_once(&cursor) => res,
        };

        match round {
            Ok(batch) => {
                cursor = batch.cursor;
                for event in &batch.events {
                    router.handle(event).await;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "subscribe failed, backing off");
                tokio::time::sleep(client.resubscribe_backoff()).await;
            }
        }
    }
}
