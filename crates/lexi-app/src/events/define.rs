use std::sync::Arc;

use kanal::AsyncSender;
use lexi_core::Orchestrator;
use lexi_types::{AppEvent, Notice, RequestParams};
use tokio::task::JoinSet;

use crate::state::Backend;

/// Run the request on its own task so later commands are not held up by
/// the network call
pub fn spawn_define(
    in_flight: &mut JoinSet<()>,
    orchestrator: Arc<Orchestrator>,
    params: RequestParams,
    app_to_ui_tx: AsyncSender<AppEvent>,
) {
    in_flight.spawn(async move {
        if let Err(e) = handle_define(&orchestrator, params, &app_to_ui_tx).await {
            tracing::error!("Failed to deliver define outcome: {}", e);
        }
    });
}

pub async fn handle_define(
    orchestrator: &Orchestrator,
    params: RequestParams,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    tracing::debug!("Define requested: '{}'", params.word);
    let outcome = orchestrator.define(params).await;

    for notice in outcome.notices {
        app_to_ui_tx.send(AppEvent::Notice(notice)).await?;
    }

    Ok(())
}

/// Re-run the `index`-th most recent history entry
pub async fn handle_replay(
    backend: &Backend,
    in_flight: &mut JoinSet<()>,
    index: usize,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let items = backend.repository().history.items().await;

    match items.get(index) {
        Some(item) => {
            tracing::info!("Replaying history entry {}: '{}'", index, item.word);
            spawn_define(
                in_flight,
                backend.orchestrator.clone(),
                item.to_request(),
                app_to_ui_tx.clone(),
            );
        }
        None => {
            app_to_ui_tx
                .send(AppEvent::Notice(Notice::warning(format!(
                    "No history entry #{}",
                    index + 1
                ))))
                .await?;
        }
    }

    Ok(())
}
