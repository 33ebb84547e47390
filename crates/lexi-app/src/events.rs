use std::ops::ControlFlow;
use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use lexi_types::AppEvent;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::state::{AppState, Backend};

pub mod cache;
pub mod collections;
pub mod define;
pub mod history;

use cache::{handle_cache_clear, handle_cache_stats};
use collections::{handle_favorite, handle_quiz};
use define::{handle_replay, spawn_define};
use history::{handle_history_clear, handle_history_list};

/// App's main loop
pub async fn event_loop(
    state: Arc<AppState>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    // Commands typed meanwhile wait in the channel until the collections are loaded
    let backend = {
        let config = state.config.read().await;
        Backend::open(&config).await?
    };

    run_backend(backend, ui_to_app_rx, app_to_ui_tx).await
}

/// Serve events against an opened backend until `Quit` or channel close
pub async fn run_backend(
    backend: Backend,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let display_done = CancellationToken::new();
    let forwarder = forward_display(&backend, app_to_ui_tx.clone(), display_done.clone());
    app_to_ui_tx.send(AppEvent::BackendReady).await?;

    // Define requests in flight; each runs independently of the loop
    let mut in_flight = JoinSet::new();

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = ui_to_app_rx.recv().await?;
        tracing::debug!(
            "[EVENT_LOOP] EVENT RECEIVED: {:?}",
            std::mem::discriminant(&event)
        );

        let flow = handle_events(&backend, &mut in_flight, &app_to_ui_tx, event).await?;
        while in_flight.try_join_next().is_some() {}

        if flow.is_break() {
            tracing::info!("[EVENT_LOOP] Quit requested, settling {} requests", in_flight.len());
            while in_flight.join_next().await.is_some() {}
            display_done.cancel();
            forwarder.await?;
            app_to_ui_tx.send(AppEvent::Quit).await?;
            return Ok(());
        }
    }
}

/// Push every change of the displayed result to the renderer. Once `done`
/// fires, a pending last change is still delivered before the task ends.
fn forward_display(
    backend: &Backend,
    app_to_ui_tx: AsyncSender<AppEvent>,
    done: CancellationToken,
) -> JoinHandle<()> {
    let mut display = backend.orchestrator.display().subscribe();

    tokio::spawn(async move {
        loop {
            let changed = tokio::select! {
                changed = display.changed() => changed.is_ok(),
                _ = done.cancelled() => display.has_changed().unwrap_or(false),
            };
            if !changed {
                break;
            }

            let current = display.borrow_and_update().clone();
            if app_to_ui_tx.send(AppEvent::Display(current)).await.is_err() || done.is_cancelled() {
                break;
            }
        }
    })
}

async fn handle_events(
    backend: &Backend,
    in_flight: &mut JoinSet<()>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> anyhow::Result<ControlFlow<()>> {
    match event {
        AppEvent::Define(params) => {
            spawn_define(in_flight, backend.orchestrator.clone(), params, app_to_ui_tx.clone());
        }
        AppEvent::Replay(index) => {
            handle_replay(backend, in_flight, index, app_to_ui_tx).await?;
        }
        AppEvent::FavoriteAdd(_)
        | AppEvent::FavoriteRemove(_)
        | AppEvent::FavoriteToggle(_)
        | AppEvent::FavoritesList => {
            handle_favorite(backend, event, app_to_ui_tx).await?;
        }
        AppEvent::QuizAdd(_) | AppEvent::QuizRemove(_) | AppEvent::QuizList => {
            handle_quiz(backend, event, app_to_ui_tx).await?;
        }
        AppEvent::HistoryList(sort) => {
            handle_history_list(backend, sort, app_to_ui_tx).await?;
        }
        AppEvent::HistoryClear { confirmed } => {
            handle_history_clear(backend, confirmed, app_to_ui_tx).await?;
        }
        AppEvent::CacheClear => {
            handle_cache_clear(backend, app_to_ui_tx).await?;
        }
        AppEvent::CacheStats => {
            handle_cache_stats(backend, app_to_ui_tx).await?;
        }
        AppEvent::Quit => return Ok(ControlFlow::Break(())),
        AppEvent::BackendReady
        | AppEvent::Display(_)
        | AppEvent::Notice(_)
        | AppEvent::ShowFavorites(_)
        | AppEvent::ShowQuiz(_)
        | AppEvent::ShowHistory(_)
        | AppEvent::ShowCacheStats { .. } => {
            // UI-only events, ignore in backend
        }
    }

    Ok(ControlFlow::Continue(()))
}
