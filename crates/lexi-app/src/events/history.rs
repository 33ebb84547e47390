use kanal::AsyncSender;
use lexi_types::{AppEvent, HistorySort, Notice};

use crate::state::Backend;

pub async fn handle_history_list(
    backend: &Backend,
    sort: HistorySort,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let items = backend.repository().history.sorted(sort).await;
    app_to_ui_tx.send(AppEvent::ShowHistory(items)).await?;
    Ok(())
}

/// Clearing history is destructive; without confirmation only explain how
pub async fn handle_history_clear(
    backend: &Backend,
    confirmed: bool,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let notice = if !confirmed {
        Notice::warning("This deletes your whole history. Run `history clear --yes` to confirm")
    } else {
        let report = backend.repository().history.clear_confirmed().await;
        match report.error {
            None => Notice::success(format!("Cleared {} history entries", report.targeted)),
            Some(e) => Notice::warning(format!("History cleared, but saving failed: {e}")),
        }
    };

    app_to_ui_tx.send(AppEvent::Notice(notice)).await?;
    Ok(())
}
