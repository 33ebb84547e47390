use kanal::AsyncSender;
use lexi_types::{AppEvent, Notice};

use crate::state::Backend;

pub async fn handle_cache_clear(
    backend: &Backend,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let report = backend.repository().cache.clear().await;

    let notice = match report.error {
        None => Notice::success(format!(
            "Removed {} cached definitions",
            report.targeted
        )),
        Some(e) => Notice::warning(format!(
            "Cache reset, but some of the {} entries could not be removed: {e}",
            report.targeted
        )),
    };

    app_to_ui_tx.send(AppEvent::Notice(notice)).await?;
    Ok(())
}

pub async fn handle_cache_stats(
    backend: &Backend,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let stats = backend.repository().cache.stats().await;
    app_to_ui_tx
        .send(AppEvent::ShowCacheStats {
            entries: stats.entries,
            last_write: stats.last_write,
        })
        .await?;
    Ok(())
}
