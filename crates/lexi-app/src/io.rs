use kanal::AsyncSender;
use lexi_io::console::Console;
use lexi_types::{AppEvent, Notice};
use tokio_util::sync::CancellationToken;

use crate::commands::{HELP, Input, parse_command};

/// Turn console lines into app events. Parse errors and help go straight
/// to the renderer. End of input asks the app to quit.
pub async fn watcher_io(
    cancel: CancellationToken,
    ui_to_app_tx: AsyncSender<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    tracing::info!("Starting console watcher");
    let mut console = Console::stdin();

    loop {
        let line = tokio::select! {
            line = console.next_line() => line?,
            _ = cancel.cancelled() => {
                tracing::info!("Console watcher stopping");
                return Ok(());
            }
        };

        let Some(line) = line else {
            ui_to_app_tx.send(AppEvent::Quit).await?;
            return Ok(());
        };

        forward_line(&line, &ui_to_app_tx, &app_to_ui_tx).await?;
    }
}

pub async fn forward_line(
    line: &str,
    ui_to_app_tx: &AsyncSender<AppEvent>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    match parse_command(line) {
        Ok(Input::Event(event)) => ui_to_app_tx.send(event).await?,
        Ok(Input::Help) => {
            app_to_ui_tx
                .send(AppEvent::Notice(Notice::info(HELP)))
                .await?
        }
        Err(e) => {
            tracing::debug!("Rejected console input '{}': {}", line, e);
            app_to_ui_tx
                .send(AppEvent::Notice(Notice::error(e.to_string())))
                .await?
        }
    }

    Ok(())
}
