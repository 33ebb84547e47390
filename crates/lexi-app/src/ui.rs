use std::io::Write;

use chrono::DateTime;
use kanal::AsyncReceiver;
use lexi_types::{AppEvent, Displayed, NoticeKind};

/// Print everything the app sends back until the channel closes
pub async fn ui_loop(app_to_ui_rx: AsyncReceiver<AppEvent>) -> anyhow::Result<()> {
    let interactive = atty::is(atty::Stream::Stdin);

    while let Ok(event) = app_to_ui_rx.recv().await {
        if matches!(event, AppEvent::Quit) {
            break;
        }

        if let Some(text) = render(&event) {
            println!("{text}");
            if interactive {
                print!("> ");
                std::io::stdout().flush().ok();
            }
        }
    }

    Ok(())
}

fn format_time(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "unknown time".to_string())
}

/// Text for one app event, or `None` for events with nothing to show
pub fn render(event: &AppEvent) -> Option<String> {
    let text = match event {
        AppEvent::BackendReady => "Ready. Type `help` for commands.".to_string(),
        AppEvent::Display(Displayed::Empty) => return None,
        AppEvent::Display(Displayed::Loading { word }) => format!("Defining '{word}'..."),
        AppEvent::Display(Displayed::Error(message)) => format!("error: {message}"),
        AppEvent::Display(Displayed::Result(entry)) => {
            let definition = &entry.definition;
            let source = if entry.cache_hit { ", cached" } else { "" };
            format!(
                "{} ({} of {} words, {}{}):\n  {}",
                definition.word,
                definition.actual_length,
                entry.requested_length,
                definition.config.effective_lang,
                source,
                definition.result
            )
        }
        AppEvent::Notice(notice) => {
            let tag = match notice.kind {
                NoticeKind::Info => "info",
                NoticeKind::Success => "ok",
                NoticeKind::Warning => "warn",
                NoticeKind::Error => "error",
            };
            format!("[{tag}] {}", notice.message)
        }
        AppEvent::ShowFavorites(items) if items.is_empty() => "No favorites yet".to_string(),
        AppEvent::ShowFavorites(items) => items
            .iter()
            .map(|f| format!("  * {}", f.word))
            .collect::<Vec<_>>()
            .join("\n"),
        AppEvent::ShowQuiz(items) if items.is_empty() => "Quiz list is empty".to_string(),
        AppEvent::ShowQuiz(items) => items
            .iter()
            .map(|q| format!("  {}  {}", q.id, q.word))
            .collect::<Vec<_>>()
            .join("\n"),
        AppEvent::ShowHistory(items) if items.is_empty() => "History is empty".to_string(),
        AppEvent::ShowHistory(items) => items
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let mut line = format!("  {:>2}. {} [{}]", i + 1, h.word, h.length);
                for value in [&h.tone, &h.context, &h.lang].into_iter().flatten() {
                    line.push_str(&format!(" {value}"));
                }
                line.push_str(&format!(" - {} ({})", h.result.status, format_time(h.timestamp)));
                line
            })
            .collect::<Vec<_>>()
            .join("\n"),
        AppEvent::ShowCacheStats {
            entries,
            last_write,
        } => match last_write {
            Some(at) => format!("{entries} cached definitions, last saved {}", format_time(*at)),
            None => format!("{entries} cached definitions"),
        },
        _ => return None,
    };

    Some(text)
}
