use kanal::AsyncSender;
use lexi_types::AppEvent;

use crate::state::Backend;

pub async fn handle_favorite(
    backend: &Backend,
    event: AppEvent,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let favorites = &backend.repository().favorites;

    let reply = match event {
        AppEvent::FavoriteAdd(word) => AppEvent::Notice(favorites.add(&word).await),
        AppEvent::FavoriteRemove(word) => AppEvent::Notice(favorites.remove(&word).await),
        AppEvent::FavoriteToggle(word) => AppEvent::Notice(favorites.toggle(&word).await),
        AppEvent::FavoritesList => AppEvent::ShowFavorites(favorites.items().await),
        other => {
            tracing::warn!("Not a favorites event: {:?}", other);
            return Ok(());
        }
    };

    app_to_ui_tx.send(reply).await?;
    Ok(())
}

pub async fn handle_quiz(
    backend: &Backend,
    event: AppEvent,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let quiz = &backend.repository().quiz;

    let reply = match event {
        AppEvent::QuizAdd(word) => AppEvent::Notice(quiz.add(&word).await),
        AppEvent::QuizRemove(id) => AppEvent::Notice(quiz.remove(id).await),
        AppEvent::QuizList => AppEvent::ShowQuiz(quiz.items().await),
        other => {
            tracing::warn!("Not a quiz event: {:?}", other);
            return Ok(());
        }
    };

    app_to_ui_tx.send(reply).await?;
    Ok(())
}
