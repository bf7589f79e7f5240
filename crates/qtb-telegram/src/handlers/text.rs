use std::sync::Arc;

use tracing::warn;

use qtb_core::{domain::ChatId, errors::Error, texts};

use crate::router::AppState;

/// Feed one text message into the dispatcher.
///
/// The dispatcher answers everything it can recover from itself; a negative
/// reminder delay comes back as an error and is turned into a reply here.
pub async fn handle_text(chat_id: i64, text: &str, state: Arc<AppState>) {
    let chat = ChatId(chat_id);
    match state.quiz.handle(chat, text).await {
        Ok(()) => {}
        Err(e @ Error::InvalidDelay { .. }) => {
            warn!(chat_id, "rejected reminder: {e}");
            if let Err(e) = state.messenger.send_text(chat, texts::NEGATIVE_DELAY).await {
                warn!(chat_id, "failed to send reply: {e}");
            }
        }
        Err(e) => warn!(chat_id, "message handling failed: {e}"),
    }
}
