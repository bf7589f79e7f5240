//! Telegram update handlers.
//!
//! Only text messages reach the quiz; other message kinds are ignored.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use crate::router::AppState;

mod text;

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    text::handle_text(msg.chat.id.0, text, state).await;
    Ok(())
}
