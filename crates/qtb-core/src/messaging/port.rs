use async_trait::async_trait;

use crate::{domain::ChatId, Result};

/// Cross-messenger outbound port.
///
/// Delivery is fire-and-forget from the core's point of view: the dispatcher
/// logs a failed reply and carries on, the reminder scheduler logs a failed
/// delivery and never retries.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()>;
}
