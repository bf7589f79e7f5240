//! Line-oriented console transport for trying the bot locally.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use qtb_core::{
    config::Config,
    dispatcher::QuizBot,
    domain::ChatId,
    errors::Error,
    messaging::port::MessagingPort,
    texts, Result,
};

struct ConsoleMessenger;

#[async_trait]
impl MessagingPort for ConsoleMessenger {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()> {
        println!("[{chat_id}] {text}");
        Ok(())
    }
}

pub async fn run(cfg: Arc<Config>) -> Result<()> {
    let catalog = cfg.load_catalog()?;
    let messenger: Arc<dyn MessagingPort> = Arc::new(ConsoleMessenger);
    let quiz = QuizBot::new(catalog, cfg.help_text.clone(), messenger.clone());
    let chat = ChatId(cfg.console_chat_id);

    info!("console transport ready (chat {chat}); type /help");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        match quiz.handle(chat, line).await {
            Ok(()) => {}
            Err(e @ Error::InvalidDelay { .. }) => {
                warn!("rejected reminder: {e}");
                messenger.send_text(chat, texts::NEGATIVE_DELAY).await?;
            }
            Err(e) => return Err(e),
        }
    }

    info!("stdin closed, exiting");
    Ok(())
}
