use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};
use tracing::info;

use qtb_core::{config::Config, dispatcher::QuizBot, messaging::port::MessagingPort};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub quiz: Arc<QuizBot>,
    pub messenger: Arc<dyn MessagingPort>,
}

pub async fn run_polling(cfg: Arc<Config>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    if let Ok(me) = bot.get_me().await {
        info!("qtb started: @{}", me.username());
    }

    let catalog = cfg.load_catalog()?;
    info!("Quiz catalog: {} questions", catalog.len());

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let quiz = Arc::new(QuizBot::new(
        catalog,
        cfg.help_text.clone(),
        messenger.clone(),
    ));

    let state = Arc::new(AppState { quiz, messenger });

    // The default distribution key is the chat id: updates of one chat are
    // handled in order, different chats run concurrently.
    let handler =
        dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .default_handler(|_| async {})
        .build()
        .dispatch()
        .await;

    Ok(())
}
