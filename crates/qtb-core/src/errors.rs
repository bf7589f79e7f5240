/// Core error type for the quiz bot.
///
/// Adapter crates should map their specific errors into this type so the bot
/// core can handle failures consistently.
///
/// Conditions the dispatcher recovers from on its own (unknown input, a delay
/// that is not a number, nothing left to review) never show up here: they are
/// answered with a message to the user instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A reminder delay below zero. Propagated to the caller of the dispatcher.
    #[error("negative delay: {seconds}")]
    InvalidDelay { seconds: i64 },

    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
