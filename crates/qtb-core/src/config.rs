use std::{env, path::PathBuf};

use crate::{catalog::QuizCatalog, errors::Error, texts, Result};

/// Which transport the binary should run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transport {
    Telegram,
    Console,
}

/// Typed configuration for the bot.
#[derive(Clone, Debug)]
pub struct Config {
    pub transport: Transport,
    pub telegram_bot_token: String,
    pub catalog_path: Option<PathBuf>,
    pub help_text: String,
    pub console_chat_id: i64,
}

impl Config {
    pub fn load() -> Result<Self> {
        // A missing `.env` is fine; values already in the environment win.
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(Error::Config(format!("failed to load .env: {e}")));
            }
        }

        let transport = match env_str("QTB_TRANSPORT").and_then(non_empty) {
            None => Transport::Telegram,
            Some(v) => parse_transport(&v)?,
        };

        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if transport == Transport::Telegram && telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let catalog_path = env_path("QUIZ_CATALOG_PATH");
        let help_text = env_str("QTB_HELP_TEXT")
            .and_then(non_empty)
            .unwrap_or_else(|| texts::DEFAULT_HELP.to_string());
        let console_chat_id = match env_str("QTB_CONSOLE_CHAT_ID").and_then(non_empty) {
            None => 0,
            Some(v) => parse_chat_id(&v)?,
        };

        Ok(Self {
            transport,
            telegram_bot_token,
            catalog_path,
            help_text,
            console_chat_id,
        })
    }

    /// The configured catalog file, or the built-in catalog when none is set.
    pub fn load_catalog(&self) -> Result<QuizCatalog> {
        match &self.catalog_path {
            Some(path) => QuizCatalog::from_json_file(path),
            None => Ok(QuizCatalog::default()),
        }
    }
}

fn parse_transport(v: &str) -> Result<Transport> {
    match v.trim().to_lowercase().as_str() {
        "telegram" => Ok(Transport::Telegram),
        "console" => Ok(Transport::Console),
        other => Err(Error::Config(format!(
            "QTB_TRANSPORT must be `telegram` or `console`, got `{other}`"
        ))),
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn parse_chat_id(v: &str) -> Result<i64> {
    v.trim().parse::<i64>().map_err(|_| {
        Error::Config(format!(
            "QTB_CONSOLE_CHAT_ID must be an integer, got `{}`",
            v.trim()
        ))
    })
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_transport_names() {
        assert_eq!(parse_transport("telegram").unwrap(), Transport::Telegram);
        assert_eq!(parse_transport(" Console ").unwrap(), Transport::Console);
        assert!(matches!(parse_transport("discord"), Err(Error::Config(_))));
    }

    #[test]
    fn parses_console_chat_id() {
        assert_eq!(parse_chat_id("42").unwrap(), 42);
        assert_eq!(parse_chat_id(" -7 ").unwrap(), -7);
        assert!(matches!(parse_chat_id("abc"), Err(Error::Config(_))));
        assert!(matches!(parse_chat_id("1.5"), Err(Error::Config(_))));
    }

    #[test]
    fn blank_values_are_treated_as_unset() {
        assert_eq!(non_empty("  ".to_string()), None);
        assert_eq!(non_empty("x".to_string()), Some("x".to_string()));
    }

    #[test]
    fn falls_back_to_builtin_catalog() {
        let cfg = Config {
            transport: Transport::Console,
            telegram_bot_token: String::new(),
            catalog_path: None,
            help_text: texts::DEFAULT_HELP.to_string(),
            console_chat_id: 0,
        };
        assert_eq!(cfg.load_catalog().unwrap().len(), 2);

        let missing = Config {
            catalog_path: Some(PathBuf::from("/nonexistent/qtb-catalog.json")),
            ..cfg
        };
        assert!(matches!(missing.load_catalog(), Err(Error::Catalog(_))));
    }
}
