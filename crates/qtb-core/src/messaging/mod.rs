//! Cross-messenger abstractions (Telegram today, console for local runs).

pub mod port;
