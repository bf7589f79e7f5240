//! Core domain + application logic for the quiz Telegram bot.
//!
//! This crate is intentionally framework-agnostic. Telegram (or any other
//! messenger) lives behind the `MessagingPort` trait implemented in adapter crates.

pub mod catalog;
pub mod config;
pub mod dispatcher;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod messaging;
pub mod scheduler;
pub mod session;
pub mod texts;

pub use errors::{Error, Result};
