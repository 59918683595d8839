//! Two-party Telegram relay bot.

pub mod commands;
pub mod config;
pub mod error;
pub mod messenger;
