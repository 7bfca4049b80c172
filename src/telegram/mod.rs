//! All Telegram-specific functionality

pub mod bot;
pub mod client;
pub mod message_formatter;

// Re-export main types for convenience
pub use bot::{TelegramReplier, run_bot};
pub use client::{ChannelClient, ChannelSession};
pub use message_formatter::{MAX_MESSAGE_LENGTH, format_analysis, split_message};
