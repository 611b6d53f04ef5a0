//! Telegram Output
//!
//! Makes model output safe for the Bot API: HTML repair for
//! `parse_mode: HTML` and splitting to the message length limit.
//! Sending is left to the caller.

mod chunk;
mod html;

pub use chunk::{split_for_telegram, split_message};
pub use html::{escape_text, sanitize_telegram_html};
