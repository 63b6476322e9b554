//! Telegram Update Handlers

use teloxide::prelude::*;
use teloxide::types::{BotCommand, ChatAction, ParseMode};

use wallet_scanner::Command;

use crate::state::AppState;

/// Commands advertised in the Telegram client menu
pub fn bot_commands() -> Vec<BotCommand> {
    Command::ALL
        .iter()
        .map(|c| BotCommand::new(c.name(), c.description()))
        .collect()
}

/// Every text message gets exactly one reply. Errors are logged, never
/// returned to the dispatcher.
pub async fn on_message(bot: Bot, msg: Message, state: AppState) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        tracing::debug!(chat = %msg.chat.id, "ignoring non-text message");
        return Ok(());
    };

    if let Err(e) = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await {
        tracing::debug!(chat = %msg.chat.id, "Typing action failed: {}", e);
    }

    let reply = state.handler.handle(text).await;
    tracing::info!(chat = %msg.chat.id, outcome = ?reply.outcome, "replying");

    let sent = bot
        .send_message(msg.chat.id, reply.text.clone())
        .parse_mode(ParseMode::Html)
        .disable_web_page_preview(true)
        .await;

    if let Err(e) = sent {
        // Markup rejected by Telegram: fall back to plain text
        tracing::warn!(chat = %msg.chat.id, "HTML send failed: {}", e);
        if let Err(e) = bot.send_message(msg.chat.id, reply.text).await {
            tracing::error!(chat = %msg.chat.id, "Failed to send reply: {}", e);
        }
    }

    Ok(())
}
