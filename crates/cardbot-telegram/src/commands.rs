//! Bot command handlers.
//!
//! Commands are the thin inbound surface; each one maps straight onto a store
//! or engine operation. Validation (missing chat id, malformed day counts)
//! happens here, before anything reaches the core.

use std::sync::Arc;

use chrono::Local;
use teloxide::{prelude::*, types::ParseMode};

use cardbot_core::{
    caption::{escape_html, format_caption},
    domain::{DayKey, RecipientId},
    ports::DeliveryOutcome,
};

use crate::router::AppState;

const MAX_SENDCARDS_DAYS: usize = 31;

/// Split `/cmd@botname arg1 ...` into a lowercase command and its argument
/// string.
pub(crate) fn parse_command(text: &str) -> (String, String) {
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

pub(crate) fn is_admin(chat_id: i64, admin_chat_ids: &[i64]) -> bool {
    !admin_chat_ids.is_empty() && admin_chat_ids.contains(&chat_id)
}

pub async fn handle_command(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let (cmd, args) = parse_command(msg.text().unwrap_or(""));

    match cmd.as_str() {
        "start" | "subscribe" => subscribe(bot, msg, state).await,
        "stop" | "unsubscribe" => unsubscribe(bot, msg, state).await,
        "today" => send_today(bot, msg, state).await,
        "sendcards" => send_cards(bot, msg, state, &args).await,
        "status" => status(bot, msg, state).await,
        _ => help(bot, msg).await,
    }
}

async fn subscribe(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let chat_id = msg.chat.id.0;
    let display_name = msg.from().map(|u| u.first_name.clone());
    let handle = msg.from().and_then(|u| u.username.clone());

    let result = state
        .subscribers
        .upsert_active(
            RecipientId(chat_id),
            display_name.as_deref(),
            handle.as_deref(),
        )
        .await;

    let reply = match result {
        Ok(_) => {
            "\u{2705} <b>Subscribed!</b>\n\nYou will now receive a greeting card every day. Send /stop to unsubscribe.".to_string()
        }
        Err(e) => {
            tracing::error!(chat_id, error = %e, "subscribe failed");
            "Something went wrong, please try again later.".to_string()
        }
    };

    bot.send_message(msg.chat.id, reply)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

async fn unsubscribe(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let chat_id = msg.chat.id.0;

    let reply = match state.subscribers.deactivate(RecipientId(chat_id)).await {
        Ok(()) => "Unsubscribed. Send /start whenever you want the cards back.".to_string(),
        Err(e) => {
            tracing::error!(chat_id, error = %e, "unsubscribe failed");
            "Something went wrong, please try again later.".to_string()
        }
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

/// Deliver today's card to the requesting chat only, subscriber or not.
async fn send_today(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let chat_id = msg.chat.id.0;
    let today = DayKey::from_date(Local::now().date_naive());

    let card = match state.cards.resolve(today).await {
        Ok(card) => card,
        Err(e) => {
            tracing::error!(chat_id, error = %e, "card lookup failed");
            bot.send_message(msg.chat.id, "Something went wrong, please try again later.")
                .await?;
            return Ok(());
        }
    };

    let Some(card) = card else {
        bot.send_message(msg.chat.id, "No card for today yet — check back tomorrow!")
            .await?;
        return Ok(());
    };

    let caption = format_caption(&card);
    match state
        .delivery
        .deliver(RecipientId(chat_id), &card.media_url, &caption)
        .await
    {
        DeliveryOutcome::Delivered => {}
        DeliveryOutcome::Failed { reason } => {
            tracing::warn!(chat_id, %reason, "on-demand card delivery failed");
            bot.send_message(msg.chat.id, "Could not send today's card, please try again later.")
                .await?;
        }
    }
    Ok(())
}

/// Admin: broadcast today and the previous N-1 days to all subscribers.
async fn send_cards(
    bot: Bot,
    msg: Message,
    state: Arc<AppState>,
    args: &str,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id.0;
    if !is_admin(chat_id, &state.cfg.admin_chat_ids) {
        bot.send_message(msg.chat.id, "This command is for the bot admin.")
            .await?;
        return Ok(());
    }

    let days = match args.split_whitespace().next() {
        None => state.cfg.broadcast_days,
        Some(n) => match n.parse::<usize>() {
            Ok(n) if (1..=MAX_SENDCARDS_DAYS).contains(&n) => n,
            _ => {
                bot.send_message(
                    msg.chat.id,
                    format!("Usage: /sendcards [1-{MAX_SENDCARDS_DAYS}]"),
                )
                .await?;
                return Ok(());
            }
        },
    };

    let day_keys = DayKey::walk_back(Local::now().date_naive(), days);
    let reply = match state.broadcaster.broadcast(&day_keys).await {
        Ok(report) => format!("\u{1F4EC} {}", escape_html(&report.summary())),
        Err(e) => {
            tracing::error!(chat_id, error = %e, "manual broadcast failed");
            format!("Broadcast failed: {}", escape_html(&e.to_string()))
        }
    };

    bot.send_message(msg.chat.id, reply)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

async fn status(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let chat_id = msg.chat.id.0;
    if !is_admin(chat_id, &state.cfg.admin_chat_ids) {
        bot.send_message(msg.chat.id, "This command is for the bot admin.")
            .await?;
        return Ok(());
    }

    let reply = match state.subscribers.count_active().await {
        Ok(n) => format!("Active subscribers: {n}"),
        Err(e) => {
            tracing::error!(chat_id, error = %e, "count_active failed");
            "Something went wrong, please try again later.".to_string()
        }
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

async fn help(bot: Bot, msg: Message) -> ResponseResult<()> {
    bot.send_message(
        msg.chat.id,
        "/start — subscribe to daily greeting cards\n\
         /stop — unsubscribe\n\
         /today — get today's card",
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_command_strips_slash_and_botname() {
        assert_eq!(
            parse_command("/sendcards@daily_card_bot 5"),
            ("sendcards".to_string(), "5".to_string())
        );
        assert_eq!(parse_command("/START"), ("start".to_string(), String::new()));
        assert_eq!(
            parse_command("  /today  "),
            ("today".to_string(), String::new())
        );
    }

    #[test]
    fn parse_command_keeps_full_argument_string() {
        let (cmd, args) = parse_command("/sendcards 3 extra words");
        assert_eq!(cmd, "sendcards");
        assert_eq!(args, "3 extra words");
    }

    #[test]
    fn admin_gate_requires_a_configured_list() {
        assert!(!is_admin(1, &[]));
        assert!(is_admin(1, &[1, 2]));
        assert!(!is_admin(3, &[1, 2]));
    }
}
