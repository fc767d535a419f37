use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use cardbot_core::{
    broadcast::Broadcaster,
    config::Config,
    ports::{CardResolver, DeliveryClient, SubscriberStore},
};

use crate::commands;

/// Shared handler state. The router talks to the same ports the broadcast
/// engine does; there is exactly one engine behind both the commands and the
/// scheduler.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub cards: Arc<dyn CardResolver>,
    pub subscribers: Arc<dyn SubscriberStore>,
    pub delivery: Arc<dyn DeliveryClient>,
    pub broadcaster: Arc<Broadcaster>,
}

pub async fn run_polling(state: Arc<AppState>) -> anyhow::Result<()> {
    let bot = Bot::new(state.cfg.telegram_bot_token.clone());

    if let Ok(me) = bot.get_me().await {
        tracing::info!(bot = me.username(), "cardbot started");
    }
    match state.subscribers.count_active().await {
        Ok(n) => tracing::info!(active_subscribers = n, "subscriber store loaded"),
        Err(e) => tracing::warn!(error = %e, "could not read subscriber count"),
    }

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    if text.starts_with('/') {
        return commands::handle_command(bot, msg, state).await;
    }

    // Anything that is not a command gets the short usage hint.
    bot.send_message(
        msg.chat.id,
        "Send /start to subscribe to daily cards, or /today for today's card.",
    )
    .await?;
    Ok(())
}
