use std::sync::Arc;

use cardbot_core::{broadcast::Broadcaster, config::Config, schedule::DailyScheduler};
use cardbot_store::{seed::starter_cards, FileCardStore, FileSubscriberStore};
use cardbot_telegram::{router, router::AppState, TelegramDelivery};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cardbot_core::logging::init("cardbot");

    let cfg = Arc::new(Config::load()?);

    let cards = Arc::new(FileCardStore::open(cfg.cards_file.clone())?);
    let seeded = cards.seed_if_empty(starter_cards()).await?;
    if seeded > 0 {
        tracing::info!(cards = seeded, "seeded starter cards");
    }
    let subscribers = Arc::new(FileSubscriberStore::open(cfg.subscribers_file.clone())?);

    let delivery = Arc::new(TelegramDelivery::new(&cfg)?);
    let broadcaster = Arc::new(Broadcaster::new(
        cards.clone(),
        subscribers.clone(),
        delivery.clone(),
    ));

    let _scheduler_handle = if cfg.broadcast_enabled {
        let scheduler = DailyScheduler::new(
            broadcaster.clone(),
            cfg.broadcast_days,
            cfg.broadcast_hour,
            cfg.broadcast_minute,
        );
        Some(scheduler.start())
    } else {
        tracing::info!("scheduled broadcast disabled");
        None
    };

    let state = Arc::new(AppState {
        cfg,
        cards,
        subscribers,
        delivery,
        broadcaster,
    });

    router::run_polling(state).await
}
