//! The broadcast engine: fan a day range of cards out to every active
//! subscriber.
//!
//! This is a best-effort fan-out, not a transactional batch: one unreachable
//! recipient or one missing day never aborts delivery to the rest. The engine
//! loads the active subscriber set exactly once per invocation and holds no
//! state between invocations.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    caption::format_caption,
    domain::DayKey,
    ports::{CardResolver, DeliveryClient, DeliveryOutcome, SubscriberStore},
    Result,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadcastStatus {
    Completed,
    /// Short-circuit: nothing was resolved or sent because nobody is
    /// subscribed.
    NoSubscribers,
}

/// Per-day entry in the report, one per *resolved* day. Days without a card
/// simply do not appear.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub day_key: DayKey,
    pub title: String,
    pub is_holiday: bool,
}

/// Aggregate outcome of one broadcast invocation.
#[derive(Clone, Debug, Serialize)]
pub struct BroadcastReport {
    pub status: BroadcastStatus,
    pub sent_count: u64,
    pub failed_count: u64,
    /// Size of the active-subscriber snapshot taken at the start.
    pub subscriber_count: usize,
    pub days: Vec<DaySummary>,
}

impl BroadcastReport {
    fn no_subscribers() -> Self {
        Self {
            status: BroadcastStatus::NoSubscribers,
            sent_count: 0,
            failed_count: 0,
            subscriber_count: 0,
            days: Vec::new(),
        }
    }

    /// One-line human summary for admin replies.
    pub fn summary(&self) -> String {
        if self.status == BroadcastStatus::NoSubscribers {
            return "No active subscribers".to_string();
        }
        format!(
            "Sent {} cards ({} days with content) to {} subscribers, {} failed",
            self.sent_count,
            self.days.len(),
            self.subscriber_count,
            self.failed_count
        )
    }
}

/// Orchestrates card resolution, caption formatting and per-subscriber
/// delivery behind the three ports.
pub struct Broadcaster {
    cards: Arc<dyn CardResolver>,
    subscribers: Arc<dyn SubscriberStore>,
    delivery: Arc<dyn DeliveryClient>,
}

impl Broadcaster {
    pub fn new(
        cards: Arc<dyn CardResolver>,
        subscribers: Arc<dyn SubscriberStore>,
        delivery: Arc<dyn DeliveryClient>,
    ) -> Self {
        Self {
            cards,
            subscribers,
            delivery,
        }
    }

    /// Deliver the cards for `day_keys` (in order) to every active
    /// subscriber.
    ///
    /// Deliveries run sequentially; the delivery client bounds each call with
    /// its own timeout, so a stalled recipient delays but never wedges the
    /// broadcast.
    pub async fn broadcast(&self, day_keys: &[DayKey]) -> Result<BroadcastReport> {
        let recipients = self.subscribers.list_active().await?;
        if recipients.is_empty() {
            info!("broadcast skipped: no active subscribers");
            return Ok(BroadcastReport::no_subscribers());
        }

        let mut report = BroadcastReport {
            status: BroadcastStatus::Completed,
            sent_count: 0,
            failed_count: 0,
            subscriber_count: recipients.len(),
            days: Vec::new(),
        };

        for &day_key in day_keys {
            let Some(card) = self.cards.resolve(day_key).await? else {
                // Absent content, not a failure.
                continue;
            };
            let caption = format_caption(&card);

            for &recipient in &recipients {
                let outcome = self
                    .delivery
                    .deliver(recipient, &card.media_url, &caption)
                    .await;

                match outcome {
                    DeliveryOutcome::Delivered => {
                        report.sent_count += 1;
                        // Best-effort stamp; a failed write does not turn a
                        // delivered card into a failure.
                        if let Err(e) = self
                            .subscribers
                            .mark_delivered(recipient, Utc::now())
                            .await
                        {
                            warn!(%recipient, error = %e, "failed to record delivery time");
                        }
                    }
                    DeliveryOutcome::Failed { reason } => {
                        report.failed_count += 1;
                        warn!(%recipient, %day_key, %reason, "delivery failed");
                    }
                }
            }

            report.days.push(DaySummary {
                day_key,
                title: card.title,
                is_holiday: card.is_holiday,
            });
        }

        info!(
            sent = report.sent_count,
            failed = report.failed_count,
            subscribers = report.subscriber_count,
            days = report.days.len(),
            "broadcast complete"
        );
        Ok(report)
    }
}
