//! Hexagonal ports for the broadcast engine.
//!
//! The engine depends only on these traits; concrete stores and the Telegram
//! delivery client live in adapter crates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    domain::{Card, DayKey, RecipientId, Subscriber},
    Result,
};

/// Read-only card lookup by day key.
#[async_trait]
pub trait CardResolver: Send + Sync {
    /// `Ok(None)` means "no card for that day" — expected, not an error.
    async fn resolve(&self, day_key: DayKey) -> Result<Option<Card>>;
}

/// Subscriber records. Records are soft-deactivated, never deleted.
#[async_trait]
pub trait SubscriberStore: Send + Sync {
    /// Insert a new active subscriber, or reactivate an existing one. On
    /// conflict the metadata is overwritten (last write wins).
    async fn upsert_active(
        &self,
        recipient_id: RecipientId,
        display_name: Option<&str>,
        handle: Option<&str>,
    ) -> Result<Subscriber>;

    /// No-op (not an error) if the recipient is unknown.
    async fn deactivate(&self, recipient_id: RecipientId) -> Result<()>;

    /// Snapshot of all currently active recipients.
    async fn list_active(&self) -> Result<Vec<RecipientId>>;

    /// Stamp the last successful delivery. Best-effort: callers treat a
    /// failure here as a warning, not a delivery failure.
    async fn mark_delivered(&self, recipient_id: RecipientId, at: DateTime<Utc>) -> Result<()>;

    async fn count_active(&self) -> Result<usize>;
}

/// Result of one delivery attempt.
///
/// Deliberately not `Result`: the remote side failing is an expected outcome
/// the engine counts, not an error that propagates. The reason string is kept
/// inspectable for logs and tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed { reason: String },
}

impl DeliveryOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// One media-plus-caption send to one recipient.
///
/// Implementations must not return transport errors through a panic or a
/// `Result`; every failure mode (timeout, network, rejected by the remote
/// service) collapses into `DeliveryOutcome::Failed`. Retry policy, if any,
/// belongs to the caller.
#[async_trait]
pub trait DeliveryClient: Send + Sync {
    async fn deliver(
        &self,
        recipient_id: RecipientId,
        media_url: &str,
        caption: &str,
    ) -> DeliveryOutcome;
}
