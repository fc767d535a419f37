//! JSON-file-backed card and subscriber stores.
//!
//! Both stores keep the working set in memory behind a mutex and rewrite
//! their backing file on every mutation. Datasets here are small (one card
//! per calendar day, a modest subscriber list), so whole-file rewrites are
//! cheaper than carrying a database.

use std::{collections::BTreeMap, fs, path::PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use cardbot_core::{
    domain::{Card, DayKey, RecipientId, Subscriber},
    ports::{CardResolver, SubscriberStore},
    Error, Result,
};

pub mod seed;

fn load_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(&contents)?))
}

fn persist_json<T: serde::Serialize>(path: &PathBuf, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|e| Error::Store(format!("{}: {e}", path.display())))
}

// ============== Cards ==============

pub struct FileCardStore {
    path: PathBuf,
    cards: Mutex<BTreeMap<DayKey, Card>>,
}

impl FileCardStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cards: Vec<Card> = load_json(&path)?.unwrap_or_default();
        Ok(Self {
            path,
            cards: Mutex::new(cards.into_iter().map(|c| (c.day_key, c)).collect()),
        })
    }

    /// Insert or fully replace the card for its day key (latest write wins).
    pub async fn upsert(&self, card: Card) -> Result<()> {
        let mut cards = self.cards.lock().await;
        cards.insert(card.day_key, card);
        persist_json(&self.path, &cards.values().collect::<Vec<_>>())
    }

    /// All cards, ordered by day key.
    pub async fn all(&self) -> Vec<Card> {
        self.cards.lock().await.values().cloned().collect()
    }

    pub async fn count(&self) -> usize {
        self.cards.lock().await.len()
    }

    /// Load `cards` only when the store holds nothing yet. Seeding never
    /// clobbers edited content.
    pub async fn seed_if_empty(&self, seed: Vec<Card>) -> Result<usize> {
        let mut cards = self.cards.lock().await;
        if !cards.is_empty() {
            return Ok(0);
        }
        for card in seed {
            cards.insert(card.day_key, card);
        }
        let inserted = cards.len();
        persist_json(&self.path, &cards.values().collect::<Vec<_>>())?;
        Ok(inserted)
    }
}

#[async_trait]
impl CardResolver for FileCardStore {
    async fn resolve(&self, day_key: DayKey) -> Result<Option<Card>> {
        Ok(self.cards.lock().await.get(&day_key).cloned())
    }
}

// ============== Subscribers ==============

pub struct FileSubscriberStore {
    path: PathBuf,
    subscribers: Mutex<BTreeMap<RecipientId, Subscriber>>,
}

impl FileSubscriberStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let subs: Vec<Subscriber> = load_json(&path)?.unwrap_or_default();
        Ok(Self {
            path,
            subscribers: Mutex::new(subs.into_iter().map(|s| (s.recipient_id, s)).collect()),
        })
    }

    pub async fn get(&self, recipient_id: RecipientId) -> Option<Subscriber> {
        self.subscribers.lock().await.get(&recipient_id).cloned()
    }
}

#[async_trait]
impl SubscriberStore for FileSubscriberStore {
    async fn upsert_active(
        &self,
        recipient_id: RecipientId,
        display_name: Option<&str>,
        handle: Option<&str>,
    ) -> Result<Subscriber> {
        let mut subs = self.subscribers.lock().await;
        let entry = subs.entry(recipient_id).or_insert_with(|| Subscriber {
            recipient_id,
            display_name: None,
            handle: None,
            is_active: true,
            last_delivered_at: None,
        });
        entry.is_active = true;
        entry.display_name = display_name.map(|s| s.to_string());
        entry.handle = handle.map(|s| s.to_string());
        let updated = entry.clone();
        persist_json(&self.path, &subs.values().collect::<Vec<_>>())?;
        Ok(updated)
    }

    async fn deactivate(&self, recipient_id: RecipientId) -> Result<()> {
        let mut subs = self.subscribers.lock().await;
        let Some(entry) = subs.get_mut(&recipient_id) else {
            return Ok(()); // unknown recipient: nothing to do
        };
        entry.is_active = false;
        persist_json(&self.path, &subs.values().collect::<Vec<_>>())
    }

    async fn list_active(&self) -> Result<Vec<RecipientId>> {
        Ok(self
            .subscribers
            .lock()
            .await
            .values()
            .filter(|s| s.is_active)
            .map(|s| s.recipient_id)
            .collect())
    }

    async fn mark_delivered(&self, recipient_id: RecipientId, at: DateTime<Utc>) -> Result<()> {
        let mut subs = self.subscribers.lock().await;
        let Some(entry) = subs.get_mut(&recipient_id) else {
            return Ok(());
        };
        entry.last_delivered_at = Some(at);
        persist_json(&self.path, &subs.values().collect::<Vec<_>>())
    }

    async fn count_active(&self) -> Result<usize> {
        Ok(self
            .subscribers
            .lock()
            .await
            .values()
            .filter(|s| s.is_active)
            .count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_file(prefix: &str) -> PathBuf {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let pid = std::process::id();
        PathBuf::from(format!("/tmp/{prefix}-{pid}-{ts}.json"))
    }

    fn key(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    fn card(day: &str, title: &str) -> Card {
        Card {
            day_key: key(day),
            title: title.to_string(),
            message: "msg".to_string(),
            media_url: "https://cards.test/x.jpg".to_string(),
            is_holiday: false,
            holiday_name: None,
        }
    }

    #[tokio::test]
    async fn card_upsert_replaces_on_day_key_conflict() {
        let store = FileCardStore::open(tmp_file("cards")).unwrap();
        store.upsert(card("01-01", "first")).await.unwrap();
        store.upsert(card("01-01", "second")).await.unwrap();

        assert_eq!(store.count().await, 1);
        let got = store.resolve(key("01-01")).await.unwrap().unwrap();
        assert_eq!(got.title, "second");
    }

    #[tokio::test]
    async fn resolve_unknown_day_is_none_not_error() {
        let store = FileCardStore::open(tmp_file("cards")).unwrap();
        assert!(store.resolve(key("06-15")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cards_survive_reopen_sorted_by_day_key() {
        let path = tmp_file("cards");
        {
            let store = FileCardStore::open(path.clone()).unwrap();
            store.upsert(card("12-31", "b")).await.unwrap();
            store.upsert(card("01-01", "a")).await.unwrap();
        }
        let store = FileCardStore::open(path.clone()).unwrap();
        let all = store.all().await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].day_key, key("01-01"));
        assert_eq!(all[1].day_key, key("12-31"));
    }

    #[tokio::test]
    async fn seed_only_fills_an_empty_store() {
        let store = FileCardStore::open(tmp_file("cards")).unwrap();
        let n = store
            .seed_if_empty(vec![card("01-01", "seeded")])
            .await
            .unwrap();
        assert_eq!(n, 1);

        // Second seed is a no-op and does not clobber edits.
        store.upsert(card("01-01", "edited")).await.unwrap();
        let n = store
            .seed_if_empty(vec![card("01-01", "seeded")])
            .await
            .unwrap();
        assert_eq!(n, 0);
        let got = store.resolve(key("01-01")).await.unwrap().unwrap();
        assert_eq!(got.title, "edited");
    }

    #[tokio::test]
    async fn subscribe_twice_keeps_one_record_with_fresh_metadata() {
        let store = FileSubscriberStore::open(tmp_file("subs")).unwrap();
        store
            .upsert_active(RecipientId(42), Some("Anna"), Some("anna"))
            .await
            .unwrap();
        let second = store
            .upsert_active(RecipientId(42), Some("Anya"), None)
            .await
            .unwrap();

        assert_eq!(store.count_active().await.unwrap(), 1);
        assert!(second.is_active);
        assert_eq!(second.display_name.as_deref(), Some("Anya"));
        assert_eq!(second.handle, None);
    }

    #[tokio::test]
    async fn unsubscribe_deactivates_without_deleting() {
        let store = FileSubscriberStore::open(tmp_file("subs")).unwrap();
        store
            .upsert_active(RecipientId(1), None, None)
            .await
            .unwrap();
        store.deactivate(RecipientId(1)).await.unwrap();

        assert_eq!(store.count_active().await.unwrap(), 0);
        let record = store.get(RecipientId(1)).await.unwrap();
        assert!(!record.is_active);

        // Resubscribing reactivates the same record.
        store
            .upsert_active(RecipientId(1), None, None)
            .await
            .unwrap();
        assert_eq!(store.list_active().await.unwrap(), vec![RecipientId(1)]);
    }

    #[tokio::test]
    async fn deactivating_unknown_recipient_is_a_no_op() {
        let store = FileSubscriberStore::open(tmp_file("subs")).unwrap();
        store.deactivate(RecipientId(999)).await.unwrap();
        assert_eq!(store.count_active().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn mark_delivered_stamps_only_the_given_recipient() {
        let store = FileSubscriberStore::open(tmp_file("subs")).unwrap();
        store
            .upsert_active(RecipientId(1), None, None)
            .await
            .unwrap();
        store
            .upsert_active(RecipientId(2), None, None)
            .await
            .unwrap();

        let now = Utc::now();
        store.mark_delivered(RecipientId(1), now).await.unwrap();
        store.mark_delivered(RecipientId(404), now).await.unwrap(); // unknown: no-op

        assert_eq!(
            store.get(RecipientId(1)).await.unwrap().last_delivered_at,
            Some(now)
        );
        assert_eq!(
            store.get(RecipientId(2)).await.unwrap().last_delivered_at,
            None
        );
    }

    #[tokio::test]
    async fn subscribers_survive_reopen() {
        let path = tmp_file("subs");
        {
            let store = FileSubscriberStore::open(path.clone()).unwrap();
            store
                .upsert_active(RecipientId(5), Some("Ivan"), Some("ivan"))
                .await
                .unwrap();
            store.deactivate(RecipientId(5)).await.unwrap();
        }
        let store = FileSubscriberStore::open(path.clone()).unwrap();
        let record = store.get(RecipientId(5)).await.unwrap();
        assert!(!record.is_active);
        assert_eq!(record.display_name.as_deref(), Some("Ivan"));
    }
}
