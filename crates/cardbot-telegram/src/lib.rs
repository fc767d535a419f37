//! Telegram adapters.
//!
//! Two independent pieces: the outbound delivery client (`sendPhoto` over the
//! Bot API) implementing the core `DeliveryClient` port, and the inbound
//! teloxide command router.

use async_trait::async_trait;
use serde::Deserialize;

use cardbot_core::{
    config::Config,
    domain::RecipientId,
    errors::Error,
    ports::{DeliveryClient, DeliveryOutcome},
    Result,
};

pub mod commands;
pub mod router;

/// Sends one photo + caption per call via `POST /bot<token>/sendPhoto`.
///
/// The HTTP client carries a per-request timeout, so a stalled recipient can
/// delay a broadcast by at most that long. All failure modes collapse into
/// `DeliveryOutcome::Failed`; this type never retries and never panics.
pub struct TelegramDelivery {
    http: reqwest::Client,
    send_photo_url: String,
}

#[derive(Debug, Deserialize)]
struct SendPhotoResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramDelivery {
    pub fn new(cfg: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(cfg.delivery_timeout)
            .build()
            .map_err(|e| Error::Config(format!("http client: {e}")))?;
        Ok(Self {
            http,
            send_photo_url: format!(
                "{}/bot{}/sendPhoto",
                cfg.telegram_api_base.trim_end_matches('/'),
                cfg.telegram_bot_token
            ),
        })
    }
}

#[async_trait]
impl DeliveryClient for TelegramDelivery {
    async fn deliver(
        &self,
        recipient_id: RecipientId,
        media_url: &str,
        caption: &str,
    ) -> DeliveryOutcome {
        let payload = serde_json::json!({
            "chat_id": recipient_id.0,
            "photo": media_url,
            "caption": caption,
            "parse_mode": "HTML",
        });

        let resp = match self.http.post(&self.send_photo_url).json(&payload).send().await {
            Ok(resp) => resp,
            Err(e) if e.is_timeout() => return DeliveryOutcome::failed("send timed out"),
            Err(e) => return DeliveryOutcome::failed(format!("request failed: {e}")),
        };

        let status = resp.status();
        let body: SendPhotoResponse = match resp.json().await {
            Ok(body) => body,
            Err(e) => {
                return DeliveryOutcome::failed(format!("unreadable response ({status}): {e}"))
            }
        };

        if body.ok {
            DeliveryOutcome::Delivered
        } else {
            let desc = body.description.unwrap_or_else(|| "no description".to_string());
            DeliveryOutcome::failed(format!("telegram rejected send ({status}): {desc}"))
        }
    }
}
