use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{errors::Error, Result};

/// Typed configuration, loaded from the environment (plus an optional `.env`).
///
/// Loading fails fast on missing credentials: a broadcast must never start
/// half-configured.
#[derive(Clone, Debug)]
pub struct Config {
    // Core
    pub telegram_bot_token: String,
    /// Chats allowed to run admin commands (`/sendcards`, `/status`).
    pub admin_chat_ids: Vec<i64>,

    // Storage
    pub data_dir: PathBuf,
    pub cards_file: PathBuf,
    pub subscribers_file: PathBuf,

    // Broadcast
    /// How many days (today included) a scheduled broadcast covers.
    pub broadcast_days: usize,
    pub broadcast_enabled: bool,
    pub broadcast_hour: u32,
    pub broadcast_minute: u32,

    // Delivery
    pub delivery_timeout: Duration,
    pub telegram_api_base: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let admin_chat_ids = parse_csv_i64(env_str("ADMIN_CHAT_IDS"));

        let data_dir = env_path("DATA_DIR").unwrap_or_else(|| PathBuf::from("data"));
        fs::create_dir_all(&data_dir)?;
        let cards_file = env_path("CARDS_FILE").unwrap_or_else(|| data_dir.join("cards.json"));
        let subscribers_file =
            env_path("SUBSCRIBERS_FILE").unwrap_or_else(|| data_dir.join("subscribers.json"));

        let broadcast_days = env_usize("BROADCAST_DAYS").unwrap_or(3).max(1);
        let broadcast_enabled = env_bool("BROADCAST_ENABLED").unwrap_or(true);
        let (broadcast_hour, broadcast_minute) =
            parse_hh_mm(env_str("BROADCAST_TIME").as_deref().unwrap_or("09:00"))?;

        let delivery_timeout =
            Duration::from_millis(env_u64("DELIVERY_TIMEOUT_MS").unwrap_or(10_000));
        let telegram_api_base = env_str("TELEGRAM_API_BASE")
            .and_then(non_empty)
            .unwrap_or_else(|| "https://api.telegram.org".to_string());

        Ok(Self {
            telegram_bot_token,
            admin_chat_ids,
            data_dir,
            cards_file,
            subscribers_file,
            broadcast_days,
            broadcast_enabled,
            broadcast_hour,
            broadcast_minute,
            delivery_timeout,
            telegram_api_base,
        })
    }
}

fn parse_hh_mm(s: &str) -> Result<(u32, u32)> {
    let bad = || Error::Config(format!("BROADCAST_TIME must be HH:MM, got {s:?}"));
    let (h, m) = s.trim().split_once(':').ok_or_else(bad)?;
    let hour: u32 = h.parse().map_err(|_| bad())?;
    let minute: u32 = m.parse().map_err(|_| bad())?;
    if hour > 23 || minute > 59 {
        return Err(bad());
    }
    Ok((hour, minute))
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_bool(key: &str) -> Option<bool> {
    env_str(key).map(|s| {
        matches!(
            s.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_usize(key: &str) -> Option<usize> {
    env_str(key).and_then(|s| s.trim().parse::<usize>().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).map(PathBuf::from)
}

fn parse_csv_i64(v: Option<String>) -> Vec<i64> {
    v.unwrap_or_default()
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<i64>().ok())
        .collect()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
