/// Core error type for the card bot.
///
/// Adapter crates should map their specific errors into this type so the core
/// can handle failures consistently (fatal config errors vs recoverable store
/// hiccups). Delivery failures are *not* errors; see `ports::DeliveryOutcome`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid day key: {0}")]
    InvalidDayKey(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
