use crate::error::{Result, ScannerError};
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot HTTP API token.
    pub bot_token: String,
    /// Chat that receives slot alerts.
    pub alert_chat_id: String,
    /// Chat that receives failure reports.
    pub error_chat_id: String,
    /// CoWIN district to watch (default 316, Rewa MP).
    pub district_id: u32,
    /// Sleep between polling cycles.
    pub poll_interval: Duration,
    /// Re-alert window: a found slot is reported again only after this long.
    pub realert_window: chrono::Duration,
    /// Path of the persisted seen-slots map.
    pub seen_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup, so tests don't have to
    /// touch process-global environment variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| {
                ScannerError::Config(format!("required environment variable {} is not set", key))
            })
        };

        let bot_token = required("BOT_TOKEN")?;
        let alert_chat_id = required("ALERT_CHAT_ID")?;
        let error_chat_id = required("ERROR_CHAT_ID")?;

        let district_id = parse_or(&lookup, "DISTRICT_ID", 316)?;
        let check_after: u64 = parse_or(&lookup, "CHECK_AFTER_SECS", 5)?;
        let refound_after: i64 = parse_or(&lookup, "REFOUND_AFTER_HOURS", 6)?;

        let seen_path = lookup("FOUND_SLOTS_PATH")
            .unwrap_or_else(|| "previouslyFoundSlots.json".to_string())
            .into();

        Ok(Self {
            bot_token,
            alert_chat_id,
            error_chat_id,
            district_id,
            poll_interval: Duration::from_secs(check_after),
            realert_window: chrono::Duration::hours(refound_after),
            seen_path,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| ScannerError::Config(format!("{} is not a valid value: {}", key, raw))),
        None => Ok(default),
    }
}
