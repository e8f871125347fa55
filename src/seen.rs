use crate::error::Result;
use chrono::{DateTime, Duration, Utc};
use log::info;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Persisted record of which slot identifiers have already triggered an
/// alert, and when (UTC). Loaded at startup, saved at shutdown.
///
/// Entries are never evicted; the map only grows.
#[derive(Debug)]
pub struct SeenSlots {
    path: PathBuf,
    slots: HashMap<String, DateTime<Utc>>,
}

impl SeenSlots {
    /// Load the map from `path` if the file exists, else start empty.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let slots = if path.exists() {
            let content = fs::read_to_string(&path).await?;
            let slots: HashMap<String, DateTime<Utc>> = serde_json::from_str(&content)?;
            info!("loaded {} previously found slots from {}", slots.len(), path.display());
            slots
        } else {
            info!("no seen-slots file at {}, starting empty", path.display());
            HashMap::new()
        };

        Ok(Self { path, slots })
    }

    /// Write the map back to its file, pretty-printed, via temp-then-rename.
    pub async fn save(&self) -> Result<()> {
        let temp_path = self.path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(&self.slots)?;

        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(json.as_bytes()).await?;
        file.flush().await?;

        fs::rename(&temp_path, &self.path).await?;

        info!("saved {} found slots to {}", self.slots.len(), self.path.display());
        Ok(())
    }

    /// True when `id` is unseen, or its last report is at least `window` old.
    pub fn should_alert(&self, id: &str, now: DateTime<Utc>, window: Duration) -> bool {
        match self.slots.get(id) {
            None => true,
            Some(reported_at) => now.signed_duration_since(*reported_at) >= window,
        }
    }

    /// Record that `id` was reported at `now`, replacing any older timestamp.
    pub fn record(&mut self, id: impl Into<String>, now: DateTime<Utc>) {
        self.slots.insert(id.into(), now);
    }

    pub fn reported_at(&self, id: &str) -> Option<DateTime<Utc>> {
        self.slots.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("cowin_scanner_{}_{}.json", name, std::process::id()))
    }

    #[tokio::test]
    async fn missing_file_starts_empty() {
        let seen = SeenSlots::load(temp_path("missing")).await.unwrap();
        assert!(seen.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let path = temp_path("round_trip");
        let t0 = Utc.with_ymd_and_hms(2021, 5, 22, 10, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2021, 5, 22, 11, 30, 0).unwrap();

        let mut seen = SeenSlots::load(&path).await.unwrap();
        seen.record("S1", t0);
        seen.record("S2", t1);
        seen.save().await.unwrap();

        let reloaded = SeenSlots::load(&path).await.unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.reported_at("S1"), Some(t0));
        assert_eq!(reloaded.reported_at("S2"), Some(t1));

        fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn unseen_id_always_alerts() {
        let seen = SeenSlots::load(temp_path("unseen")).await.unwrap();
        let now = Utc.with_ymd_and_hms(2021, 5, 22, 10, 0, 0).unwrap();
        assert!(seen.should_alert("S1", now, Duration::hours(6)));
    }

    #[tokio::test]
    async fn suppressed_inside_window_eligible_after() {
        let mut seen = SeenSlots::load(temp_path("window")).await.unwrap();
        let window = Duration::hours(6);
        let t0 = Utc.with_ymd_and_hms(2021, 5, 22, 10, 0, 0).unwrap();

        seen.record("S1", t0);
        assert!(!seen.should_alert("S1", t0 + Duration::hours(1), window));
        assert!(seen.should_alert("S1", t0 + Duration::hours(6), window));
        assert!(seen.should_alert("S1", t0 + Duration::hours(7), window));
    }

    #[tokio::test]
    async fn record_updates_timestamp() {
        let mut seen = SeenSlots::load(temp_path("update")).await.unwrap();
        let t0 = Utc.with_ymd_and_hms(2021, 5, 22, 10, 0, 0).unwrap();
        let t7 = t0 + Duration::hours(7);

        seen.record("S1", t0);
        seen.record("S1", t7);
        assert_eq!(seen.reported_at("S1"), Some(t7));
        assert_eq!(seen.len(), 1);
    }
}
