use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{TimeZone, Utc};
use tracing::{debug, info};

use crate::event::CalendarEvent;

/// Read-only source of the event collection. Events are supplied data, not
/// owned state: the store loads them and nothing in the calendar ever
/// writes them back.
#[derive(Debug)]
pub struct EventStore {
    pub data_dir: PathBuf,
    pub events_path: PathBuf,
}

impl EventStore {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let events_path = data_dir.join("events.json");
        info!(
            data_dir = %data_dir.display(),
            events = %events_path.display(),
            "opened event store"
        );

        Ok(Self {
            data_dir,
            events_path,
        })
    }

    #[tracing::instrument(skip(self))]
    pub fn load_events(&self) -> anyhow::Result<Vec<CalendarEvent>> {
        if !self.events_path.exists() {
            info!(
                events = %self.events_path.display(),
                "no events file; using the built-in sample fixture"
            );
            return Ok(sample_events());
        }

        let text = fs::read_to_string(&self.events_path)
            .with_context(|| format!("failed to read {}", self.events_path.display()))?;
        let mut events: Vec<CalendarEvent> =
            serde_json::from_str(&text).context("failed to parse events.json")?;

        events.sort_by_key(|event| event.starts_at);
        debug!(count = events.len(), "loaded events");
        Ok(events)
    }
}

/// Static sample data standing in for the site's event feed.
pub fn sample_events() -> Vec<CalendarEvent> {
    let mut events: Vec<CalendarEvent> = [
        ("Friday Circle", "Main Hall", 2024, 10, 25, 19, 0),
        ("Community Open Day", "Courtyard", 2024, 10, 26, 11, 0),
        ("Youth Halaqa", "Room 2", 2024, 11, 9, 18, 30),
        ("Charity Bake Sale", "Courtyard", 2024, 11, 23, 10, 0),
        ("Winter Fundraising Dinner", "Main Hall", 2024, 12, 14, 19, 30),
        ("New Year Family Quiz", "Room 1", 2025, 1, 4, 17, 0),
    ]
    .into_iter()
    .filter_map(|(title, location, year, month, day, hour, minute)| {
        let starts_at = Utc
            .with_ymd_and_hms(year, month, day, hour, minute, 0)
            .single()?;
        let mut event = CalendarEvent::new(title, starts_at);
        event.location = Some(location.to_string());
        Some(event)
    })
    .collect();

    events.sort_by_key(|event| event.starts_at);
    events
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::EventStore;

    #[test]
    fn missing_file_falls_back_to_the_sample_fixture() {
        let temp = tempdir().expect("tempdir");
        let store = EventStore::open(temp.path()).expect("open store");

        let events = store.load_events().expect("load events");
        assert!(!events.is_empty());
        assert!(events.windows(2).all(|w| w[0].starts_at <= w[1].starts_at));
    }

    #[test]
    fn malformed_events_file_is_an_error() {
        let temp = tempdir().expect("tempdir");
        std::fs::write(temp.path().join("events.json"), "{not json").expect("write file");

        let store = EventStore::open(temp.path()).expect("open store");
        assert!(store.load_events().is_err());
    }
}
