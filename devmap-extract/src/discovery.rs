//! Metric key discovery for configuration pickers.

use std::collections::BTreeMap;
use std::sync::Arc;

use devmap_schema::{columns, Frame};
use devmap_types::MetricValue;
use tracing::{debug, warn};

use crate::access::text_column;
use crate::payload::parse_data;

/// Keys seen in `data` payloads, each with the last sample value observed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyCatalog {
    samples: BTreeMap<String, MetricValue>,
}

impl KeyCatalog {
    /// One-shot scan of every `data` cell in `frames`.
    pub fn scan(frames: &[Frame]) -> Self {
        let mut samples = BTreeMap::new();
        for frame in frames {
            let Ok(cells) = text_column(frame, columns::DATA) else {
                continue;
            };
            for (row, cell) in cells.iter().enumerate() {
                let Some(cell) = cell else { continue };
                match parse_data(cell) {
                    Ok(map) => {
                        for (key, value) in map.iter() {
                            samples.insert(key.to_string(), value.clone());
                        }
                    }
                    Err(e) => warn!(frame = frame.label(), row, "data payload skipped in key scan: {e}"),
                }
            }
        }
        Self { samples }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.samples.keys().map(String::as_str)
    }

    pub fn sample(&self, key: &str) -> Option<&MetricValue> {
        self.samples.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.samples.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Owner of the current key catalog.
///
/// Each rescan replaces the snapshot; readers hold an `Arc` to the catalog
/// they were handed and never observe a partial scan.
#[derive(Debug, Default)]
pub struct KeyDiscovery {
    current: Arc<KeyCatalog>,
    scans: u64,
}

impl KeyDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rescan(&mut self, frames: &[Frame]) -> Arc<KeyCatalog> {
        self.current = Arc::new(KeyCatalog::scan(frames));
        self.scans += 1;
        debug!(keys = self.current.len(), scan = self.scans, "key catalog rebuilt");
        Arc::clone(&self.current)
    }

    pub fn snapshot(&self) -> Arc<KeyCatalog> {
        Arc::clone(&self.current)
    }

    pub fn scans(&self) -> u64 {
        self.scans
    }
}

#[cfg(test)]
mod tests {
    use devmap_schema::FrameBuilder;

    use super::*;

    fn data_frame(cells: Vec<Option<&str>>) -> Frame {
        FrameBuilder::new().text("data", cells).build().unwrap()
    }

    #[test]
    fn last_sample_wins() {
        let frames = vec![data_frame(vec![
            Some(r#"{"temp": 1, "hum": 2}"#),
            Some("{oops"),
            None,
            Some(r#"{"temp": 5}"#),
        ])];
        let catalog = KeyCatalog::scan(&frames);
        assert_eq!(catalog.keys().collect::<Vec<_>>(), vec!["hum", "temp"]);
        assert_eq!(catalog.sample("temp"), Some(&MetricValue::Number(5.0)));
    }

    #[test]
    fn rescan_drops_stale_keys() {
        let mut discovery = KeyDiscovery::new();
        let old = discovery.rescan(&[data_frame(vec![Some(r#"{"pm25": 3}"#)])]);
        let new = discovery.rescan(&[data_frame(vec![Some(r#"{"co2": 400}"#)])]);
        assert!(old.contains("pm25"));
        assert!(!new.contains("pm25"));
        assert!(discovery.snapshot().contains("co2"));
        assert_eq!(discovery.scans(), 2);
    }
}
