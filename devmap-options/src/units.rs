use std::collections::BTreeMap;

use devmap_extract::KeyCatalog;

/// Unit label per payload key, shown in the detail view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnitLabels {
    labels: BTreeMap<String, String>,
}

impl UnitLabels {
    pub fn from_map(labels: BTreeMap<String, String>) -> Self {
        Self { labels }
    }

    /// Map `key` to `unit`. Empty input and already-mapped keys are refused.
    pub fn add(&mut self, key: &str, unit: &str) -> bool {
        if key.is_empty() || unit.is_empty() || self.labels.contains_key(key) {
            return false;
        }
        self.labels.insert(key.to_string(), unit.to_string());
        true
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.labels.remove(key)
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    /// Discovered keys that still have no unit.
    pub fn available_keys(&self, catalog: &KeyCatalog) -> Vec<String> {
        catalog
            .keys()
            .filter(|k| !self.labels.contains_key(*k))
            .map(str::to_string)
            .collect()
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.labels
    }
}
