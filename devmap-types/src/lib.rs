use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Display color as the host stores it (`#808080`, `red`, `rgb(..)`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub String);

impl Color {
    pub fn new(color: impl Into<String>) -> Self {
        Self(color.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Color {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One plotted device location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
    pub deviceid: String,
}

/// Connectivity state reported in `device_status`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeviceStatus {
    Online,
    Offline,
    /// Any other raw status string, kept verbatim.
    Other(String),
    /// No table or row carried a status for the device.
    Unknown,
}

impl DeviceStatus {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "online" => DeviceStatus::Online,
            "offline" => DeviceStatus::Offline,
            other => DeviceStatus::Other(other.to_string()),
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, DeviceStatus::Online)
    }

    pub fn as_str(&self) -> &str {
        match self {
            DeviceStatus::Online => "online",
            DeviceStatus::Offline => "offline",
            DeviceStatus::Other(raw) => raw,
            DeviceStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed value of one key in a row's `data` payload.
#[derive(Clone, Debug, PartialEq)]
pub enum MetricValue {
    Number(f64),
    Text(String),
    Flag(bool),
    Null,
    /// Nested arrays/objects are kept as JSON.
    Json(Value),
}

impl MetricValue {
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => MetricValue::Null,
            Value::Bool(b) => MetricValue::Flag(b),
            Value::Number(n) => match n.as_f64() {
                Some(f) => MetricValue::Number(f),
                None => MetricValue::Json(Value::Number(n)),
            },
            Value::String(s) => MetricValue::Text(s),
            other => MetricValue::Json(other),
        }
    }

    /// Numeric view used for threshold classification.
    ///
    /// Text that parses as a finite number counts as numeric; the host often
    /// ships readings as strings.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) if n.is_finite() => Some(*n),
            MetricValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{n}"),
            MetricValue::Text(s) => f.write_str(s),
            MetricValue::Flag(b) => write!(f, "{b}"),
            MetricValue::Null => f.write_str("null"),
            MetricValue::Json(v) => write!(f, "{v}"),
        }
    }
}

/// Key -> value mapping parsed from a `data` cell, ordered by key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricMap {
    entries: BTreeMap<String, MetricValue>,
}

impl MetricMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object payload. Anything other than an object is rejected.
    pub fn from_json_str(payload: &str) -> Result<Self, serde_json::Error> {
        let object: serde_json::Map<String, Value> = serde_json::from_str(payload)?;
        Ok(object
            .into_iter()
            .map(|(k, v)| (k, MetricValue::from_json(v)))
            .collect())
    }

    pub fn get(&self, key: &str) -> Option<&MetricValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: MetricValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, MetricValue)> for MetricMap {
    fn from_iter<I: IntoIterator<Item = (String, MetricValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// One entry of a row's `alerts_info` list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "alerttext", default)]
    pub text: Option<String>,
    #[serde(rename = "creation_timestamp", default)]
    pub created: Option<String>,
}

/// Per-device telemetry facts gathered for one render pass.
///
/// Rebuilt from the frames on every refresh; never patched in place.
#[derive(Clone, Debug, PartialEq)]
pub struct DeviceState {
    pub deviceid: String,
    /// Value at the configured metric key; `None` when no key is configured,
    /// the key is absent, or the payload was malformed.
    pub metric_value: Option<MetricValue>,
    pub status: DeviceStatus,
    pub alert_count: u32,
    pub alerts: Vec<Alert>,
    pub last_updated: Option<DateTime<Utc>>,
    /// Every field of the matched `data` payload.
    pub raw_fields: MetricMap,
}

impl DeviceState {
    /// State for a device no table knows anything about.
    pub fn unknown(deviceid: impl Into<String>) -> Self {
        Self {
            deviceid: deviceid.into(),
            metric_value: None,
            status: DeviceStatus::Unknown,
            alert_count: 0,
            alerts: Vec::new(),
            last_updated: None,
            raw_fields: MetricMap::new(),
        }
    }
}

/// Pin body width; three-digit readings get the wide body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PinWidth {
    Standard,
    Wide,
}

/// Render-ready state of a single device marker.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerVisual {
    pub deviceid: String,
    pub color: Color,
    pub text_color: Color,
    pub badge_text: Option<String>,
    pub value_text: String,
    pub pin_width: PinWidth,
}

/// Icon chosen by the rendering layer for a cluster of markers.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkerIcon {
    Cluster { size: usize, label: String },
    Single(MarkerVisual),
}

impl MarkerIcon {
    pub fn variant(&self) -> IconVariant {
        match self {
            MarkerIcon::Cluster { .. } => IconVariant::Cluster,
            MarkerIcon::Single(_) => IconVariant::Single,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IconVariant {
    Cluster,
    Single,
}
