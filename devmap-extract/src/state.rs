//! Device State Extractor: per-device facts joined by `deviceid`.

use std::collections::HashMap;

use devmap_schema::{columns, Frame};
use devmap_types::{DeviceState, DeviceStatus, MetricMap, Point};
use tracing::{debug, warn};

use crate::access::text_column;
use crate::alerts::{aligned_positional_counts, AlertAlignment};
use crate::payload::{parse_alerts, parse_data, parse_timestamp, timestamp_from_millis};

/// First `(frame, row)` per device id for one fact column.
///
/// Frames qualify only when they carry both `deviceid` and the fact column;
/// earlier frames and earlier rows win.
#[derive(Debug, Default)]
pub struct FactIndex {
    rows: HashMap<String, (usize, usize)>,
}

impl FactIndex {
    pub fn build(frames: &[Frame], fact_column: &str) -> Self {
        let mut rows = HashMap::new();
        for (frame_idx, frame) in frames.iter().enumerate() {
            if !frame.has_column(fact_column) {
                continue;
            }
            let ids = match text_column(frame, columns::DEVICE_ID) {
                Ok(ids) => ids,
                Err(e) => {
                    debug!(frame = frame.label(), column = fact_column, "frame skipped: {e}");
                    continue;
                }
            };
            for (row, id) in ids.iter().enumerate() {
                if let Some(id) = id {
                    rows.entry(id.to_string()).or_insert((frame_idx, row));
                }
            }
        }
        Self { rows }
    }

    pub fn locate(&self, device_id: &str) -> Option<(usize, usize)> {
        self.rows.get(device_id).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Extractor over one dataset, indexed once per render pass.
pub struct StateExtractor<'a> {
    frames: &'a [Frame],
    data: FactIndex,
    status: FactIndex,
    alerts: FactIndex,
    received: FactIndex,
}

impl<'a> StateExtractor<'a> {
    pub fn new(frames: &'a [Frame]) -> Self {
        Self {
            frames,
            data: FactIndex::build(frames, columns::DATA),
            status: FactIndex::build(frames, columns::DEVICE_STATUS),
            alerts: FactIndex::build(frames, columns::ALERTS_INFO),
            received: FactIndex::build(frames, columns::RECEIVE_TIMESTAMP),
        }
    }

    /// Facts for one device. Missing data never fails: absent facts are
    /// `None` / `0` / `DeviceStatus::Unknown`.
    pub fn extract(&self, device_id: &str, metric_key: Option<&str>) -> DeviceState {
        let raw_fields = self.raw_fields(device_id);
        let metric_value = metric_key.and_then(|key| raw_fields.get(key).cloned());
        let alerts = self.alerts(device_id);

        DeviceState {
            deviceid: device_id.to_string(),
            metric_value,
            status: self.status(device_id),
            alert_count: count_of(alerts.len()),
            alerts,
            last_updated: self.last_updated(device_id),
            raw_fields,
        }
    }

    /// One state per point, in point order.
    ///
    /// With [`AlertAlignment::Positional`] the alert count of a point is the
    /// count at its location row, whatever device that row holds.
    pub fn extract_all(
        &self,
        points: &[Point],
        metric_key: Option<&str>,
        alignment: AlertAlignment,
    ) -> Vec<DeviceState> {
        let positional = match alignment {
            AlertAlignment::ById => None,
            AlertAlignment::Positional => Some(aligned_positional_counts(self.frames, points.len())),
        };
        points
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let mut state = self.extract(&point.deviceid, metric_key);
                if let Some(counts) = &positional {
                    state.alert_count = counts.get(i).copied().unwrap_or(0);
                }
                state
            })
            .collect()
    }

    fn cell(&self, index: &FactIndex, column: &str, device_id: &str) -> Option<&'a str> {
        let (frame_idx, row) = index.locate(device_id)?;
        let frame = &self.frames[frame_idx];
        match text_column(frame, column) {
            Ok(col) => col.value(row),
            Err(e) => {
                debug!(frame = frame.label(), device = device_id, "fact unavailable: {e}");
                None
            }
        }
    }

    fn raw_fields(&self, device_id: &str) -> MetricMap {
        let Some(cell) = self.cell(&self.data, columns::DATA, device_id) else {
            return MetricMap::new();
        };
        parse_data(cell).unwrap_or_else(|e| {
            warn!(device = device_id, "malformed data payload: {e}");
            MetricMap::new()
        })
    }

    fn status(&self, device_id: &str) -> DeviceStatus {
        self.cell(&self.status, columns::DEVICE_STATUS, device_id)
            .map(DeviceStatus::from_raw)
            .unwrap_or(DeviceStatus::Unknown)
    }

    fn alerts(&self, device_id: &str) -> Vec<devmap_types::Alert> {
        let Some(cell) = self.cell(&self.alerts, columns::ALERTS_INFO, device_id) else {
            return Vec::new();
        };
        parse_alerts(cell).unwrap_or_else(|e| {
            warn!(device = device_id, "malformed alerts_info payload: {e}");
            Vec::new()
        })
    }

    fn last_updated(&self, device_id: &str) -> Option<chrono::DateTime<chrono::Utc>> {
        let (frame_idx, row) = self.received.locate(device_id)?;
        let frame = &self.frames[frame_idx];
        // Host time fields arrive as epoch milliseconds.
        if let Ok(ms) = crate::access::number_column(frame, columns::RECEIVE_TIMESTAMP) {
            return ms.value(row).and_then(|ms| timestamp_from_millis(ms as i64));
        }
        let cell = self.cell(&self.received, columns::RECEIVE_TIMESTAMP, device_id)?;
        match parse_timestamp(cell) {
            Ok(ts) => Some(ts),
            Err(e) => {
                warn!(device = device_id, "malformed receive_timestamp: {e}");
                None
            }
        }
    }
}

/// Facts for a single device, indexing `frames` on the fly.
pub fn extract(device_id: &str, frames: &[Frame], metric_key: Option<&str>) -> DeviceState {
    StateExtractor::new(frames).extract(device_id, metric_key)
}

pub(crate) fn count_of(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
