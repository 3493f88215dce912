//! Alert counts aligned to the point list.

use devmap_schema::{columns, Frame};
use devmap_types::Point;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::access::text_column;
use crate::payload::parse_alerts;
use crate::points::location_ordinals;
use crate::state::{count_of, StateExtractor};

/// How alert counts are matched to points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertAlignment {
    /// Joined on `deviceid`, first match wins.
    #[default]
    ById,
    /// Flattened rows matched to points by location row, ignoring device ids.
    /// Misaligns as soon as frames are reordered or a device is missing from
    /// a frame; kept for dashboards that relied on it.
    Positional,
}

/// Alert count of every row of every frame carrying `deviceid` and
/// `alerts_info`, in encounter order.
pub fn positional_alert_counts(frames: &[Frame]) -> Vec<u32> {
    let mut counts = Vec::new();
    for frame in frames {
        if text_column(frame, columns::DEVICE_ID).is_err() {
            continue;
        }
        let Ok(alerts) = text_column(frame, columns::ALERTS_INFO) else {
            continue;
        };
        for (row, cell) in alerts.iter().enumerate() {
            let count = match cell.map(parse_alerts) {
                None => 0,
                Some(Ok(list)) => count_of(list.len()),
                Some(Err(e)) => {
                    warn!(frame = frame.label(), row, "malformed alerts_info payload: {e}");
                    0
                }
            };
            counts.push(count);
        }
    }
    counts
}

/// Positional count for each of `len` points.
///
/// Point `i` takes the count at its flattened location row, so rows skipped
/// for a null coordinate keep their slot. When the points did not come from
/// `frames`, point `i` takes row `i`.
pub fn aligned_positional_counts(frames: &[Frame], len: usize) -> Vec<u32> {
    let counts = positional_alert_counts(frames);
    let ordinals = location_ordinals(frames);
    (0..len)
        .map(|i| {
            let row = if ordinals.len() == len { ordinals[i] } else { i };
            counts.get(row).copied().unwrap_or(0)
        })
        .collect()
}

/// Alert count per point under `alignment`.
pub fn alert_counts(frames: &[Frame], points: &[Point], alignment: AlertAlignment) -> Vec<u32> {
    match alignment {
        AlertAlignment::ById => {
            let extractor = StateExtractor::new(frames);
            points
                .iter()
                .map(|p| extractor.extract(&p.deviceid, None).alert_count)
                .collect()
        }
        AlertAlignment::Positional => aligned_positional_counts(frames, points.len()),
    }
}
