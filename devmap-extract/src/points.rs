use std::sync::Arc;

use devmap_schema::{columns, Frame, LocationFrame};
use devmap_types::Point;
use tracing::debug;

use crate::access::{number_column, text_column, ColumnError};

/// Every located device across all frames meeting the location contract
/// (numeric `lat`/`lng`, string `deviceid`), in frame then row order.
///
/// Rows with a null coordinate or id are skipped.
pub fn extract_points(frames: &[Frame]) -> Vec<Point> {
    located_rows(frames).into_iter().map(|(_, point)| point).collect()
}

/// Flattened location row of each point returned by [`extract_points`],
/// counting skipped rows.
pub fn location_ordinals(frames: &[Frame]) -> Vec<usize> {
    located_rows(frames).into_iter().map(|(ordinal, _)| ordinal).collect()
}

fn located_rows(frames: &[Frame]) -> Vec<(usize, Point)> {
    let mut rows = Vec::new();
    let mut ordinal = 0;
    for frame in frames {
        let location = match LocationFrame::new(Arc::clone(frame.batch())) {
            Ok(location) => location,
            Err(e) => {
                debug!(frame = frame.label(), role = LocationFrame::ROLE.label(), "frame skipped: {e}");
                continue;
            }
        };
        if let Err(e) = push_frame_points(frame, ordinal, &mut rows) {
            debug!(frame = frame.label(), "location columns unreadable: {e}");
        }
        ordinal += location.inner().num_rows();
    }
    rows
}

fn push_frame_points(frame: &Frame, ordinal: usize, out: &mut Vec<(usize, Point)>) -> Result<(), ColumnError> {
    let lat = number_column(frame, columns::LAT)?;
    let lng = number_column(frame, columns::LNG)?;
    let ids = text_column(frame, columns::DEVICE_ID)?;
    for row in 0..frame.num_rows() {
        match (lat.value(row), lng.value(row), ids.value(row)) {
            (Some(lat), Some(lng), Some(id)) => out.push((
                ordinal + row,
                Point {
                    lat,
                    lng,
                    deviceid: id.to_string(),
                },
            )),
            _ => debug!(frame = frame.label(), row, "row without full location skipped"),
        }
    }
    Ok(())
}
