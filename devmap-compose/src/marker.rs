use devmap_classifier::{classify_metric, BandList};
use devmap_types::{Color, DeviceState, MarkerIcon, MarkerVisual, PinWidth, Point};

use crate::format::{badge_text, round_off, Precision};

/// Readings at or above this get the wide pin body.
pub const WIDE_PIN_THRESHOLD: f64 = 100.0;

/// Committed look of every marker in a render pass.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerStyle {
    pub bands: BandList,
    pub default_color: Color,
    pub pin_text: Color,
}

impl MarkerStyle {
    pub fn new(bands: BandList, default_color: Color, pin_text: Color) -> Self {
        Self {
            bands,
            default_color,
            pin_text,
        }
    }

    pub fn compose(&self, point: &Point, state: &DeviceState) -> MarkerVisual {
        compose(point, state, &self.bands, &self.default_color, &self.pin_text)
    }

    pub fn status_color(&self, state: &DeviceState) -> Color {
        status_gated_color(state, &self.bands, &self.default_color)
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self::new(BandList::empty(), Color::from("#808080"), Color::from("#FFF"))
    }
}

/// Only an online device shows its threshold color. Offline, unknown and
/// unrecognised statuses fall back to the default color whatever the reading.
pub fn status_gated_color(state: &DeviceState, bands: &BandList, default_color: &Color) -> Color {
    if state.status.is_online() {
        classify_metric(state.metric_value.as_ref(), bands, default_color)
    } else {
        default_color.clone()
    }
}

pub fn pin_width(state: &DeviceState) -> PinWidth {
    match state.metric_value.as_ref().and_then(|v| v.as_number()) {
        Some(n) if n >= WIDE_PIN_THRESHOLD => PinWidth::Wide,
        _ => PinWidth::Standard,
    }
}

/// Visual for one plotted device.
pub fn compose(
    point: &Point,
    state: &DeviceState,
    bands: &BandList,
    default_color: &Color,
    pin_text_color: &Color,
) -> MarkerVisual {
    MarkerVisual {
        deviceid: point.deviceid.clone(),
        color: status_gated_color(state, bands, default_color),
        text_color: pin_text_color.clone(),
        badge_text: badge_text(state.alert_count),
        value_text: round_off(state.metric_value.as_ref(), Precision::Pin),
        pin_width: pin_width(state),
    }
}

/// Icon for a group of markers the renderer merged at the current zoom.
pub fn icon_for_cluster(members: &[MarkerVisual]) -> Option<MarkerIcon> {
    match members {
        [] => None,
        [single] => Some(MarkerIcon::Single(single.clone())),
        many => Some(MarkerIcon::Cluster {
            size: many.len(),
            label: many.len().to_string(),
        }),
    }
}

/// Device a cluster click acts on.
pub fn cluster_target(members: &[MarkerVisual]) -> Option<&str> {
    members.first().map(|m| m.deviceid.as_str())
}
