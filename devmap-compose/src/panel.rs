//! Side list, expanded detail and hover content.

use chrono::{DateTime, Utc};
use devmap_types::{Color, DeviceState, Point};

use crate::format::{relative_time, round_off, Precision, MISSING_VALUE};
use crate::marker::MarkerStyle;

pub const ONLINE_DOT: &str = "rgb(27, 211, 13)";
pub const OFFLINE_DOT: &str = "rgb(247, 4, 33)";
pub const NO_ALERTS: &str = "No Alerts";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Online,
    Offline,
}

impl StatusTone {
    pub fn of(state: &DeviceState) -> Self {
        if state.status.is_online() {
            StatusTone::Online
        } else {
            StatusTone::Offline
        }
    }

    pub fn dot_color(self) -> Color {
        match self {
            StatusTone::Online => Color::from(ONLINE_DOT),
            StatusTone::Offline => Color::from(OFFLINE_DOT),
        }
    }
}

/// Everything a card or detail view needs besides the device itself.
#[derive(Clone, Copy, Debug)]
pub struct CardContext<'a> {
    pub style: &'a MarkerStyle,
    pub metric_key: Option<&'a str>,
    pub unit: Option<&'a str>,
    pub now: DateTime<Utc>,
}

/// One row of the device list.
#[derive(Clone, Debug, PartialEq)]
pub struct ListCard {
    pub deviceid: String,
    pub lat: f64,
    pub lng: f64,
    /// `None` when no metric key is configured; the card then shows no reading.
    pub value_text: Option<String>,
    pub value_color: Color,
    pub unit: Option<String>,
    pub last_updated: Option<String>,
    pub status: String,
    pub tone: StatusTone,
    pub selected: bool,
}

pub fn list_card(point: &Point, state: &DeviceState, ctx: &CardContext<'_>, selected: bool) -> ListCard {
    let value_text = ctx
        .metric_key
        .map(|_| round_off(state.metric_value.as_ref(), Precision::List));
    let value_color = match ctx.metric_key {
        Some(_) => ctx.style.status_color(state),
        None => ctx.style.default_color.clone(),
    };
    ListCard {
        deviceid: point.deviceid.clone(),
        lat: point.lat,
        lng: point.lng,
        value_text,
        value_color,
        unit: ctx.unit.map(str::to_string),
        last_updated: state.last_updated.map(|ts| relative_time(ts, ctx.now)),
        status: state.status.to_string(),
        tone: StatusTone::of(state),
        selected,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailRow {
    pub key: String,
    pub value: String,
    pub unit: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlertRow {
    pub text: String,
    pub created: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AlertTable {
    Rows(Vec<AlertRow>),
    NoAlerts,
}

impl AlertTable {
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            AlertTable::NoAlerts => Some(NO_ALERTS),
            AlertTable::Rows(_) => None,
        }
    }
}

/// Expanded view of the selected device.
#[derive(Clone, Debug, PartialEq)]
pub struct DetailView {
    pub card: ListCard,
    pub rows: Vec<DetailRow>,
    pub alerts: AlertTable,
}

/// Build the detail view. `unit_for` maps a payload key to its unit label.
pub fn detail_view<'u>(
    point: &Point,
    state: &DeviceState,
    ctx: &CardContext<'_>,
    unit_for: impl Fn(&str) -> Option<&'u str>,
) -> DetailView {
    let rows = state
        .raw_fields
        .iter()
        .filter(|(key, _)| Some(*key) != ctx.metric_key)
        .map(|(key, value)| DetailRow {
            key: key.to_string(),
            value: value.to_string(),
            unit: unit_for(key).map(str::to_string),
        })
        .collect();

    let alerts = if state.alerts.is_empty() {
        AlertTable::NoAlerts
    } else {
        AlertTable::Rows(
            state
                .alerts
                .iter()
                .map(|a| AlertRow {
                    text: a.text.clone().unwrap_or_default(),
                    created: a.created.clone().unwrap_or_default(),
                })
                .collect(),
        )
    };

    DetailView {
        card: list_card(point, state, ctx, true),
        rows,
        alerts,
    }
}

/// Pointer hover popup.
#[derive(Clone, Debug, PartialEq)]
pub struct HoverCard {
    pub deviceid: String,
    pub reading: Option<String>,
    pub status: String,
    pub status_dot: Color,
}

pub fn hover_card(state: &DeviceState, metric_key: Option<&str>, unit: Option<&str>) -> HoverCard {
    let reading = metric_key.map(|key| {
        let value = state
            .metric_value
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| MISSING_VALUE.to_string());
        match unit {
            Some(unit) => format!("{key}: {value} {unit}"),
            None => format!("{key}: {value}"),
        }
    });
    HoverCard {
        deviceid: state.deviceid.clone(),
        reading,
        status: state.status.to_string(),
        status_dot: StatusTone::of(state).dot_color(),
    }
}
