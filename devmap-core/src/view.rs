//! Selection, expansion and fit requests shared between the list and the map.

use std::sync::Arc;

use devmap_options::ZoomPolicy;
use devmap_types::Point;
use tracing::debug;

use crate::host::PanelHost;

/// Padding around a fitted extent, in pixels.
pub const FIT_PADDING: u32 = 50;
/// Fly-to animation length for a fit.
pub const FIT_DURATION_MS: u32 = 1250;

/// Bounding box of a set of points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl Extent {
    pub fn of(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let start = Extent {
            min_lat: first.lat,
            min_lng: first.lng,
            max_lat: first.lat,
            max_lng: first.lng,
        };
        Some(points.iter().skip(1).fold(start, |e, p| Extent {
            min_lat: e.min_lat.min(p.lat),
            min_lng: e.min_lng.min(p.lng),
            max_lat: e.max_lat.max(p.lat),
            max_lng: e.max_lng.max(p.lng),
        }))
    }
}

/// What the map should do next.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewCommand {
    CenterOn { lat: f64, lng: f64, zoom: u8 },
    FitExtent { extent: Extent, padding: u32, duration_ms: u32 },
}

pub struct ViewState {
    host: Arc<dyn PanelHost>,
    zoom: ZoomPolicy,
    selected: Option<String>,
    expanded: Option<String>,
    fit_pending: bool,
}

impl ViewState {
    pub fn new(host: Arc<dyn PanelHost>) -> Self {
        Self {
            host,
            zoom: ZoomPolicy::default(),
            selected: None,
            expanded: None,
            fit_pending: false,
        }
    }

    pub fn set_zoom(&mut self, zoom: ZoomPolicy) {
        self.zoom = zoom;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    pub fn fit_pending(&self) -> bool {
        self.fit_pending
    }

    fn center_on(&self, point: &Point) -> ViewCommand {
        ViewCommand::CenterOn {
            lat: point.lat,
            lng: point.lng,
            zoom: self.zoom.focus_zoom(),
        }
    }

    /// A list row was clicked.
    pub fn select_from_list(&mut self, point: &Point) -> ViewCommand {
        self.selected = Some(point.deviceid.clone());
        self.host.device_selected(&point.deviceid);
        self.center_on(point)
    }

    /// A marker (or a cluster resolved to its first member) was clicked.
    /// Unknown ids leave the view untouched.
    pub fn click_marker(&mut self, deviceid: &str, points: &[Point]) -> Option<ViewCommand> {
        let Some(point) = points.iter().find(|p| p.deviceid == deviceid) else {
            debug!(device = deviceid, "click on a device that is not plotted");
            return None;
        };
        self.selected = Some(point.deviceid.clone());
        self.expanded = Some(point.deviceid.clone());
        self.host.expand_detail(&point.deviceid);
        Some(self.center_on(point))
    }

    /// Fit the map to every point. Nothing to fit on an empty map.
    pub fn request_fit(&mut self, points: &[Point]) -> Option<ViewCommand> {
        let extent = Extent::of(points)?;
        self.fit_pending = true;
        self.host.fit_view(true);
        Some(ViewCommand::FitExtent {
            extent,
            padding: FIT_PADDING,
            duration_ms: FIT_DURATION_MS,
        })
    }

    /// Consume a pending fit. The host sees the flag drop back to false.
    pub fn take_fit(&mut self) -> bool {
        if !self.fit_pending {
            return false;
        }
        self.fit_pending = false;
        self.host.fit_view(false);
        true
    }

    /// Collapse the detail view and zoom back out to all devices.
    pub fn close_detail(&mut self, points: &[Point]) -> Option<ViewCommand> {
        self.expanded = None;
        self.selected = None;
        self.request_fit(points)
    }
}
