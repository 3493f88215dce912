use std::sync::Arc;

use chrono::{DateTime, Utc};
use devmap_classifier::BandList;
use devmap_compose::{
    detail_view, hover_card, list_card, CardContext, DetailView, HoverCard, ListCard, MarkerStyle,
};
use devmap_extract::{extract_points, KeyCatalog, KeyDiscovery, StateExtractor};
use devmap_options::{PanelOptions, TileSource, UnitLabels, ZoomPolicy};
use devmap_schema::Frame;
use devmap_types::{DeviceState, MarkerVisual, Point};
use tracing::{debug, warn};

pub mod host;
pub mod view;

pub use host::{HostEvent, NullHost, PanelHost, RecordingHost};
pub use view::{Extent, ViewCommand, ViewState};

/// Everything one refresh produces, index-aligned with `points`.
#[derive(Clone, Debug)]
pub struct RenderPass {
    pub points: Vec<Point>,
    pub states: Vec<DeviceState>,
    pub markers: Vec<MarkerVisual>,
    pub cards: Vec<ListCard>,
    pub catalog: Arc<KeyCatalog>,
    pub now: DateTime<Utc>,
}

impl RenderPass {
    fn position(&self, deviceid: &str) -> Option<usize> {
        self.points.iter().position(|p| p.deviceid == deviceid)
    }

    pub fn state(&self, deviceid: &str) -> Option<&DeviceState> {
        self.position(deviceid).map(|i| &self.states[i])
    }

    pub fn marker(&self, deviceid: &str) -> Option<&MarkerVisual> {
        self.position(deviceid).map(|i| &self.markers[i])
    }
}

/// The map panel: committed options plus view state, rendering each
/// dataset the host delivers.
pub struct PanelKernel {
    options: PanelOptions,
    style: MarkerStyle,
    tiles: TileSource,
    units: UnitLabels,
    discovery: KeyDiscovery,
    view: ViewState,
}

impl PanelKernel {
    pub fn new(options: PanelOptions, host: Arc<dyn PanelHost>) -> Self {
        let mut kernel = Self {
            options: PanelOptions::default(),
            style: MarkerStyle::default(),
            tiles: TileSource::OpenStreetMap,
            units: UnitLabels::default(),
            discovery: KeyDiscovery::new(),
            view: ViewState::new(host),
        };
        kernel.apply_options(options);
        kernel
    }

    /// Commit a new options object. Invalid parts degrade instead of failing:
    /// bad bands render every marker in the default color, a bad tile
    /// template falls back to OpenStreetMap.
    pub fn apply_options(&mut self, options: PanelOptions) {
        let bands = options.bands().unwrap_or_else(|e| {
            warn!("color bands rejected, using default color: {e}");
            BandList::empty()
        });
        self.tiles = options.tile_source().unwrap_or_else(|e| {
            warn!("tile layer rejected, using OpenStreetMap: {e}");
            TileSource::OpenStreetMap
        });
        if options.zoom_boolean {
            if let Err(e) = ZoomPolicy::check(options.zoom_ind) {
                warn!("{e}; clamping");
            }
        }
        self.view.set_zoom(options.zoom_policy());
        self.style = MarkerStyle::new(bands, options.def_color.clone(), options.pin_text.clone());
        self.units = options.unit_labels();
        debug!(
            bands = self.style.bands.len(),
            key = options.metric_key().unwrap_or("-"),
            "options applied"
        );
        self.options = options;
    }

    pub fn options(&self) -> &PanelOptions {
        &self.options
    }

    pub fn style(&self) -> &MarkerStyle {
        &self.style
    }

    pub fn tile_source(&self) -> &TileSource {
        &self.tiles
    }

    pub fn units(&self) -> &UnitLabels {
        &self.units
    }

    pub fn key_catalog(&self) -> Arc<KeyCatalog> {
        self.discovery.snapshot()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn render(&mut self, frames: &[Frame]) -> RenderPass {
        self.render_at(frames, Utc::now())
    }

    /// Render with an explicit clock for the "last updated" text.
    pub fn render_at(&mut self, frames: &[Frame], now: DateTime<Utc>) -> RenderPass {
        let catalog = self.discovery.rescan(frames);
        let key = self.options.metric_key();
        if let Some(key) = key {
            if !catalog.is_empty() && !catalog.contains(key) {
                debug!(key, "metric key not present in any payload");
            }
        }

        let points = extract_points(frames);
        let states = StateExtractor::new(frames).extract_all(&points, key, self.options.alert_alignment);
        let markers = points
            .iter()
            .zip(&states)
            .map(|(point, state)| self.style.compose(point, state))
            .collect();

        let ctx = self.card_context(now);
        let selected = self.view.selected();
        let cards = points
            .iter()
            .zip(&states)
            .map(|(point, state)| list_card(point, state, &ctx, selected == Some(point.deviceid.as_str())))
            .collect();

        debug!(frames = frames.len(), points = points.len(), "render pass");
        RenderPass {
            points,
            states,
            markers,
            cards,
            catalog,
            now,
        }
    }

    fn card_context(&self, now: DateTime<Utc>) -> CardContext<'_> {
        CardContext {
            style: &self.style,
            metric_key: self.options.metric_key(),
            unit: self.options.unit_label(),
            now,
        }
    }

    /// Detail view of the expanded device, if it is still plotted.
    pub fn detail(&self, pass: &RenderPass) -> Option<DetailView> {
        let deviceid = self.view.expanded()?;
        let i = pass.position(deviceid)?;
        let ctx = self.card_context(pass.now);
        Some(detail_view(&pass.points[i], &pass.states[i], &ctx, |key| self.units.label(key)))
    }

    pub fn hover(&self, deviceid: &str, pass: &RenderPass) -> Option<HoverCard> {
        let state = pass.state(deviceid)?;
        Some(hover_card(state, self.options.metric_key(), self.options.unit_label()))
    }
}
