//! Tile layer selection and zoom behaviour.

use serde::{Deserialize, Serialize};

use crate::OptionsError;

pub const OSM_TEMPLATE: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Initial viewport before any data arrives: zoom 9 over (lat 25.30, lng 51.15).
pub const INITIAL_ZOOM: u8 = 9;
pub const INITIAL_CENTER: (f64, f64) = (25.30, 51.15);
/// Zoom used when focusing a single device without an override.
pub const DEFAULT_FOCUS_ZOOM: u8 = 12;
pub const MAX_ZOOM: u8 = 20;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapType {
    #[default]
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "XYZconfig")]
    Xyz,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TileSource {
    OpenStreetMap,
    Custom(String),
}

impl TileSource {
    pub fn from_options(map_type: MapType, url: Option<&str>) -> Result<Self, OptionsError> {
        match map_type {
            MapType::Default => Ok(TileSource::OpenStreetMap),
            MapType::Xyz => {
                let url = url.map(str::trim).filter(|u| !u.is_empty()).ok_or(OptionsError::EmptyTileUrl)?;
                if !url.contains("{x}") {
                    return Err(OptionsError::MissingTilePlaceholder("{x}"));
                }
                if !url.contains("{y}") && !url.contains("{-y}") {
                    return Err(OptionsError::MissingTilePlaceholder("{y}"));
                }
                if !url.contains("{z}") {
                    return Err(OptionsError::MissingTilePlaceholder("{z}"));
                }
                Ok(TileSource::Custom(url.to_string()))
            }
        }
    }

    pub fn url_template(&self) -> &str {
        match self {
            TileSource::OpenStreetMap => OSM_TEMPLATE,
            TileSource::Custom(url) => url,
        }
    }
}

/// Zoom applied when the view focuses a device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoomPolicy {
    override_zoom: Option<u8>,
}

impl ZoomPolicy {
    pub fn new(override_zoom: Option<u8>) -> Self {
        Self {
            override_zoom: override_zoom.map(|z| z.min(MAX_ZOOM)),
        }
    }

    pub fn check(zoom: u8) -> Result<u8, OptionsError> {
        if zoom > MAX_ZOOM {
            Err(OptionsError::ZoomOutOfRange(zoom))
        } else {
            Ok(zoom)
        }
    }

    pub fn focus_zoom(&self) -> u8 {
        self.override_zoom.unwrap_or(DEFAULT_FOCUS_ZOOM)
    }

    pub fn initial_zoom(&self) -> u8 {
        INITIAL_ZOOM
    }
}

impl Default for ZoomPolicy {
    fn default() -> Self {
        Self::new(None)
    }
}
