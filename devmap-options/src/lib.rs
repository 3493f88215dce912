//! Panel options as the host stores them, plus the editors' operations.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use devmap_classifier::{BandError, BandList};
use devmap_extract::AlertAlignment;
use devmap_types::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod bands;
pub mod tiles;
pub mod units;

pub use bands::{BandDraft, ColorPair, Threshold};
pub use tiles::{MapType, TileSource, ZoomPolicy};
pub use units::UnitLabels;

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("io error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("custom tile layer needs a URL template")]
    EmptyTileUrl,
    #[error("tile URL template is missing the {0} placeholder")]
    MissingTilePlaceholder(&'static str),
    #[error("zoom {0} is outside 0..=20")]
    ZoomOutOfRange(u8),
    #[error("color band {index} has a non-numeric threshold '{value}'")]
    BadThreshold { index: usize, value: String },
    #[error("invalid color band: {0}")]
    Band(#[from] BandError),
}

/// Options object of the map panel.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanelOptions {
    #[serde(rename = "type")]
    pub map_type: MapType,
    #[serde(rename = "XYZurl")]
    pub xyz_url: Option<String>,
    pub zoom_boolean: bool,
    pub zoom_ind: u8,
    pub pin_text: Color,
    pub header: String,
    pub data_key: Option<String>,
    pub unit: Option<String>,
    #[serde(
        deserialize_with = "bands::deserialize_color_pairs",
        serialize_with = "bands::serialize_color_pairs"
    )]
    pub color_pairs: Vec<ColorPair>,
    pub def_color: Color,
    pub data_units: BTreeMap<String, String>,
    pub alert_alignment: AlertAlignment,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            map_type: MapType::Default,
            xyz_url: None,
            zoom_boolean: false,
            zoom_ind: 5,
            pin_text: Color::from("#FFF"),
            header: "DEVICES".into(),
            data_key: None,
            unit: None,
            color_pairs: Vec::new(),
            def_color: Color::from("#808080"),
            data_units: BTreeMap::new(),
            alert_alignment: AlertAlignment::ById,
        }
    }
}

impl PanelOptions {
    pub fn from_json_str(text: &str) -> Result<Self, OptionsError> {
        serde_json::from_str(text).map_err(|e| OptionsError::Parse(e.to_string()))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, OptionsError> {
        serde_yaml::from_str(text).map_err(|e| OptionsError::Parse(e.to_string()))
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| OptionsError::Io(e.to_string()))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            _ => Self::from_json_str(&text),
        }
    }

    /// Metric key on display; an empty selection counts as none.
    pub fn metric_key(&self) -> Option<&str> {
        self.data_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn unit_label(&self) -> Option<&str> {
        self.unit.as_deref().filter(|u| !u.is_empty())
    }

    pub fn band_draft(&self) -> BandDraft {
        BandDraft::new(self.color_pairs.clone())
    }

    /// Validated, sorted band snapshot.
    pub fn bands(&self) -> Result<BandList, OptionsError> {
        self.band_draft().commit()
    }

    pub fn tile_source(&self) -> Result<TileSource, OptionsError> {
        TileSource::from_options(self.map_type, self.xyz_url.as_deref())
    }

    pub fn zoom_policy(&self) -> ZoomPolicy {
        ZoomPolicy::new(self.zoom_boolean.then_some(self.zoom_ind))
    }

    pub fn unit_labels(&self) -> UnitLabels {
        UnitLabels::from_map(self.data_units.clone())
    }

    /// Every configuration problem, for the options editor.
    pub fn validate(&self) -> Vec<OptionsError> {
        let mut problems = Vec::new();
        if let Err(e) = self.tile_source() {
            problems.push(e);
        }
        if self.zoom_boolean {
            if let Err(e) = ZoomPolicy::check(self.zoom_ind) {
                problems.push(e);
            }
        }
        if let Err(e) = self.bands() {
            problems.push(e);
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST_JSON: &str = r##"{
        "type": "XYZconfig",
        "XYZurl": "https://tiles.example/{z}/{-y}/{x}.png",
        "zoomBoolean": true,
        "zoomInd": 14,
        "header": "STATIONS",
        "dataKey": "pm25",
        "unit": "µg/m³",
        "colorPairs": [
            {"color": "red", "value": "100"},
            {"color": "green", "value": 0}
        ],
        "defColor": "#808080",
        "dataUnits": {"temp": "°C"}
    }"##;

    #[test]
    fn parses_host_options() {
        let opts = PanelOptions::from_json_str(HOST_JSON).unwrap();
        assert_eq!(opts.map_type, MapType::Xyz);
        assert_eq!(opts.metric_key(), Some("pm25"));
        assert_eq!(opts.zoom_policy().focus_zoom(), 14);
        assert_eq!(opts.pin_text.as_str(), "#FFF");
        let bands = opts.bands().unwrap();
        assert_eq!(bands.bands()[0].color.as_str(), "green");
        assert_eq!(bands.bands()[1].threshold, 100.0);
        assert!(opts.validate().is_empty());
        assert_eq!(opts.unit_labels().label("temp"), Some("°C"));
    }

    #[test]
    fn defaults_match_the_editor() {
        let opts = PanelOptions::from_json_str("{}").unwrap();
        assert_eq!(opts.header, "DEVICES");
        assert_eq!(opts.def_color.as_str(), "#808080");
        assert_eq!(opts.zoom_ind, 5);
        assert_eq!(opts.zoom_policy().focus_zoom(), 12);
        assert!(opts.bands().unwrap().is_empty());
        assert_eq!(opts.alert_alignment, AlertAlignment::ById);
        assert_eq!(opts.metric_key(), None);
    }

    #[test]
    fn color_pairs_in_editor_shape() {
        let opts = PanelOptions::from_json_str(
            r#"{"dataKey":"pm25","colorPairs":{"colorPairs":[{"color":"green","value":0},{"color":"red","value":"100"}]}}"#,
        )
        .unwrap();
        let bands = opts.bands().unwrap();
        assert_eq!(bands.len(), 2);
        assert_eq!(bands.bands()[1].color.as_str(), "red");
        assert_eq!(bands.bands()[1].threshold, 100.0);

        let empty = PanelOptions::from_json_str(r#"{"colorPairs":{}}"#).unwrap();
        assert!(empty.color_pairs.is_empty());
        let null = PanelOptions::from_json_str(r#"{"colorPairs":null}"#).unwrap();
        assert!(null.color_pairs.is_empty());

        let yaml = PanelOptions::from_yaml_str("colorPairs:\n  colorPairs:\n    - color: blue\n      value: 10\n").unwrap();
        assert_eq!(yaml.color_pairs.len(), 1);
    }

    #[test]
    fn saved_options_reload_in_editor_shape() {
        let opts = PanelOptions::from_json_str(HOST_JSON).unwrap();
        let saved = serde_json::to_value(&opts).unwrap();
        assert_eq!(saved["colorPairs"]["colorPairs"][0]["color"], "red");
        let reloaded: PanelOptions = serde_json::from_value(saved).unwrap();
        assert_eq!(reloaded.color_pairs, opts.color_pairs);
    }

    #[test]
    fn yaml_options() {
        let opts = PanelOptions::from_yaml_str(
            "type: default\ndataKey: temp\ncolorPairs:\n  - color: blue\n    value: 10\nalertAlignment: positional\n",
        )
        .unwrap();
        assert_eq!(opts.metric_key(), Some("temp"));
        assert_eq!(opts.bands().unwrap().len(), 1);
        assert_eq!(opts.alert_alignment, AlertAlignment::Positional);
    }

    #[test]
    fn validate_collects_every_problem() {
        let opts = PanelOptions {
            map_type: MapType::Xyz,
            xyz_url: Some("https://tiles.example/{x}.png".into()),
            zoom_boolean: true,
            zoom_ind: 30,
            color_pairs: vec![ColorPair::new("red", Threshold::Text("lots".into()))],
            ..PanelOptions::default()
        };
        let problems = opts.validate();
        assert_eq!(problems.len(), 3);
        assert!(matches!(problems[0], OptionsError::MissingTilePlaceholder(_)));
        assert!(matches!(problems[1], OptionsError::ZoomOutOfRange(30)));
        assert!(matches!(problems[2], OptionsError::BadThreshold { index: 0, .. }));
    }

    #[test]
    fn from_path_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("panel.yaml");
        fs::write(&yaml, "header: YARD\n").unwrap();
        assert_eq!(PanelOptions::from_path(&yaml).unwrap().header, "YARD");

        let json = dir.path().join("panel.json");
        fs::write(&json, r#"{"header": "DOCK"}"#).unwrap();
        assert_eq!(PanelOptions::from_path(&json).unwrap().header, "DOCK");

        assert!(matches!(
            PanelOptions::from_path(dir.path().join("missing.json")),
            Err(OptionsError::Io(_))
        ));
    }
}
