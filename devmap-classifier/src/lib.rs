//! Threshold bands and value -> color classification.

use devmap_types::{Color, MetricValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lower bound of a half-open value range and the color shown inside it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub threshold: f64,
    pub color: Color,
}

impl Band {
    pub fn new(threshold: f64, color: impl Into<String>) -> Self {
        Self {
            threshold,
            color: Color::new(color),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum BandError {
    #[error("band {index} has a non-finite threshold")]
    NonFiniteThreshold { index: usize },
    #[error("band {index} has an empty color")]
    EmptyColor { index: usize },
}

/// Immutable, ascending band snapshot.
///
/// The only way to build one is [`BandList::commit`], so classification never
/// sees unsorted bands.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BandList {
    bands: Vec<Band>,
}

impl BandList {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate and sort a band edit into a snapshot.
    pub fn commit(mut bands: Vec<Band>) -> Result<Self, BandError> {
        for (index, band) in bands.iter().enumerate() {
            if !band.threshold.is_finite() {
                return Err(BandError::NonFiniteThreshold { index });
            }
            if band.color.as_str().trim().is_empty() {
                return Err(BandError::EmptyColor { index });
            }
        }
        // Stable: equal thresholds keep their edit order.
        bands.sort_by(|a, b| a.threshold.total_cmp(&b.threshold));
        Ok(Self { bands })
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    pub fn classify(&self, value: f64, default: &Color) -> Color {
        classify_slice(value, &self.bands, default)
    }
}

/// Color for `value` under `bands`.
pub fn classify(value: f64, bands: &BandList, default: &Color) -> Color {
    bands.classify(value, default)
}

/// Color for an optional payload value; absent or non-numeric values get `default`.
pub fn classify_metric(value: Option<&MetricValue>, bands: &BandList, default: &Color) -> Color {
    match value.and_then(MetricValue::as_number) {
        Some(v) => bands.classify(v, default),
        None => default.clone(),
    }
}

/// Classification over a raw slice.
///
/// Assumes `bands` is ascending by threshold; the result for unsorted input is
/// whatever the first matching adjacent pair says. NaN never matches.
pub fn classify_slice(value: f64, bands: &[Band], default: &Color) -> Color {
    let Some(last) = bands.last() else {
        return default.clone();
    };
    for pair in bands.windows(2) {
        if value >= pair[0].threshold && value < pair[1].threshold {
            return pair[0].color.clone();
        }
    }
    if value >= last.threshold {
        return last.color.clone();
    }
    default.clone()
}
