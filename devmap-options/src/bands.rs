//! Color scheme editor state and its commit into a [`BandList`].

use devmap_classifier::{Band, BandList};
use devmap_types::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::OptionsError;

/// Threshold as typed in the editor: a number, or the raw input text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Threshold {
    Number(f64),
    Text(String),
}

impl Threshold {
    pub fn parse(&self) -> Option<f64> {
        match self {
            Threshold::Number(n) => Some(*n),
            Threshold::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorPair {
    pub color: Color,
    pub value: Threshold,
}

impl ColorPair {
    pub fn new(color: impl Into<String>, value: Threshold) -> Self {
        Self {
            color: Color::new(color),
            value,
        }
    }
}

/// `colorPairs` as the host stores it: the color editor writes the list
/// wrapped in an object, older dashboards carry the bare list.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredColorPairs {
    List(Vec<ColorPair>),
    Wrapped {
        #[serde(rename = "colorPairs", default)]
        color_pairs: Vec<ColorPair>,
    },
}

#[derive(Serialize)]
struct WrappedColorPairs<'a> {
    #[serde(rename = "colorPairs")]
    color_pairs: &'a [ColorPair],
}

pub(crate) fn deserialize_color_pairs<'de, D>(deserializer: D) -> Result<Vec<ColorPair>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<StoredColorPairs>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(StoredColorPairs::List(pairs)) => pairs,
        Some(StoredColorPairs::Wrapped { color_pairs }) => color_pairs,
    })
}

/// Always written in the editor's wrapped shape.
pub(crate) fn serialize_color_pairs<S>(pairs: &[ColorPair], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    WrappedColorPairs { color_pairs: pairs }.serialize(serializer)
}

/// Pending edits to the color scheme. Order is whatever the user typed;
/// [`BandDraft::commit`] is the only path to a classifier-ready list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BandDraft {
    pairs: Vec<ColorPair>,
}

impl BandDraft {
    pub fn new(pairs: Vec<ColorPair>) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &[ColorPair] {
        &self.pairs
    }

    /// Append the editor's starter band (green at 0).
    pub fn add(&mut self) {
        self.pairs
            .push(ColorPair::new("green", Threshold::Number(0.0)));
    }

    pub fn set_color(&mut self, index: usize, color: impl Into<String>) -> bool {
        match self.pairs.get_mut(index) {
            Some(pair) => {
                pair.color = Color::new(color);
                true
            }
            None => false,
        }
    }

    /// Store the raw input; it is only parsed on commit.
    pub fn set_threshold(&mut self, index: usize, input: impl Into<String>) -> bool {
        match self.pairs.get_mut(index) {
            Some(pair) => {
                pair.value = Threshold::Text(input.into());
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<ColorPair> {
        (index < self.pairs.len()).then(|| self.pairs.remove(index))
    }

    /// Parse, validate and sort into a snapshot.
    pub fn commit(&self) -> Result<BandList, OptionsError> {
        let bands = self
            .pairs
            .iter()
            .enumerate()
            .map(|(index, pair)| -> Result<Band, OptionsError> {
                let threshold = pair.value.parse().ok_or_else(|| OptionsError::BadThreshold {
                    index,
                    value: match &pair.value {
                        Threshold::Text(s) => s.clone(),
                        Threshold::Number(n) => n.to_string(),
                    },
                })?;
                Ok(Band {
                    threshold,
                    color: pair.color.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BandList::commit(bands)?)
    }

    pub fn into_pairs(self) -> Vec<ColorPair> {
        self.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_then_commit() {
        let mut draft = BandDraft::default();
        draft.add();
        draft.add();
        assert!(draft.set_color(1, "red"));
        assert!(draft.set_threshold(1, "80"));
        assert!(draft.set_threshold(0, " 20 "));
        assert!(!draft.set_color(5, "blue"));

        let bands = draft.commit().unwrap();
        assert_eq!(bands.bands()[0].threshold, 20.0);
        assert_eq!(bands.bands()[1].color.as_str(), "red");
    }

    #[test]
    fn commit_sorts_without_touching_the_draft() {
        let draft = BandDraft::new(vec![
            ColorPair::new("red", Threshold::Number(100.0)),
            ColorPair::new("gray", Threshold::Number(0.0)),
        ]);
        let bands = draft.commit().unwrap();
        assert_eq!(bands.bands()[0].color.as_str(), "gray");
        assert_eq!(draft.pairs()[0].color.as_str(), "red");
    }

    #[test]
    fn removal_and_bad_input() {
        let mut draft = BandDraft::default();
        draft.add();
        draft.set_threshold(0, "abc");
        assert!(matches!(
            draft.commit(),
            Err(OptionsError::BadThreshold { index: 0, .. })
        ));
        assert!(draft.remove(0).is_some());
        assert!(draft.remove(0).is_none());
        assert!(draft.commit().unwrap().is_empty());
    }

    #[test]
    fn empty_color_is_a_band_error() {
        let draft = BandDraft::new(vec![ColorPair::new("", Threshold::Number(1.0))]);
        assert!(matches!(draft.commit(), Err(OptionsError::Band(_))));
    }
}
