//! Frame documents on disk.
//!
//! ```json
//! {"frames": [{"name": "devices", "fields": [
//!     {"name": "deviceid", "type": "string", "values": ["a", "b"]},
//!     {"name": "lat", "type": "number", "values": [25.3, null]}
//! ]}]}
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use devmap_schema::{Frame, FrameBuilder};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{FrameSource, SourceError};

#[derive(Debug, Deserialize)]
struct FrameDocument {
    #[serde(default)]
    frames: Vec<FrameEntry>,
}

#[derive(Debug, Deserialize)]
struct FrameEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    fields: Vec<FieldEntry>,
}

#[derive(Debug, Deserialize)]
struct FieldEntry {
    name: String,
    #[serde(rename = "type")]
    kind: FieldKind,
    #[serde(default)]
    values: Vec<Value>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum FieldKind {
    Number,
    String,
    Boolean,
    /// Epoch milliseconds.
    Time,
}

/// Decode a frame document into Arrow-backed frames, preserving nulls.
pub fn decode_frames(text: &str) -> Result<Vec<Frame>, SourceError> {
    let doc: FrameDocument = serde_json::from_str(text)?;
    doc.frames
        .into_iter()
        .enumerate()
        .map(|(index, entry)| decode_frame(index, entry))
        .collect()
}

fn decode_frame(index: usize, entry: FrameEntry) -> Result<Frame, SourceError> {
    let label = entry.name.clone().unwrap_or_else(|| format!("#{index}"));
    let mut builder = FrameBuilder::new();
    if let Some(name) = entry.name {
        builder = builder.name(name);
    }

    for field in entry.fields {
        let bad = |row: usize, expected: &str| SourceError::Field {
            frame: label.clone(),
            field: field.name.clone(),
            message: format!("row {row}: expected {expected}"),
        };
        builder = match field.kind {
            FieldKind::Number => {
                let values = field
                    .values
                    .iter()
                    .enumerate()
                    .map(|(row, v)| match v {
                        Value::Null => Ok(None),
                        Value::Number(n) => n.as_f64().map(Some).ok_or_else(|| bad(row, "a number")),
                        _ => Err(bad(row, "a number")),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                builder.number(&field.name, values)
            }
            FieldKind::String => {
                // Objects in string fields are kept as their JSON text.
                let values: Vec<Option<String>> = field
                    .values
                    .iter()
                    .map(|v| match v {
                        Value::Null => None,
                        Value::String(s) => Some(s.clone()),
                        other => Some(other.to_string()),
                    })
                    .collect();
                builder.text(&field.name, values)
            }
            FieldKind::Boolean => {
                let values = field
                    .values
                    .iter()
                    .enumerate()
                    .map(|(row, v)| match v {
                        Value::Null => Ok(None),
                        Value::Bool(b) => Ok(Some(*b)),
                        _ => Err(bad(row, "a boolean")),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                builder.flag(&field.name, values)
            }
            FieldKind::Time => {
                let values = field
                    .values
                    .iter()
                    .enumerate()
                    .map(|(row, v)| match v {
                        Value::Null => Ok(None),
                        Value::Number(n) => n.as_i64().map(Some).ok_or_else(|| bad(row, "epoch milliseconds")),
                        _ => Err(bad(row, "epoch milliseconds")),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                builder.time_ms(&field.name, values)
            }
        };
    }

    builder
        .build()
        .map_err(|source| SourceError::Arrow { frame: label, source })
}

/// Reads a frame document from disk on every refresh.
pub struct JsonFrameSource {
    path: PathBuf,
}

impl JsonFrameSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FrameSource for JsonFrameSource {
    async fn frames(&self) -> Result<Vec<Frame>, SourceError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SourceError::Io {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })?;
        let frames = decode_frames(&text)?;
        debug!(path = %self.path.display(), frames = frames.len(), "loaded frame document");
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use arrow::array::{Array, Float64Array, StringArray};
    use arrow::datatypes::DataType;

    use super::*;

    const DOC: &str = r#"{"frames": [
        {"name": "locations", "fields": [
            {"name": "deviceid", "type": "string", "values": ["st-1", null, "st-3"]},
            {"name": "lat", "type": "number", "values": [25.3, 25.1, null]},
            {"name": "lng", "type": "number", "values": [51.5, 51.2, 51.0]}
        ]},
        {"fields": [
            {"name": "deviceid", "type": "string", "values": ["st-1"]},
            {"name": "data", "type": "string", "values": [{"temp": 21}]},
            {"name": "active", "type": "boolean", "values": [true]},
            {"name": "receive_timestamp", "type": "time", "values": [1714564800000]}
        ]}
    ]}"#;

    #[test]
    fn decodes_typed_columns() {
        let frames = decode_frames(DOC).unwrap();
        assert_eq!(frames.len(), 2);

        let loc = &frames[0];
        assert_eq!(loc.name(), Some("locations"));
        assert_eq!(loc.num_rows(), 3);
        let lat = loc.column("lat").unwrap().as_any().downcast_ref::<Float64Array>().unwrap();
        assert!(lat.is_null(2));
        let ids = loc.column("deviceid").unwrap().as_any().downcast_ref::<StringArray>().unwrap();
        assert!(ids.is_null(1));

        let tel = &frames[1];
        assert_eq!(tel.name(), None);
        let data = tel.column("data").unwrap().as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(data.value(0), r#"{"temp":21}"#);
        assert_eq!(tel.schema().field_with_name("receive_timestamp").unwrap().data_type(), &DataType::Int64);
        assert_eq!(tel.schema().field_with_name("active").unwrap().data_type(), &DataType::Boolean);
    }

    #[test]
    fn rejects_bad_documents() {
        assert!(matches!(decode_frames("not json"), Err(SourceError::Json(_))));
        assert!(matches!(
            decode_frames(r#"{"frames":[{"fields":[{"name":"x","type":"vector","values":[]}]}]}"#),
            Err(SourceError::Json(_))
        ));
        assert!(matches!(
            decode_frames(r#"{"frames":[{"name":"f","fields":[{"name":"lat","type":"number","values":["north"]}]}]}"#),
            Err(SourceError::Field { ref field, .. }) if field == "lat"
        ));
        assert!(matches!(
            decode_frames(
                r#"{"frames":[{"name":"f","fields":[
                    {"name":"lat","type":"number","values":[1, 2]},
                    {"name":"deviceid","type":"string","values":["a"]}
                ]}]}"#
            ),
            Err(SourceError::Arrow { ref frame, .. }) if frame == "f"
        ));
    }

    #[test]
    fn empty_document() {
        assert!(decode_frames("{}").unwrap().is_empty());
    }

    #[tokio::test]
    async fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.json");
        std::fs::write(&path, DOC).unwrap();

        let source = JsonFrameSource::new(&path);
        assert_eq!(source.frames().await.unwrap().len(), 2);

        let missing = JsonFrameSource::new(dir.path().join("nope.json"));
        assert!(matches!(missing.frames().await, Err(SourceError::Io { .. })));
    }
}
