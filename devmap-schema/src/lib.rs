#![forbid(unsafe_code)]

pub mod macros;
pub mod role;

use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};

pub use role::{ColumnKind, FrameRole};

/// Column names the panel reads from host frames.
pub mod columns {
    pub const LAT: &str = "lat";
    pub const LNG: &str = "lng";
    pub const DEVICE_ID: &str = "deviceid";
    pub const DATA: &str = "data";
    pub const DEVICE_STATUS: &str = "device_status";
    pub const ALERTS_INFO: &str = "alerts_info";
    pub const RECEIVE_TIMESTAMP: &str = "receive_timestamp";
}

/// Frame shapes the panel checks before reading.
pub mod generated {
    use crate::define_frames;
    use crate::role::FrameRole;

    define_frames! {
        // Points on the map
        frame LocationFrame {
            role: FrameRole::Location,
            columns: {
                lat: Number,
                lng: Number,
                deviceid: Text
            }
        }
    }
}

pub use generated::*;

/// One host-delivered table: an Arrow batch plus the host's frame name.
#[derive(Clone, Debug)]
pub struct Frame {
    name: Option<String>,
    batch: Arc<RecordBatch>,
}

impl Frame {
    pub fn new(batch: Arc<RecordBatch>) -> Self {
        Self { name: None, batch }
    }

    pub fn named(name: impl Into<String>, batch: Arc<RecordBatch>) -> Self {
        Self {
            name: Some(name.into()),
            batch,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn batch(&self) -> &Arc<RecordBatch> {
        &self.batch
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn column(&self, name: &str) -> Option<&ArrayRef> {
        self.batch.column_by_name(name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.batch.schema().index_of(name).is_ok()
    }

    /// Label for log lines.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

/// Column-by-column frame construction.
#[derive(Default)]
pub struct FrameBuilder {
    name: Option<String>,
    fields: Vec<Field>,
    arrays: Vec<ArrayRef>,
}

impl FrameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn number(self, name: &str, values: Vec<Option<f64>>) -> Self {
        self.column(name, DataType::Float64, Arc::new(Float64Array::from(values)))
    }

    pub fn text<S: Into<String>>(self, name: &str, values: Vec<Option<S>>) -> Self {
        let values: Vec<Option<String>> = values.into_iter().map(|v| v.map(Into::into)).collect();
        self.column(name, DataType::Utf8, Arc::new(StringArray::from(values)))
    }

    pub fn flag(self, name: &str, values: Vec<Option<bool>>) -> Self {
        self.column(name, DataType::Boolean, Arc::new(BooleanArray::from(values)))
    }

    pub fn time_ms(self, name: &str, values: Vec<Option<i64>>) -> Self {
        self.column(name, DataType::Int64, Arc::new(Int64Array::from(values)))
    }

    pub fn column(mut self, name: &str, data_type: DataType, array: ArrayRef) -> Self {
        self.fields.push(Field::new(name, data_type, true));
        self.arrays.push(array);
        self
    }

    pub fn build(self) -> Result<Frame, ArrowError> {
        let rows = self.arrays.first().map(|a| a.len()).unwrap_or(0);
        let schema = Arc::new(Schema::new(self.fields));
        let options = RecordBatchOptions::new().with_row_count(Some(rows));
        let batch = RecordBatch::try_new_with_options(schema, self.arrays, &options)?;
        Ok(Frame {
            name: self.name,
            batch: Arc::new(batch),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_rejects_ragged_columns() {
        let res = FrameBuilder::new()
            .number("lat", vec![Some(1.0), Some(2.0)])
            .text("deviceid", vec![Some("a")])
            .build();
        assert!(res.is_err());
    }

    #[test]
    fn empty_builder_yields_empty_frame() {
        let frame = FrameBuilder::new().name("empty").build().unwrap();
        assert_eq!(frame.num_rows(), 0);
        assert_eq!(frame.label(), "empty");
        assert!(!frame.has_column("deviceid"));
    }
}
