//! What a frame contributes to a render pass.

use arrow::datatypes::DataType;

/// Frame roles recognised by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRole {
    Location, // lat / lng / deviceid
}

impl FrameRole {
    pub const fn label(self) -> &'static str {
        match self {
            FrameRole::Location => "location",
        }
    }
}

/// Logical column type as the host describes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Number,
    Text,
}

impl ColumnKind {
    /// Whether an Arrow column of `data_type` satisfies this kind.
    pub fn accepts(self, data_type: &DataType) -> bool {
        match self {
            ColumnKind::Number => matches!(
                data_type,
                DataType::Int8
                    | DataType::Int16
                    | DataType::Int32
                    | DataType::Int64
                    | DataType::UInt8
                    | DataType::UInt16
                    | DataType::UInt32
                    | DataType::UInt64
                    | DataType::Float16
                    | DataType::Float32
                    | DataType::Float64
            ),
            ColumnKind::Text => matches!(data_type, DataType::Utf8 | DataType::LargeUtf8),
        }
    }
}
