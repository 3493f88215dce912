//! Typed, zero-copy views over frame columns.

use arrow::array::{Array, Float64Array, LargeStringArray, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use devmap_schema::{ColumnKind, Frame};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ColumnError {
    #[error("missing column '{0}'")]
    MissingColumn(String),
    #[error("invalid type for column '{0}'")]
    InvalidColumnType(String),
}

/// String column, either offset width.
#[derive(Clone, Copy)]
pub enum TextColumn<'a> {
    Utf8(&'a StringArray),
    Large(&'a LargeStringArray),
}

impl<'a> TextColumn<'a> {
    pub fn len(&self) -> usize {
        match self {
            TextColumn::Utf8(a) => a.len(),
            TextColumn::Large(a) => a.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell text; `None` for nulls and out-of-range rows.
    pub fn value(&self, row: usize) -> Option<&'a str> {
        if row >= self.len() {
            return None;
        }
        match self {
            TextColumn::Utf8(a) if !a.is_null(row) => Some(a.value(row)),
            TextColumn::Large(a) if !a.is_null(row) => Some(a.value(row)),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&'a str>> + '_ {
        (0..self.len()).map(move |row| self.value(row))
    }
}

/// Numeric column widened to `f64`.
pub struct NumberColumn {
    values: Float64Array,
}

impl NumberColumn {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value(&self, row: usize) -> Option<f64> {
        if row >= self.values.len() || self.values.is_null(row) {
            None
        } else {
            Some(self.values.value(row))
        }
    }
}

/// Locate a string column by name.
pub fn text_column<'a>(frame: &'a Frame, name: &str) -> Result<TextColumn<'a>, ColumnError> {
    let array = frame
        .column(name)
        .ok_or_else(|| ColumnError::MissingColumn(name.to_string()))?;
    if let Some(a) = array.as_any().downcast_ref::<StringArray>() {
        return Ok(TextColumn::Utf8(a));
    }
    if let Some(a) = array.as_any().downcast_ref::<LargeStringArray>() {
        return Ok(TextColumn::Large(a));
    }
    Err(ColumnError::InvalidColumnType(name.to_string()))
}

/// Locate a numeric column by name, casting integer/float widths to `f64`.
pub fn number_column(frame: &Frame, name: &str) -> Result<NumberColumn, ColumnError> {
    let array = frame
        .column(name)
        .ok_or_else(|| ColumnError::MissingColumn(name.to_string()))?;
    if !ColumnKind::Number.accepts(array.data_type()) {
        return Err(ColumnError::InvalidColumnType(name.to_string()));
    }
    let widened = cast(array.as_ref(), &DataType::Float64)
        .map_err(|_| ColumnError::InvalidColumnType(name.to_string()))?;
    let values = widened
        .as_any()
        .downcast_ref::<Float64Array>()
        .cloned()
        .ok_or_else(|| ColumnError::InvalidColumnType(name.to_string()))?;
    Ok(NumberColumn { values })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Int64Array, LargeStringArray};
    use devmap_schema::FrameBuilder;

    use super::*;

    #[test]
    fn integer_columns_widen_to_f64() {
        let frame = FrameBuilder::new()
            .column("lat", DataType::Int64, Arc::new(Int64Array::from(vec![Some(25), None])))
            .build()
            .unwrap();
        let col = number_column(&frame, "lat").unwrap();
        assert_eq!(col.value(0), Some(25.0));
        assert_eq!(col.value(1), None);
        assert_eq!(col.value(9), None);
    }

    #[test]
    fn large_utf8_is_readable() {
        let frame = FrameBuilder::new()
            .column(
                "deviceid",
                DataType::LargeUtf8,
                Arc::new(LargeStringArray::from(vec![Some("a"), None])),
            )
            .build()
            .unwrap();
        let col = text_column(&frame, "deviceid").unwrap();
        assert_eq!(col.iter().collect::<Vec<_>>(), vec![Some("a"), None]);
    }

    #[test]
    fn wrong_types_are_reported() {
        let frame = FrameBuilder::new()
            .number("deviceid", vec![Some(1.0)])
            .text("lat", vec![Some("north")])
            .build()
            .unwrap();
        assert!(matches!(
            text_column(&frame, "deviceid"),
            Err(ColumnError::InvalidColumnType(_))
        ));
        assert!(matches!(
            number_column(&frame, "lat"),
            Err(ColumnError::InvalidColumnType(_))
        ));
        assert!(matches!(
            number_column(&frame, "lng"),
            Err(ColumnError::MissingColumn(_))
        ));
    }
}
