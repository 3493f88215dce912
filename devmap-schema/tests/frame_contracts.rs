use std::sync::Arc;

use arrow::array::{Int32Array, LargeStringArray, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use devmap_schema::*;

#[test]
fn location_contract_columns() {
    let names: Vec<_> = LocationFrame::COLUMNS.iter().map(|(name, _)| *name).collect();
    assert_eq!(names, vec![columns::LAT, columns::LNG, columns::DEVICE_ID]);
    assert_eq!(LocationFrame::ROLE, FrameRole::Location);
    assert_eq!(LocationFrame::ROLE.label(), "location");
}

#[test]
fn integer_coordinates_are_accepted() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("lat", DataType::Int32, true),
        Field::new("lng", DataType::Int32, true),
        Field::new("deviceid", DataType::LargeUtf8, true),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int32Array::from(vec![25])),
            Arc::new(Int32Array::from(vec![51])),
            Arc::new(LargeStringArray::from(vec!["dev-1"])),
        ],
    )
    .unwrap();
    let frame = LocationFrame::new(Arc::new(batch)).unwrap();
    assert_eq!(frame.inner().num_rows(), 1);
}

#[test]
fn numeric_device_id_breaks_location_contract() {
    let frame = FrameBuilder::new()
        .number("lat", vec![Some(1.0)])
        .number("lng", vec![Some(2.0)])
        .number("deviceid", vec![Some(7.0)])
        .build()
        .unwrap();
    let err = LocationFrame::new(Arc::clone(frame.batch())).unwrap_err();
    assert!(err.to_string().contains("deviceid"));
}

#[test]
fn missing_column_is_named_in_error() {
    let schema = Arc::new(Schema::new(vec![Field::new("deviceid", DataType::Utf8, true)]));
    let batch = RecordBatch::try_new(schema, vec![Arc::new(StringArray::from(vec!["a"]))]).unwrap();
    let err = LocationFrame::new(Arc::new(batch)).unwrap_err();
    assert!(err.to_string().contains("missing column lat"));
}
