//! Column-oriented views of the pipeline tables
//!
//! The chart layer consumes Arrow record batches; row structs convert into
//! one batch per table. Dates become `Date32`, counts `Int64`, money
//! `Float64` and text `Utf8`. Columns that may be NULL in the store are
//! nullable.

use std::sync::Arc;

use arrow_array::{ArrayRef, Date32Array, Float64Array, Int64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema, SchemaRef};

use crate::aggregator::{CategoryMonthTotal, PeriodSummary, ProductTotal};
use crate::error::Result;
use crate::query::{DailyOrderSummary, OrderProductLine, ProductFrequency};
use crate::utils::days_since_epoch;

pub trait ToRecordBatch {
    fn schema() -> SchemaRef;

    fn to_record_batch(&self) -> Result<RecordBatch>;
}

fn utf8<'a>(values: impl Iterator<Item = &'a str>) -> ArrayRef {
    Arc::new(StringArray::from_iter_values(values))
}

fn int64(values: impl Iterator<Item = i64>) -> ArrayRef {
    Arc::new(Int64Array::from_iter_values(values))
}

fn nullable_utf8<'a>(values: impl Iterator<Item = Option<&'a str>>) -> ArrayRef {
    Arc::new(values.collect::<StringArray>())
}

fn nullable_float64(values: impl Iterator<Item = Option<f64>>) -> ArrayRef {
    Arc::new(values.collect::<Float64Array>())
}

fn float64(values: impl Iterator<Item = f64>) -> ArrayRef {
    Arc::new(Float64Array::from_iter_values(values))
}

fn date32(values: impl Iterator<Item = i32>) -> ArrayRef {
    Arc::new(Date32Array::from_iter_values(values))
}

impl ToRecordBatch for [DailyOrderSummary] {
    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("order_date", DataType::Utf8, true),
            Field::new("number_of_orders", DataType::Int64, false),
            Field::new("total_amount", DataType::Float64, false),
        ]))
    }

    fn to_record_batch(&self) -> Result<RecordBatch> {
        Ok(RecordBatch::try_new(
            Self::schema(),
            vec![
                nullable_utf8(self.iter().map(|r| r.date.as_deref())),
                int64(self.iter().map(|r| r.order_count)),
                float64(self.iter().map(|r| r.total_amount)),
            ],
        )?)
    }
}

impl ToRecordBatch for [OrderProductLine] {
    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("product_name", DataType::Utf8, true),
            Field::new("category", DataType::Utf8, true),
            Field::new("price", DataType::Float64, true),
            Field::new("order_id", DataType::Int64, false),
            Field::new("order_date", DataType::Utf8, true),
        ]))
    }

    fn to_record_batch(&self) -> Result<RecordBatch> {
        Ok(RecordBatch::try_new(
            Self::schema(),
            vec![
                nullable_utf8(self.iter().map(|r| r.product_name.as_deref())),
                nullable_utf8(self.iter().map(|r| r.category.as_deref())),
                nullable_float64(self.iter().map(|r| r.price)),
                int64(self.iter().map(|r| r.order_id)),
                nullable_utf8(self.iter().map(|r| r.order_date.as_deref())),
            ],
        )?)
    }
}

impl ToRecordBatch for [ProductFrequency] {
    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("product_name", DataType::Utf8, false),
            Field::new("category", DataType::Utf8, false),
            Field::new("frequency", DataType::Int64, false),
        ]))
    }

    fn to_record_batch(&self) -> Result<RecordBatch> {
        Ok(RecordBatch::try_new(
            Self::schema(),
            vec![
                utf8(self.iter().map(|r| r.product_name.as_str())),
                utf8(self.iter().map(|r| r.category.as_str())),
                int64(self.iter().map(|r| r.frequency)),
            ],
        )?)
    }
}

impl ToRecordBatch for [PeriodSummary] {
    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("period_end", DataType::Date32, false),
            Field::new("number_of_orders", DataType::Int64, false),
            Field::new("total_amount", DataType::Float64, false),
        ]))
    }

    fn to_record_batch(&self) -> Result<RecordBatch> {
        Ok(RecordBatch::try_new(
            Self::schema(),
            vec![
                date32(self.iter().map(|r| days_since_epoch(r.period_end))),
                int64(self.iter().map(|r| r.order_count)),
                float64(self.iter().map(|r| r.total_amount)),
            ],
        )?)
    }
}

impl ToRecordBatch for [CategoryMonthTotal] {
    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("year_month", DataType::Date32, false),
            Field::new("category", DataType::Utf8, false),
            Field::new("price", DataType::Float64, false),
        ]))
    }

    fn to_record_batch(&self) -> Result<RecordBatch> {
        Ok(RecordBatch::try_new(
            Self::schema(),
            vec![
                date32(self.iter().map(|r| days_since_epoch(r.month))),
                utf8(self.iter().map(|r| r.category.as_str())),
                float64(self.iter().map(|r| r.total_price)),
            ],
        )?)
    }
}

impl ToRecordBatch for [ProductTotal] {
    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("product_name", DataType::Utf8, false),
            Field::new("price", DataType::Float64, false),
        ]))
    }

    fn to_record_batch(&self) -> Result<RecordBatch> {
        Ok(RecordBatch::try_new(
            Self::schema(),
            vec![
                utf8(self.iter().map(|r| r.product_name.as_str())),
                float64(self.iter().map(|r| r.total_price)),
            ],
        )?)
    }
}
