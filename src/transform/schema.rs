//! Staged earnings schema
//!
//! The staged table has a fixed column list. Every column is nullable; the
//! derived margin column is always last.

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use std::sync::Arc;

/// Target type of a staged column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Utf8,
    Int64,
    Date,
    Float64,
}

impl ColumnType {
    /// Arrow type written to Parquet
    pub fn data_type(self) -> DataType {
        match self {
            ColumnType::Utf8 => DataType::Utf8,
            ColumnType::Int64 => DataType::Int64,
            ColumnType::Date => DataType::Date32,
            ColumnType::Float64 => DataType::Float64,
        }
    }
}

/// Nested object holding the currency fields
pub const CURRENCY_FIELD: &str = "currency";
pub const CURRENCY_CODE: &str = "currency_code";
pub const CURRENCY_EXCHANGE: &str = "currency_exchange";

pub const NET_REVENUE: &str = "netrevenue";
pub const GROSS_REVENUE: &str = "gross_revenue";

/// `netrevenue / gross_revenue * 100`
pub const NET_REVENUE_MARGIN_PCT: &str = "net_revenue_margin_pct";

/// Selected columns, in output order
pub const EARNINGS_COLUMNS: [(&str, ColumnType); 21] = [
    ("host", ColumnType::Utf8),
    ("username", ColumnType::Utf8),
    ("brand", ColumnType::Utf8),
    ("campaign", ColumnType::Utf8),
    ("payment_id", ColumnType::Int64),
    ("product", ColumnType::Utf8),
    ("reward_plan", ColumnType::Utf8),
    ("date", ColumnType::Date),
    ("base_currency", ColumnType::Utf8),
    ("deposit_value", ColumnType::Float64),
    ("REV_income", ColumnType::Float64),
    ("Extra_fee", ColumnType::Float64),
    ("bonus", ColumnType::Float64),
    (NET_REVENUE, ColumnType::Float64),
    (GROSS_REVENUE, ColumnType::Float64),
    ("turnover", ColumnType::Float64),
    ("deduction", ColumnType::Float64),
    ("total", ColumnType::Float64),
    ("CPA_income", ColumnType::Float64),
    (CURRENCY_CODE, ColumnType::Utf8),
    (CURRENCY_EXCHANGE, ColumnType::Float64),
];

/// Arrow schema of the staged file: the selected columns plus the margin
pub fn earnings_schema() -> SchemaRef {
    let mut fields: Vec<Field> = EARNINGS_COLUMNS
        .iter()
        .map(|(name, column_type)| Field::new(*name, column_type.data_type(), true))
        .collect();
    fields.push(Field::new(NET_REVENUE_MARGIN_PCT, DataType::Float64, true));

    Arc::new(Schema::new(fields))
}
