//! Strict JSON to Arrow column casts
//!
//! JSON null always becomes an Arrow null. Anything that cannot be
//! represented in the target type is a [`Error::Cast`].

use super::schema::ColumnType;
use crate::error::{Error, Result};
use crate::types::JsonValue;
use arrow::array::{ArrayRef, Date32Array, Float64Array, Int64Array, StringArray};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use std::sync::Arc;

/// Days from 0001-01-01 (CE) to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Build one typed column from the cells of every row
pub fn build_column(
    column: &str,
    column_type: ColumnType,
    cells: &[&JsonValue],
) -> Result<ArrayRef> {
    let array: ArrayRef = match column_type {
        ColumnType::Utf8 => Arc::new(StringArray::from(collect_cells(column, cells, to_utf8)?)),
        ColumnType::Int64 => Arc::new(Int64Array::from(collect_cells(column, cells, to_int64)?)),
        ColumnType::Float64 => {
            Arc::new(Float64Array::from(collect_cells(column, cells, to_float64)?))
        }
        ColumnType::Date => Arc::new(Date32Array::from(collect_cells(column, cells, to_date32)?)),
    };
    Ok(array)
}

fn collect_cells<T>(
    column: &str,
    cells: &[&JsonValue],
    cast: fn(&JsonValue) -> std::result::Result<T, String>,
) -> Result<Vec<Option<T>>> {
    cells
        .iter()
        .enumerate()
        .map(|(row, value)| match value {
            JsonValue::Null => Ok(None),
            value => cast(value)
                .map(Some)
                .map_err(|message| Error::cast(column, row, message)),
        })
        .collect()
}

fn to_utf8(value: &JsonValue) -> std::result::Result<String, String> {
    match value {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        other => Err(format!("cannot cast {} to string", type_name(other))),
    }
}

#[allow(clippy::cast_precision_loss)]
fn to_int64(value: &JsonValue) -> std::result::Result<i64, String> {
    match value {
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                    Ok(f as i64)
                }
                _ => Err(format!("{n} is not a 64-bit integer")),
            }
        }
        JsonValue::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("'{s}' is not an integer")),
        other => Err(format!("cannot cast {} to int64", type_name(other))),
    }
}

fn to_float64(value: &JsonValue) -> std::result::Result<f64, String> {
    match value {
        JsonValue::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("{n} is not representable as float64")),
        JsonValue::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("'{s}' is not a number")),
        other => Err(format!("cannot cast {} to float64", type_name(other))),
    }
}

fn to_date32(value: &JsonValue) -> std::result::Result<i32, String> {
    let JsonValue::String(s) = value else {
        return Err(format!("cannot cast {} to date", type_name(value)));
    };

    parse_date(s.trim())
        .map(|date| date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
        .ok_or_else(|| format!("'{s}' is not a date"))
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` and RFC 3339 timestamps
fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
