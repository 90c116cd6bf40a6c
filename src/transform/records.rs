//! Raw report parsing and record flattening

use super::schema::{CURRENCY_CODE, CURRENCY_EXCHANGE, CURRENCY_FIELD};
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use std::path::Path;
use tracing::warn;

/// Read and parse the raw report document
pub async fn read_raw_document(path: impl AsRef<Path>) -> Result<JsonValue> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::file_not_found(path));
    }

    let contents = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&contents)?)
}

/// Records of the first month under `data`
///
/// Months after the first (document order) are dropped with a warning.
pub fn extract_month_records(document: &JsonValue) -> Result<(&str, &[JsonValue])> {
    let data = document
        .get("data")
        .ok_or_else(|| Error::schema("raw report has no 'data' key"))?
        .as_object()
        .ok_or_else(|| Error::schema("'data' is not an object"))?;

    let mut months = data.iter();
    let (month, records) = months
        .next()
        .ok_or_else(|| Error::schema("'data' contains no month keys"))?;

    let dropped: Vec<&str> = months.map(|(key, _)| key.as_str()).collect();
    if !dropped.is_empty() {
        warn!(
            "Report contains {} extra month(s) {:?}; only '{month}' is processed",
            dropped.len(),
            dropped
        );
    }

    let records = records
        .as_array()
        .ok_or_else(|| Error::schema(format!("month '{month}' is not an array of records")))?;

    Ok((month.as_str(), records.as_slice()))
}

/// Copy a record with `currency.{code,exchange}` lifted to top-level columns
///
/// A null currency yields null columns; a currency object lacking a field
/// leaves that column absent so schema validation reports it.
pub fn unnest_currency(record: &JsonValue, row: usize) -> Result<JsonObject> {
    let mut flat = record
        .as_object()
        .cloned()
        .ok_or_else(|| Error::schema(format!("record {row} is not an object")))?;

    match flat.remove(CURRENCY_FIELD) {
        Some(JsonValue::Object(currency)) => {
            if let Some(code) = currency.get("code") {
                flat.insert(CURRENCY_CODE.to_string(), code.clone());
            }
            if let Some(exchange) = currency.get("exchange") {
                flat.insert(CURRENCY_EXCHANGE.to_string(), exchange.clone());
            }
        }
        Some(JsonValue::Null) => {
            flat.insert(CURRENCY_CODE.to_string(), JsonValue::Null);
            flat.insert(CURRENCY_EXCHANGE.to_string(), JsonValue::Null);
        }
        Some(other) => {
            return Err(Error::schema(format!(
                "record {row}: '{CURRENCY_FIELD}' must be an object, got {other}"
            )))
        }
        None => {
            return Err(Error::schema(format!(
                "record {row} is missing column '{CURRENCY_FIELD}'"
            )))
        }
    }

    Ok(flat)
}
