//! Raw report to staged Parquet

use super::cast::build_column;
use super::records::{extract_month_records, read_raw_document, unnest_currency};
use super::schema::{earnings_schema, EARNINGS_COLUMNS, GROSS_REVENUE, NET_REVENUE};
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::output::write_batch_to_parquet;
use crate::paths::ArtifactPath;
use crate::storage::BlobStore;
use crate::types::{JsonObject, JsonValue};
use arrow::array::{Array, ArrayRef, Float64Array};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Normalize a raw report document into the staged record batch
pub fn transform_document(document: &JsonValue) -> Result<RecordBatch> {
    let (month, records) = extract_month_records(document)?;
    info!("Unnesting {} records for month {month}", records.len());

    let rows: Vec<JsonObject> = records
        .iter()
        .enumerate()
        .map(|(row, record)| unnest_currency(record, row))
        .collect::<Result<_>>()?;

    info!("Casting data types");
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(EARNINGS_COLUMNS.len() + 1);
    for (name, column_type) in EARNINGS_COLUMNS {
        let cells = rows
            .iter()
            .enumerate()
            .map(|(row, record)| {
                record.get(name).ok_or_else(|| {
                    Error::schema(format!("record {row} is missing column '{name}'"))
                })
            })
            .collect::<Result<Vec<&JsonValue>>>()?;
        columns.push(build_column(name, column_type, &cells)?);
    }

    info!("Adding net revenue margin");
    let margin = net_revenue_margin_pct(&columns)?;
    columns.push(Arc::new(margin));

    Ok(RecordBatch::try_new(earnings_schema(), columns)?)
}

/// `netrevenue / gross_revenue * 100` with IEEE semantics; null in, null out
fn net_revenue_margin_pct(columns: &[ArrayRef]) -> Result<Float64Array> {
    let net = float_column(columns, NET_REVENUE)?;
    let gross = float_column(columns, GROSS_REVENUE)?;

    Ok(net
        .iter()
        .zip(gross.iter())
        .map(|(net, gross)| match (net, gross) {
            (Some(net), Some(gross)) => Some(net / gross * 100.0),
            _ => None,
        })
        .collect())
}

fn float_column<'a>(columns: &'a [ArrayRef], name: &str) -> Result<&'a Float64Array> {
    EARNINGS_COLUMNS
        .iter()
        .position(|(column, _)| *column == name)
        .and_then(|idx| columns.get(idx))
        .and_then(|array| array.as_any().downcast_ref::<Float64Array>())
        .ok_or_else(|| Error::schema(format!("column '{name}' is not float64")))
}

/// A staged file written locally and uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedArtifact {
    /// Object key in the bucket
    pub key: String,
    /// Full remote URI
    pub uri: String,
    /// Local Parquet file
    pub local_path: PathBuf,
    /// Number of rows written
    pub rows: usize,
}

/// Transform stage: raw JSON file in, uploaded Parquet out
pub struct Transformer<'a> {
    config: &'a PipelineConfig,
    store: &'a BlobStore,
}

impl<'a> Transformer<'a> {
    /// Create a transformer writing under the configured staging root
    pub fn new(config: &'a PipelineConfig, store: &'a BlobStore) -> Self {
        Self {
            config,
            store,
        }
    }

    /// Transform `raw_json_path`, write `<staging>/<date>_<report>.parquet`, upload it
    pub async fn transform(
        &self,
        raw_json_path: impl AsRef<Path>,
        run_date: NaiveDate,
    ) -> Result<StagedArtifact> {
        let raw_json_path = raw_json_path.as_ref();
        info!("Transforming {}", raw_json_path.display());

        let document = read_raw_document(raw_json_path).await?;
        let batch = transform_document(&document)?;

        let artifact = ArtifactPath::new(
            &self.config.staging_data_path,
            &self.config.report_name,
            "parquet",
            run_date,
        );
        let local_path = artifact.local_path(&self.config.data_dir);
        let rows = write_batch_to_parquet(&local_path, &batch, None)?;
        info!("Saved {rows} rows to {}", local_path.display());

        let key = artifact.key();
        let uri = self.store.upload(&local_path, &key).await?;

        Ok(StagedArtifact {
            key,
            uri,
            local_path,
            rows,
        })
    }
}
