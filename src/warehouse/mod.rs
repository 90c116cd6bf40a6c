//! Warehouse module
//!
//! Loads the staged Parquet file into BigQuery with replace-table
//! semantics and schema auto-detection.

mod bigquery;
mod types;

pub use bigquery::{BigQueryLoader, WarehouseLoader, BIGQUERY_API_BASE};
pub use types::{
    ErrorProto, Job, JobConfiguration, JobInsertRequest, JobReference, JobStatus, LoadJobConfig,
    SourceFormat, TableReference, WriteDisposition,
};
