//! BigQuery load-job wire types
//!
//! Field names follow the BigQuery v2 REST representation (camelCase).

use serde::{Deserialize, Serialize};

/// File format of the load source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceFormat {
    #[default]
    Parquet,
    NewlineDelimitedJson,
    Csv,
}

/// What a load job does to an existing destination table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WriteDisposition {
    /// Replace the table contents
    #[default]
    WriteTruncate,
    /// Append to the table
    WriteAppend,
    /// Fail unless the table is empty
    WriteEmpty,
}

/// Fully-qualified table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableReference {
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
}

impl std::fmt::Display for TableReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.project_id, self.dataset_id, self.table_id)
    }
}

/// `configuration.load` of a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadJobConfig {
    pub source_uris: Vec<String>,
    pub destination_table: TableReference,
    pub source_format: SourceFormat,
    pub write_disposition: WriteDisposition,
    pub autodetect: bool,
}

impl LoadJobConfig {
    /// Parquet, replace-table, auto-detected schema
    pub fn parquet_replace(source_uri: impl Into<String>, destination: TableReference) -> Self {
        Self {
            source_uris: vec![source_uri.into()],
            destination_table: destination,
            source_format: SourceFormat::Parquet,
            write_disposition: WriteDisposition::WriteTruncate,
            autodetect: true,
        }
    }
}

/// Job configuration envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfiguration {
    pub load: LoadJobConfig,
}

/// Body of `jobs.insert`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInsertRequest {
    pub job_reference: JobReference,
    pub configuration: JobConfiguration,
}

/// Identifies a job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReference {
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Error detail attached to a job
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorProto {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl std::fmt::Display for ErrorProto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.reason, &self.message) {
            (Some(reason), Some(message)) => write!(f, "{reason}: {message}"),
            (None, Some(message)) => write!(f, "{message}"),
            (Some(reason), None) => write!(f, "{reason}"),
            (None, None) => write!(f, "unknown error"),
        }
    }
}

/// Job state as reported by the API
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub error_result: Option<ErrorProto>,
    #[serde(default)]
    pub errors: Vec<ErrorProto>,
}

impl JobStatus {
    /// Job has finished (successfully or not)
    pub fn is_done(&self) -> bool {
        self.state == "DONE"
    }
}

/// Job resource returned by `jobs.insert` / `jobs.get`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub job_reference: JobReference,
    #[serde(default)]
    pub status: JobStatus,
}
