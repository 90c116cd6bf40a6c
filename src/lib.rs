// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]

//! # Earnings ETL
//!
//! A batch pipeline that moves one month of affiliate earnings from a
//! reporting API into a BigQuery table.
//!
//! ## Stages
//!
//! - **Extract**: fetch last month's report (or use a fixture) and keep the raw JSON
//! - **Transform**: unnest currency, cast to a fixed schema, derive the revenue margin
//! - **Load**: upload the Parquet file to GCS and replace the table from it
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use earnings_etl::{Pipeline, PipelineConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = PipelineConfig::from_env()?;
//!     let report = Pipeline::from_config(config)?.run().await?;
//!     println!("finished at {:?}", report.stage);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Pipeline                             │
//! │     extract() → path    transform(path) → key    load(key)   │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌───────────┬───────────┬─────┴──────┬───────────┬─────────────┐
//! │  Extract  │ Transform │   Output   │  Storage  │  Warehouse  │
//! ├───────────┼───────────┼────────────┼───────────┼─────────────┤
//! │ HTTP GET  │ Unnest    │ Parquet    │ GCS       │ Load job    │
//! │ Fixture   │ Cast      │ (Snappy)   │ Local FS  │ Poll        │
//! │           │ Margin    │            │           │ JWT auth    │
//! └───────────┴───────────┴────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the pipeline
pub mod error;

/// Common types and type aliases
pub mod types;

/// Environment-driven configuration
pub mod config;

/// Artifact naming and report date ranges
pub mod paths;

/// Access tokens for Google APIs
pub mod auth;

/// HTTP client
pub mod http;

/// Report fetchers
pub mod extract;

/// JSON report to Arrow batch
pub mod transform;

/// Parquet output
pub mod output;

/// Object storage uploads
pub mod storage;

/// BigQuery load jobs
pub mod warehouse;

/// Stage orchestration
pub mod pipeline;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{FetchMode, PipelineConfig};
pub use pipeline::{Pipeline, RunReport, Stage};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
