//! Transform module
//!
//! Turns the raw earnings report into the staged columnar file.
//!
//! # Overview
//!
//! - Takes the records of the first month under `data`
//! - Unnests `currency.code` / `currency.exchange` into top-level columns
//! - Projects onto the fixed 21-column schema and casts every column
//! - Derives `net_revenue_margin_pct = netrevenue / gross_revenue * 100`
//! - Writes Parquet locally and uploads it to the staging root

mod cast;
mod engine;
mod records;
mod schema;

pub use cast::build_column;
pub use engine::{transform_document, StagedArtifact, Transformer};
pub use records::{extract_month_records, read_raw_document, unnest_currency};
pub use schema::{
    earnings_schema, ColumnType, CURRENCY_CODE, CURRENCY_EXCHANGE, EARNINGS_COLUMNS,
    NET_REVENUE_MARGIN_PCT,
};
