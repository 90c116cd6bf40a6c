//! Extract module
//!
//! Obtains the raw monthly earnings report and writes it, byte for byte,
//! under the raw root.
//!
//! # Fetchers
//!
//! - `HttpReportFetcher` - one authenticated GET against the reporting API
//! - `FixtureReportFetcher` - no network; the report must already be on disk

mod fetcher;
mod params;

pub use fetcher::{fetch_and_save, FixtureReportFetcher, HttpReportFetcher, ReportFetcher};
pub use params::build_earnings_params;

#[cfg(test)]
mod tests;
