//! Report fetchers
//!
//! The extract stage only needs "make the raw report exist at this path".
//! [`HttpReportFetcher`] calls the reporting API; [`FixtureReportFetcher`]
//! relies on a file already on disk (optionally copying it from a fixture).

use super::params::build_earnings_params;
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::paths::last_month_date_range;
use crate::types::StringMap;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Produces the raw report file for a run
#[async_trait]
pub trait ReportFetcher: Send + Sync {
    /// Ensure the report for `run_date` is present at `destination`
    async fn fetch(&self, destination: &Path, run_date: NaiveDate) -> Result<()>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// GET `url` once and write the body verbatim to `destination`
///
/// The destination is only touched after a 2xx response has been received.
pub async fn fetch_and_save(
    client: &HttpClient,
    url: &str,
    params: &StringMap,
    headers: &StringMap,
    destination: &Path,
) -> Result<()> {
    let mut header_names: Vec<&str> = headers.keys().map(String::as_str).collect();
    header_names.sort_unstable();
    info!("Sending GET request to {url} with params {params:?} and headers keys {header_names:?}");

    let request = RequestConfig::new().queries(params).headers(headers);
    let body = match client.get_with_config(url, request).await {
        Ok(response) => response.text().await.map_err(|e| {
            error!("Request failed: {e}");
            Error::Http(e)
        })?,
        Err(e) => {
            error!("Request failed: {e}");
            return Err(e);
        }
    };

    if let Err(e) = write_body(destination, &body).await {
        error!("Failed to save response to {}: {e}", destination.display());
        return Err(e);
    }

    info!("Response saved to {}", destination.display());
    Ok(())
}

async fn write_body(destination: &Path, body: &str) -> Result<()> {
    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(destination, body).await?;
    Ok(())
}

/// Fetches last month's earnings report from the reporting API
#[derive(Debug, Clone)]
pub struct HttpReportFetcher {
    client: HttpClient,
    api: ApiConfig,
    extra_params: StringMap,
}

impl HttpReportFetcher {
    /// Create a fetcher for the configured endpoint
    pub fn new(client: HttpClient, api: ApiConfig) -> Self {
        Self {
            client,
            api,
            extra_params: StringMap::new(),
        }
    }

    /// Merge additional query parameters over the defaults
    #[must_use]
    pub fn with_params(mut self, params: StringMap) -> Self {
        self.extra_params = params;
        self
    }

    /// Query parameters for the month preceding `run_date`
    pub fn params_for(&self, run_date: NaiveDate) -> StringMap {
        let (start, end) = last_month_date_range(run_date);
        build_earnings_params(&start, &end, Some(&self.extra_params))
    }
}

#[async_trait]
impl ReportFetcher for HttpReportFetcher {
    async fn fetch(&self, destination: &Path, run_date: NaiveDate) -> Result<()> {
        let params = self.params_for(run_date);
        let mut headers = StringMap::new();
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.api.key),
        );

        match fetch_and_save(
            &self.client,
            self.api.url.as_str(),
            &params,
            &headers,
            destination,
        )
        .await
        {
            Ok(()) => {
                info!("Report saved successfully as {}", destination.display());
                Ok(())
            }
            Err(e) => {
                error!("Failed to fetch or save the report");
                Err(e)
            }
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Uses a report file that is already on disk instead of calling the API
#[derive(Debug, Clone, Default)]
pub struct FixtureReportFetcher {
    source: Option<PathBuf>,
}

impl FixtureReportFetcher {
    /// Expect the report to already exist at the destination
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `source` to the destination before checking it
    pub fn from_file(source: impl Into<PathBuf>) -> Self {
        Self {
            source: Some(source.into()),
        }
    }
}

#[async_trait]
impl ReportFetcher for FixtureReportFetcher {
    async fn fetch(&self, destination: &Path, _run_date: NaiveDate) -> Result<()> {
        info!("Skipping API request; using report fixture");

        if let Some(source) = &self.source {
            if !source.exists() {
                return Err(Error::file_not_found(source));
            }
            if let Some(parent) = destination.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::copy(source, destination).await?;
        }

        if !destination.exists() {
            error!("Report fixture missing at {}", destination.display());
            return Err(Error::file_not_found(destination));
        }

        info!("Report saved successfully as {}", destination.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
