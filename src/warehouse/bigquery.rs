//! BigQuery load jobs over the v2 REST API

use super::types::{
    Job, JobConfiguration, JobInsertRequest, JobReference, LoadJobConfig, TableReference,
};
use crate::auth::TokenProvider;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use async_trait::async_trait;
use reqwest::Method;
use std::time::Duration;
use tracing::{debug, info};

/// Default REST endpoint
pub const BIGQUERY_API_BASE: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// Loads a staged file into a warehouse table
#[async_trait]
pub trait WarehouseLoader: Send + Sync {
    /// Replace `dataset.table` with the contents of `source_uri`, waiting for completion
    async fn load(&self, dataset: &str, table: &str, source_uri: &str) -> Result<()>;
}

/// Issues Parquet load jobs and polls them to completion
#[derive(Debug, Clone)]
pub struct BigQueryLoader {
    http: HttpClient,
    tokens: TokenProvider,
    project_id: String,
    base_url: String,
    poll_interval: Duration,
}

impl BigQueryLoader {
    /// Create a loader for `project_id`
    pub fn new(http: HttpClient, tokens: TokenProvider, project_id: impl Into<String>) -> Self {
        Self {
            http,
            tokens,
            project_id: project_id.into(),
            base_url: BIGQUERY_API_BASE.to_string(),
            poll_interval: Duration::from_secs(1),
        }
    }

    /// Point at a different API root
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Delay between job status checks
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Project the jobs run in
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Submit a load job and return the job as accepted
    pub async fn insert_job(&self, load: LoadJobConfig) -> Result<Job> {
        let url = format!("{}/projects/{}/jobs", self.base_url, self.project_id);
        let request = JobInsertRequest {
            job_reference: JobReference {
                project_id: self.project_id.clone(),
                ..JobReference::default()
            },
            configuration: JobConfiguration { load },
        };

        let token = self.tokens.access_token().await?;
        let body = serde_json::to_value(&request)?;
        self.http
            .request_json(
                Method::POST,
                &url,
                RequestConfig::new().bearer(&token).json(body),
            )
            .await
    }

    /// Fetch the current state of a job
    pub async fn get_job(&self, reference: &JobReference) -> Result<Job> {
        let job_id = reference
            .job_id
            .as_deref()
            .ok_or_else(|| Error::load_job("<unknown>", "job reference has no id"))?;
        let url = format!(
            "{}/projects/{}/jobs/{job_id}",
            self.base_url, reference.project_id
        );

        let mut request = RequestConfig::new().bearer(&self.tokens.access_token().await?);
        if let Some(location) = &reference.location {
            request = request.query("location", location.as_str());
        }

        self.http.request_json(Method::GET, &url, request).await
    }

    /// Poll until the job is DONE; a job-level error becomes [`Error::LoadJob`]
    pub async fn wait_for_job(&self, mut job: Job) -> Result<Job> {
        let job_id = job
            .job_reference
            .job_id
            .clone()
            .unwrap_or_else(|| "<unknown>".to_string());

        while !job.status.is_done() {
            debug!("Load job {job_id} is {}", job.status.state);
            tokio::time::sleep(self.poll_interval).await;
            job = self.get_job(&job.job_reference).await?;
        }

        if let Some(err) = &job.status.error_result {
            let details: Vec<String> = job.status.errors.iter().map(ToString::to_string).collect();
            let message = if details.is_empty() {
                err.to_string()
            } else {
                format!("{err} ({})", details.join("; "))
            };
            return Err(Error::load_job(job_id, message));
        }

        Ok(job)
    }
}

#[async_trait]
impl WarehouseLoader for BigQueryLoader {
    async fn load(&self, dataset: &str, table: &str, source_uri: &str) -> Result<()> {
        let destination = TableReference {
            project_id: self.project_id.clone(),
            dataset_id: dataset.to_string(),
            table_id: table.to_string(),
        };
        info!("Loading {source_uri} into {destination}");

        let job = self
            .insert_job(LoadJobConfig::parquet_replace(source_uri, destination.clone()))
            .await?;
        let job = self.wait_for_job(job).await?;

        info!(
            "Load job {} finished for {destination}",
            job.job_reference.job_id.as_deref().unwrap_or("<unknown>")
        );
        Ok(())
    }
}
