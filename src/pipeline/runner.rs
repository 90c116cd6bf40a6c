//! Pipeline runner

use crate::auth::TokenProvider;
use crate::config::{FetchMode, PipelineConfig, ENV_API_URL, ENV_BQ_PROJECT_ID};
use crate::error::{Error, Result, ResultExt};
use crate::extract::{FixtureReportFetcher, HttpReportFetcher, ReportFetcher};
use crate::http::HttpClient;
use crate::paths::{today_local, ArtifactPath};
use crate::storage::BlobStore;
use crate::transform::{StagedArtifact, Transformer};
use crate::warehouse::{BigQueryLoader, WarehouseLoader};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Base name of the raw report file
const RAW_REPORT_NAME: &str = "earnings";

/// Last stage a run completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extracted,
    Transformed,
    Loaded,
}

/// Outcome of [`Pipeline::run`]
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_date: NaiveDate,
    pub stage: Stage,
    /// Local raw report
    pub raw_path: PathBuf,
    /// Staged Parquet file, once transformed
    pub staged: Option<StagedArtifact>,
    /// Swallowed load failure
    pub load_error: Option<String>,
}

impl RunReport {
    /// All three stages completed
    pub fn is_complete(&self) -> bool {
        self.stage == Stage::Loaded
    }
}

/// Extract → Transform → Load
pub struct Pipeline {
    config: PipelineConfig,
    fetcher: Box<dyn ReportFetcher>,
    store: BlobStore,
    loader: Box<dyn WarehouseLoader>,
    run_date: NaiveDate,
}

impl Pipeline {
    /// Assemble a pipeline from its parts; the run date defaults to today
    pub fn new(
        config: PipelineConfig,
        fetcher: Box<dyn ReportFetcher>,
        store: BlobStore,
        loader: Box<dyn WarehouseLoader>,
    ) -> Self {
        Self {
            config,
            fetcher,
            store,
            loader,
            run_date: today_local(),
        }
    }

    /// Production wiring: fetcher per fetch mode, GCS bucket, BigQuery
    pub fn from_config(config: PipelineConfig) -> Result<Self> {
        let http = HttpClient::new()?;

        let fetcher: Box<dyn ReportFetcher> = match config.fetch_mode {
            FetchMode::Live => {
                let api = config
                    .api
                    .clone()
                    .ok_or_else(|| Error::missing_field(ENV_API_URL))?;
                Box::new(HttpReportFetcher::new(http.clone(), api))
            }
            FetchMode::Mock => Box::new(FixtureReportFetcher::new()),
        };

        let store = BlobStore::gcs(&config.gcs_bucket)?;

        let tokens = TokenProvider::from_credentials(&config.credentials, http.clone())?;
        let project_id = warehouse_project(&config, &tokens)?;
        let loader = BigQueryLoader::new(http, tokens, project_id);

        Ok(Self::new(config, fetcher, store, Box::new(loader)))
    }

    /// Run for a specific date instead of today
    #[must_use]
    pub fn with_run_date(mut self, run_date: NaiveDate) -> Self {
        self.run_date = run_date;
        self
    }

    pub fn run_date(&self) -> NaiveDate {
        self.run_date
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Where the raw report lives for this run
    pub fn raw_artifact(&self) -> ArtifactPath {
        ArtifactPath::new(
            &self.config.raw_data_path,
            RAW_REPORT_NAME,
            "json",
            self.run_date,
        )
    }

    /// Obtain the raw report and mirror it to the bucket; returns the local path
    pub async fn extract(&self) -> Result<PathBuf> {
        let artifact = self.raw_artifact();
        let local_path = artifact.local_path(&self.config.data_dir);

        info!("Extracting report with {} fetcher", self.fetcher.name());
        self.fetcher.fetch(&local_path, self.run_date).await?;

        let uri = self
            .store
            .upload(&local_path, &artifact.key())
            .await
            .context("Failed to upload raw report")?;
        info!("Raw report available at {uri}");

        Ok(local_path)
    }

    /// Stage the raw report as Parquet in the bucket
    pub async fn transform(&self, raw_path: &Path) -> Result<StagedArtifact> {
        Transformer::new(&self.config, &self.store)
            .transform(raw_path, self.run_date)
            .await
    }

    /// Replace the report table with the staged object at `key`
    pub async fn load(&self, key: &str) -> Result<()> {
        let uri = self.config.gcs_uri(key);
        self.loader
            .load(&self.config.dataset_id, &self.config.report_name, &uri)
            .await?;
        info!(
            "Data loaded successfully into {}.{}",
            self.config.dataset_id, self.config.report_name
        );
        Ok(())
    }

    /// Run every stage in order
    pub async fn run(&self) -> Result<RunReport> {
        info!("Starting ETL process for {}", self.run_date);

        let raw_path = self.extract().await?;
        let mut report = RunReport {
            run_date: self.run_date,
            stage: Stage::Extracted,
            raw_path,
            staged: None,
            load_error: None,
        };

        let staged = self.transform(&report.raw_path).await?;
        report.stage = Stage::Transformed;

        match self.load(&staged.key).await {
            Ok(()) => report.stage = Stage::Loaded,
            Err(e) => {
                error!("Failed to load data into the warehouse: {e}");
                report.load_error = Some(e.to_string());
            }
        }
        report.staged = Some(staged);

        info!("ETL process finished at stage {:?}", report.stage);
        Ok(report)
    }
}

/// `BQ_PROJECT_ID`, falling back to the service account's own project
pub(crate) fn warehouse_project(config: &PipelineConfig, tokens: &TokenProvider) -> Result<String> {
    config
        .project_id
        .clone()
        .or_else(|| tokens.project_id().map(str::to_string))
        .ok_or_else(|| Error::missing_field(ENV_BQ_PROJECT_ID))
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("fetcher", &self.fetcher.name())
            .field("bucket", &self.store.bucket())
            .field("run_date", &self.run_date)
            .finish_non_exhaustive()
    }
}
