//! Pipeline configuration
//!
//! All settings come from the process environment (optionally seeded from a
//! `.env` file). The configuration is resolved once at start-up into a
//! [`PipelineConfig`] and passed by reference to every stage.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

// ============================================================================
// Environment Variable Names
// ============================================================================

pub const ENV_API_URL: &str = "API_URL";
pub const ENV_API_KEY: &str = "API_KEY";
pub const ENV_GCS_BUCKET: &str = "GCS_BUCKET";
pub const ENV_RAW_DATA_PATH: &str = "RAW_DATA_PATH";
pub const ENV_STAGING_DATA_PATH: &str = "STAGING_DATA_PATH";
pub const ENV_BQ_DATASET_ID: &str = "BQ_DATASET_ID";
pub const ENV_REPORT_NAME: &str = "REPORT_NAME";
pub const ENV_BQ_PROJECT_ID: &str = "BQ_PROJECT_ID";
pub const ENV_CREDENTIALS: &str = "GOOGLE_APPLICATION_CREDENTIALS";
pub const ENV_ACCESS_TOKEN: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";
pub const ENV_DATA_DIR: &str = "DATA_DIR";
pub const ENV_FETCH_MODE: &str = "FETCH_MODE";

/// Default local root for pipeline artifacts
pub const DEFAULT_DATA_DIR: &str = "data";

// ============================================================================
// Fetch Mode
// ============================================================================

/// How the extract stage obtains the raw report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    /// Call the reporting API
    Live,
    /// Use a report file already present on disk
    #[default]
    Mock,
}

impl FromStr for FetchMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(FetchMode::Live),
            "mock" | "fixture" => Ok(FetchMode::Mock),
            other => Err(Error::invalid_value(
                ENV_FETCH_MODE,
                format!("expected 'live' or 'mock', got '{other}'"),
            )),
        }
    }
}

// ============================================================================
// Reporting API
// ============================================================================

/// Reporting API endpoint and credentials
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Report endpoint
    pub url: Url,
    /// Bearer token
    pub key: String,
}

// ============================================================================
// Warehouse Credentials
// ============================================================================

/// How the warehouse client obtains an access token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WarehouseCredentials {
    /// Pre-issued OAuth2 access token
    AccessToken(String),
    /// Service-account key file
    ServiceAccountFile(PathBuf),
    /// Nothing configured; loads will fail with an auth error
    #[default]
    None,
}

// ============================================================================
// Pipeline Config
// ============================================================================

/// Complete pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Reporting API settings (required in live mode only)
    pub api: Option<ApiConfig>,
    /// Bucket holding raw and staged artifacts
    pub gcs_bucket: String,
    /// Relative root for raw reports (e.g. `raw`)
    pub raw_data_path: String,
    /// Relative root for staged columnar files (e.g. `staging`)
    pub staging_data_path: String,
    /// Warehouse dataset
    pub dataset_id: String,
    /// Staged file base name and destination table
    pub report_name: String,
    /// Warehouse project (falls back to the service account's project)
    pub project_id: Option<String>,
    /// Warehouse credentials
    pub credentials: WarehouseCredentials,
    /// Local directory that mirrors the bucket layout
    pub data_dir: PathBuf,
    /// Extract behaviour
    pub fetch_mode: FetchMode,
}

impl PipelineConfig {
    /// Load `.env` (if present) and read the process environment
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(Error::config(format!("Failed to load .env file: {e}"))),
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| get(key).ok_or_else(|| Error::missing_field(key));

        let fetch_mode = match get(ENV_FETCH_MODE) {
            Some(mode) => mode.parse()?,
            None => FetchMode::default(),
        };

        let api = match (get(ENV_API_URL), get(ENV_API_KEY)) {
            (Some(url), Some(key)) => Some(ApiConfig {
                url: Url::parse(&url)
                    .map_err(|e| Error::invalid_value(ENV_API_URL, e.to_string()))?,
                key,
            }),
            _ if fetch_mode == FetchMode::Live => {
                let missing = if get(ENV_API_URL).is_none() {
                    ENV_API_URL
                } else {
                    ENV_API_KEY
                };
                return Err(Error::missing_field(missing));
            }
            _ => None,
        };

        let credentials = if let Some(token) = get(ENV_ACCESS_TOKEN) {
            WarehouseCredentials::AccessToken(token)
        } else if let Some(path) = get(ENV_CREDENTIALS) {
            WarehouseCredentials::ServiceAccountFile(PathBuf::from(path))
        } else {
            WarehouseCredentials::None
        };

        Ok(Self {
            api,
            gcs_bucket: require(ENV_GCS_BUCKET)?,
            raw_data_path: trim_slashes(&require(ENV_RAW_DATA_PATH)?),
            staging_data_path: trim_slashes(&require(ENV_STAGING_DATA_PATH)?),
            dataset_id: require(ENV_BQ_DATASET_ID)?,
            report_name: require(ENV_REPORT_NAME)?,
            project_id: get(ENV_BQ_PROJECT_ID),
            credentials,
            data_dir: get(ENV_DATA_DIR)
                .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from),
            fetch_mode,
        })
    }

    /// `gs://` URI for an object key in the configured bucket
    pub fn gcs_uri(&self, key: &str) -> String {
        format!("gs://{}/{}", self.gcs_bucket, key.trim_start_matches('/'))
    }
}

fn trim_slashes(path: &str) -> String {
    path.trim_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn base_vars() -> Vec<(&'static str, &'static str)> {
        vec![
            (ENV_GCS_BUCKET, "reports-bucket"),
            (ENV_RAW_DATA_PATH, "raw/"),
            (ENV_STAGING_DATA_PATH, "/staging"),
            (ENV_BQ_DATASET_ID, "affiliates"),
            (ENV_REPORT_NAME, "earnings_report"),
        ]
    }

    #[test]
    fn test_minimal_mock_config() {
        let config = PipelineConfig::from_lookup(lookup(&base_vars())).unwrap();

        assert_eq!(config.fetch_mode, FetchMode::Mock);
        assert!(config.api.is_none());
        assert_eq!(config.raw_data_path, "raw");
        assert_eq!(config.staging_data_path, "staging");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.credentials, WarehouseCredentials::None);
    }

    #[test]
    fn test_missing_required_field() {
        let vars: Vec<_> = base_vars()
            .into_iter()
            .filter(|(k, _)| *k != ENV_BQ_DATASET_ID)
            .collect();
        let err = PipelineConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "BQ_DATASET_ID"));
    }

    #[test]
    fn test_live_mode_requires_api() {
        let mut vars = base_vars();
        vars.push((ENV_FETCH_MODE, "live"));
        vars.push((ENV_API_URL, "https://api.example.com/reports"));
        let err = PipelineConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "API_KEY"));

        vars.push((ENV_API_KEY, "secret"));
        let config = PipelineConfig::from_lookup(lookup(&vars)).unwrap();
        let api = config.api.unwrap();
        assert_eq!(api.url.as_str(), "https://api.example.com/reports");
        assert_eq!(api.key, "secret");
    }

    #[test]
    fn test_invalid_api_url() {
        let mut vars = base_vars();
        vars.push((ENV_API_URL, "not a url"));
        vars.push((ENV_API_KEY, "secret"));
        let err = PipelineConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));
    }

    #[test]
    fn test_invalid_fetch_mode() {
        let mut vars = base_vars();
        vars.push((ENV_FETCH_MODE, "sometimes"));
        assert!(PipelineConfig::from_lookup(lookup(&vars)).is_err());
    }

    #[test]
    fn test_credentials_precedence() {
        let mut vars = base_vars();
        vars.push((ENV_CREDENTIALS, "/secrets/sa.json"));
        let config = PipelineConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(
            config.credentials,
            WarehouseCredentials::ServiceAccountFile(PathBuf::from("/secrets/sa.json"))
        );

        vars.push((ENV_ACCESS_TOKEN, "ya29.token"));
        let config = PipelineConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(
            config.credentials,
            WarehouseCredentials::AccessToken("ya29.token".to_string())
        );
    }

    #[test]
    fn test_gcs_uri() {
        let config = PipelineConfig::from_lookup(lookup(&base_vars())).unwrap();
        assert_eq!(
            config.gcs_uri("staging/2024-03-15_earnings_report.parquet"),
            "gs://reports-bucket/staging/2024-03-15_earnings_report.parquet"
        );
    }
}
