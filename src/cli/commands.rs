//! CLI argument definitions

use clap::Parser;

/// Monthly earnings ETL: fetch the report, stage it as Parquet, load it into BigQuery
///
/// Settings are read from the environment (and a `.env` file, if present):
/// GCS_BUCKET, RAW_DATA_PATH, STAGING_DATA_PATH, BQ_DATASET_ID, REPORT_NAME,
/// plus API_URL and API_KEY when FETCH_MODE=live.
#[derive(Parser, Debug, Default)]
#[command(name = "earnings-etl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_takes_no_arguments() {
        assert!(Cli::try_parse_from(["earnings-etl"]).is_ok());
        assert!(Cli::try_parse_from(["earnings-etl", "--stream", "x"]).is_err());
    }

    #[test]
    fn test_cli_version_flag() {
        let err = Cli::try_parse_from(["earnings-etl", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
