//! Artifact naming and report-period helpers
//!
//! Every artifact is named `<YYYY-MM-DD>_<name>.<ext>` after the run date and
//! lives under a relative root (`raw`, `staging`). The same relative path is
//! used as the object key in the bucket and, under the local data directory,
//! as the on-disk location.

use chrono::{Datelike, Local, NaiveDate};
use std::path::{Path, PathBuf};

/// Date format used in file names and report parameters
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Build `<YYYY-MM-DD>_<name>.<extension>` for the given run date
pub fn generate_filename(name: &str, extension: &str, run_date: NaiveDate) -> String {
    format!("{}_{name}.{extension}", run_date.format(DATE_FORMAT))
}

/// Today's date on the host clock
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// First and last calendar day of the month before `today`, ISO formatted
pub fn last_month_date_range(today: NaiveDate) -> (String, String) {
    let first_this_month = today.with_day(1).unwrap_or(today);
    let last_prev_month = first_this_month.pred_opt().unwrap_or(first_this_month);
    let first_prev_month = last_prev_month.with_day(1).unwrap_or(last_prev_month);

    (
        first_prev_month.format(DATE_FORMAT).to_string(),
        last_prev_month.format(DATE_FORMAT).to_string(),
    )
}

/// Last-month range using the host clock
pub fn last_month_date_range_local() -> (String, String) {
    last_month_date_range(today_local())
}

/// A dated artifact addressed both locally and in object storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPath {
    root: String,
    file_name: String,
}

impl ArtifactPath {
    /// Artifact `<root>/<date>_<name>.<extension>`
    pub fn new(root: &str, name: &str, extension: &str, run_date: NaiveDate) -> Self {
        Self {
            root: root.trim_matches('/').to_string(),
            file_name: generate_filename(name, extension, run_date),
        }
    }

    /// The bare file name
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Object key, relative to the bucket root
    pub fn key(&self) -> String {
        if self.root.is_empty() {
            self.file_name.clone()
        } else {
            format!("{}/{}", self.root, self.file_name)
        }
    }

    /// On-disk location under `data_dir`
    pub fn local_path(&self, data_dir: &Path) -> PathBuf {
        let mut path = data_dir.to_path_buf();
        if !self.root.is_empty() {
            path.push(&self.root);
        }
        path.push(&self.file_name);
        path
    }
}
