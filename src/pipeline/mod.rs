//! Pipeline module
//!
//! Runs Extract, Transform and Load in strict sequence for one run date.
//! Extract and transform failures end the run; a load failure is logged
//! and reported in the [`RunReport`] instead.

mod runner;

pub use runner::{Pipeline, RunReport, Stage};
