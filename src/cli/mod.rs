//! CLI module
//!
//! The binary takes no subcommands: it runs the fixed Extract → Transform →
//! Load sequence with settings from the environment. clap supplies
//! `--help` and `--version`.

mod commands;
mod runner;

pub use commands::Cli;
pub use runner::Runner;
