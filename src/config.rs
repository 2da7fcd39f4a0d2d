//! Command line and environment configuration.

use crate::dashboard::DEFAULT_SUBJECT;
use crate::data::{DataSource, DEFAULT_DATASET_URL};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(name = "grade-dashboard")]
#[command(about = "Course grade distribution dashboard", long_about = None)]
pub struct Cli {
    /// Dataset URL or local CSV path
    #[arg(long, env = "GRADE_DASHBOARD_SOURCE", default_value = DEFAULT_DATASET_URL)]
    pub source: String,

    /// Subject selected at startup
    #[arg(long, env = "GRADE_DASHBOARD_SUBJECT", default_value = DEFAULT_SUBJECT)]
    pub subject: String,

    /// Course selected at startup (defaults to the subject's first course)
    #[arg(long)]
    pub course: Option<String>,

    /// Verbose logging
    #[arg(long, env = "GRADE_DASHBOARD_DEBUG")]
    pub debug: bool,

    /// Write both charts (PNG and JSON) for the startup selection into DIR and exit
    #[arg(long, value_name = "DIR")]
    pub export: Option<PathBuf>,
}

impl Cli {
    pub fn data_source(&self) -> DataSource {
        DataSource::parse(&self.source)
    }

    /// Default log directive when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins over `--debug`.
pub fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
