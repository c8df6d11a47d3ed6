use std::path::PathBuf;

use clap::Parser;
use reqwest::Url;

use crate::{core::TimeRange, error::Error};

/// Print hourly averages of the samples served by the timestamp server.
#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    /// Range start, for example: `2021-03-04T03:00:00Z`.
    #[clap(value_name = "BEGIN")]
    pub begin: String,

    /// Range end (inclusive), for example: `2021-03-04T05:59:59Z`.
    #[clap(value_name = "END")]
    pub end: String,

    #[clap(flatten)]
    pub source: SourceArgs,
}

impl Args {
    pub fn time_range(&self) -> Result<TimeRange, Error> {
        TimeRange::parse(&self.begin, &self.end)
    }
}

#[derive(Parser)]
pub struct SourceArgs {
    /// Timestamp server base URL.
    #[clap(long = "base-url", env = "TSSERV_BASE_URL", default_value = "https://tsserv.tinkermode.dev")]
    pub base_url: Url,

    /// Request timeout.
    #[clap(long = "timeout", env = "TSSERV_TIMEOUT", default_value = "30s")]
    pub timeout: humantime::Duration,

    /// Read the samples from the file instead of requesting the server.
    #[clap(long = "input-file", env = "TSSERV_INPUT_FILE")]
    pub input_file: Option<PathBuf>,
}
