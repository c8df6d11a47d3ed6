#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod cli;
mod core;
mod error;
mod prelude;
mod source;
mod summarizer;

use std::{io::Write, process::ExitCode};

use clap::{Parser, crate_version};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::{
    cli::Args,
    prelude::*,
    source::{FileSource, HttpSource, TimestampSource},
    summarizer::Summarizer,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();
    info!(version = crate_version!(), "starting…");

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result {
    let range = args.time_range()?;

    let cancellation = CancellationToken::new();
    tokio::spawn({
        let cancellation = cancellation.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancellation.cancel();
            }
        }
    });

    let summary = match args.source.input_file {
        Some(path) => summarize(FileSource::new(path), range, cancellation).await?,
        None => {
            let source = HttpSource::new(args.source.base_url, args.source.timeout.into())?;
            summarize(source, range, cancellation).await?
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(summary.as_bytes()).context("failed to write the summary")?;
    stdout.flush().context("failed to flush the summary")?;
    Ok(())
}

async fn summarize(
    source: impl TimestampSource,
    range: core::TimeRange,
    cancellation: CancellationToken,
) -> Result<String> {
    let summary = Summarizer::new(source).with_cancellation(cancellation).run(range).await?;
    Ok(summary)
}
