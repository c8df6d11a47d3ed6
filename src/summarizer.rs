use tokio_util::sync::CancellationToken;

use crate::{
    core::{TimeRange, calculate_hourly_averages, serialize},
    error::{Error, ErrorKind},
    prelude::*,
    source::TimestampSource,
};

const OP: &str = "summarize-hourly-timestamp";

/// Fetches the samples and renders their hourly averages.
pub struct Summarizer<S> {
    source: S,
    cancellation: CancellationToken,
}

impl<S: TimestampSource> Summarizer<S> {
    pub fn new(source: S) -> Self {
        Self { source, cancellation: CancellationToken::new() }
    }

    /// Abort the pending fetch when the token gets cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    #[instrument(skip_all, fields(range = %range))]
    pub async fn run(&self, range: TimeRange) -> Result<String, Error> {
        let data = tokio::select! {
            result = self.source.fetch_range(range) => result.map_err(|error| {
                warn!(op = error.op(), kind = %error.kind(), reason = error.message(), "fetch failed");
                Error::new(OP).with_message("fail to batch get timestamp").with_source(error)
            })?,
            () = self.cancellation.cancelled() => {
                warn!("cancelled");
                return Err(Error::new(OP)
                    .with_kind(ErrorKind::Internal)
                    .with_message("fail to batch get timestamp")
                    .with_source(Error::new("batch-get-timestamp").with_message("the fetch was cancelled")));
            }
        };
        debug!(n_bytes = data.len(), "fetched");

        let averages = calculate_hourly_averages(&data, range).map_err(|error| {
            warn!(op = error.op(), kind = %error.kind(), reason = error.message(), "aggregation failed");
            Error::new(OP).with_message("fail to calculate hourly averages").with_source(error)
        })?;
        info!(n_hours = averages.len(), "aggregated");

        Ok(serialize(&averages))
    }
}
