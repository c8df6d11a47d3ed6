//! Client of the timestamp server: `GET /data?begin=…&end=…` returns plain-text samples.
//!
//! ```text
//! 2021-03-04T03:45:14Z 110.8634
//! 2021-03-04T03:46:30Z 110.7046
//! 2021-03-04T03:47:27Z 110.5467
//! ```

use std::time::Duration;

use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::{Client, StatusCode, Url};

use crate::{
    core::TimeRange,
    error::{Error, ErrorKind},
    prelude::*,
    source::TimestampSource,
};

pub struct HttpSource {
    client: Client,
    base_url: Url,
}

impl HttpSource {
    #[instrument(skip_all, fields(base_url = %base_url, timeout = ?timeout))]
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build the HTTP client")?;
        Ok(Self { client, base_url })
    }

    fn data_url(&self, range: TimeRange) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::BaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push("data");
        url.query_pairs_mut()
            .append_pair("begin", &range.start.to_rfc3339_opts(SecondsFormat::Secs, true))
            .append_pair("end", &range.end.to_rfc3339_opts(SecondsFormat::Secs, true));
        Ok(url)
    }

    async fn fetch(&self, range: TimeRange) -> Result<String, FetchError> {
        let url = self.data_url(range)?;
        info!(%url, "fetching…");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Send { url, source })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        response.text().await.map_err(FetchError::Body)
    }
}

#[async_trait]
impl TimestampSource for HttpSource {
    #[instrument(skip_all, fields(range = %range))]
    async fn fetch_range(&self, range: TimeRange) -> Result<String, Error> {
        let body = self.fetch(range).await.map_err(|error| {
            Error::new("batch-get-timestamp")
                .with_kind(ErrorKind::Internal)
                .with_message(error.message())
                .with_source(error)
        })?;
        info!(n_bytes = body.len(), "fetched");
        Ok(body)
    }
}

#[derive(Debug, thiserror::Error)]
enum FetchError {
    #[error("`{0}` cannot be used as a base URL")]
    BaseUrl(Url),

    #[error("failed to call `{url}`")]
    Send {
        url: Url,

        #[source]
        source: reqwest::Error,
    },

    #[error("the server responded with `{0}`")]
    Status(StatusCode),

    #[error("failed to read the response body")]
    Body(#[source] reqwest::Error),
}

impl FetchError {
    const fn message(&self) -> &'static str {
        match self {
            Self::BaseUrl(_) => "fail to create client",
            Self::Send { .. } | Self::Status(_) => "fail to request timestamp",
            Self::Body(_) => "fail to read response",
        }
    }
}
