mod file;
mod http;

use async_trait::async_trait;

pub use self::{file::FileSource, http::HttpSource};
use crate::{core::TimeRange, error::Error};

/// Provider of the raw `<timestamp> <value>` payload for a time range.
#[async_trait]
pub trait TimestampSource: Sync {
    /// Fetch the payload as is: newline-terminated lines, one sample per line.
    async fn fetch_range(&self, range: TimeRange) -> Result<String, Error>;
}

/// In-memory payload, returned regardless of the range.
#[async_trait]
impl TimestampSource for String {
    async fn fetch_range(&self, _range: TimeRange) -> Result<String, Error> {
        Ok(self.clone())
    }
}
