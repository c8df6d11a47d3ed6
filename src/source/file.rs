use std::path::PathBuf;

use async_trait::async_trait;

use crate::{
    core::TimeRange,
    error::{Error, ErrorKind},
    prelude::*,
    source::TimestampSource,
};

/// Payload stored in a local file, for example a saved server response.
///
/// The whole file is returned: the range gets validated by the aggregation.
pub struct FileSource(PathBuf);

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }
}

#[async_trait]
impl TimestampSource for FileSource {
    #[instrument(skip_all, fields(path = %self.0.display()))]
    async fn fetch_range(&self, _range: TimeRange) -> Result<String, Error> {
        let data = tokio::fs::read_to_string(&self.0).await.map_err(|error| {
            Error::new("read-timestamp-file")
                .with_kind(ErrorKind::Internal)
                .with_message(format!("fail to read `{}`", self.0.display()))
                .with_source(error)
        })?;
        debug!(n_bytes = data.len(), "read");
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn test_read_ok() -> Result {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"2021-03-04T03:45:00Z 100.0\n")?;
        let data = FileSource::new(file.path()).fetch_range(TimeRange::default()).await?;
        assert_eq!(data, "2021-03-04T03:45:00Z 100.0\n");
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file() {
        let error = FileSource::new("/nonexistent/payload.txt")
            .fetch_range(TimeRange::default())
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Internal);
        assert_eq!(error.op(), "read-timestamp-file");
    }
}
