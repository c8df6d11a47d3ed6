use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Timelike, Utc};

use crate::{
    core::{TimeRange, parse_line},
    error::{Error, ErrorKind},
};

/// Hour-truncated UTC timestamp to the running average of the samples within that hour.
pub type HourlyAverages = BTreeMap<DateTime<Utc>, f64>;

/// Parse the payload line by line and average the values per hour.
///
/// The aggregation is a single pass: consecutive samples of the same hour form a chunk,
/// and a chunk is merged into the averages as soon as a sample of another hour arrives.
/// An hour that is revisited after a different one gets its average updated as if the
/// earlier chunks had the same size as the new one.
pub fn calculate_hourly_averages(data: &str, range: TimeRange) -> Result<HourlyAverages, Error> {
    const OP: &str = "calculate-hourly-averages";

    let mut aggregator = HourlyAggregator::default();
    for line in data.lines() {
        let (timestamp, value) = parse_line(line)?;
        if !range.contains(timestamp) {
            return Err(Error::new(OP)
                .with_kind(ErrorKind::InvalidArgument)
                .with_message(format!("timestamp is out of range: {timestamp}")));
        }
        aggregator.push(timestamp, value);
    }
    Ok(aggregator.finish())
}

#[derive(Default)]
struct HourlyAggregator {
    /// Hour of the chunk being accumulated.
    current_hour: Option<DateTime<Utc>>,

    /// Values of the current chunk.
    chunk: Vec<f64>,

    averages: HourlyAverages,
}

impl HourlyAggregator {
    fn push(&mut self, timestamp: DateTime<Utc>, value: f64) {
        let hour = truncate_to_hour(timestamp);
        if self.current_hour != Some(hour) {
            self.flush();
            self.current_hour = Some(hour);
        }
        self.chunk.push(value);
    }

    fn finish(mut self) -> HourlyAverages {
        self.flush();
        self.averages
    }

    fn flush(&mut self) {
        let Some(hour) = self.current_hour else { return };
        if self.chunk.is_empty() {
            return;
        }
        #[expect(clippy::cast_precision_loss)]
        let n_values = self.chunk.len() as f64;
        let sum: f64 = self.chunk.drain(..).sum();
        self.averages
            .entry(hour)
            .and_modify(|average| *average = (*average * n_values + sum) / (2.0 * n_values))
            .or_insert(sum / n_values);
    }
}

fn truncate_to_hour(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    let since_hour_start = TimeDelta::seconds(i64::from(timestamp.minute() * 60 + timestamp.second()))
        + TimeDelta::nanoseconds(i64::from(timestamp.nanosecond()));
    timestamp - since_hour_start
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;

    use super::*;

    fn range() -> TimeRange {
        TimeRange::new(
            Utc.with_ymd_and_hms(2021, 3, 4, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2021, 3, 4, 23, 59, 59).unwrap(),
        )
    }

    fn hour(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 3, 4, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_truncate_to_hour() {
        let timestamp = Utc.with_ymd_and_hms(2021, 3, 4, 5, 24, 5).unwrap()
            + TimeDelta::milliseconds(250);
        assert_eq!(truncate_to_hour(timestamp), hour(5));
        assert_eq!(truncate_to_hour(hour(5)), hour(5));
    }

    #[test]
    fn test_consecutive_hours() -> Result<(), Error> {
        let data = "2021-03-04T03:45:00Z 100.0\n2021-03-04T03:50:00Z 200.0\n2021-03-04T04:05:00Z 50.0\n";
        let averages = calculate_hourly_averages(data, range())?;
        assert_eq!(averages.len(), 2);
        assert_abs_diff_eq!(averages[&hour(3)], 150.0);
        assert_abs_diff_eq!(averages[&hour(4)], 50.0);
        Ok(())
    }

    #[test]
    fn test_empty_payload() -> Result<(), Error> {
        assert!(calculate_hourly_averages("", range())?.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_trailing_newline() -> Result<(), Error> {
        let averages = calculate_hourly_averages("2021-03-04T03:45:00Z 1.5", range())?;
        assert_abs_diff_eq!(averages[&hour(3)], 1.5);
        Ok(())
    }

    #[test]
    fn test_revisited_hour_uses_running_update() -> Result<(), Error> {
        let data = "\
            2021-03-04T03:00:00Z 5\n\
            2021-03-04T03:10:00Z 15\n\
            2021-03-04T04:00:00Z 100\n\
            2021-03-04T03:20:00Z 15\n\
            2021-03-04T03:30:00Z 25\n";
        let averages = calculate_hourly_averages(data, range())?;
        assert_abs_diff_eq!(averages[&hour(3)], 15.0);
        assert_abs_diff_eq!(averages[&hour(4)], 100.0);
        Ok(())
    }

    #[test]
    fn test_revisited_hour_with_unequal_chunks() -> Result<(), Error> {
        // The earlier chunk of 3 samples is weighted as if it had 1 sample.
        let data = "\
            2021-03-04T03:00:00Z 10\n\
            2021-03-04T03:10:00Z 10\n\
            2021-03-04T03:20:00Z 10\n\
            2021-03-04T04:00:00Z 0\n\
            2021-03-04T03:30:00Z 30\n";
        let averages = calculate_hourly_averages(data, range())?;
        assert_abs_diff_eq!(averages[&hour(3)], 20.0);
        Ok(())
    }

    #[test]
    fn test_out_of_range() {
        let error =
            calculate_hourly_averages("2021-03-05T00:00:00Z 1.0\n", range()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidArgument);
        assert_eq!(error.op(), "calculate-hourly-averages");
        assert_eq!(error.message(), "timestamp is out of range: 2021-03-05 00:00:00 UTC");
    }

    #[test]
    fn test_bounds_are_inclusive() -> Result<(), Error> {
        let data = "2021-03-04T00:00:00Z 1\n2021-03-04T23:59:59Z 2\n";
        let averages = calculate_hourly_averages(data, range())?;
        assert_abs_diff_eq!(averages[&hour(0)], 1.0);
        assert_abs_diff_eq!(averages[&hour(23)], 2.0);
        Ok(())
    }

    #[test]
    fn test_malformed_line_aborts() {
        let data = "2021-03-04T03:45:00Z 100.0\n\n2021-03-04T03:50:00Z 200.0\n";
        let error = calculate_hourly_averages(data, range()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidArgument);
        assert_eq!(error.op(), "parse-timestamp-line");
    }

    #[test]
    fn test_overflowing_value_aborts() {
        let data = "2021-03-04T03:00:00Z 1e400\n2021-03-04T03:10:00Z 1\n";
        let error = calculate_hourly_averages(data, range()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidArgument);
        assert_eq!(error.op(), "parse-timestamp-line");
    }
}
