use std::fmt::Write;

use chrono::SecondsFormat;

use crate::core::HourlyAverages;

/// Render the averages as `<RFC 3339 hour> <average>` lines, earliest hour first.
#[must_use]
pub fn serialize(averages: &HourlyAverages) -> String {
    averages.iter().fold(String::new(), |mut output, (hour, average)| {
        let _ = writeln!(output, "{} {average:.4}", hour.to_rfc3339_opts(SecondsFormat::Secs, true));
        output
    })
}
