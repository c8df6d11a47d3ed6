use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::{
    core::Point,
    error::{Error, ErrorKind},
};

/// Timestamp in the fixed UTC format followed by a single value token, for example:
/// `2021-03-04T05:24:05Z 100.4288`. Only ASCII whitespace separates the tokens.
static LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}Z)[\t\n\f\r ]+([^\t\n\f\r ]+)$")
        .expect("the line pattern is valid")
});

/// Parse a single `<timestamp> <value>` line.
pub fn parse_line(line: &str) -> Result<Point<DateTime<Utc>, f64>, Error> {
    const OP: &str = "parse-timestamp-line";

    let invalid = |message: String| {
        Error::new(OP).with_kind(ErrorKind::InvalidArgument).with_message(message)
    };

    let captures =
        LINE.captures(line).ok_or_else(|| invalid(format!("invalid timestamp line: {line}")))?;
    let (timestamp, value) = (&captures[1], &captures[2]);

    let timestamp = DateTime::parse_from_rfc3339(timestamp).map_err(|error| {
        invalid(format!("fail to parse string to time: {timestamp} (line: {line})")).with_source(error)
    })?;
    let parsed_value = value.parse::<f64>().map_err(|error| {
        invalid(format!("fail to parse value string to float: {value} (line: {line})"))
            .with_source(error)
    })?;
    if parsed_value.is_infinite() && !is_infinity_literal(value) {
        return Err(invalid(format!("value is out of range: {value} (line: {line})")));
    }

    Ok((timestamp.to_utc(), parsed_value))
}

/// Overflowing literals like `1e400` parse into infinity, spelled-out infinities are fine.
fn is_infinity_literal(token: &str) -> bool {
    let unsigned = token.strip_prefix(['+', '-']).unwrap_or(token);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}
