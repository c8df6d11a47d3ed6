mod hourly;
mod line;
mod serialize;
mod time_range;

pub use self::{
    hourly::{HourlyAverages, calculate_hourly_averages},
    line::parse_line,
    serialize::serialize,
    time_range::TimeRange,
};

pub type Point<K, V> = (K, V);
