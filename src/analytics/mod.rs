pub mod aggregate;
pub mod ranking;
pub mod trend;

use chrono::{DateTime, Duration, Utc};

use crate::analytics::trend::Granularity;

/// Lookback window accepted by the report endpoints. Unrecognized tokens
/// fall back to thirty days rather than erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    Week,
    Month,
    Quarter,
    Year,
}

impl TimeRange {
    pub fn from_token(token: &str) -> Self {
        match token {
            "7d" => TimeRange::Week,
            "30d" => TimeRange::Month,
            "90d" => TimeRange::Quarter,
            "1y" => TimeRange::Year,
            _ => TimeRange::Month,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Week => "7d",
            TimeRange::Month => "30d",
            TimeRange::Quarter => "90d",
            TimeRange::Year => "1y",
        }
    }

    pub fn days(&self) -> i64 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Quarter => 90,
            TimeRange::Year => 365,
        }
    }

    /// Half-open window `[start, end)` ending at `now`.
    pub fn window(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        (now - Duration::days(self.days()), now)
    }

    /// Bucket granularity used for trend series over this range.
    pub fn granularity(&self) -> Granularity {
        match self {
            TimeRange::Week | TimeRange::Month => Granularity::Day,
            TimeRange::Quarter => Granularity::Week,
            TimeRange::Year => Granularity::Month,
        }
    }

    /// Number of trend buckets rendered for this range.
    pub fn bucket_count(&self) -> usize {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Quarter => 13,
            TimeRange::Year => 12,
        }
    }
}
