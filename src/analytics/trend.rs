use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendBucket {
    pub label: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Finite backward-looking sequence of bucket windows, oldest first. The
/// newest bucket ends at "now" truncated to the bucket's own boundary
/// (day: UTC midnight, week: Monday, month: first calendar day), and every
/// earlier boundary is a whole number of units before it, so a fixed `now`
/// always reproduces the same windows.
pub struct TrendSeries {
    granularity: Granularity,
    /// Exclusive end of the newest bucket.
    anchor: NaiveDate,
    total: usize,
    emitted: usize,
}

impl TrendSeries {
    pub fn new(now: DateTime<Utc>, buckets: usize, granularity: Granularity) -> Self {
        Self {
            granularity,
            anchor: truncate(now, granularity),
            total: buckets,
            emitted: 0,
        }
    }

    /// Evaluates `metric` over each `[start, end)` window in order.
    pub fn collect_with(self, metric: impl Fn(DateTime<Utc>, DateTime<Utc>) -> f64) -> Vec<TrendPoint> {
        self.map(|bucket| TrendPoint {
            value: metric(bucket.start, bucket.end),
            label: bucket.label,
        })
        .collect()
    }
}

impl Iterator for TrendSeries {
    type Item = TrendBucket;

    fn next(&mut self) -> Option<TrendBucket> {
        if self.emitted == self.total {
            return None;
        }
        let steps_back = (self.total - self.emitted) as u32;
        let start = step_back(self.anchor, self.granularity, steps_back);
        let end = step_back(self.anchor, self.granularity, steps_back - 1);
        self.emitted += 1;

        Some(TrendBucket {
            label: label_for(start, self.granularity),
            start: midnight_utc(start),
            end: midnight_utc(end),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.emitted;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TrendSeries {}

fn truncate(now: DateTime<Utc>, granularity: Granularity) -> NaiveDate {
    let date = now.date_naive();
    match granularity {
        Granularity::Day => date,
        Granularity::Week => date - Duration::days(date.weekday().num_days_from_monday() as i64),
        Granularity::Month => first_of_month(date.year(), date.month0()),
    }
}

fn step_back(anchor: NaiveDate, granularity: Granularity, units: u32) -> NaiveDate {
    match granularity {
        Granularity::Day => anchor - Duration::days(units as i64),
        Granularity::Week => anchor - Duration::weeks(units as i64),
        Granularity::Month => {
            let total = anchor.year() * 12 + anchor.month0() as i32 - units as i32;
            first_of_month(total.div_euclid(12), total.rem_euclid(12) as u32)
        }
    }
}

fn first_of_month(year: i32, month0: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).expect("first day of month is a valid date")
}

fn label_for(start: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Day | Granularity::Week => start.format("%Y-%m-%d").to_string(),
        Granularity::Month => start.format("%Y-%m").to_string(),
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
