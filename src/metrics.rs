//! Null-safe scalar reducers. Every percentage in the engine (completion,
//! engagement, dropoff, per-bucket completion rate) routes through [`ratio`],
//! which resolves an empty denominator to zero instead of NaN.

pub fn sum<T>(items: &[T], f: impl Fn(&T) -> f64) -> f64 {
    items.iter().map(f).sum()
}

pub fn count<T>(items: &[T], predicate: impl Fn(&T) -> bool) -> usize {
    items.iter().filter(|item| predicate(item)).count()
}

/// Arithmetic mean, 0.0 on empty input.
pub fn average<T>(items: &[T], f: impl Fn(&T) -> f64) -> f64 {
    ratio(sum(items, f), items.len() as f64)
}

/// Returns 0.0 when the denominator is zero. Never NaN, never an error.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Ratio expressed in percent, rounded to two decimals.
pub fn percentage(numerator: f64, denominator: f64) -> f64 {
    round2(ratio(numerator, denominator) * 100.0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
