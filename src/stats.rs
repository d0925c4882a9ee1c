use crate::models::{Countdown, DataPoint, Summary};

const NET_SHARE: f64 = 0.9;
const DEDUCTION_SHARE: f64 = 0.1;

const MILLIS_PER_HOUR: i64 = 3_600_000;
const MILLIS_PER_MINUTE: i64 = 60_000;

pub fn count(series: &[DataPoint]) -> usize {
    series.len()
}

/// Left-to-right sum in insertion order.
pub fn total_sum(series: &[DataPoint]) -> f64 {
    series.iter().fold(0.0, |acc, point| acc + point.value)
}

pub fn net_value(series: &[DataPoint]) -> f64 {
    total_sum(series) * NET_SHARE
}

pub fn deduction(series: &[DataPoint]) -> f64 {
    total_sum(series) * DEDUCTION_SHARE
}

pub fn build_summary(series: &[DataPoint]) -> Summary {
    let total = total_sum(series);
    Summary {
        count: count(series),
        total,
        deduction: total * DEDUCTION_SHARE,
        net: total * NET_SHARE,
    }
}

/// Whole hours and minutes left until `expiration_time`, clamped at zero.
pub fn remaining(expiration_time: i64, now_millis: i64) -> Countdown {
    let remaining = expiration_time.saturating_sub(now_millis).max(0);
    Countdown {
        hours: remaining / MILLIS_PER_HOUR,
        minutes: (remaining % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE,
    }
}
