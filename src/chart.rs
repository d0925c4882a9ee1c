use crate::models::{ChartSeries, DataPoint, HistoryRow};
use chrono::{Local, TimeZone};

pub const SERIES_TITLE: &str = "Value";

const TIME_FORMAT: &str = "%H:%M:%S";

pub fn chart_series(series: &[DataPoint]) -> ChartSeries {
    chart_series_in(series, &Local)
}

/// Labels and values for the line chart, index-aligned with `series`.
pub fn chart_series_in<Tz: TimeZone>(series: &[DataPoint], tz: &Tz) -> ChartSeries
where
    Tz::Offset: std::fmt::Display,
{
    ChartSeries {
        labels: series.iter().map(|point| time_label(point, tz)).collect(),
        values: series.iter().map(|point| point.value).collect(),
        series_title: SERIES_TITLE.to_string(),
    }
}

pub fn history_rows(series: &[DataPoint]) -> Vec<HistoryRow> {
    history_rows_in(series, &Local)
}

/// History table rows, newest first.
pub fn history_rows_in<Tz: TimeZone>(series: &[DataPoint], tz: &Tz) -> Vec<HistoryRow>
where
    Tz::Offset: std::fmt::Display,
{
    series
        .iter()
        .enumerate()
        .rev()
        .map(|(i, point)| HistoryRow {
            index: i + 1,
            value: point.value,
            timestamp: point.timestamp,
            time: time_label(point, tz),
        })
        .collect()
}

fn time_label<Tz: TimeZone>(point: &DataPoint, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    point
        .timestamp
        .with_timezone(tz)
        .format(TIME_FORMAT)
        .to_string()
}
