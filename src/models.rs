use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

/// The record kept in the `graphData` slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub data: Vec<DataPoint>,
    pub expiration_time: i64,
}

/// `expirationTime` is the window the page was showing when the value was
/// entered. It only counts for the first point of a series.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPointRequest {
    pub value: String,
    pub expiration_time: Option<i64>,
}

/// `tz_offset` is the viewer's offset in minutes as reported by
/// `Date.prototype.getTimezoneOffset` (positive west of UTC).
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub tz_offset: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub total: f64,
    pub deduction: f64,
    pub net: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub hours: i64,
    pub minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub series_title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub index: usize,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    pub time: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub summary: Summary,
    pub expiration_time: i64,
    pub countdown: Countdown,
    pub chart: ChartSeries,
    pub history: Vec<HistoryRow>,
}
