use crate::chart::{chart_series, chart_series_in, history_rows, history_rows_in};
use crate::clock::{Clock, SystemClock};
use crate::errors::AppError;
use crate::models::{AddPointRequest, DashboardResponse, ViewQuery};
use crate::series::SeriesState;
use crate::state::{AppState, Backend};
use crate::stats::{build_summary, remaining};
use crate::storage::{CookieStore, KeyValueStore};
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::FixedOffset;
use tracing::debug;

type RequestSeries<'a> = SeriesState<&'a mut dyn KeyValueStore, SystemClock>;

pub async fn index(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, dashboard) = with_series(&state, jar, |series| build_dashboard(series, None)).await;
    (jar, Html(render_index(&dashboard)))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(view): Query<ViewQuery>,
    jar: CookieJar,
) -> (CookieJar, Json<DashboardResponse>) {
    let tz = view_offset(&view);
    let (jar, dashboard) = with_series(&state, jar, |series| build_dashboard(series, tz)).await;
    (jar, Json(dashboard))
}

pub async fn add_point(
    State(state): State<AppState>,
    Query(view): Query<ViewQuery>,
    jar: CookieJar,
    Json(payload): Json<AddPointRequest>,
) -> Result<(CookieJar, Json<DashboardResponse>), AppError> {
    let value = parse_value(&payload.value)?;
    let tz = view_offset(&view);
    let (jar, dashboard) = with_series(&state, jar, |series| {
        append_point(series, value, payload.expiration_time);
        build_dashboard(series, tz)
    })
    .await;
    Ok((jar, Json(dashboard)))
}

pub async fn add_point_form(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(payload): Form<AddPointRequest>,
) -> Result<(CookieJar, Redirect), AppError> {
    let value = parse_value(&payload.value)?;
    let (jar, ()) = with_series(&state, jar, |series| {
        append_point(series, value, payload.expiration_time)
    })
    .await;
    Ok((jar, Redirect::to("/")))
}

/// The viewer's zone from a `getTimezoneOffset` value; `None` when absent or
/// out of range, in which case the server's zone is used.
pub fn view_offset(view: &ViewQuery) -> Option<FixedOffset> {
    view.tz_offset
        .and_then(|minutes| minutes.checked_mul(60))
        .and_then(FixedOffset::west_opt)
}

/// Accepts a finite decimal number; anything else never reaches the series.
pub fn parse_value(raw: &str) -> Result<f64, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::bad_request("value is required"));
    }

    let value = raw
        .parse::<f64>()
        .map_err(|_| AppError::bad_request("value must be a number"))?;
    if !value.is_finite() {
        return Err(AppError::bad_request("value must be finite"));
    }

    Ok(value)
}

/// Runs `f` against the series of this request, then hands back the cookie
/// jar carrying whatever the series wrote.
async fn with_series<R>(
    state: &AppState,
    jar: CookieJar,
    f: impl FnOnce(&mut RequestSeries<'_>) -> R,
) -> (CookieJar, R) {
    match &state.backend {
        Backend::Cookie => {
            let mut store = CookieStore::new(jar);
            let result = {
                let mut series = SeriesState::initialize(
                    &mut store as &mut dyn KeyValueStore,
                    state.clock,
                );
                f(&mut series)
            };
            (store.into_jar(), result)
        }
        Backend::Memory(shared) => {
            let mut store = shared.lock().await;
            let mut series =
                SeriesState::initialize(&mut *store as &mut dyn KeyValueStore, state.clock);
            (jar, f(&mut series))
        }
    }
}

fn append_point(series: &mut RequestSeries<'_>, value: f64, shown_expiration: Option<i64>) {
    if let Some(expiration) = shown_expiration {
        if series.adopt_expiration(expiration) {
            debug!(expiration, "series window starts at page load");
        }
    }
    series.append(value);
    debug!(value, points = series.len(), "point appended");
}

fn build_dashboard<S: KeyValueStore, C: Clock>(
    series: &SeriesState<S, C>,
    tz: Option<FixedOffset>,
) -> DashboardResponse {
    let points = series.points();
    let (chart, history) = match tz {
        Some(tz) => (chart_series_in(points, &tz), history_rows_in(points, &tz)),
        None => (chart_series(points), history_rows(points)),
    };
    DashboardResponse {
        summary: build_summary(points),
        expiration_time: series.expiration_time(),
        countdown: remaining(series.expiration_time(), series.now_millis()),
        chart,
        history,
    }
}
