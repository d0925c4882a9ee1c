use crate::models::{Countdown, DashboardResponse, HistoryRow};

pub fn render_index(dashboard: &DashboardResponse) -> String {
    let summary = &dashboard.summary;
    INDEX_HTML
        .replace("{{COUNT}}", &summary.count.to_string())
        .replace("{{TOTAL}}", &format_amount(summary.total))
        .replace("{{DEDUCTION}}", &format_amount(summary.deduction))
        .replace("{{NET}}", &format_amount(summary.net))
        .replace("{{COUNTDOWN}}", &format_countdown(dashboard.countdown))
        .replace("{{EXPIRATION}}", &dashboard.expiration_time.to_string())
        .replace("{{HISTORY_ROWS}}", &render_history(&dashboard.history))
}

pub fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}

pub fn format_countdown(countdown: Countdown) -> String {
    format!("{}h {}m", countdown.hours, countdown.minutes)
}

fn render_history(rows: &[HistoryRow]) -> String {
    if rows.is_empty() {
        return r#"<tr class="empty"><td colspan="3">No values yet</td></tr>"#.to_string();
    }

    rows.iter()
        .map(|row| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                row.index, row.time, row.value
            )
        })
        .collect()
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Graph Dashboard</title>
  <style>
    :root {
      --bg: #f4f1ea;
      --ink: #23262b;
      --muted: #6c6861;
      --accent: #3a7bd5;
      --accent-2: #2d7a4b;
      --warn: #c63b2b;
      --card: #ffffff;
      --line: rgba(35, 38, 43, 0.1);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: start center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(900px, 100%);
      display: grid;
      gap: 24px;
    }

    header h1 {
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
    }

    .subtitle {
      margin: 6px 0 0;
      color: var(--muted);
    }

    .entry {
      display: flex;
      gap: 12px;
    }

    .entry input {
      flex: 1;
      padding: 12px 16px;
      border-radius: 12px;
      border: 1px solid var(--line);
      font-size: 1rem;
    }

    .entry button {
      border: none;
      border-radius: 12px;
      padding: 12px 22px;
      font-size: 1rem;
      font-weight: 600;
      background: var(--accent);
      color: white;
      cursor: pointer;
    }

    .entry button:disabled {
      opacity: 0.5;
      cursor: default;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 14px;
    }

    .stat {
      background: var(--card);
      border-radius: 16px;
      padding: 16px;
      border: 1px solid var(--line);
      display: grid;
      gap: 6px;
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .stat .value {
      font-size: 1.5rem;
      font-weight: 600;
    }

    .stat .value.net {
      color: var(--accent-2);
    }

    .stat .value.deduction {
      color: var(--warn);
    }

    .chart-card,
    .history {
      background: var(--card);
      border-radius: 16px;
      padding: 16px;
      border: 1px solid var(--line);
    }

    #chart {
      width: 100%;
      height: 260px;
      display: block;
    }

    .chart-line {
      fill: none;
      stroke: var(--accent);
      stroke-width: 3;
    }

    .chart-point {
      fill: white;
      stroke: var(--accent);
      stroke-width: 2;
    }

    .chart-grid {
      stroke: var(--line);
    }

    .chart-label {
      fill: var(--muted);
      font-size: 11px;
    }

    .history {
      max-height: 280px;
      overflow-y: auto;
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th,
    td {
      text-align: left;
      padding: 8px 10px;
      border-bottom: 1px solid var(--line);
    }

    tr.empty td {
      color: var(--muted);
      text-align: center;
    }

    .status {
      min-height: 1.2em;
      color: var(--muted);
    }

    .status[data-type="error"] {
      color: var(--warn);
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Graph Dashboard</h1>
      <p class="subtitle">Values are kept in this browser for 12 hours. Resets in <span id="countdown">{{COUNTDOWN}}</span>.</p>
    </header>

    <form id="entry-form" class="entry" method="post" action="/points">
      <input id="value" name="value" type="number" step="any" placeholder="Enter a value" autocomplete="off" />
      <input id="shown-expiration" name="expirationTime" type="hidden" value="{{EXPIRATION}}" />
      <button id="add-btn" type="submit">Add</button>
    </form>

    <section class="panel">
      <div class="stat">
        <span class="label">Count</span>
        <span id="count" class="value">{{COUNT}}</span>
      </div>
      <div class="stat">
        <span class="label">Total</span>
        <span id="total" class="value">{{TOTAL}}</span>
      </div>
      <div class="stat">
        <span class="label">Deduction (10%)</span>
        <span id="deduction" class="value deduction">{{DEDUCTION}}</span>
      </div>
      <div class="stat">
        <span class="label">Profit</span>
        <span id="net" class="value net">{{NET}}</span>
      </div>
    </section>

    <section class="chart-card">
      <svg id="chart" viewBox="0 0 600 260" aria-label="Value chart" role="img"></svg>
    </section>

    <section class="history">
      <table>
        <thead>
          <tr><th>#</th><th>Time</th><th>Value</th></tr>
        </thead>
        <tbody id="history">{{HISTORY_ROWS}}</tbody>
      </table>
    </section>

    <div class="status" id="status"></div>
  </main>

  <script>
    const countEl = document.getElementById('count');
    const totalEl = document.getElementById('total');
    const deductionEl = document.getElementById('deduction');
    const netEl = document.getElementById('net');
    const countdownEl = document.getElementById('countdown');
    const historyEl = document.getElementById('history');
    const statusEl = document.getElementById('status');
    const chartEl = document.getElementById('chart');
    const form = document.getElementById('entry-form');
    const input = document.getElementById('value');
    const addBtn = document.getElementById('add-btn');
    const shownExpirationEl = document.getElementById('shown-expiration');
    const tzOffset = new Date().getTimezoneOffset();

    let expirationTime = {{EXPIRATION}};

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const renderCountdown = () => {
      const remaining = Math.max(0, expirationTime - Date.now());
      const hours = Math.floor(remaining / 3600000);
      const minutes = Math.floor((remaining % 3600000) / 60000);
      countdownEl.textContent = `${hours}h ${minutes}m`;
    };

    const renderLineChart = (chart) => {
      if (!chart.values.length) {
        chartEl.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No data yet</text>';
        return;
      }

      const width = 600;
      const height = 260;
      const paddingX = 44;
      const paddingY = 34;
      const top = 24;

      let min = Math.min(...chart.values);
      let max = Math.max(...chart.values);
      if (min === max) {
        min -= 1;
        max += 1;
      }

      const range = max - min;
      const xStep = chart.values.length > 1 ? (width - paddingX * 2) / (chart.values.length - 1) : 0;
      const scaleY = (height - top - paddingY) / range;
      const x = (index) => paddingX + index * xStep;
      const y = (value) => height - paddingY - (value - min) * scaleY;

      const path = chart.values
        .map((value, index) => `${index === 0 ? 'M' : 'L'} ${x(index).toFixed(2)} ${y(value).toFixed(2)}`)
        .join(' ');

      let grid = '';
      for (let i = 0; i <= 4; i += 1) {
        const value = min + (range * i) / 4;
        grid += `<line class="chart-grid" x1="${paddingX}" y1="${y(value)}" x2="${width - paddingX}" y2="${y(value)}" />`;
        grid += `<text class="chart-label" x="${paddingX - 10}" y="${y(value) + 4}" text-anchor="end">${value.toFixed(1)}</text>`;
      }

      const labelEvery = Math.max(1, Math.ceil(chart.labels.length / 8));
      const xLabels = chart.labels
        .map((label, index) => index % labelEvery === 0
          ? `<text class="chart-label" x="${x(index)}" y="${height - paddingY + 18}" text-anchor="middle">${label}</text>`
          : '')
        .join('');

      const circles = chart.values
        .map((value, index) => `<circle class="chart-point" cx="${x(index)}" cy="${y(value)}" r="4"><title>${chart.seriesTitle}: ${value}</title></circle>`)
        .join('');

      chartEl.innerHTML = `${grid}<path class="chart-line" d="${path}" />${circles}${xLabels}`;
    };

    const renderHistory = (rows) => {
      if (!rows.length) {
        historyEl.innerHTML = '<tr class="empty"><td colspan="3">No values yet</td></tr>';
        return;
      }
      historyEl.innerHTML = rows
        .map((row) => `<tr><td>${row.index}</td><td>${row.time}</td><td>${row.value}</td></tr>`)
        .join('');
    };

    const render = (dashboard) => {
      countEl.textContent = dashboard.summary.count;
      totalEl.textContent = dashboard.summary.total.toFixed(2);
      deductionEl.textContent = dashboard.summary.deduction.toFixed(2);
      netEl.textContent = dashboard.summary.net.toFixed(2);
      expirationTime = dashboard.expirationTime;
      shownExpirationEl.value = expirationTime;
      renderCountdown();
      renderLineChart(dashboard.chart);
      renderHistory(dashboard.history);
    };

    const load = async () => {
      const res = await fetch(`/api/dashboard?tz_offset=${tzOffset}`);
      if (!res.ok) {
        throw new Error('Unable to load dashboard');
      }
      render(await res.json());
    };

    const send = async (value) => {
      const res = await fetch(`/api/points?tz_offset=${tzOffset}`, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ value, expirationTime })
      });

      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }

      render(await res.json());
      input.value = '';
      addBtn.disabled = true;
      setStatus('', '');
    };

    const syncButton = () => {
      addBtn.disabled = input.value.trim() === '';
    };

    input.addEventListener('input', syncButton);

    form.addEventListener('submit', (event) => {
      event.preventDefault();
      const value = input.value.trim();
      if (value === '') {
        return;
      }
      send(value).catch((err) => setStatus(err.message, 'error'));
    });

    syncButton();
    setInterval(renderCountdown, 60000);
    load().catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChartSeries, Summary};
    use chrono::{TimeZone, Utc};

    fn dashboard(history: Vec<HistoryRow>) -> DashboardResponse {
        DashboardResponse {
            summary: Summary {
                count: history.len(),
                total: 4.0,
                deduction: 0.4,
                net: 3.6,
            },
            expiration_time: 1_790_043_200_000,
            countdown: Countdown {
                hours: 11,
                minutes: 59,
            },
            chart: ChartSeries {
                labels: Vec::new(),
                values: Vec::new(),
                series_title: "Value".into(),
            },
            history,
        }
    }

    #[test]
    fn index_shows_summary_and_countdown() {
        let html = render_index(&dashboard(Vec::new()));
        assert!(html.contains(r#"<span id="total" class="value">4.00</span>"#));
        assert!(html.contains(r#"<span id="net" class="value net">3.60</span>"#));
        assert!(html.contains(r#"<span id="countdown">11h 59m</span>"#));
        assert!(html.contains("let expirationTime = 1790043200000;"));
        assert!(html.contains(
            r#"name="expirationTime" type="hidden" value="1790043200000""#
        ));
        assert!(html.contains(r#"<tbody id="history"><tr class="empty">"#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn index_lists_history_rows() {
        let rows = vec![HistoryRow {
            index: 1,
            value: 1.8,
            timestamp: Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap(),
            time: "09:00:00".into(),
        }];
        let html = render_index(&dashboard(rows));
        assert!(html.contains("<tr><td>1</td><td>09:00:00</td><td>1.8</td></tr>"));
        assert!(!html.contains(r#"<tbody id="history"><tr class="empty">"#));
    }
}
