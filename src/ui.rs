use crate::calendar::{CalendarGrid, DAY_NAMES, WEEKS};
use crate::milestones::MILESTONES;
use crate::models::{AppData, CalendarEntry};
use crate::stats;
use crate::timer::TimerSnapshot;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

pub fn render_index(
    data: &AppData,
    today: NaiveDate,
    now_ms: i64,
    achieved: &[u32],
    grid: &CalendarGrid,
    timer: &TimerSnapshot,
) -> String {
    let completed = data.completed();
    let remaining = data.total.saturating_sub(completed);
    let pct = stats::completed_pct(completed, data.total);
    let today_progress = data
        .daily_progress
        .get(&today.to_string())
        .copied()
        .unwrap_or(0);
    let daily_pct = stats::daily_pct(today_progress, data.daily_goal);
    let arc_offset = stats::ring_arc_offset(daily_pct);
    let (rate_per_day, eta_ms) = stats::rate_and_eta(data.total, &data.events, now_ms);

    INDEX_HTML
        .replace("{{COMPLETED}}", &completed.to_string())
        .replace("{{TOTAL}}", &data.total.to_string())
        .replace("{{REMAINING}}", &remaining.to_string())
        .replace("{{PCT}}", &format!("{pct:.1}"))
        .replace("{{BAR_PCT}}", &format!("{:.1}", pct.clamp(0.0, 100.0)))
        .replace("{{TODAY_PROGRESS}}", &today_progress.to_string())
        .replace("{{DAILY_GOAL}}", &data.daily_goal.to_string())
        .replace("{{DAILY_PCT}}", &format!("{daily_pct:.1}"))
        .replace("{{ARC_OFFSET}}", &format!("{arc_offset:.2}"))
        .replace("{{RATE}}", &format!("{rate_per_day:.2}"))
        .replace("{{ETA}}", &eta_display(eta_ms))
        .replace("{{LAST_PAGE}}", &data.last_page.to_string())
        .replace("{{NEXT_QUESTION}}", &data.next_question_number.to_string())
        .replace("{{MILESTONES}}", &render_badges(achieved))
        .replace("{{CALENDAR}}", &render_calendar(grid))
        .replace("{{CALENDAR_DATA}}", &calendar_data_json(data))
        .replace("{{CHART_HIDDEN}}", if completed > 0 { "" } else { " hidden" })
        .replace("{{TIMER_DISPLAY}}", &timer.display)
        .replace("{{TIMER_PHASE}}", phase_label(timer.phase))
        .replace("{{WORK_COUNT}}", &timer.work_count.to_string())
        .replace("{{BREAK_COUNT}}", &timer.break_count.to_string())
}

fn eta_display(eta_ms: Option<i64>) -> String {
    eta_ms
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .map(|dt: DateTime<Utc>| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "—".to_string())
}

fn phase_label(phase: &str) -> &'static str {
    if phase == "work" { "Work" } else { "Break" }
}

fn render_badges(achieved: &[u32]) -> String {
    MILESTONES
        .iter()
        .map(|m| {
            let class = if achieved.contains(m) {
                "milestone-badge achieved"
            } else {
                "milestone-badge"
            };
            format!(r#"<span class="{class}" data-milestone="{m}">{m}%</span>"#)
        })
        .collect::<Vec<_>>()
        .join("\n        ")
}

/// Initial server-side render of the activity grid. The client-side painter
/// rebuilds the same node layout from patched cells.
fn render_calendar(grid: &CalendarGrid) -> String {
    let mut nodes = Vec::with_capacity(1 + WEEKS + 7 * (WEEKS + 1));
    nodes.push(r#"<div class="calendar-corner"></div>"#.to_string());
    for week in 1..=WEEKS {
        nodes.push(format!(
            r#"<div class="calendar-label week-label">{week}</div>"#
        ));
    }
    for (day_of_week, name) in DAY_NAMES.iter().enumerate() {
        nodes.push(format!(
            r#"<div class="calendar-label day-label">{name}</div>"#
        ));
        for week in 0..WEEKS {
            let cell = grid.cell(day_of_week, week);
            if cell.active {
                nodes.push(format!(
                    r#"<div class="calendar-day active" data-count="{}" title="{}"></div>"#,
                    cell.level, cell.date
                ));
            } else {
                nodes.push(format!(
                    r#"<div class="calendar-day" title="{}"></div>"#,
                    cell.date
                ));
            }
        }
    }
    nodes.join("\n      ")
}

fn calendar_data_json(data: &AppData) -> String {
    let entries: Vec<CalendarEntry> = data
        .daily_progress
        .iter()
        .map(|(date, &count)| CalendarEntry {
            date: date.clone(),
            count,
        })
        .collect();
    serde_json::to_string(&entries).unwrap_or_else(|_| "[]".to_string())
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Study Progress</title>
  <style>
    :root {
      --bg-1: #f4f6fb;
      --bg-2: #dfe7f5;
      --ink: #23293a;
      --muted: #68708a;
      --accent: #0a84ff;
      --forecast: #34c759;
      --warn: #c63b2b;
      --card: #ffffff;
      --border: rgba(35, 41, 58, 0.1);
      --shadow: 0 20px 50px rgba(35, 41, 58, 0.12);
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top right, var(--bg-2), transparent 55%), var(--bg-1);
      color: var(--ink);
      font-family: "Avenir Next", "Segoe UI", sans-serif;
      display: grid;
      place-items: start center;
      padding: 34px 18px 56px;
    }

    .app {
      width: min(920px, 100%);
      display: grid;
      gap: 24px;
    }

    .card {
      background: var(--card);
      border-radius: 22px;
      border: 1px solid var(--border);
      box-shadow: var(--shadow);
      padding: 26px;
    }

    h1 { margin: 0; font-size: clamp(1.8rem, 4vw, 2.4rem); }
    h2 { margin: 0 0 14px; font-size: 1.25rem; }
    .subtitle { margin: 4px 0 0; color: var(--muted); }

    .overview {
      display: grid;
      grid-template-columns: auto 1fr;
      gap: 28px;
      align-items: center;
    }

    .circular-progress { width: 130px; height: 130px; }
    .circular-progress svg { transform: rotate(-90deg); }
    .ring-track { fill: none; stroke: var(--bg-2); stroke-width: 10; }
    .progress-circle {
      fill: none;
      stroke: var(--accent);
      stroke-width: 10;
      stroke-linecap: round;
      stroke-dasharray: 314.16;
      transition: stroke-dashoffset 600ms ease;
    }
    .ring-caption { text-align: center; margin-top: 8px; font-size: 0.85rem; color: var(--muted); }

    .stat-grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(130px, 1fr));
      gap: 14px;
    }
    .stat { display: grid; gap: 4px; }
    .stat .label {
      font-size: 0.78rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }
    .stat .value { font-size: 1.5rem; font-weight: 600; }

    .bar-track {
      height: 12px;
      border-radius: 999px;
      background: var(--bg-2);
      overflow: hidden;
      margin-top: 18px;
    }
    .bar-fill {
      height: 100%;
      border-radius: 999px;
      background: var(--accent);
      transition: width 500ms ease;
    }

    .milestones { display: flex; gap: 10px; margin-top: 16px; flex-wrap: wrap; }
    .milestone-badge {
      padding: 6px 14px;
      border-radius: 999px;
      border: 1px solid var(--border);
      color: var(--muted);
      font-size: 0.85rem;
      font-weight: 600;
    }
    .milestone-badge.achieved {
      background: var(--forecast);
      border-color: transparent;
      color: white;
    }

    form { margin: 0; }
    .forms {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      align-items: center;
    }
    input[type="number"] {
      width: 90px;
      padding: 10px 12px;
      border-radius: 12px;
      border: 1px solid var(--border);
      font-size: 0.95rem;
    }
    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 20px;
      font-size: 0.95rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
      transition: transform 120ms ease, opacity 120ms ease;
    }
    button:active { transform: scale(0.97); }
    button:disabled { opacity: 0.45; cursor: default; }
    button.secondary { background: var(--bg-2); color: var(--ink); }
    button.danger { background: var(--warn); }

    .footer-stats {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 14px;
      margin-top: 18px;
      padding-top: 16px;
      border-top: 1px solid var(--border);
    }

    .chart-header {
      display: flex;
      flex-wrap: wrap;
      justify-content: space-between;
      align-items: center;
      gap: 14px;
      margin-bottom: 14px;
    }
    .tabs {
      display: flex;
      gap: 6px;
      padding: 5px;
      background: var(--bg-2);
      border-radius: 999px;
    }
    .tab {
      background: transparent;
      color: var(--muted);
      padding: 8px 16px;
      font-size: 0.88rem;
    }
    .tab.active { background: white; color: var(--ink); box-shadow: 0 6px 14px rgba(35,41,58,0.12); }

    #chart { width: 100%; height: 280px; display: block; }
    .chart-line { fill: none; stroke: var(--accent); stroke-width: 2.5; }
    .chart-point { fill: white; stroke: var(--accent); stroke-width: 2; }
    .chart-forecast { fill: none; stroke: var(--forecast); stroke-width: 2; stroke-dasharray: 6 6; }
    .chart-grid-line { stroke: var(--border); }
    .chart-label { fill: var(--muted); font-size: 11px; font-family: inherit; }
    .chart-eta {
      fill: var(--forecast);
      font-size: 11px;
      font-weight: 600;
      font-family: inherit;
    }

    .calendar {
      display: grid;
      grid-template-columns: auto repeat(5, 26px);
      gap: 6px;
      justify-content: start;
    }
    .calendar-corner { width: 26px; height: 18px; }
    .calendar-label {
      font-size: 0.72rem;
      color: var(--muted);
      display: grid;
      place-items: center;
    }
    .day-label { justify-items: end; padding-right: 4px; }
    .calendar-day {
      width: 26px;
      height: 26px;
      border-radius: 7px;
      background: var(--bg-2);
    }
    .calendar-day.active { background: var(--accent); }
    .calendar-day.active[data-count="1"] { opacity: 0.35; }
    .calendar-day.active[data-count="2"] { opacity: 0.5; }
    .calendar-day.active[data-count="3"] { opacity: 0.65; }
    .calendar-day.active[data-count="4"] { opacity: 0.82; }
    .calendar-day.active[data-count="5"] { opacity: 1; }

    .timer-panel {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      gap: 22px;
    }
    #timer { font-size: 2.6rem; font-weight: 700; font-variant-numeric: tabular-nums; }
    #phase { color: var(--muted); font-weight: 600; }
    .timer-counts { display: flex; gap: 18px; color: var(--muted); font-size: 0.9rem; }
    .timer-controls { display: flex; gap: 10px; }

    .confetti {
      position: fixed;
      top: -12px;
      width: 9px;
      height: 14px;
      border-radius: 2px;
      z-index: 50;
      animation: confetti-fall 2.6s linear forwards;
    }
    @keyframes confetti-fall {
      to { transform: translateY(105vh) rotate(540deg); opacity: 0.2; }
    }

    @media (max-width: 640px) {
      .overview { grid-template-columns: 1fr; justify-items: center; }
    }
  </style>
</head>
<body>
  <main class="app">
    <section class="card overview">
      <div>
        <div class="circular-progress">
          <svg viewBox="0 0 120 120" width="130" height="130">
            <circle class="ring-track" cx="60" cy="60" r="50" />
            <circle class="progress-circle" cx="60" cy="60" r="50" stroke-dashoffset="{{ARC_OFFSET}}" />
          </svg>
        </div>
        <div class="ring-caption">
          Today: <span id="today-progress">{{TODAY_PROGRESS}}</span>/<span id="daily-goal">{{DAILY_GOAL}}</span>
          (<span id="daily-pct">{{DAILY_PCT}}</span>%)
        </div>
      </div>
      <div>
        <h1>Study Progress</h1>
        <p class="subtitle">One page, one question at a time.</p>
        <div class="stat-grid" style="margin-top: 18px;">
          <div class="stat"><span class="label">Completed</span><span class="value" id="completed">{{COMPLETED}}</span></div>
          <div class="stat"><span class="label">Target</span><span class="value" id="total">{{TOTAL}}</span></div>
          <div class="stat"><span class="label">Done</span><span class="value" id="pct">{{PCT}}%</span></div>
        </div>
        <div class="bar-track"><div class="bar-fill" id="progress-bar" style="width: {{BAR_PCT}}%"></div></div>
        <div class="milestones">
        {{MILESTONES}}
        </div>
        <div class="footer-stats">
          <div class="stat"><span class="label">Remaining</span><span class="value" id="remaining">{{REMAINING}}</span></div>
          <div class="stat"><span class="label">Rate / day</span><span class="value" id="rate">{{RATE}}</span></div>
          <div class="stat"><span class="label">ETA</span><span class="value" id="eta">{{ETA}}</span></div>
        </div>
      </div>
    </section>

    <section class="card">
      <h2>Log progress</h2>
      <div class="forms">
        <form id="add-form" method="post" action="/add">
          <input type="hidden" name="last_page" id="last-page" value="{{LAST_PAGE}}" />
          <input type="hidden" name="question_number" id="question-number" value="{{NEXT_QUESTION}}" />
          <button type="submit">Done one more</button>
        </form>
        <form method="post" action="/set-total">
          <input type="number" name="total" min="0" placeholder="Target" aria-label="Target count" />
          <button class="secondary" type="submit">Set target</button>
        </form>
        <form method="post" action="/set-goal">
          <input type="number" name="daily_goal" min="0" placeholder="Per day" aria-label="Daily goal" />
          <button class="secondary" type="submit">Set daily goal</button>
        </form>
        <button class="danger" type="button" id="reset-btn">Reset</button>
      </div>
    </section>

    <section class="card" id="chart-section"{{CHART_HIDDEN}}>
      <div class="chart-header">
        <div>
          <h2>Progress over time</h2>
          <p class="subtitle">Cumulative completions, minutes since the first one.</p>
        </div>
        <div class="tabs" role="tablist">
          <button class="tab" type="button" id="full-btn" role="tab">Full</button>
          <button class="tab" type="button" id="current-btn" role="tab">Current</button>
        </div>
      </div>
      <svg id="chart" viewBox="0 0 640 280" role="img" aria-label="Progress chart"></svg>
    </section>

    <section class="card">
      <h2>Activity</h2>
      <div class="calendar" id="calendar">
      {{CALENDAR}}
      </div>
    </section>

    <section class="card">
      <h2>Focus timer</h2>
      <div class="timer-panel">
        <div>
          <div id="timer">{{TIMER_DISPLAY}}</div>
          <div id="phase">{{TIMER_PHASE}}</div>
        </div>
        <div class="timer-controls">
          <button type="button" id="start-btn">Start</button>
          <button type="button" class="secondary" id="pause-btn" disabled>Pause</button>
          <button type="button" class="secondary" id="reset-timer-btn">Reset</button>
        </div>
        <div class="timer-counts">
          <span>Work sessions: <span id="work-count">{{WORK_COUNT}}</span></span>
          <span>Breaks: <span id="break-count">{{BREAK_COUNT}}</span></span>
        </div>
      </div>
    </section>
  </main>

  <script>
    window.calendarData = {{CALENDAR_DATA}};

    const RING_ARC_LENGTH = 314.16;

    const byId = (id) => document.getElementById(id);
    const chartSection = byId('chart-section');
    const chartEl = byId('chart');
    const fullBtn = byId('full-btn');
    const currentBtn = byId('current-btn');

    let chartMode = localStorage.getItem('chartMode') || 'full';

    const syncModeButtons = () => {
      fullBtn.classList.toggle('active', chartMode === 'full');
      currentBtn.classList.toggle('active', chartMode === 'current');
    };

    // Clipping and y-axis policy come from the server's view model; this
    // renderer only draws what it is handed.
    const drawChart = (view) => {
      chartEl.innerHTML = '';
      if (!view.actual.length) {
        chartEl.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No data yet</text>';
        return;
      }

      const width = 640;
      const height = 280;
      const padX = 46;
      const padY = 34;
      const top = 22;

      let tMax = view.actual[view.actual.length - 1].t;
      if (view.projection) {
        tMax = Math.max(tMax, view.projection[1].t);
      }
      if (tMax <= 0) tMax = 1;
      const yMax = Math.max(view.y_max, 1);

      const x = (t) => padX + (t / tMax) * (width - padX * 2);
      const y = (v) => height - padY - (v / yMax) * (height - top - padY);

      let parts = [];
      const ticks = 4;
      for (let i = 0; i <= ticks; i += 1) {
        const value = (yMax * i) / ticks;
        const yPos = y(value);
        parts.push(`<line class="chart-grid-line" x1="${padX}" y1="${yPos}" x2="${width - padX}" y2="${yPos}" />`);
        parts.push(`<text class="chart-label" x="${padX - 8}" y="${yPos + 4}" text-anchor="end">${Math.round(value)}</text>`);
        const tValue = (tMax * i) / ticks;
        parts.push(`<text class="chart-label" x="${x(tValue)}" y="${height - padY + 18}" text-anchor="middle">${Math.round(tValue)} min</text>`);
      }

      const path = view.actual
        .map((p, i) => `${i === 0 ? 'M' : 'L'} ${x(p.t).toFixed(2)} ${y(p.y).toFixed(2)}`)
        .join(' ');
      parts.push(`<path class="chart-line" d="${path}" />`);
      parts.push(view.actual
        .map((p) => `<circle class="chart-point" cx="${x(p.t).toFixed(2)}" cy="${y(p.y).toFixed(2)}" r="3" />`)
        .join(''));

      if (view.projection) {
        const [from, to] = view.projection;
        parts.push(`<line class="chart-forecast" x1="${x(from.t).toFixed(2)}" y1="${y(from.y).toFixed(2)}" x2="${x(to.t).toFixed(2)}" y2="${y(to.y).toFixed(2)}" />`);
        if (view.eta_label) {
          parts.push(`<text class="chart-eta" x="${x(to.t).toFixed(2)}" y="${(y(to.y) - 8).toFixed(2)}" text-anchor="end">${view.eta_label}</text>`);
        }
      }

      chartEl.innerHTML = parts.join('');
    };

    // Fire-and-forget: a failed refresh is logged and the chart keeps its
    // previous view.
    const refreshChart = () => {
      if (!chartEl) return;
      fetch(`/chart-data?mode=${chartMode}`)
        .then((res) => {
          if (!res.ok) throw new Error(`chart-data ${res.status}`);
          return res.json();
        })
        .then((data) => drawChart(data.view))
        .catch((err) => console.error('chart refresh failed:', err));
    };

    const setMode = (mode) => {
      chartMode = mode;
      localStorage.setItem('chartMode', mode);
      syncModeButtons();
      refreshChart();
    };

    fullBtn.addEventListener('click', () => setMode('full'));
    currentBtn.addEventListener('click', () => setMode('current'));

    const paintCalendar = (cells) => {
      const calendarEl = byId('calendar');
      if (!calendarEl || !cells) return;
      const dayNames = ['Mon', 'Tue', 'Wed', 'Thu', 'Fri', 'Sat', 'Sun'];
      const nodes = [];

      const corner = document.createElement('div');
      corner.className = 'calendar-corner';
      nodes.push(corner);
      for (let week = 1; week <= 5; week += 1) {
        const label = document.createElement('div');
        label.className = 'calendar-label week-label';
        label.textContent = String(week);
        nodes.push(label);
      }

      for (let dayOfWeek = 0; dayOfWeek < 7; dayOfWeek += 1) {
        const dayLabel = document.createElement('div');
        dayLabel.className = 'calendar-label day-label';
        dayLabel.textContent = dayNames[dayOfWeek];
        nodes.push(dayLabel);
        for (let week = 0; week < 5; week += 1) {
          const cell = cells[week * 7 + dayOfWeek];
          const div = document.createElement('div');
          div.className = 'calendar-day';
          div.title = cell.date;
          if (cell.active) {
            div.classList.add('active');
            div.setAttribute('data-count', cell.level);
          }
          nodes.push(div);
        }
      }

      calendarEl.innerHTML = '';
      nodes.forEach((n) => calendarEl.appendChild(n));
    };

    const createConfetti = () => {
      const colors = ['#ff6b6b', '#4ecdc4', '#45b7d1', '#f9ca24', '#f0932b'];
      for (let i = 0; i < 30; i += 1) {
        const piece = document.createElement('div');
        piece.className = 'confetti';
        piece.style.left = Math.random() * 100 + 'vw';
        piece.style.animationDelay = Math.random() * 1.5 + 's';
        piece.style.backgroundColor = colors[Math.floor(Math.random() * colors.length)];
        document.body.appendChild(piece);
        setTimeout(() => piece.remove(), 3000);
      }
    };

    const syncMilestones = (achieved, fresh) => {
      document.querySelectorAll('.milestone-badge').forEach((badge) => {
        const id = parseInt(badge.dataset.milestone, 10);
        badge.classList.toggle('achieved', achieved.includes(id));
      });
      if (fresh && fresh.length > 0) {
        createConfetti();
      }
    };

    // Partial-update semantics: only regions named in the payload change.
    const applyUpdate = (u) => {
      if (u.today_progress != null) byId('today-progress').textContent = u.today_progress;
      if (u.daily_goal != null) byId('daily-goal').textContent = u.daily_goal;
      if (u.daily_pct != null) byId('daily-pct').textContent = u.daily_pct.toFixed(1);
      if (u.daily_arc_offset != null) {
        document.querySelector('.progress-circle').style.strokeDashoffset = u.daily_arc_offset;
      }
      if (u.completed != null) byId('completed').textContent = u.completed;
      if (u.total != null) byId('total').textContent = u.total;
      if (u.pct != null) {
        byId('pct').textContent = u.pct.toFixed(1) + '%';
        byId('progress-bar').style.width = Math.min(Math.max(u.pct, 0), 100) + '%';
      }
      if (u.remaining != null) byId('remaining').textContent = u.remaining;
      if (u.rate_per_day != null) byId('rate').textContent = u.rate_per_day.toFixed(2);
      if (u.eta_iso != null) byId('eta').textContent = new Date(u.eta_iso).toLocaleString();
      if (u.last_page != null) byId('last-page').value = u.last_page;
      if (u.next_question_number != null) byId('question-number').value = u.next_question_number;
      if (u.achieved_milestones != null) syncMilestones(u.achieved_milestones, u.new_milestones);
      if (u.calendar_data != null) window.calendarData = u.calendar_data;
      if (u.calendar_cells != null) paintCalendar(u.calendar_cells);
      if (u.completed != null && u.completed > 0 && chartSection.hidden) {
        chartSection.hidden = false;
        refreshChart();
      }
    };

    const addForm = byId('add-form');
    const onAddSubmit = async (event) => {
      event.preventDefault();
      try {
        const res = await fetch(addForm.action, {
          method: 'POST',
          headers: {
            'Accept': 'application/json',
            'Content-Type': 'application/x-www-form-urlencoded'
          },
          body: new URLSearchParams(new FormData(addForm))
        });
        if (!res.ok) throw new Error(`add failed: ${res.status}`);
        applyUpdate(await res.json());
        refreshChart();
      } catch (err) {
        // Degrade to a plain form post with a full reload.
        console.error(err);
        addForm.removeEventListener('submit', onAddSubmit);
        addForm.submit();
      }
    };
    addForm.addEventListener('submit', onAddSubmit);

    byId('reset-btn').addEventListener('click', () => {
      if (!confirm('Reset all progress? This cannot be undone.')) return;
      fetch('/reset', { method: 'POST' })
        .then(() => window.location.reload())
        .catch(() => alert('Reset failed'));
    });

    // Entrance animation for the daily ring.
    const ring = document.querySelector('.progress-circle');
    if (ring) {
      const initialOffset = ring.getAttribute('stroke-dashoffset');
      ring.style.strokeDashoffset = RING_ARC_LENGTH;
      setTimeout(() => {
        ring.style.strokeDashoffset = initialOffset;
      }, 100);
    }

    const startBtn = byId('start-btn');
    const pauseBtn = byId('pause-btn');

    const renderTimer = (snap) => {
      byId('timer').textContent = snap.display;
      byId('phase').textContent = snap.phase === 'work' ? 'Work' : 'Break';
      byId('work-count').textContent = snap.work_count;
      byId('break-count').textContent = snap.break_count;
      startBtn.disabled = snap.running;
      pauseBtn.disabled = !snap.running;
    };

    const timerAction = (path) => {
      fetch(path, { method: 'POST' })
        .then((res) => res.json())
        .then(renderTimer)
        .catch((err) => console.error('timer action failed:', err));
    };

    startBtn.addEventListener('click', () => timerAction('/api/timer/start'));
    pauseBtn.addEventListener('click', () => timerAction('/api/timer/pause'));
    byId('reset-timer-btn').addEventListener('click', () => timerAction('/api/timer/reset'));

    setInterval(() => {
      fetch('/api/timer')
        .then((res) => res.json())
        .then(renderTimer)
        .catch(() => {});
    }, 1000);

    syncModeButtons();
    refreshChart();
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample_data() -> AppData {
        let mut data = AppData {
            total: 10,
            events: vec![0, 60_000],
            ..AppData::default()
        };
        data.daily_progress.insert("2024-03-06".to_string(), 2);
        data
    }

    fn render(data: &AppData) -> String {
        let today = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        let grid = CalendarGrid::build(&data.daily_progress, today);
        let achieved: Vec<u32> = Vec::new();
        let timer = crate::timer::TimerState::new().snapshot();
        render_index(data, today, 120_000, &achieved, &grid, &timer)
    }

    #[test]
    fn rendered_page_fills_all_placeholders() {
        let html = render(&sample_data());
        assert!(!html.contains("{{"), "unreplaced placeholder left in page");
        assert!(html.contains(r#"<span class="value" id="completed">2</span>"#));
        assert!(html.contains("25:00"));
    }

    #[test]
    fn chart_section_hidden_until_first_completion() {
        let empty = AppData::default();
        let html = render(&empty);
        assert!(html.contains(r#"id="chart-section" hidden"#));

        let html = render(&sample_data());
        assert!(html.contains(r#"id="chart-section">"#));
    }

    #[test]
    fn calendar_renders_full_labeled_grid() {
        let html = render(&sample_data());
        assert_eq!(html.matches("class=\"calendar-day").count(), 35);
        assert!(html.contains(r#"title="2024-03-04""#)); // anchor Monday
        assert!(html.contains(r#"data-count="2" title="2024-03-06""#));
    }

    #[test]
    fn badges_carry_milestone_ids() {
        let data = sample_data();
        let today = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        let grid = CalendarGrid::build(&data.daily_progress, today);
        let timer = crate::timer::TimerState::new().snapshot();
        let html = render_index(&data, today, 120_000, &[25], &grid, &timer);
        assert!(html.contains(r#"class="milestone-badge achieved" data-milestone="25""#));
        assert!(html.contains(r#"class="milestone-badge" data-milestone="50""#));
    }

    #[test]
    fn inline_calendar_data_is_json() {
        let html = render(&sample_data());
        assert!(html.contains(r#"window.calendarData = [{"date":"2024-03-06","count":2}];"#));
    }

    #[test]
    fn eta_placeholder_shows_dash_without_estimate() {
        let mut data = sample_data();
        data.total = 2; // already done, no eta
        let html = render(&data);
        assert!(html.contains(r#"<span class="value" id="eta">—</span>"#));
    }

    #[test]
    fn empty_activity_map_serializes_to_empty_array() {
        let data = AppData::default();
        assert_eq!(calendar_data_json(&data), "[]");
    }
}
