use crate::calendar::CalendarGrid;
use crate::milestones::MilestoneSync;
use crate::models::{AppData, CalendarEntry, ChartPoint, ChartSnapshot, DashboardUpdate, Projection};
use chrono::{NaiveDate, TimeZone, Utc};

const MS_PER_MINUTE: f64 = 60_000.0;
const MS_PER_DAY: f64 = 86_400_000.0;

/// Rendered circumference of the daily-progress ring (2 * pi * r, r = 50).
/// The entrance animation and every later patch offset against this same
/// constant.
pub const RING_ARC_LENGTH: f64 = 314.16;

/// Stroke-dashoffset for the circular progress ring. Out-of-range
/// percentages clamp so the arc never over- or under-shoots.
pub fn ring_arc_offset(daily_pct: f64) -> f64 {
    RING_ARC_LENGTH - daily_pct.clamp(0.0, 100.0) / 100.0 * RING_ARC_LENGTH
}

/// Overall completion percentage, capped at 100.
pub fn completed_pct(completed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (completed as f64 / total as f64 * 100.0).min(100.0)
}

pub fn daily_pct(today_progress: u64, daily_goal: u64) -> f64 {
    if daily_goal == 0 {
        return 0.0;
    }
    today_progress as f64 / daily_goal as f64 * 100.0
}

/// Completion rate in items per day plus the estimated completion instant
/// in epoch milliseconds.
///
/// With two or more events the observed span is first..last; with a single
/// event it runs to `now_ms`. The span is floored at one minute to keep the
/// rate finite. No ETA when nothing remains or the rate is not positive.
pub fn rate_and_eta(total: u64, events: &[i64], now_ms: i64) -> (f64, Option<i64>) {
    let n = events.len() as u64;
    let Some(&first) = events.first() else {
        return (0.0, None);
    };

    let span_end = if events.len() >= 2 {
        *events.last().unwrap_or(&first)
    } else {
        now_ms
    };

    let span_ms = ((span_end - first) as f64).max(MS_PER_MINUTE);
    let rate_per_day = n as f64 / (span_ms / MS_PER_DAY);
    let rate_per_day = (rate_per_day * 100.0).round() / 100.0;

    let remaining = total.saturating_sub(n);
    if remaining == 0 || rate_per_day <= 0.0 {
        return (rate_per_day, None);
    }

    let days_remaining = remaining as f64 / rate_per_day;
    // Absurd targets push the estimate past the representable range; the
    // float-to-int cast saturates and the add must not overflow either.
    let eta_ms = now_ms.saturating_add((days_remaining * MS_PER_DAY) as i64);
    (rate_per_day, Some(eta_ms))
}

pub fn eta_iso(eta_ms: i64) -> Option<String> {
    Utc.timestamp_millis_opt(eta_ms)
        .single()
        .map(|dt| dt.to_rfc3339())
}

/// Builds the chart snapshot: a cumulative series over minutes elapsed since
/// the first event, plus a single straight projection segment from the last
/// point to `(eta, total)` when an estimate exists.
pub fn chart_snapshot(data: &AppData, now_ms: i64) -> ChartSnapshot {
    let first_ts = data.events.first().copied().unwrap_or(0);
    let points: Vec<ChartPoint> = data
        .events
        .iter()
        .enumerate()
        .map(|(i, &ts)| ChartPoint {
            t: (ts - first_ts) as f64 / MS_PER_MINUTE,
            y: (i + 1) as f64,
        })
        .collect();

    let (rate_per_day, eta_ms) = rate_and_eta(data.total, &data.events, now_ms);

    let projection = match (eta_ms, points.last()) {
        (Some(eta), Some(&last)) => Some(Projection {
            from: last,
            to: ChartPoint {
                t: (eta - first_ts) as f64 / MS_PER_MINUTE,
                y: data.total as f64,
            },
        }),
        _ => None,
    };

    ChartSnapshot {
        points,
        total: data.total,
        rate_per_day,
        projection,
        eta: eta_ms.and_then(eta_iso),
    }
}

/// Full dashboard patch for the current store state. Every region is
/// populated here; partial payloads arise only from serialization dropping
/// `None` fields.
pub fn build_dashboard_update(
    data: &AppData,
    today: NaiveDate,
    now_ms: i64,
    sync: &MilestoneSync,
) -> DashboardUpdate {
    let completed = data.completed();
    let today_progress = data
        .daily_progress
        .get(&today.to_string())
        .copied()
        .unwrap_or(0);
    let daily_pct = daily_pct(today_progress, data.daily_goal);
    let pct = completed_pct(completed, data.total);
    let (rate_per_day, eta_ms) = rate_and_eta(data.total, &data.events, now_ms);
    let grid = CalendarGrid::build(&data.daily_progress, today);

    DashboardUpdate {
        today_progress: Some(today_progress),
        daily_goal: Some(data.daily_goal),
        daily_pct: Some(daily_pct),
        daily_arc_offset: Some(ring_arc_offset(daily_pct)),
        completed: Some(completed),
        total: Some(data.total),
        pct: Some(pct),
        remaining: Some(data.total.saturating_sub(completed)),
        rate_per_day: Some(rate_per_day),
        eta_iso: eta_ms.and_then(eta_iso),
        last_page: Some(data.last_page),
        next_question_number: Some(data.next_question_number),
        achieved_milestones: Some(sync.achieved.clone()),
        new_milestones: Some(sync.newly_achieved.clone()),
        calendar_data: Some(
            data.daily_progress
                .iter()
                .map(|(date, &count)| CalendarEntry {
                    date: date.clone(),
                    count,
                })
                .collect(),
        ),
        calendar_cells: Some(grid.cells),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_with(total: u64, events: Vec<i64>) -> AppData {
        AppData {
            total,
            events,
            ..AppData::default()
        }
    }

    #[test]
    fn rate_is_zero_without_events() {
        let (rate, eta) = rate_and_eta(10, &[], 1_000_000);
        assert_eq!(rate, 0.0);
        assert!(eta.is_none());
    }

    #[test]
    fn single_event_measures_span_to_now() {
        // One event, one day ago: rate should be ~1/day.
        let now = 86_400_000 * 10;
        let (rate, eta) = rate_and_eta(5, &[now - 86_400_000], now);
        assert!((rate - 1.0).abs() < 0.01);
        let eta = eta.expect("eta expected");
        // 4 remaining at 1/day.
        assert!((eta - (now + 4 * 86_400_000)).abs() < 86_400_000 / 10);
    }

    #[test]
    fn no_eta_when_target_reached() {
        let now = 86_400_000 * 3;
        let events = vec![0, 86_400_000];
        let (rate, eta) = rate_and_eta(2, &events, now);
        assert!(rate > 0.0);
        assert!(eta.is_none());
    }

    #[test]
    fn absurd_target_saturates_instead_of_overflowing() {
        let (rate, eta) = rate_and_eta(i64::MAX as u64, &[0], 60_000);
        assert!(rate > 0.0);
        assert_eq!(eta, Some(i64::MAX));

        // Snapshot building over the same data stays panic-free; the ETA is
        // beyond representable time, so no ISO string is emitted.
        let data = data_with(i64::MAX as u64, vec![0]);
        let snapshot = chart_snapshot(&data, 60_000);
        assert!(snapshot.projection.is_some());
        assert!(snapshot.eta.is_none());
    }

    #[test]
    fn span_floor_keeps_rate_finite() {
        // Two events at the same millisecond: span floors at one minute.
        let (rate, _) = rate_and_eta(100, &[5_000, 5_000], 10_000);
        assert!(rate.is_finite());
        assert!(rate > 0.0);
    }

    #[test]
    fn snapshot_points_are_cumulative_minutes() {
        let data = data_with(10, vec![0, 60_000, 180_000]);
        let snapshot = chart_snapshot(&data, 200_000);
        assert_eq!(snapshot.points.len(), 3);
        assert_eq!(snapshot.points[0], ChartPoint { t: 0.0, y: 1.0 });
        assert_eq!(snapshot.points[1], ChartPoint { t: 1.0, y: 2.0 });
        assert_eq!(snapshot.points[2], ChartPoint { t: 3.0, y: 3.0 });
        assert!(snapshot.points.windows(2).all(|w| w[0].t <= w[1].t));
    }

    #[test]
    fn projection_runs_from_last_point_to_total() {
        let data = data_with(10, vec![0, 86_400_000]);
        let snapshot = chart_snapshot(&data, 86_400_000 * 2);
        let projection = snapshot.projection.expect("projection expected");
        assert_eq!(projection.from, *snapshot.points.last().unwrap());
        assert_eq!(projection.to.y, 10.0);
        assert!(projection.to.t > projection.from.t);
        assert!(snapshot.eta.is_some());
    }

    #[test]
    fn no_projection_without_events() {
        let data = data_with(10, vec![]);
        let snapshot = chart_snapshot(&data, 1_000);
        assert!(snapshot.points.is_empty());
        assert!(snapshot.projection.is_none());
        assert!(snapshot.eta.is_none());
    }

    #[test]
    fn arc_offset_halves_at_fifty_pct() {
        assert!((ring_arc_offset(50.0) - RING_ARC_LENGTH / 2.0).abs() < 1e-9);
    }

    #[test]
    fn arc_offset_clamps_out_of_range() {
        assert_eq!(ring_arc_offset(150.0), ring_arc_offset(100.0));
        assert_eq!(ring_arc_offset(150.0), 0.0);
        assert_eq!(ring_arc_offset(-20.0), ring_arc_offset(0.0));
    }

    #[test]
    fn completed_pct_caps_at_hundred() {
        assert_eq!(completed_pct(15, 10), 100.0);
        assert_eq!(completed_pct(5, 10), 50.0);
        assert_eq!(completed_pct(5, 0), 0.0);
    }
}
