use crate::models::{ChartPoint, ChartSnapshot};
use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Headroom above the last data point so the line never touches the frame.
const Y_HEADROOM: f64 = 2.0;

/// `Full` shows the whole journey including the forecast; `Current` zooms in
/// on recorded progress only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    #[default]
    Full,
    Current,
}

/// Mode-resolved render plan for a snapshot. The client draws exactly what
/// is here and adds nothing of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartView {
    pub mode: ChartMode,
    /// Actual progress series; empty means the chart draws no series.
    pub actual: Vec<ChartPoint>,
    /// Two-point dashed forecast segment, only ever present in full mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<[ChartPoint; 2]>,
    /// Suggested y-axis upper bound. Guarantees the data is never clipped
    /// and, in full mode, that the target stays visible.
    pub y_max: f64,
    /// Human-readable ETA shown at the projection's terminal point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta_label: Option<String>,
}

impl ChartView {
    pub fn build(snapshot: &ChartSnapshot, mode: ChartMode) -> Self {
        let actual = snapshot.points.clone();
        let last_y = actual.last().map(|p| p.y).unwrap_or(0.0);

        let projection = match (mode, snapshot.projection.as_ref()) {
            (ChartMode::Full, Some(p)) if !actual.is_empty() => Some([p.from, p.to]),
            _ => None,
        };

        let y_max = match mode {
            ChartMode::Full => (snapshot.total as f64).max(last_y + Y_HEADROOM),
            ChartMode::Current => last_y + Y_HEADROOM,
        };

        let eta_label = match (&projection, snapshot.eta.as_deref()) {
            (Some(_), Some(eta)) => format_eta(eta),
            _ => None,
        };

        Self {
            mode,
            actual,
            projection,
            y_max,
            eta_label,
        }
    }
}

fn format_eta(eta: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(eta)
        .ok()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Projection;

    fn snapshot(points: Vec<ChartPoint>, total: u64, with_projection: bool) -> ChartSnapshot {
        let projection = if with_projection {
            points.last().map(|&last| Projection {
                from: last,
                to: ChartPoint {
                    t: last.t + 100.0,
                    y: total as f64,
                },
            })
        } else {
            None
        };
        ChartSnapshot {
            points,
            total,
            rate_per_day: 1.0,
            projection,
            eta: with_projection.then(|| "2026-09-01T12:00:00+00:00".to_string()),
        }
    }

    fn points(ys: &[f64]) -> Vec<ChartPoint> {
        ys.iter()
            .enumerate()
            .map(|(i, &y)| ChartPoint { t: i as f64, y })
            .collect()
    }

    #[test]
    fn full_mode_y_max_covers_target_and_data() {
        // Target dominates.
        let view = ChartView::build(&snapshot(points(&[1.0, 3.0]), 10, true), ChartMode::Full);
        assert_eq!(view.y_max, 10.0);
        assert!(view.y_max >= 10.0 && view.y_max >= 3.0 + 2.0);

        // Data overshoots a small target.
        let view = ChartView::build(&snapshot(points(&[4.0, 8.0]), 2, true), ChartMode::Full);
        assert_eq!(view.y_max, 10.0);
    }

    #[test]
    fn current_mode_y_max_is_last_point_plus_headroom() {
        let view = ChartView::build(&snapshot(points(&[1.0, 3.0]), 50, true), ChartMode::Current);
        assert_eq!(view.y_max, 5.0);
    }

    #[test]
    fn current_mode_never_draws_projection() {
        let view = ChartView::build(&snapshot(points(&[1.0, 2.0]), 10, true), ChartMode::Current);
        assert!(view.projection.is_none());
        assert!(view.eta_label.is_none());
    }

    #[test]
    fn full_mode_draws_projection_when_present() {
        let view = ChartView::build(&snapshot(points(&[1.0, 2.0]), 10, true), ChartMode::Full);
        let segment = view.projection.expect("projection expected");
        assert_eq!(segment[0], ChartPoint { t: 1.0, y: 2.0 });
        assert_eq!(segment[1].y, 10.0);
        assert_eq!(view.eta_label.as_deref(), Some("2026-09-01 12:00"));
    }

    #[test]
    fn empty_points_draw_nothing() {
        let view = ChartView::build(&snapshot(points(&[]), 10, false), ChartMode::Full);
        assert!(view.actual.is_empty());
        assert!(view.projection.is_none());
        assert_eq!(view.y_max, 10.0);
    }

    #[test]
    fn mode_round_trips_through_query_strings() {
        assert_eq!(
            serde_json::from_str::<ChartMode>("\"current\"").unwrap(),
            ChartMode::Current
        );
        assert_eq!(serde_json::to_string(&ChartMode::Full).unwrap(), "\"full\"");
    }
}
