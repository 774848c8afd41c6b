use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Persisted progress store. Missing fields default on load, so older data
/// files keep working.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppData {
    pub total: u64,
    /// Millisecond UTC timestamps of each completed item, kept sorted.
    pub events: Vec<i64>,
    pub daily_goal: u64,
    /// ISO date -> items completed that day.
    pub daily_progress: BTreeMap<String, u64>,
    /// Authoritative record of milestones already celebrated.
    pub achieved_milestones: BTreeSet<u32>,
    pub last_page: u64,
    pub next_question_number: u64,
}

impl Default for AppData {
    fn default() -> Self {
        Self {
            total: 0,
            events: Vec::new(),
            daily_goal: 10,
            daily_progress: BTreeMap::new(),
            achieved_milestones: BTreeSet::new(),
            last_page: 0,
            next_question_number: 1,
        }
    }
}

impl AppData {
    pub fn completed(&self) -> u64 {
        self.events.len() as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Minutes elapsed since the first recorded event.
    pub t: f64,
    /// Cumulative completed count at that moment.
    pub y: f64,
}

/// Straight forecast segment from the latest known point to the hypothesized
/// completion point at `total`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub from: ChartPoint,
    pub to: ChartPoint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub points: Vec<ChartPoint>,
    pub total: u64,
    pub rate_per_day: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
    /// ISO-8601 completion estimate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub date: String,
    pub count: u64,
}

/// Patch payload returned by the add-progress endpoint. Every field is
/// optional on the wire; the client applies only the regions that are
/// present and leaves the rest of the page untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub today_progress: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_goal: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_arc_offset: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_per_day: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta_iso: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achieved_milestones: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_milestones: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_data: Option<Vec<CalendarEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_cells: Option<Vec<crate::calendar::CalendarCell>>,
}

#[derive(Debug, Deserialize)]
pub struct AddProgressForm {
    #[serde(default)]
    pub last_page: Option<u64>,
    #[serde(default)]
    pub question_number: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct SetTotalForm {
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub struct SetGoalForm {
    pub daily_goal: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_update_skips_absent_fields() {
        let update = DashboardUpdate {
            completed: Some(5),
            total: Some(10),
            ..DashboardUpdate::default()
        };

        let value = serde_json::to_value(&update).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["completed"], 5);
        assert_eq!(object["total"], 10);
        assert!(!object.contains_key("calendar_data"));
        assert!(!object.contains_key("eta_iso"));
    }

    #[test]
    fn app_data_defaults_match_fresh_store() {
        let data: AppData = serde_json::from_str("{}").unwrap();
        assert_eq!(data.total, 0);
        assert_eq!(data.daily_goal, 10);
        assert_eq!(data.next_question_number, 1);
        assert!(data.events.is_empty());
    }
}
