use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const WEEKS: usize = 5;
pub const GRID_DAYS: usize = WEEKS * 7;

/// Intensity levels cap here; anything busier renders the same shade.
pub const MAX_LEVEL: u64 = 5;

pub const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: String,
    pub count: u64,
    /// Presentation shade, `min(count, 5)`. Does not decide `active`.
    pub level: u8,
    pub active: bool,
}

/// Fixed 7x5 activity grid. The anchor is the Monday on or before the
/// earliest recorded activity date, or the Monday of `today` when nothing
/// has been recorded yet. All date arithmetic is calendar-day based, so no
/// timezone can shift a cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarGrid {
    pub anchor: NaiveDate,
    pub cells: Vec<CalendarCell>,
}

impl CalendarGrid {
    pub fn build(activity: &BTreeMap<String, u64>, today: NaiveDate) -> Self {
        let earliest = activity
            .keys()
            .filter_map(|key| NaiveDate::parse_from_str(key, "%Y-%m-%d").ok())
            .min();
        let anchor = monday_on_or_before(earliest.unwrap_or(today));

        let cells = (0..GRID_DAYS as i64)
            .map(|offset| {
                let date = anchor + Duration::days(offset);
                let key = date.to_string();
                let count = activity.get(&key).copied().unwrap_or(0);
                CalendarCell {
                    date: key,
                    count,
                    level: count.min(MAX_LEVEL) as u8,
                    active: count > 0,
                }
            })
            .collect();

        Self { anchor, cells }
    }

    /// Cell for a given day-of-week row (0 = Monday) and week column.
    pub fn cell(&self, day_of_week: usize, week: usize) -> &CalendarCell {
        &self.cells[week * 7 + day_of_week]
    }
}

fn monday_on_or_before(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}
