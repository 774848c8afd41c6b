use crate::calendar::CalendarGrid;
use crate::chart::{ChartMode, ChartView};
use crate::errors::AppError;
use crate::milestones;
use crate::models::{AddProgressForm, ChartSnapshot, SetGoalForm, SetTotalForm};
use crate::state::AppState;
use crate::stats;
use crate::storage::persist_data;
use crate::timer::TimerSnapshot;
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let data = state.data.lock().await;
    let timer = state.timer.lock().await.snapshot();
    let today = today();
    let pct = stats::completed_pct(data.completed(), data.total);
    let achieved = milestones::achieved_for(pct);
    let grid = CalendarGrid::build(&data.daily_progress, today);
    Html(render_index(&data, today, now_ms(), &achieved, &grid, &timer))
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    #[serde(default)]
    pub mode: Option<ChartMode>,
}

#[derive(Debug, Serialize)]
pub struct ChartDataResponse {
    #[serde(flatten)]
    pub snapshot: ChartSnapshot,
    pub view: ChartView,
}

pub async fn chart_data(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Json<ChartDataResponse> {
    let data = state.data.lock().await;
    let snapshot = stats::chart_snapshot(&data, now_ms());
    let view = ChartView::build(&snapshot, query.mode.unwrap_or_default());
    Json(ChartDataResponse { snapshot, view })
}

/// Records one completed item. With `Accept: application/json` the response
/// is a dashboard patch; plain form posts get the classic redirect so the
/// non-AJAX fallback still works.
pub async fn add_progress(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<AddProgressForm>,
) -> Result<Response, AppError> {
    let today = today();
    let now = now_ms();
    let mut data = state.data.lock().await;

    data.events.push(now);
    // The wall clock moving backwards must not break point ordering.
    data.events.sort_unstable();
    let today_count = data.daily_progress.entry(today.to_string()).or_insert(0);
    *today_count = today_count.saturating_add(1);
    if let Some(page) = form.last_page {
        data.last_page = page;
    }
    data.next_question_number = match form.question_number {
        Some(question) => question.saturating_add(1),
        None => data.next_question_number.saturating_add(1),
    };

    let pct = stats::completed_pct(data.completed(), data.total);
    let sync = milestones::sync(&mut data.achieved_milestones, pct);

    persist_data(&state.data_path, &data).await?;

    if wants_json(&headers) {
        let update = stats::build_dashboard_update(&data, today, now, &sync);
        Ok(Json(update).into_response())
    } else {
        Ok(Redirect::to("/").into_response())
    }
}

pub async fn set_total(
    State(state): State<AppState>,
    Form(form): Form<SetTotalForm>,
) -> Result<Redirect, AppError> {
    let mut data = state.data.lock().await;
    data.total = form.total.max(0) as u64;
    persist_data(&state.data_path, &data).await?;
    Ok(Redirect::to("/"))
}

pub async fn set_goal(
    State(state): State<AppState>,
    Form(form): Form<SetGoalForm>,
) -> Result<Redirect, AppError> {
    if form.daily_goal < 0 {
        return Err(AppError::bad_request("daily goal must not be negative"));
    }
    let mut data = state.data.lock().await;
    data.daily_goal = form.daily_goal as u64;
    persist_data(&state.data_path, &data).await?;
    Ok(Redirect::to("/"))
}

/// Clears the target, the recorded events and the resume cursor. The daily
/// goal and the activity history stay; the calendar keeps showing past work.
pub async fn reset(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let mut data = state.data.lock().await;
    data.total = 0;
    data.events.clear();
    data.last_page = 0;
    data.next_question_number = 1;
    milestones::sync(&mut data.achieved_milestones, 0.0);
    persist_data(&state.data_path, &data).await?;
    Ok(Redirect::to("/"))
}

pub async fn timer_status(State(state): State<AppState>) -> Json<TimerSnapshot> {
    Json(state.timer.lock().await.snapshot())
}

pub async fn timer_start(State(state): State<AppState>) -> Json<TimerSnapshot> {
    let mut timer = state.timer.lock().await;
    timer.start();
    Json(timer.snapshot())
}

pub async fn timer_pause(State(state): State<AppState>) -> Json<TimerSnapshot> {
    let mut timer = state.timer.lock().await;
    timer.pause();
    Json(timer.snapshot())
}

pub async fn timer_reset(State(state): State<AppState>) -> Json<TimerSnapshot> {
    let mut timer = state.timer.lock().await;
    timer.reset();
    Json(timer.snapshot())
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.contains("application/json"))
        .unwrap_or(false)
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn accept_header_switches_response_shape() {
        let mut headers = HeaderMap::new();
        assert!(!wants_json(&headers));

        headers.insert(header::ACCEPT, HeaderValue::from_static("text/html"));
        assert!(!wants_json(&headers));

        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/plain"),
        );
        assert!(wants_json(&headers));
    }
}
