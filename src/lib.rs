pub mod app;
pub mod calendar;
pub mod chart;
pub mod errors;
pub mod handlers;
pub mod milestones;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod timer;
pub mod ui;

pub use app::router;
pub use state::AppState;
pub use storage::{load_data, resolve_data_path};
pub use timer::spawn_tick_task;
