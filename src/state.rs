use crate::models::AppData;
use crate::timer::TimerState;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    /// Interval timer, deliberately not persisted.
    pub timer: Arc<Mutex<TimerState>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            timer: Arc::new(Mutex::new(TimerState::new())),
        }
    }
}
