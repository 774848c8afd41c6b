use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub const WORK_SECS: u32 = 25 * 60;
pub const BREAK_SECS: u32 = 5 * 60;

/// Two-phase work/break countdown. Lives only in memory; a server restart
/// starts it fresh, exactly like a page reload did before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    pub time_left: u32,
    pub work_phase: bool,
    pub running: bool,
    pub work_count: u32,
    pub break_count: u32,
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerState {
    pub fn new() -> Self {
        Self {
            time_left: WORK_SECS,
            work_phase: true,
            running: false,
            work_count: 0,
            break_count: 0,
        }
    }

    /// No-op when already running.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// No-op when already paused.
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Unconditionally restores the initial state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// One second of countdown. Reaching zero flips the phase, refills the
    /// clock for the other phase and credits the phase that just finished.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            if self.work_phase {
                self.work_count += 1;
                self.time_left = BREAK_SECS;
            } else {
                self.break_count += 1;
                self.time_left = WORK_SECS;
            }
            self.work_phase = !self.work_phase;
        }
    }

    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.time_left / 60, self.time_left % 60)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            time_left: self.time_left,
            display: self.display(),
            phase: if self.work_phase { "work" } else { "break" },
            running: self.running,
            work_count: self.work_count,
            break_count: self.break_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimerSnapshot {
    pub time_left: u32,
    pub display: String,
    pub phase: &'static str,
    pub running: bool,
    pub work_count: u32,
    pub break_count: u32,
}

/// Drives the shared timer at one tick per second. `tick` ignores paused
/// timers, so the task can run for the lifetime of the process.
pub fn spawn_tick_task(timer: Arc<Mutex<TimerState>>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            timer.lock().await.tick();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_work_phase_flips_to_break_exactly_once() {
        let mut timer = TimerState::new();
        timer.start();
        for _ in 0..1500 {
            timer.tick();
        }
        assert!(!timer.work_phase);
        assert_eq!(timer.work_count, 1);
        assert_eq!(timer.break_count, 0);
        assert_eq!(timer.time_left, BREAK_SECS);
    }

    #[test]
    fn break_phase_flips_back_to_work() {
        let mut timer = TimerState::new();
        timer.start();
        for _ in 0..(1500 + 300) {
            timer.tick();
        }
        assert!(timer.work_phase);
        assert_eq!(timer.work_count, 1);
        assert_eq!(timer.break_count, 1);
        assert_eq!(timer.time_left, WORK_SECS);
    }

    #[test]
    fn ticks_do_nothing_while_paused() {
        let mut timer = TimerState::new();
        timer.tick();
        assert_eq!(timer.time_left, WORK_SECS);

        timer.start();
        timer.tick();
        assert_eq!(timer.time_left, WORK_SECS - 1);

        timer.pause();
        timer.tick();
        assert_eq!(timer.time_left, WORK_SECS - 1);
    }

    #[test]
    fn reset_restores_initial_state_unconditionally() {
        let mut timer = TimerState::new();
        timer.start();
        for _ in 0..2000 {
            timer.tick();
        }
        timer.reset();
        assert_eq!(timer.time_left, 1500);
        assert!(timer.work_phase);
        assert!(!timer.running);
        assert_eq!(timer.work_count, 0);
        assert_eq!(timer.break_count, 0);
    }

    #[test]
    fn start_is_idempotent() {
        let mut timer = TimerState::new();
        timer.start();
        timer.tick();
        timer.start();
        assert_eq!(timer.time_left, WORK_SECS - 1);
        assert!(timer.running);
    }

    #[test]
    fn display_is_zero_padded() {
        let mut timer = TimerState::new();
        assert_eq!(timer.display(), "25:00");
        timer.start();
        timer.tick();
        assert_eq!(timer.display(), "24:59");
        timer.time_left = 65;
        assert_eq!(timer.display(), "01:05");
    }
}
