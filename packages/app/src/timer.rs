//! # Countdown timer
//!
//! A pure state machine: callers pass the wall-clock `now` into every
//! transition and drive [`Timer::tick`] once per second while running.
//!
//! ```text
//! Idle --start--> Running --pause--> Paused --start--> Running
//!   ^                |                  |
//!   +---completion---+-------reset------+
//! ```
//!
//! The countdown itself is tick based, but the recorded duration is wall-clock
//! based: running windows are summed (`active_ms` plus the open window since
//! `resumed_at`) and rounded to whole minutes on completion. Throttled ticks
//! therefore make the recorded duration longer than the configured one.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use store::NewStudySession;

pub const DEFAULT_MINUTES: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
}

/// A finished countdown, ready to be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub finished_at: DateTime<Utc>,
    pub minutes: i32,
}

impl Completion {
    pub fn into_session(self, work_type_id: impl Into<String>) -> NewStudySession {
        NewStudySession {
            date: self.finished_at,
            duration: self.minutes,
            work_type_id: work_type_id.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Timer {
    minutes: u32,
    remaining: u32,
    status: TimerStatus,
    /// Closed running windows.
    active_ms: i64,
    /// Start of the open running window.
    resumed_at: Option<DateTime<Utc>>,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(DEFAULT_MINUTES)
    }
}

impl Timer {
    pub fn new(minutes: u32) -> Self {
        let minutes = minutes.max(1);
        Self {
            minutes,
            remaining: seconds_in(minutes),
            status: TimerStatus::Idle,
            active_ms: 0,
            resumed_at: None,
        }
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining
    }

    /// `MM:SS` of the remaining time.
    pub fn display(&self) -> String {
        format_clock(self.remaining)
    }

    /// Change the configured length. Only takes effect while idle.
    pub fn set_minutes(&mut self, minutes: u32) -> bool {
        if self.status != TimerStatus::Idle {
            return false;
        }
        *self = Self::new(minutes);
        true
    }

    pub fn start(&mut self, now: DateTime<Utc>) {
        match self.status {
            TimerStatus::Idle => {
                self.remaining = seconds_in(self.minutes);
                self.active_ms = 0;
                self.resumed_at = Some(now);
                self.status = TimerStatus::Running;
            }
            TimerStatus::Paused => {
                self.resumed_at = Some(now);
                self.status = TimerStatus::Running;
            }
            TimerStatus::Running => {}
        }
    }

    pub fn pause(&mut self, now: DateTime<Utc>) {
        if self.status != TimerStatus::Running {
            return;
        }
        self.close_window(now);
        self.status = TimerStatus::Paused;
    }

    /// Back to idle with the configured length; in-progress time is discarded.
    pub fn reset(&mut self) {
        *self = Self::new(self.minutes);
    }

    /// One second elapsed. Returns the completion when the counter reaches zero.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Completion> {
        if self.status != TimerStatus::Running {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return None;
        }

        self.close_window(now);
        let completion = Completion {
            finished_at: now,
            minutes: round_minutes(self.active_ms),
        };
        self.reset();
        Some(completion)
    }

    /// Wall-clock running time so far.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        let open = match (self.status, self.resumed_at) {
            (TimerStatus::Running, Some(resumed_at)) => {
                (now - resumed_at).num_milliseconds().max(0)
            }
            _ => 0,
        };
        Duration::milliseconds(self.active_ms + open)
    }

    fn close_window(&mut self, now: DateTime<Utc>) {
        if let Some(resumed_at) = self.resumed_at.take() {
            self.active_ms += (now - resumed_at).num_milliseconds().max(0);
        }
    }
}

fn seconds_in(minutes: u32) -> u32 {
    minutes.saturating_mul(60)
}

fn round_minutes(ms: i64) -> i32 {
    ((ms as f64) / 60_000.0).round() as i32
}

pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        "2024-03-01T09:00:00Z".parse().unwrap()
    }

    fn secs(n: i64) -> Duration {
        Duration::seconds(n)
    }

    /// Tick once per second of wall clock, starting one second after `from`.
    fn run(timer: &mut Timer, from: DateTime<Utc>, seconds: i64) -> Option<Completion> {
        let mut done = None;
        for i in 1..=seconds {
            if let Some(c) = timer.tick(from + secs(i)) {
                done = Some(c);
            }
        }
        done
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(3600), "60:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(0), "00:00");
    }

    #[test]
    fn test_full_run_records_configured_minutes() {
        let mut timer = Timer::new(25);
        timer.start(t0());
        assert_eq!(timer.display(), "25:00");

        let done = run(&mut timer, t0(), 25 * 60).unwrap();
        assert_eq!(done.minutes, 25);
        assert_eq!(done.finished_at, t0() + secs(1500));
        assert_eq!(timer.status(), TimerStatus::Idle);
        assert_eq!(timer.remaining_seconds(), 1500);
    }

    #[test]
    fn test_pause_and_resume_accumulate_running_time() {
        let mut timer = Timer::new(60);
        timer.start(t0());
        assert!(run(&mut timer, t0(), 3000).is_none());
        timer.pause(t0() + secs(3000));
        assert_eq!(timer.status(), TimerStatus::Paused);
        assert_eq!(timer.remaining_seconds(), 600);

        // Ticks while paused do nothing.
        assert!(timer.tick(t0() + secs(3500)).is_none());
        assert_eq!(timer.remaining_seconds(), 600);

        let resumed = t0() + secs(5000);
        timer.start(resumed);
        let done = run(&mut timer, resumed, 600).unwrap();
        assert_eq!(done.minutes, 60);
    }

    #[test]
    fn test_reset_discards_progress() {
        let mut timer = Timer::new(60);
        timer.start(t0());
        run(&mut timer, t0(), 120);
        timer.reset();
        assert_eq!(timer.status(), TimerStatus::Idle);
        assert_eq!(timer.remaining_seconds(), 3600);
        assert_eq!(timer.elapsed(t0() + secs(200)), Duration::zero());
    }

    #[test]
    fn test_throttled_ticks_stretch_the_recorded_duration() {
        let mut timer = Timer::new(1);
        timer.start(t0());
        // Each tick arrives two seconds apart.
        let mut done = None;
        for i in 1..=60 {
            done = timer.tick(t0() + secs(2 * i));
        }
        assert_eq!(done.unwrap().minutes, 2);
    }

    #[test]
    fn test_minutes_only_change_while_idle() {
        let mut timer = Timer::new(60);
        assert!(timer.set_minutes(45));
        assert_eq!(timer.remaining_seconds(), 2700);
        timer.start(t0());
        assert!(!timer.set_minutes(10));
        assert_eq!(timer.minutes(), 45);
    }

    #[test]
    fn test_huge_length_saturates() {
        let mut timer = Timer::new(u32::MAX);
        assert_eq!(timer.remaining_seconds(), u32::MAX);
        timer.start(t0());
        assert_eq!(timer.remaining_seconds(), u32::MAX);
        assert!(timer.tick(t0() + secs(1)).is_none());

        let mut timer = Timer::default();
        assert!(timer.set_minutes(u32::MAX));
        assert_eq!(timer.minutes(), u32::MAX);
    }

    #[test]
    fn test_completion_becomes_a_session() {
        let session = Completion {
            finished_at: t0(),
            minutes: 30,
        }
        .into_session("wt1");
        assert_eq!(session.duration, 30);
        assert_eq!(session.work_type_id, "wt1");
    }
}
