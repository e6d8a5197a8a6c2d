//! Single-duration countdown used for meditation sessions.
//!
//! Completion fires exactly once, on the tick that reaches zero. A completed
//! countdown refuses to start again until it is reset or reconfigured.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{DrivenTimer, TimerStatus};
use crate::error::InvalidConfig;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownState {
    pub seconds_remaining: u32,
    pub total_seconds: u32,
    pub running: bool,
    pub completed: bool,
}

impl CountdownState {
    /// 0.0 .. 1.0 elapsed share of the session.
    pub fn progress_fraction(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        f64::from(self.total_seconds - self.seconds_remaining) / f64::from(self.total_seconds)
    }
}

#[derive(Debug, Clone)]
pub struct CountdownEngine {
    total_secs: u32,
    remaining_secs: u32,
    running: bool,
    completed: bool,
}

impl CountdownEngine {
    pub fn new(total_seconds: u32) -> Result<Self, InvalidConfig> {
        if total_seconds < 1 {
            return Err(InvalidConfig::ZeroDuration);
        }
        Ok(Self {
            total_secs: total_seconds,
            remaining_secs: total_seconds,
            running: false,
            completed: false,
        })
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_secs
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn configure(&mut self, total_seconds: u32) -> Result<CountdownState, InvalidConfig> {
        if total_seconds < 1 {
            return Err(InvalidConfig::ZeroDuration);
        }
        debug!(total_seconds, "countdown configured");
        self.total_secs = total_seconds;
        Ok(self.reset())
    }

    pub fn start(&mut self) -> CountdownState {
        if !self.completed {
            self.running = true;
        }
        self.snapshot()
    }

    pub fn pause(&mut self) -> CountdownState {
        self.running = false;
        self.snapshot()
    }

    pub fn reset(&mut self) -> CountdownState {
        self.remaining_secs = self.total_secs;
        self.completed = false;
        self.running = false;
        self.snapshot()
    }

    pub fn advance(&mut self) -> CountdownState {
        if self.running && self.remaining_secs > 0 {
            self.remaining_secs -= 1;
            if self.remaining_secs == 0 {
                self.running = false;
                self.completed = true;
                debug!(total_seconds = self.total_secs, "countdown completed");
            }
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> CountdownState {
        CountdownState {
            seconds_remaining: self.remaining_secs,
            total_seconds: self.total_secs,
            running: self.running,
            completed: self.completed,
        }
    }

    pub fn status(&self) -> TimerStatus {
        if self.completed {
            TimerStatus::Completed
        } else if self.running {
            TimerStatus::Running
        } else if self.remaining_secs == self.total_secs {
            TimerStatus::Idle
        } else {
            TimerStatus::Paused
        }
    }
}

impl DrivenTimer for CountdownEngine {
    type Snapshot = CountdownState;

    fn start(&mut self) -> CountdownState {
        CountdownEngine::start(self)
    }

    fn pause(&mut self) -> CountdownState {
        CountdownEngine::pause(self)
    }

    fn reset(&mut self) -> CountdownState {
        CountdownEngine::reset(self)
    }

    fn advance(&mut self) -> CountdownState {
        CountdownEngine::advance(self)
    }

    fn snapshot(&self) -> CountdownState {
        CountdownEngine::snapshot(self)
    }

    fn status(&self) -> TimerStatus {
        CountdownEngine::status(self)
    }

    fn tick_events(prev: &CountdownState, next: &CountdownState) -> Vec<Event> {
        if !prev.completed && next.completed {
            vec![Event::CountdownCompleted {
                total_seconds: next.total_seconds,
                at: Utc::now(),
            }]
        } else {
            Vec::new()
        }
    }
}
