//! Phase-cycling engine.
//!
//! Drives a pattern's phase sequence for a fixed number of cycles. The engine
//! has no clock of its own: the host calls `advance()` once per tick (one
//! second) and renders from the returned snapshot.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//! Running -> Idle   (last cycle finished, counters rewound)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = PhaseCycleEngine::new(catalog::box_breathing(), 5)?;
//! engine.start();
//! // Once per second:
//! let snap = engine.advance();
//! ```
//!
//! Lap detection follows one rule: a cycle is counted when the sequence wraps
//! back to its first phase from a different phase. A single-phase sequence
//! counts every expiry as a lap. Sequences are always ordered
//! inhale/hold1/exhale/hold2, so the rule cannot under- or over-count today;
//! it would need revisiting if patterns ever allowed arbitrary orderings.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::pattern::{PatternDefinition, PhaseKind, PhaseSequence};
use super::{DrivenTimer, TimerStatus};
use crate::error::InvalidConfig;
use crate::events::Event;

/// Point-in-time view of a [`PhaseCycleEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCycleState {
    pub current_phase: PhaseKind,
    pub seconds_remaining_in_phase: u32,
    /// Configured duration of `current_phase`.
    pub phase_total_seconds: u32,
    /// 1-based.
    pub cycle_index: u32,
    pub total_cycles: u32,
    pub running: bool,
}

impl PhaseCycleState {
    /// 0.0 .. 1.0 progress within the current phase.
    pub fn phase_progress(&self) -> f64 {
        if self.phase_total_seconds == 0 {
            return 0.0;
        }
        1.0 - (self.seconds_remaining_in_phase as f64 / self.phase_total_seconds as f64)
    }
}

/// Stateful breathing-session engine.
#[derive(Debug, Clone)]
pub struct PhaseCycleEngine {
    pattern: PatternDefinition,
    sequence: PhaseSequence,
    total_cycles: u32,
    phase_index: usize,
    remaining_secs: u32,
    cycle_index: u32,
    running: bool,
}

impl PhaseCycleEngine {
    /// Create an idle engine on the first phase of `pattern`.
    pub fn new(pattern: PatternDefinition, total_cycles: u32) -> Result<Self, InvalidConfig> {
        let sequence = Self::prepare(&pattern, total_cycles)?;
        let (_, first_secs) = sequence.first();
        Ok(Self {
            pattern,
            sequence,
            total_cycles,
            phase_index: 0,
            remaining_secs: first_secs,
            cycle_index: 1,
            running: false,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn pattern(&self) -> &PatternDefinition {
        &self.pattern
    }

    pub fn sequence(&self) -> &PhaseSequence {
        &self.sequence
    }

    pub fn total_cycles(&self) -> u32 {
        self.total_cycles
    }

    /// Ticks left until the session ends, counting the current one.
    pub fn remaining_session_secs(&self) -> u64 {
        let later_phases: u64 = (self.phase_index + 1..self.sequence.len())
            .filter_map(|i| self.sequence.get(i))
            .map(|(_, d)| u64::from(d))
            .sum();
        let later_cycles = u64::from(self.total_cycles - self.cycle_index);
        u64::from(self.remaining_secs) + later_phases + later_cycles * self.sequence.total_seconds()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Replace pattern and cycle target, then rewind to idle.
    ///
    /// On error the engine is left untouched.
    pub fn configure(
        &mut self,
        pattern: PatternDefinition,
        total_cycles: u32,
    ) -> Result<PhaseCycleState, InvalidConfig> {
        let sequence = Self::prepare(&pattern, total_cycles)?;
        debug!(pattern = %pattern.id, total_cycles, "phase engine configured");
        self.pattern = pattern;
        self.sequence = sequence;
        self.total_cycles = total_cycles;
        self.rewind();
        Ok(self.snapshot())
    }

    pub fn start(&mut self) -> PhaseCycleState {
        self.running = true;
        self.snapshot()
    }

    pub fn pause(&mut self) -> PhaseCycleState {
        self.running = false;
        self.snapshot()
    }

    pub fn reset(&mut self) -> PhaseCycleState {
        self.rewind();
        self.snapshot()
    }

    pub fn advance(&mut self) -> PhaseCycleState {
        if !self.running {
            return self.snapshot();
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.finish_phase();
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> PhaseCycleState {
        let (current_phase, phase_total_seconds) = self
            .sequence
            .get(self.phase_index)
            .unwrap_or_else(|| self.sequence.first());
        PhaseCycleState {
            current_phase,
            seconds_remaining_in_phase: self.remaining_secs,
            phase_total_seconds,
            cycle_index: self.cycle_index,
            total_cycles: self.total_cycles,
            running: self.running,
        }
    }

    pub fn status(&self) -> TimerStatus {
        if self.running {
            TimerStatus::Running
        } else if self.at_start() {
            TimerStatus::Idle
        } else {
            TimerStatus::Paused
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn prepare(
        pattern: &PatternDefinition,
        total_cycles: u32,
    ) -> Result<PhaseSequence, InvalidConfig> {
        if total_cycles < 1 {
            return Err(InvalidConfig::ZeroCycles);
        }
        pattern.validate()?;
        PhaseSequence::from_pattern(pattern)
    }

    fn at_start(&self) -> bool {
        self.phase_index == 0
            && self.cycle_index == 1
            && self.remaining_secs == self.sequence.first().1
    }

    fn rewind(&mut self) {
        self.running = false;
        self.phase_index = 0;
        self.cycle_index = 1;
        self.remaining_secs = self.sequence.first().1;
    }

    fn finish_phase(&mut self) {
        let next = self.sequence.next_after(self.phase_index);
        if next.lap_completed {
            if self.cycle_index >= self.total_cycles {
                debug!(pattern = %self.pattern.id, cycles = self.total_cycles, "session finished");
                self.rewind();
                return;
            }
            self.cycle_index += 1;
            debug!(cycle = self.cycle_index, total = self.total_cycles, "cycle started");
        }
        self.phase_index = next.index;
        self.remaining_secs = next.duration_secs;
    }
}

impl DrivenTimer for PhaseCycleEngine {
    type Snapshot = PhaseCycleState;

    fn start(&mut self) -> PhaseCycleState {
        PhaseCycleEngine::start(self)
    }

    fn pause(&mut self) -> PhaseCycleState {
        PhaseCycleEngine::pause(self)
    }

    fn reset(&mut self) -> PhaseCycleState {
        PhaseCycleEngine::reset(self)
    }

    fn advance(&mut self) -> PhaseCycleState {
        PhaseCycleEngine::advance(self)
    }

    fn snapshot(&self) -> PhaseCycleState {
        PhaseCycleEngine::snapshot(self)
    }

    fn status(&self) -> TimerStatus {
        PhaseCycleEngine::status(self)
    }

    fn tick_events(prev: &PhaseCycleState, next: &PhaseCycleState) -> Vec<Event> {
        let at = Utc::now();
        if prev.running && !next.running {
            return vec![
                Event::CycleCompleted {
                    cycle_index: prev.cycle_index,
                    total_cycles: prev.total_cycles,
                    at,
                },
                Event::SessionFinished {
                    total_cycles: prev.total_cycles,
                    at,
                },
            ];
        }
        let mut events = Vec::new();
        if next.cycle_index > prev.cycle_index {
            events.push(Event::CycleCompleted {
                cycle_index: prev.cycle_index,
                total_cycles: prev.total_cycles,
                at,
            });
        }
        if next.current_phase != prev.current_phase || next.cycle_index != prev.cycle_index {
            events.push(Event::PhaseStarted {
                phase: next.current_phase,
                duration_secs: next.phase_total_seconds,
                cycle_index: next.cycle_index,
                at,
            });
        }
        events
    }
}
