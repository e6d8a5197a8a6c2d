use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::PhaseKind;

/// Notable transitions of a session.
/// Observers receive these alongside every snapshot; most ticks carry none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        at: DateTime<Utc>,
    },
    TimerPaused {
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// A new breathing phase began (including the first phase of a new cycle).
    PhaseStarted {
        phase: PhaseKind,
        duration_secs: u32,
        cycle_index: u32,
        at: DateTime<Utc>,
    },
    CycleCompleted {
        cycle_index: u32,
        total_cycles: u32,
        at: DateTime<Utc>,
    },
    /// Final cycle done; the engine is idle again on its first phase.
    SessionFinished {
        total_cycles: u32,
        at: DateTime<Utc>,
    },
    CountdownCompleted {
        total_seconds: u32,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Whether this event ends the session it belongs to.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Event::SessionFinished { .. } | Event::CountdownCompleted { .. }
        )
    }
}
