mod countdown;
mod cycle;
mod pattern;

use serde::{Deserialize, Serialize};

use crate::events::Event;

pub use countdown::{CountdownEngine, CountdownState};
pub use cycle::{PhaseCycleEngine, PhaseCycleState};
pub use pattern::{NextPhase, PatternDefinition, PhaseDurations, PhaseKind, PhaseSequence};

/// Coarse lifecycle position of an engine, derived from its counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    /// Not running, at the initial position.
    Idle,
    Running,
    /// Not running, somewhere mid-session.
    Paused,
    /// Countdown reached zero; needs `reset` before it can run again.
    Completed,
}

/// Contract shared by the engines: a countdown stepped by an external tick.
///
/// Every command returns the resulting snapshot. None of them can fail; a
/// command that does not apply in the current state is a no-op.
pub trait DrivenTimer {
    type Snapshot: Copy + std::fmt::Debug;

    fn start(&mut self) -> Self::Snapshot;
    fn pause(&mut self) -> Self::Snapshot;
    fn reset(&mut self) -> Self::Snapshot;
    /// Step by one tick. No-op unless running.
    fn advance(&mut self) -> Self::Snapshot;
    fn snapshot(&self) -> Self::Snapshot;
    fn status(&self) -> TimerStatus;

    /// Domain events implied by one `advance` that moved `prev` to `next`.
    fn tick_events(prev: &Self::Snapshot, next: &Self::Snapshot) -> Vec<Event>;
}
