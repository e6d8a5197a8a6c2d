//! # Breathpace Core Library
//!
//! This library provides the core logic for Breathpace, a guided breathing
//! and meditation timer. The engines are pure state machines; the host (the
//! CLI binary, or any UI) owns the clock and calls `advance()` once per tick.
//!
//! ## Architecture
//!
//! - **Phase-cycle engine**: steps a breathing pattern's phases for a fixed
//!   number of cycles, then rewinds itself to idle
//! - **Countdown engine**: a single meditation countdown that completes once
//! - **Session**: fans engine snapshots and derived events out to observers
//! - **Catalog**: built-in patterns, presets, phase labels and ambient sounds
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`PhaseCycleEngine`]: Breathing state machine
//! - [`CountdownEngine`]: Meditation countdown
//! - [`Session`]: Observer wiring around either engine
//! - [`Config`]: Application configuration management

pub mod ambient;
pub mod catalog;
pub mod error;
pub mod events;
pub mod session;
pub mod storage;
pub mod timer;

pub use ambient::{AmbientCue, AmbientMixer, AmbientObserver};
pub use error::{ConfigError, CoreError, InvalidConfig};
pub use events::Event;
pub use session::{Observer, Outcome, Session};
pub use storage::Config;
pub use timer::{
    CountdownEngine, CountdownState, DrivenTimer, PatternDefinition, PhaseCycleEngine,
    PhaseCycleState, PhaseDurations, PhaseKind, TimerStatus,
};
