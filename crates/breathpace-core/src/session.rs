//! Observer wiring around an engine.
//!
//! A [`Session`] owns one engine and fans every resulting snapshot out to its
//! subscribers together with the events the command produced. The host keeps
//! the tick source and calls [`Session::tick`] once per interval.

use chrono::Utc;
use tracing::{debug, info};

use crate::events::Event;
use crate::timer::{DrivenTimer, TimerStatus};

/// Receives a read-only copy of the engine state after every command.
pub trait Observer<S> {
    fn on_snapshot(&mut self, snapshot: &S, events: &[Event]);
}

impl<S, F> Observer<S> for F
where
    F: FnMut(&S, &[Event]),
{
    fn on_snapshot(&mut self, snapshot: &S, events: &[Event]) {
        self(snapshot, events)
    }
}

/// What a single command produced.
#[derive(Debug, Clone)]
pub struct Outcome<S> {
    pub snapshot: S,
    pub events: Vec<Event>,
}

impl<S> Outcome<S> {
    pub fn finished(&self) -> bool {
        self.events.iter().any(Event::is_terminal)
    }
}

pub struct Session<E: DrivenTimer> {
    engine: E,
    observers: Vec<Box<dyn Observer<E::Snapshot>>>,
}

impl<E: DrivenTimer> Session<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: impl Observer<E::Snapshot> + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Direct access for reconfiguration. Observers are not notified; call
    /// [`Session::publish`] afterwards if they should see the new state.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn snapshot(&self) -> E::Snapshot {
        self.engine.snapshot()
    }

    pub fn status(&self) -> TimerStatus {
        self.engine.status()
    }

    pub fn start(&mut self) -> Outcome<E::Snapshot> {
        let before = self.engine.status();
        let snapshot = self.engine.start();
        let mut events = Vec::new();
        if matches!(before, TimerStatus::Idle | TimerStatus::Paused)
            && self.engine.status() == TimerStatus::Running
        {
            info!(from = ?before, "session started");
            events.push(Event::TimerStarted { at: Utc::now() });
        }
        self.emit(snapshot, events)
    }

    pub fn pause(&mut self) -> Outcome<E::Snapshot> {
        let was_running = self.engine.status() == TimerStatus::Running;
        let snapshot = self.engine.pause();
        let mut events = Vec::new();
        if was_running {
            info!("session paused");
            events.push(Event::TimerPaused { at: Utc::now() });
        }
        self.emit(snapshot, events)
    }

    pub fn reset(&mut self) -> Outcome<E::Snapshot> {
        let snapshot = self.engine.reset();
        info!("session reset");
        self.emit(snapshot, vec![Event::TimerReset { at: Utc::now() }])
    }

    pub fn tick(&mut self) -> Outcome<E::Snapshot> {
        let prev = self.engine.snapshot();
        let next = self.engine.advance();
        let events = E::tick_events(&prev, &next);
        for event in &events {
            debug!(?event, "tick event");
        }
        self.emit(next, events)
    }

    /// Push the current snapshot to every observer without changing state.
    pub fn publish(&mut self) -> E::Snapshot {
        let snapshot = self.engine.snapshot();
        for observer in &mut self.observers {
            observer.on_snapshot(&snapshot, &[]);
        }
        snapshot
    }

    fn emit(&mut self, snapshot: E::Snapshot, events: Vec<Event>) -> Outcome<E::Snapshot> {
        for observer in &mut self.observers {
            observer.on_snapshot(&snapshot, &events);
        }
        Outcome { snapshot, events }
    }
}
