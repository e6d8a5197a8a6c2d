//! Text and JSON rendering of engine snapshots and events.

use breathpace_core::catalog::{self, format_clock};
use breathpace_core::{AmbientCue, CountdownState, Event, PatternDefinition, PhaseCycleState};
use serde::Serialize;

const BAR_WIDTH: usize = 20;

pub fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

pub fn breathing_line(snap: &PhaseCycleState) -> String {
    format!(
        "{:<12} {:>3}s {}  Cycle {}/{}",
        catalog::phase_label(snap.current_phase),
        snap.seconds_remaining_in_phase,
        progress_bar(snap.phase_progress(), BAR_WIDTH),
        snap.cycle_index,
        snap.total_cycles,
    )
}

pub fn meditation_line(snap: &CountdownState) -> String {
    let fraction = snap.progress_fraction();
    let status = if snap.completed {
        "Complete"
    } else if snap.running {
        "Meditating..."
    } else {
        "Ready to begin"
    };
    format!(
        "{} {} {:>3.0}%  {}",
        format_clock(snap.seconds_remaining),
        progress_bar(fraction, BAR_WIDTH),
        fraction * 100.0,
        status,
    )
}

/// Human-readable line for an event, if it deserves one.
pub fn event_line(event: &Event) -> Option<String> {
    let line = match event {
        Event::TimerStarted { .. } => "Started".to_string(),
        Event::TimerPaused { .. } => "Paused".to_string(),
        Event::TimerReset { .. } => "Reset".to_string(),
        Event::PhaseStarted { .. } => return None,
        Event::CycleCompleted {
            cycle_index,
            total_cycles,
            ..
        } => format!("Cycle {cycle_index}/{total_cycles} complete"),
        Event::SessionFinished { total_cycles, at } => format!(
            "Session finished: {total_cycles} cycles at {}",
            at.format("%H:%M:%S")
        ),
        Event::CountdownCompleted { .. } => {
            "Session Complete! Great job! You've completed your meditation session.".to_string()
        }
    };
    Some(line)
}

pub fn cue_line(cue: &AmbientCue) -> String {
    match cue {
        AmbientCue::Play {
            sound_id, volume, ..
        } => {
            let name = catalog::ambient_sound(sound_id)
                .map(|s| s.name)
                .unwrap_or(sound_id.as_str());
            format!("♪ Playing {name} (volume {:.0}%)", volume * 100.0)
        }
        AmbientCue::Silence => "♪ Ambient sound paused".to_string(),
    }
}

/// `4-7-8` style summary of a pattern's timings.
pub fn timings(pattern: &PatternDefinition) -> String {
    pattern
        .active_phases()
        .map(|phase| pattern.duration_of(phase).to_string())
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Serialize)]
struct JsonLine<'a, S: Serialize> {
    snapshot: &'a S,
    events: &'a [Event],
}

pub fn json_line<S: Serialize>(snapshot: &S, events: &[Event]) -> serde_json::Result<String> {
    serde_json::to_string(&JsonLine { snapshot, events })
}
