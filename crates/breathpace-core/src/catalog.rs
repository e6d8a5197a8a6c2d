//! Built-in data the host offers: breathing patterns, cycle and duration
//! presets, phase labels and ambient sounds.
//!
//! Engines accept any valid [`PatternDefinition`]; nothing here is hardcoded
//! into the engines themselves.

use serde::Serialize;

use crate::timer::{PatternDefinition, PhaseDurations, PhaseKind};

/// Cycle counts offered for a breathing session.
pub const CYCLE_CHOICES: [u32; 4] = [3, 5, 7, 10];

pub const DEFAULT_CYCLES: u32 = 5;

pub const DEFAULT_PATTERN_ID: &str = "box";

/// Meditation durations offered, in minutes.
pub const MEDITATION_PRESETS_MIN: [u32; 5] = [5, 10, 15, 20, 30];

pub const DEFAULT_MEDITATION_SECS: u32 = 10 * 60;

fn builtin(id: &str, name: &str, description: &str, timings: [u32; 4]) -> PatternDefinition {
    let [inhale, hold1, exhale, hold2] = timings;
    PatternDefinition {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        phase_durations: PhaseDurations {
            inhale,
            hold1,
            exhale,
            hold2,
        },
    }
}

pub fn box_breathing() -> PatternDefinition {
    builtin(
        "box",
        "Box Breathing",
        "Equal inhale, hold, exhale, hold",
        [4, 4, 4, 4],
    )
}

pub fn four_seven_eight() -> PatternDefinition {
    builtin(
        "478",
        "4-7-8 Breathing",
        "Inhale 4, hold 7, exhale 8",
        [4, 7, 8, 0],
    )
}

pub fn triangle() -> PatternDefinition {
    builtin(
        "triangle",
        "Triangle Breathing",
        "Equal inhale, hold, exhale",
        [4, 4, 4, 0],
    )
}

/// Built-in patterns in display order.
pub fn builtin_patterns() -> Vec<PatternDefinition> {
    vec![box_breathing(), four_seven_eight(), triangle()]
}

pub fn builtin_pattern(id: &str) -> Option<PatternDefinition> {
    builtin_patterns().into_iter().find(|p| p.id == id)
}

/// Text shown to the user while a phase is active.
pub fn phase_label(phase: PhaseKind) -> &'static str {
    match phase {
        PhaseKind::Inhale => "Breathe In",
        PhaseKind::Hold1 | PhaseKind::Hold2 => "Hold",
        PhaseKind::Exhale => "Breathe Out",
    }
}

/// A looping background track for meditation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmbientSound {
    pub id: &'static str,
    pub name: &'static str,
    pub track: &'static str,
}

pub static AMBIENT_SOUNDS: [AmbientSound; 4] = [
    AmbientSound {
        id: "rain",
        name: "Rain",
        track: "audio/rain.mp3",
    },
    AmbientSound {
        id: "ocean",
        name: "Ocean Waves",
        track: "audio/ocean.mp3",
    },
    AmbientSound {
        id: "forest",
        name: "Forest",
        track: "audio/forest.mp3",
    },
    AmbientSound {
        id: "night",
        name: "Night Sounds",
        track: "audio/night.mp3",
    },
];

pub fn ambient_sound(id: &str) -> Option<&'static AmbientSound> {
    AMBIENT_SOUNDS.iter().find(|s| s.id == id)
}

/// `MM:SS`, minutes zero-padded to two digits.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
