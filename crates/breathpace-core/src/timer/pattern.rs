use serde::{Deserialize, Serialize};

use crate::error::InvalidConfig;

/// One segment of a breathing pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    Inhale,
    Hold1,
    Exhale,
    Hold2,
}

impl PhaseKind {
    /// Canonical order of phases within a pattern.
    pub const ALL: [PhaseKind; 4] = [
        PhaseKind::Inhale,
        PhaseKind::Hold1,
        PhaseKind::Exhale,
        PhaseKind::Hold2,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PhaseKind::Inhale => "inhale",
            PhaseKind::Hold1 => "hold1",
            PhaseKind::Exhale => "exhale",
            PhaseKind::Hold2 => "hold2",
        }
    }
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seconds per phase. A zero hold is left out of the active sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDurations {
    pub inhale: u32,
    #[serde(default)]
    pub hold1: u32,
    pub exhale: u32,
    #[serde(default)]
    pub hold2: u32,
}

impl PhaseDurations {
    pub fn get(&self, phase: PhaseKind) -> u32 {
        match phase {
            PhaseKind::Inhale => self.inhale,
            PhaseKind::Hold1 => self.hold1,
            PhaseKind::Exhale => self.exhale,
            PhaseKind::Hold2 => self.hold2,
        }
    }
}

/// A named breathing technique.
///
/// Patterns are plain data supplied by the host (built-in catalog or user
/// config); [`PatternDefinition::validate`] is run by the engine before a
/// pattern is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub phase_durations: PhaseDurations,
}

impl PatternDefinition {
    /// Build a pattern and check its invariants.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        phase_durations: PhaseDurations,
    ) -> Result<Self, InvalidConfig> {
        let pattern = Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            phase_durations,
        };
        pattern.validate()?;
        Ok(pattern)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn duration_of(&self, phase: PhaseKind) -> u32 {
        self.phase_durations.get(phase)
    }

    /// Phases with a positive duration, in canonical order.
    pub fn active_phases(&self) -> impl Iterator<Item = PhaseKind> + '_ {
        PhaseKind::ALL
            .into_iter()
            .filter(|&phase| self.duration_of(phase) > 0)
    }

    /// Seconds in one full lap of the active sequence.
    pub fn cycle_seconds(&self) -> u64 {
        self.active_phases()
            .map(|phase| u64::from(self.duration_of(phase)))
            .sum()
    }

    pub fn breaths_per_minute(&self) -> f64 {
        let secs = self.cycle_seconds();
        if secs == 0 {
            return 0.0;
        }
        60.0 / secs as f64
    }

    /// Check that the pattern can drive an engine.
    ///
    /// Inhale and exhale must be present; holds are optional.
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        if self.active_phases().next().is_none() {
            return Err(InvalidConfig::NoActivePhases {
                pattern: self.id.clone(),
            });
        }
        for phase in [PhaseKind::Inhale, PhaseKind::Exhale] {
            if self.duration_of(phase) == 0 {
                return Err(InvalidConfig::MissingPhase {
                    pattern: self.id.clone(),
                    phase,
                });
            }
        }
        Ok(())
    }
}

/// Ordered list of the phases a pattern actually visits, with their
/// durations. Built once per `configure`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseSequence {
    steps: Vec<(PhaseKind, u32)>,
}

/// Result of stepping past the end of a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextPhase {
    pub index: usize,
    pub phase: PhaseKind,
    pub duration_secs: u32,
    /// The step wrapped back to the first phase from a different phase,
    /// or the sequence has a single phase.
    pub lap_completed: bool,
}

impl PhaseSequence {
    pub fn from_pattern(pattern: &PatternDefinition) -> Result<Self, InvalidConfig> {
        let steps: Vec<_> = pattern
            .active_phases()
            .map(|phase| (phase, pattern.duration_of(phase)))
            .collect();
        if steps.is_empty() {
            return Err(InvalidConfig::NoActivePhases {
                pattern: pattern.id.clone(),
            });
        }
        Ok(Self { steps })
    }

    /// Sequence from raw steps; zero-length steps are dropped.
    pub fn from_steps(steps: &[(PhaseKind, u32)]) -> Result<Self, InvalidConfig> {
        let steps: Vec<_> = steps.iter().copied().filter(|&(_, d)| d > 0).collect();
        if steps.is_empty() {
            return Err(InvalidConfig::NoActivePhases {
                pattern: String::new(),
            });
        }
        Ok(Self { steps })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn first(&self) -> (PhaseKind, u32) {
        self.steps[0]
    }

    pub fn get(&self, index: usize) -> Option<(PhaseKind, u32)> {
        self.steps.get(index).copied()
    }

    pub fn phases(&self) -> impl Iterator<Item = PhaseKind> + '_ {
        self.steps.iter().map(|&(phase, _)| phase)
    }

    pub fn total_seconds(&self) -> u64 {
        self.steps.iter().map(|&(_, d)| u64::from(d)).sum()
    }

    /// The phase after `index`, wrapping around.
    pub fn next_after(&self, index: usize) -> NextPhase {
        let next = (index + 1) % self.steps.len();
        let (phase, duration_secs) = self.steps[next];
        let lap_completed = next == 0 && (index != 0 || self.steps.len() == 1);
        NextPhase {
            index: next,
            phase,
            duration_secs,
            lap_completed,
        }
    }
}
