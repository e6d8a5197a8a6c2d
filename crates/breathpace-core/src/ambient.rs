//! Ambient-sound decisions for meditation sessions.
//!
//! Playback itself belongs to the host. This module only decides what should
//! be audible for a given countdown state: the selected track loops while the
//! session runs and goes silent on pause, reset and completion.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog;
use crate::events::Event;
use crate::session::Observer;
use crate::timer::CountdownState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cue", rename_all = "lowercase")]
pub enum AmbientCue {
    Play {
        sound_id: String,
        track: String,
        volume: f32,
        looped: bool,
    },
    Silence,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmbientMixer {
    selected: Option<String>,
    muted: bool,
    volume: f32,
}

impl Default for AmbientMixer {
    fn default() -> Self {
        Self {
            selected: None,
            muted: true,
            volume: 0.5,
        }
    }
}

impl AmbientMixer {
    pub fn new(selected: Option<String>, muted: bool, volume: f32) -> Self {
        let mut mixer = Self {
            selected,
            muted,
            volume: 0.0,
        };
        mixer.set_volume(volume);
        mixer
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn select(&mut self, sound_id: Option<String>) {
        self.selected = sound_id;
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Clamped to 0.0 ..= 1.0.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
    }

    pub fn cue(&self, running: bool) -> AmbientCue {
        if !running || self.muted {
            return AmbientCue::Silence;
        }
        let Some(sound) = self.selected.as_deref().and_then(catalog::ambient_sound) else {
            return AmbientCue::Silence;
        };
        AmbientCue::Play {
            sound_id: sound.id.to_string(),
            track: sound.track.to_string(),
            volume: self.volume,
            looped: true,
        }
    }
}

/// Tracks the cue implied by each countdown snapshot and remembers which
/// cues were new, so the host switches tracks only on change.
///
/// Mixer settings may change mid-session through [`AmbientObserver::update`];
/// the cue is then recomputed against the last running flag seen.
#[derive(Debug, Default)]
pub struct AmbientObserver {
    mixer: AmbientMixer,
    running: bool,
    current: Option<AmbientCue>,
    changes: Vec<AmbientCue>,
}

impl AmbientObserver {
    pub fn new(mixer: AmbientMixer) -> Self {
        Self {
            mixer,
            running: false,
            current: None,
            changes: Vec::new(),
        }
    }

    pub fn mixer(&self) -> &AmbientMixer {
        &self.mixer
    }

    pub fn current(&self) -> Option<&AmbientCue> {
        self.current.as_ref()
    }

    /// Apply `change` to the mixer and record the resulting cue if it differs.
    pub fn update(&mut self, change: impl FnOnce(&mut AmbientMixer)) {
        change(&mut self.mixer);
        self.refresh();
    }

    /// Cue changes recorded since the last call.
    pub fn drain_changes(&mut self) -> Vec<AmbientCue> {
        std::mem::take(&mut self.changes)
    }

    fn refresh(&mut self) {
        let cue = self.mixer.cue(self.running);
        if self.current.as_ref() != Some(&cue) {
            debug!(?cue, "ambient cue changed");
            self.current = Some(cue.clone());
            self.changes.push(cue);
        }
    }
}

impl Observer<CountdownState> for AmbientObserver {
    fn on_snapshot(&mut self, snapshot: &CountdownState, _events: &[Event]) {
        self.running = snapshot.running;
        self.refresh();
    }
}
