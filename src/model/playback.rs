//! Playback state machine state

use serde::Serialize;

use super::types::Track;

/// Idle / Playing / Paused. The current track is carried by the non-idle
/// variants, so a track is present exactly when playback is not idle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "track")]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Playing(Track),
    Paused(Track),
}

impl PlaybackStatus {
    pub fn current_track(&self) -> Option<&Track> {
        match self {
            PlaybackStatus::Idle => None,
            PlaybackStatus::Playing(track) | PlaybackStatus::Paused(track) => Some(track),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, PlaybackStatus::Idle)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, PlaybackStatus::Paused(_))
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackStatus::Playing(_))
    }
}

/// Complete playback state consumed by the renderer
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PlaybackState {
    pub status: PlaybackStatus,
    pub autoplay: bool,
}

impl PlaybackState {
    pub fn current_track(&self) -> Option<&Track> {
        self.status.current_track()
    }

    /// Enter Playing with `track`, whatever the previous state was
    pub fn start(&mut self, track: Track) {
        self.status = PlaybackStatus::Playing(track);
    }

    /// Playing -> Paused, Paused -> Playing. Returns the new paused flag, or
    /// `None` when idle (no transition).
    pub fn toggle_pause(&mut self) -> Option<bool> {
        let paused = !self.status.is_paused();
        self.set_paused(paused).then_some(paused)
    }

    /// Directional pause/resume. Returns whether a transition happened.
    pub fn set_paused(&mut self, paused: bool) -> bool {
        let status = std::mem::take(&mut self.status);
        let (next, changed) = match (status, paused) {
            (PlaybackStatus::Playing(track), true) => (PlaybackStatus::Paused(track), true),
            (PlaybackStatus::Paused(track), false) => (PlaybackStatus::Playing(track), true),
            (other, _) => (other, false),
        };
        self.status = next;
        changed
    }

    /// Drop the current track and go idle. Returns the track that was playing.
    pub fn stop(&mut self) -> Option<Track> {
        match std::mem::take(&mut self.status) {
            PlaybackStatus::Idle => None,
            PlaybackStatus::Playing(track) | PlaybackStatus::Paused(track) => Some(track),
        }
    }

    pub fn toggle_autoplay(&mut self) -> bool {
        self.autoplay = !self.autoplay;
        self.autoplay
    }
}
