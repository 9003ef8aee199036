//! Playback state machine transitions
//!
//! Faults raised while starting or streaming a track stop here: they become a
//! notice plus an automatic advance, never an error for the dispatcher.

use crate::error::{ControllerError, Result, TransportError, UserInputError};
use crate::model::Track;
use crate::view::PLAYBACK_FAULT_NOTICE;

use super::{PlayerController, SessionState};

impl PlayerController {
    /// Move on to the next pending track, or to an autoplay continuation, or
    /// go idle. Broken tracks are reported to the channel and skipped over;
    /// their faults are returned so a requester can be answered too.
    pub(crate) async fn advance(&self, state: &mut SessionState) -> Vec<ControllerError> {
        self.stop_active(state).await;

        let mut faults = Vec::new();
        if state.connection.is_none() {
            tracing::warn!("Cannot advance without a voice connection");
            state.model.playback.stop();
            return faults;
        }

        let mut tried_autoplay = false;
        loop {
            let next = match state.model.take_next() {
                Some(track) => Some(track),
                None if state.model.playback.autoplay && !tried_autoplay => {
                    tried_autoplay = true;
                    self.autoplay_continuation(state).await
                }
                None => None,
            };

            let Some(track) = next else {
                if let Some(track) = state.model.playback.stop() {
                    tracing::info!(track = %track.title, "Queue exhausted, going idle");
                }
                self.schedule_idle_teardown(state);
                return faults;
            };

            match self.start_track(state, track).await {
                Ok(()) => return faults,
                Err(fault) => {
                    tracing::warn!(error = %fault, "Playback fault, advancing");
                    self.notify(state, &format!("{fault}\n{PLAYBACK_FAULT_NOTICE}")).await;
                    faults.push(fault);
                }
            }
        }
    }

    async fn start_track(&self, state: &mut SessionState, track: Track) -> Result<()> {
        let Some(connection) = state.connection.clone() else {
            return Err(ControllerError::PlaybackFault {
                track: track.title,
                reason: TransportError::NotConnected.to_string(),
            });
        };

        self.cancel_idle_teardown(state);
        let playback = state.next_playback_id();

        match self
            .transport
            .play(&connection, &track.source_ref, playback, self.signals.clone())
            .await
        {
            Ok(handle) => {
                tracing::info!(
                    track = %track.title,
                    source = %track.source_ref,
                    playback = %playback,
                    "Track started"
                );
                state.active = Some(handle);
                state.model.start(track);
                Ok(())
            }
            Err(e) => Err(ControllerError::PlaybackFault {
                track: track.title,
                reason: e.to_string(),
            }),
        }
    }

    async fn autoplay_continuation(&self, state: &SessionState) -> Option<Track> {
        let previous = state.model.last_played()?;
        match self.resolver.continuation(previous).await {
            Ok(Some(track)) => {
                tracing::info!(after = %previous.title, track = %track.title, "Autoplay continuation");
                Some(track)
            }
            Ok(None) => {
                tracing::debug!(after = %previous.title, "No autoplay continuation found");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Autoplay continuation lookup failed");
                None
            }
        }
    }

    /// Release the active audio resource, if any
    pub(crate) async fn stop_active(&self, state: &mut SessionState) {
        if let Some(handle) = state.active.take() {
            if let Err(e) = self.transport.stop(&handle).await {
                tracing::warn!(playback = %handle.id, error = %e, "Failed to stop audio resource");
            }
        }
    }

    /// Explicit skip. Only offered when a next track exists or autoplay can
    /// produce one.
    pub(crate) async fn skip_locked(&self, state: &mut SessionState) -> Result<()> {
        if !state.model.can_skip() {
            return Err(UserInputError::NothingToSkip.into());
        }
        tracing::info!(
            current = ?state.model.playback.current_track().map(|t| &t.title),
            pending = state.model.queue().len(),
            "Skipping track"
        );
        self.advance(state).await;
        Ok(())
    }

    pub(crate) async fn toggle_pause_locked(&self, state: &mut SessionState) -> Result<()> {
        let paused = !state.model.playback.status.is_paused();
        self.set_paused_locked(state, paused).await
    }

    /// Directional pause/resume; already being in the requested state is a no-op
    pub(crate) async fn set_paused_locked(&self, state: &mut SessionState, paused: bool) -> Result<()> {
        let Some(handle) = state.active.clone() else {
            return Err(UserInputError::NothingPlaying.into());
        };
        if state.model.playback.status.is_paused() == paused {
            return Ok(());
        }

        let result = if paused {
            self.transport.pause(&handle).await
        } else {
            self.transport.resume(&handle).await
        };

        match result {
            Ok(()) => {
                state.model.playback.set_paused(paused);
                tracing::info!(action = if paused { "paused" } else { "resumed" }, "Playback toggled");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Toggle playback failed");
                Err(ControllerError::PlaybackFault {
                    track: state
                        .model
                        .playback
                        .current_track()
                        .map(|t| t.title.clone())
                        .unwrap_or_default(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Stop audio, empty the queue, go idle and leave the voice channel
    pub(crate) async fn release_audio(&self, state: &mut SessionState) {
        self.stop_active(state).await;
        state.model.reset();
        self.cancel_idle_teardown(state);

        if let Some(connection) = state.connection.take() {
            match self.transport.leave(&connection).await {
                Ok(()) => tracing::info!(channel = %connection.channel, "Left voice channel"),
                Err(e) => tracing::warn!(error = %e, "Failed to leave voice channel"),
            }
        }
    }
}
