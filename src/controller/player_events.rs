//! Playback signal listener
//!
//! The transport reports every audio event into the session's signal channel.
//! The listener is subscribed once, when the session is created, and applies
//! each signal as one atomic transition under the session lock.

use tokio::task::AbortHandle;

use crate::audio::{PlaybackEvent, PlaybackSignal, SignalReceiver};
use crate::error::ControllerError;
use crate::view::{PLAYBACK_FAULT_NOTICE, TRANSPORT_FAULT_NOTICE};

use super::PlayerController;

impl PlayerController {
    pub(crate) fn start_player_event_listener(&self, mut receiver: SignalReceiver) -> AbortHandle {
        let controller = self.clone();
        tracing::info!(guild = %self.guild(), "Starting playback signal listener");

        tokio::spawn(async move {
            while let Some(signal) = receiver.recv().await {
                controller.handle_signal(signal).await;

                if controller.is_terminated() {
                    break;
                }
            }
            tracing::debug!(guild = %controller.guild(), "Playback signal listener shutting down");
        })
        .abort_handle()
    }

    /// Apply one signal from the audio transport
    pub async fn handle_signal(&self, signal: PlaybackSignal) {
        let mut state = self.state.lock().await;
        if self.is_terminated() {
            return;
        }

        match signal {
            PlaybackSignal::Track { playback, event } => {
                let is_active = state.active.as_ref().is_some_and(|h| h.id == playback);
                if !is_active {
                    tracing::trace!(playback = %playback, ?event, "Ignoring signal from inactive playback");
                    return;
                }

                match event {
                    PlaybackEvent::Started => {
                        tracing::debug!(playback = %playback, "PlaybackEvent::Started");
                    }
                    event @ (PlaybackEvent::Paused | PlaybackEvent::Resumed) => {
                        let paused = event == PlaybackEvent::Paused;
                        tracing::debug!(playback = %playback, paused, "PlaybackEvent pause state");
                        if state.model.playback.set_paused(paused) {
                            self.refresh(&state, None).await;
                        }
                    }
                    PlaybackEvent::Idle => {
                        tracing::info!(playback = %playback, "PlaybackEvent::Idle");
                        state.active = None;
                        self.advance(&mut state).await;
                        self.refresh(&state, None).await;
                    }
                    PlaybackEvent::Error(reason) => {
                        let fault = ControllerError::PlaybackFault {
                            track: state
                                .model
                                .playback
                                .current_track()
                                .map(|t| t.title.clone())
                                .unwrap_or_default(),
                            reason,
                        };
                        tracing::warn!(playback = %playback, error = %fault, "PlaybackEvent::Error");
                        state.active = None;
                        self.notify(&state, &format!("{fault}\n{PLAYBACK_FAULT_NOTICE}")).await;
                        self.advance(&mut state).await;
                        self.refresh(&state, None).await;
                    }
                }
            }
            PlaybackSignal::Disconnected { reason } => {
                tracing::error!(reason = %reason, "Voice connection lost");
                // the transport already dropped it
                state.connection = None;
                state.active = None;
                self.notify(&state, TRANSPORT_FAULT_NOTICE).await;
                self.teardown_locked(&mut state).await;
            }
        }
    }
}
