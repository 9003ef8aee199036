//! Slash command entry points

use tokio::sync::MutexGuard;

use crate::error::{ControllerError, Result, TransportError, UserInputError};
use crate::model::InteractionId;
use crate::view::STOPPED_NOTICE;
use crate::log_surface_result;

use super::{Interaction, PlayerController, SessionState};

impl PlayerController {
    /// Lock the session for one inbound request
    pub(crate) async fn session(
        &self,
        interaction: Option<&Interaction>,
    ) -> Result<MutexGuard<'_, SessionState>> {
        let mut state = self.state.lock().await;
        if self.is_terminated() {
            return Err(ControllerError::TransportFault(TransportError::NotConnected));
        }
        if let Some(interaction) = interaction {
            state.text_channel = Some(interaction.channel.clone());
        }
        Ok(state)
    }

    pub(crate) async fn acknowledge(&self, interaction: &InteractionId, content: &str) {
        let result = self.surface.reply(interaction, content).await;
        log_surface_result!("acknowledge", result);
    }

    /// Connect to the requester's voice channel unless already connected
    pub(crate) async fn ensure_joined(
        &self,
        state: &mut SessionState,
        interaction: &Interaction,
    ) -> Result<()> {
        if state.connection.is_some() {
            return Ok(());
        }
        let Some(channel) = interaction.voice_channel.as_ref() else {
            return Err(UserInputError::NotInVoiceChannel.into());
        };

        let connection = match self.transport.join(channel, self.signals.clone()).await {
            Ok(connection) => connection,
            Err(e) => {
                tracing::warn!(channel = %channel, error = %e, "Voice join refused");
                return Err(UserInputError::JoinFailed(e.to_string()).into());
            }
        };
        tracing::info!(channel = %channel, connection = connection.id, "Joined voice channel");
        state.connection = Some(connection);

        if state.model.playback.status.is_idle() && state.model.queue().is_empty() {
            self.schedule_idle_teardown(state);
        }
        Ok(())
    }

    pub async fn join(&self, interaction: &Interaction) -> Result<()> {
        let mut state = self.session(Some(interaction)).await?;
        self.ensure_joined(&mut state, interaction).await?;
        self.acknowledge(&interaction.id, "Joined the voice channel.").await;
        Ok(())
    }

    /// Resolve `keyword`, queue the track and start playback if idle
    pub async fn play(&self, interaction: &Interaction, keyword: &str) -> Result<()> {
        let mut state = self.session(Some(interaction)).await?;
        self.ensure_joined(&mut state, interaction).await?;

        let track = match self.resolver.resolve(keyword).await {
            Ok(Some(track)) => track,
            Ok(None) => return Err(UserInputError::NotFound(keyword.to_string()).into()),
            Err(e) => {
                tracing::warn!(keyword, error = %e, "Track resolution failed");
                return Err(UserInputError::NotFound(keyword.to_string()).into());
            }
        };

        tracing::info!(keyword, track = %track.title, source = %track.source_ref, "Track queued");
        let title = track.title.clone();
        state.model.enqueue(track);

        // the requester hears about it when their own track could not start
        let start_fault = if state.model.playback.status.is_idle() {
            self.advance(&mut state)
                .await
                .into_iter()
                .find(|fault| matches!(fault, ControllerError::PlaybackFault { track, .. } if *track == title))
        } else {
            None
        };

        if state.status.is_bound() {
            self.refresh(&state, None).await;
        } else {
            self.show_player_locked(&mut state, &interaction.channel).await?;
        }

        if let Some(fault) = start_fault {
            return Err(fault);
        }

        self.acknowledge(&interaction.id, &format!("Added \"{title}\" to the queue."))
            .await;
        Ok(())
    }

    /// Post a fresh player, retiring the previous one
    pub async fn show_player(&self, interaction: &Interaction) -> Result<()> {
        let mut state = self.session(Some(interaction)).await?;
        if interaction.voice_channel.is_some() {
            self.ensure_joined(&mut state, interaction).await?;
        }
        self.show_player_locked(&mut state, &interaction.channel).await
    }

    pub async fn pause(&self, interaction: &Interaction) -> Result<()> {
        let mut state = self.session(Some(interaction)).await?;
        self.set_paused_locked(&mut state, true).await?;
        self.refresh(&state, None).await;
        self.acknowledge(&interaction.id, "Paused.").await;
        Ok(())
    }

    pub async fn resume(&self, interaction: &Interaction) -> Result<()> {
        let mut state = self.session(Some(interaction)).await?;
        self.set_paused_locked(&mut state, false).await?;
        self.refresh(&state, None).await;
        self.acknowledge(&interaction.id, "Resumed.").await;
        Ok(())
    }

    pub async fn skip(&self, interaction: &Interaction) -> Result<()> {
        let mut state = self.session(Some(interaction)).await?;
        self.skip_locked(&mut state).await?;
        self.refresh(&state, None).await;
        self.acknowledge(&interaction.id, "Skipped.").await;
        Ok(())
    }

    /// Stop playback, empty the queue, close the player and leave voice
    pub async fn stop(&self, interaction: &Interaction) -> Result<()> {
        let mut state = self.session(Some(interaction)).await?;
        tracing::info!("Stopping playback");
        self.release_audio(&mut state).await;
        self.retire(&mut state).await;
        self.acknowledge(&interaction.id, STOPPED_NOTICE).await;
        Ok(())
    }

    /// Drop every pending track; the current track keeps playing
    pub async fn clear(&self, interaction: &Interaction) -> Result<()> {
        let mut state = self.session(Some(interaction)).await?;
        let dropped = state.model.queue().len();
        state.model.clear_pending();
        tracing::info!(dropped, "Queue cleared");
        self.refresh(&state, None).await;
        self.acknowledge(&interaction.id, "Cleared the queue.").await;
        Ok(())
    }
}
