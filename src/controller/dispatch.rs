//! Inbound event routing and error reporting

use crate::error::ControllerError;
use crate::log_surface_result;

use super::{InboundEvent, Interaction, PlayerController, SlashCommand, VoiceStateChange};

impl PlayerController {
    /// Route one inbound event to its entry point. Errors end here: they are
    /// logged, answered to the requester, and a transport fault tears the
    /// session down.
    pub async fn handle_event(&self, event: InboundEvent) {
        let interaction = event.interaction().cloned();

        let result = match event {
            InboundEvent::SlashCommand { interaction, command } => {
                tracing::debug!(command = command.name(), "Slash command received");
                self.run_command(&interaction, command).await
            }
            InboundEvent::ButtonPress {
                interaction,
                custom_id,
                source_message,
            } => self.handle_button(&interaction, &custom_id, &source_message).await,
            InboundEvent::MenuSelect {
                interaction,
                custom_id,
                values,
                source_message,
            } => {
                self.handle_select(&interaction, &custom_id, &values, &source_message)
                    .await
            }
            InboundEvent::VoiceState { change, .. } => {
                self.handle_voice_state(change).await;
                Ok(())
            }
        };

        if let Err(error) = result {
            self.report(interaction.as_ref(), error).await;
        }
    }

    async fn run_command(
        &self,
        interaction: &Interaction,
        command: SlashCommand,
    ) -> crate::error::Result<()> {
        match command {
            SlashCommand::Join => self.join(interaction).await,
            SlashCommand::Play { keyword } => self.play(interaction, &keyword).await,
            SlashCommand::Player => self.show_player(interaction).await,
            SlashCommand::Pause => self.pause(interaction).await,
            SlashCommand::Resume => self.resume(interaction).await,
            SlashCommand::Skip => self.skip(interaction).await,
            SlashCommand::Stop => self.stop(interaction).await,
            SlashCommand::Clear => self.clear(interaction).await,
        }
    }

    /// Changes to the bot's own voice presence
    pub async fn handle_voice_state(&self, change: VoiceStateChange) {
        let Ok(mut state) = self.session(None).await else {
            return;
        };

        match change {
            VoiceStateChange::BotDisconnected => {
                tracing::warn!("Removed from voice channel");
                // the connection is already gone on the platform side
                state.connection = None;
                self.notify(&state, crate::view::TRANSPORT_FAULT_NOTICE).await;
                self.teardown_locked(&mut state).await;
            }
            VoiceStateChange::BotAlone => {
                if state.connection.is_none() {
                    return;
                }
                tracing::info!("Voice channel is empty, leaving");
                self.release_audio(&mut state).await;
                self.retire(&mut state).await;
            }
        }
    }

    async fn report(&self, interaction: Option<&Interaction>, error: ControllerError) {
        match &error {
            ControllerError::UserInput(e) => tracing::debug!(error = %e, "Rejected request"),
            ControllerError::StaleControl { message } => {
                tracing::info!(message = %message, "Aborted action on stale player")
            }
            ControllerError::PlaybackFault { .. } => tracing::warn!(error = %error, "Playback fault"),
            ControllerError::Surface(e) => tracing::warn!(error = %e, "UI surface fault"),
            ControllerError::TransportFault(e) => tracing::error!(error = %e, "Transport fault"),
        }

        if error.needs_reply() {
            if let Some(interaction) = interaction {
                let result = self.surface.reply(&interaction.id, &error.to_string()).await;
                log_surface_result!("reply_error", result);
            }
        }

        if matches!(error, ControllerError::TransportFault(_)) {
            self.teardown().await;
        }
    }
}
