//! Status message binding: create, refresh, validate and retire the one live
//! player message of a session

use crate::error::{ControllerError, Result, SurfaceError};
use crate::log_surface_result;
use crate::model::{ChannelRef, InteractionId, MessageId};
use crate::view::{self, MessageHandle, StatusPayload};

use super::{Interaction, PlayerController, SessionState};

impl PlayerController {
    pub(crate) fn payload(state: &SessionState) -> StatusPayload {
        view::render_payload(state.model.queue(), state.model.selection(), &state.model.playback)
    }

    /// Retire the current player, if any, and post a fresh one to `channel`
    pub(crate) async fn show_player_locked(
        &self,
        state: &mut SessionState,
        channel: &ChannelRef,
    ) -> Result<()> {
        self.retire(state).await;

        let payload = Self::payload(state);
        let result = self.surface.send(channel, &payload).await;
        log_surface_result!("send_player", result);
        let message = result?;

        tracing::info!(channel = %channel, message = %message, "Status message bound");
        state.status.bind(channel.clone(), message);
        Ok(())
    }

    /// Push the current render to the bound message. A component interaction
    /// is answered in place; anything else fetches and edits the message.
    /// Failures are reported but never undo the state change being rendered.
    pub(crate) async fn refresh(&self, state: &SessionState, source: Option<&InteractionId>) {
        let payload = Self::payload(state);

        if let Some(interaction) = source {
            let result = self.surface.update_interaction(interaction, &payload).await;
            log_surface_result!("update_interaction", result);
            if let Err(e) = result {
                self.surface_fault(state, &e).await;
            }
            return;
        }

        let (Some(channel), Some(message)) = (&state.status.channel, &state.status.message) else {
            return;
        };
        let result = self.edit_message(channel, message, &payload).await;
        log_surface_result!("edit_player", result);
        if let Err(e) = result {
            self.surface_fault(state, &e).await;
        }
    }

    /// Check that a component interaction came from the live player. A stale
    /// player is answered, retired, and the action aborted.
    pub(crate) async fn validate(
        &self,
        state: &SessionState,
        interaction: &Interaction,
        source_message: &MessageId,
    ) -> Result<()> {
        if state.status.is_bound_to(source_message) {
            return Ok(());
        }

        tracing::info!(
            stale = %source_message,
            bound = ?state.status.message,
            "Interaction targets a superseded player"
        );

        let result = self.surface.reply(&interaction.id, view::STALE_NOTICE).await;
        log_surface_result!("reply_stale", result);

        let result = self
            .edit_message(&interaction.channel, source_message, &view::expired_payload())
            .await;
        log_surface_result!("retire_stale", result);

        Err(ControllerError::StaleControl {
            message: source_message.clone(),
        })
    }

    /// Replace the bound message with the expiry notice and drop the binding
    pub(crate) async fn retire(&self, state: &mut SessionState) {
        let Some((channel, message)) = state.status.unbind() else {
            return;
        };

        let result = self.edit_message(&channel, &message, &view::expired_payload()).await;
        log_surface_result!("retire_player", result);
        tracing::info!(message = %message, "Status message retired");
    }

    /// Best-effort notice in the session's channel
    pub(crate) async fn notify(&self, state: &SessionState, content: &str) {
        let Some(channel) = state.status.channel.as_ref().or(state.text_channel.as_ref()) else {
            tracing::debug!(content, "No channel to deliver notice to");
            return;
        };
        let result = self.surface.notify(channel, content).await;
        log_surface_result!("notify", result);
    }

    async fn edit_message(
        &self,
        channel: &ChannelRef,
        message: &MessageId,
        payload: &StatusPayload,
    ) -> std::result::Result<(), SurfaceError> {
        let handle: MessageHandle = self.surface.fetch(channel, message).await?;
        self.surface.edit(&handle, payload).await
    }

    async fn surface_fault(&self, state: &SessionState, error: &SurfaceError) {
        let notice = ControllerError::Surface(error.clone()).to_string();
        self.notify(state, &notice).await;
    }
}
