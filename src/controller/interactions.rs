//! Button and select menu entry points
//!
//! Every interaction is validated against the bound status message first, so
//! controls from a superseded render can never mutate the session.

use crate::error::{Result, UserInputError};
use crate::model::MessageId;
use crate::view::{Control, TRACK_MENU_ID};

use super::{Interaction, PlayerController, SessionState};

impl PlayerController {
    pub async fn handle_button(
        &self,
        interaction: &Interaction,
        custom_id: &str,
        source_message: &MessageId,
    ) -> Result<()> {
        let mut state = self.session(Some(interaction)).await?;
        self.validate(&state, interaction, source_message).await?;

        let control: Control = custom_id.parse()?;
        tracing::debug!(control = %control, "Button pressed");

        let outcome = match control {
            Control::Pause => self.toggle_pause_locked(&mut state).await,
            Control::Skip => self.skip_locked(&mut state).await,
            Control::Delete => self.delete_selected(&mut state),
            Control::PlayNow => self.play_selected_now(&mut state).await,
            Control::AutoPlay => {
                let enabled = state.model.playback.toggle_autoplay();
                tracing::info!(enabled, "Autoplay toggled");
                Ok(())
            }
        };

        // the selection may have been cleared even when the action failed
        self.refresh(&state, Some(&interaction.id)).await;
        outcome
    }

    pub async fn handle_select(
        &self,
        interaction: &Interaction,
        custom_id: &str,
        values: &[String],
        source_message: &MessageId,
    ) -> Result<()> {
        let mut state = self.session(Some(interaction)).await?;
        self.validate(&state, interaction, source_message).await?;

        if custom_id != TRACK_MENU_ID {
            return Err(UserInputError::UnknownControl(custom_id.to_string()).into());
        }

        match values.first().map(|value| value.parse::<usize>()) {
            Some(Ok(index)) => {
                let selected = state.model.select(index);
                tracing::debug!(index, selected, "Track selected");
            }
            _ => tracing::debug!(?values, "Ignoring non-track menu value"),
        }

        self.refresh(&state, Some(&interaction.id)).await;
        Ok(())
    }

    fn delete_selected(&self, state: &mut SessionState) -> Result<()> {
        if state.model.playback.status.is_idle() {
            return Err(UserInputError::NothingPlaying.into());
        }
        match state.model.remove_selected() {
            Ok(Some(track)) => {
                tracing::info!(track = %track.title, "Removed track from queue");
                Ok(())
            }
            Ok(None) => Err(UserInputError::NoSelection.into()),
            Err(index) => Err(UserInputError::SelectionOutOfRange(index).into()),
        }
    }

    /// Move the selected track into the next slot, then skip to it
    async fn play_selected_now(&self, state: &mut SessionState) -> Result<()> {
        if state.model.playback.status.is_idle() {
            return Err(UserInputError::NothingPlaying.into());
        }
        match state.model.promote_selected() {
            Ok(Some(track)) => {
                tracing::info!(track = %track.title, "Playing selected track now");
                self.skip_locked(state).await
            }
            Ok(None) => Err(UserInputError::NoSelection.into()),
            Err(index) => Err(UserInputError::SelectionOutOfRange(index).into()),
        }
    }
}
