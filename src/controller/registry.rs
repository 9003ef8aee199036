//! Voice sessions keyed by guild

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::ControllerConfig;
use crate::model::GuildId;

use super::{Collaborators, InboundEvent, PlayerController};

/// Creates controllers on first use, replaces torn-down ones, and routes
/// events to the controller of their guild. The registry lock is never held
/// while an event is being handled.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<GuildId, PlayerController>>,
    collaborators: Collaborators,
    config: Arc<ControllerConfig>,
}

impl SessionRegistry {
    pub fn new(collaborators: Collaborators, config: ControllerConfig) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            collaborators,
            config: Arc::new(config),
        }
    }

    /// The live controller for `guild`, created if missing or torn down
    pub async fn session(&self, guild: &GuildId) -> PlayerController {
        let mut sessions = self.sessions.lock().await;

        if let Some(controller) = sessions.get(guild) {
            if !controller.is_terminated() {
                return controller.clone();
            }
            tracing::debug!(guild = %guild, "Replacing torn-down session");
        }

        let controller =
            PlayerController::new(guild.clone(), self.collaborators.clone(), self.config.clone());
        sessions.insert(guild.clone(), controller.clone());
        controller
    }

    pub async fn get(&self, guild: &GuildId) -> Option<PlayerController> {
        self.sessions.lock().await.get(guild).cloned()
    }

    pub async fn dispatch(&self, event: InboundEvent) {
        let guild = event.guild().clone();

        let controller = match &event {
            // presence changes never create a session
            InboundEvent::VoiceState { .. } => match self.get(&guild).await {
                Some(controller) => controller,
                None => return,
            },
            _ => self.session(&guild).await,
        };

        controller.handle_event(event).await;

        if controller.is_terminated() {
            self.forget(&guild, &controller).await;
        }
    }

    /// Tear down and drop the session of `guild`
    pub async fn teardown(&self, guild: &GuildId) {
        let controller = self.sessions.lock().await.remove(guild);
        if let Some(controller) = controller {
            controller.teardown().await;
        }
    }

    /// Tear down every session
    pub async fn shutdown(&self) {
        let sessions: Vec<PlayerController> =
            self.sessions.lock().await.drain().map(|(_, c)| c).collect();
        tracing::info!(sessions = sessions.len(), "Shutting down voice sessions");
        futures::future::join_all(sessions.iter().map(|controller| controller.teardown())).await;
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }

    async fn forget(&self, guild: &GuildId, controller: &PlayerController) {
        let mut sessions = self.sessions.lock().await;
        // a replacement may already be registered under the same guild
        if sessions
            .get(guild)
            .is_some_and(|current| Arc::ptr_eq(&current.state, &controller.state))
        {
            sessions.remove(guild);
            tracing::info!(guild = %guild, "Voice session removed");
        }
    }
}
