//! Controller module - Session logic and event handling
//!
//! One `PlayerController` exists per voice session. It owns the queue, the
//! selection, the playback state and the live status message, and is the only
//! writer of any of them. It is organized into submodules by responsibility:
//!
//! - `events`: Tagged inbound events and slash command parsing
//! - `dispatch`: Routing of inbound events to entry points, error replies
//! - `commands`: Slash command entry points (join, play, clear, ...)
//! - `interactions`: Button and select menu entry points
//! - `playback`: Playback state machine transitions (advance, skip, stop, ...)
//! - `binder`: Status message create/refresh/validate/retire
//! - `player_events`: Playback signal listener
//! - `idle`: Idle-teardown timer
//! - `registry`: Sessions keyed by guild

mod events;
mod dispatch;
mod commands;
mod interactions;
mod playback;
mod binder;
mod player_events;
mod idle;
mod registry;

pub use events::{InboundEvent, Interaction, SlashCommand, VoiceStateChange};
pub use registry::SessionRegistry;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::sync::Mutex;
use tokio::task::AbortHandle;

use crate::audio::{
    signal_channel, AudioTransport, ConnectionHandle, PlaybackHandle, PlaybackId, SignalSender,
};
use crate::config::ControllerConfig;
use crate::model::{
    ChannelRef, GuildId, MessageId, PlaybackStatus, PlayerModel, StatusMessage, Track,
    TrackResolver,
};
use crate::view::UiSurface;

/// External collaborators shared by every session
#[derive(Clone)]
pub struct Collaborators {
    pub transport: Arc<dyn AudioTransport>,
    pub resolver: Arc<dyn TrackResolver>,
    pub surface: Arc<dyn UiSurface>,
}

/// Everything a session owns. Only ever touched with the session lock held,
/// and the lock is held across "mutate then render" so renders go out in the
/// order their mutations were applied.
#[derive(Default)]
pub(crate) struct SessionState {
    pub(crate) model: PlayerModel,
    pub(crate) status: StatusMessage,
    /// Last channel a request came from; notices fall back to it while no
    /// status message is bound
    pub(crate) text_channel: Option<ChannelRef>,
    pub(crate) connection: Option<ConnectionHandle>,
    pub(crate) active: Option<PlaybackHandle>,
    next_playback: u64,
    pub(crate) idle_timer: Option<AbortHandle>,
    pub(crate) idle_epoch: u64,
}

impl SessionState {
    pub(crate) fn next_playback_id(&mut self) -> PlaybackId {
        self.next_playback += 1;
        PlaybackId(self.next_playback)
    }
}

/// Read-only view of a session, for status output and tests
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub status: PlaybackStatus,
    pub autoplay: bool,
    pub pending: Vec<Track>,
    pub selection: Option<usize>,
    pub message: Option<MessageId>,
    pub connected: bool,
    pub terminated: bool,
}

#[derive(Clone)]
pub struct PlayerController {
    guild: GuildId,
    pub(crate) state: Arc<Mutex<SessionState>>,
    pub(crate) transport: Arc<dyn AudioTransport>,
    pub(crate) resolver: Arc<dyn TrackResolver>,
    pub(crate) surface: Arc<dyn UiSurface>,
    pub(crate) config: Arc<ControllerConfig>,
    pub(crate) signals: SignalSender,
    listener: Arc<OnceLock<AbortHandle>>,
    terminated: Arc<AtomicBool>,
}

impl PlayerController {
    /// Create a session and subscribe to its playback signal channel.
    /// Must be called from within a tokio runtime.
    pub fn new(guild: GuildId, collaborators: Collaborators, config: Arc<ControllerConfig>) -> Self {
        let (signals, receiver) = signal_channel();
        let controller = Self {
            guild,
            state: Arc::new(Mutex::new(SessionState::default())),
            transport: collaborators.transport,
            resolver: collaborators.resolver,
            surface: collaborators.surface,
            config,
            signals,
            listener: Arc::new(OnceLock::new()),
            terminated: Arc::new(AtomicBool::new(false)),
        };

        let handle = controller.start_player_event_listener(receiver);
        let _ = controller.listener.set(handle);
        tracing::info!(guild = %controller.guild, "Voice session created");
        controller
    }

    pub fn guild(&self) -> &GuildId {
        &self.guild
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        SessionSnapshot {
            status: state.model.playback.status.clone(),
            autoplay: state.model.playback.autoplay,
            pending: state.model.queue().pending().cloned().collect(),
            selection: state.model.selection().get(),
            message: state.status.message.clone(),
            connected: state.connection.is_some(),
            terminated: self.is_terminated(),
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::Acquire)
    }

    /// Release every resource of the session and retire its status message.
    /// The controller accepts no further work afterwards.
    pub async fn teardown(&self) {
        let mut state = self.state.lock().await;
        self.teardown_locked(&mut state).await;
    }

    pub(crate) async fn teardown_locked(&self, state: &mut SessionState) {
        if self.is_terminated() {
            return;
        }
        tracing::info!(guild = %self.guild, "Tearing down voice session");

        self.release_audio(state).await;
        self.retire(state).await;
        self.terminated.store(true, Ordering::Release);

        // abort last, this may be running on the listener task
        if let Some(listener) = self.listener.get() {
            listener.abort();
        }
    }
}
