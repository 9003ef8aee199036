//! Test doubles for the controller's collaborators
//!
//! Every mock records what it was asked to do so tests can assert on the
//! exact side effects of an event.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use jukebox_rs::audio::{
    AudioTransport, ConnectionHandle, PlaybackEvent, PlaybackHandle, PlaybackId, PlaybackSignal,
    SignalSender,
};
use jukebox_rs::config::ControllerConfig;
use jukebox_rs::controller::{InboundEvent, Interaction, SlashCommand};
use jukebox_rs::error::{ResolveError, SurfaceError, TransportError};
use jukebox_rs::model::{
    ChannelRef, GuildId, InteractionId, MessageId, Track, TrackResolver, VoiceChannelRef,
};
use jukebox_rs::view::{Control, MessageHandle, StatusPayload, UiSurface, ViewModel, TRACK_MENU_ID};
use jukebox_rs::{Collaborators, PlayerController};

pub const GUILD: &str = "guild-1";
pub const TEXT_CHANNEL: &str = "text-1";
pub const VOICE_CHANNEL: &str = "voice-1";

// ===== Transport =====

#[derive(Default)]
pub struct TransportLog {
    pub joins: usize,
    pub leaves: usize,
    pub played: Vec<(PlaybackId, String)>,
    pub stopped: Vec<PlaybackId>,
    pub pauses: usize,
    pub resumes: usize,
}

#[derive(Default)]
pub struct MockTransport {
    log: Mutex<TransportLog>,
    failing_sources: Mutex<Vec<String>>,
    refused_join: Mutex<Option<String>>,
    next_connection: Mutex<u64>,
}

impl MockTransport {
    /// Make `play` fail for every source ref containing `pattern`
    pub fn fail_sources_containing(&self, pattern: &str) {
        self.failing_sources.lock().unwrap().push(pattern.to_string());
    }

    /// Make every `join` fail with `reason`
    pub fn refuse_joins(&self, reason: &str) {
        *self.refused_join.lock().unwrap() = Some(reason.to_string());
    }

    pub fn joins(&self) -> usize {
        self.log.lock().unwrap().joins
    }

    pub fn leaves(&self) -> usize {
        self.log.lock().unwrap().leaves
    }

    pub fn pauses(&self) -> usize {
        self.log.lock().unwrap().pauses
    }

    pub fn resumes(&self) -> usize {
        self.log.lock().unwrap().resumes
    }

    pub fn played_sources(&self) -> Vec<String> {
        self.log.lock().unwrap().played.iter().map(|(_, s)| s.clone()).collect()
    }

    pub fn stopped(&self) -> Vec<PlaybackId> {
        self.log.lock().unwrap().stopped.clone()
    }

    /// Id of the most recently started playback
    pub fn last_playback(&self) -> PlaybackId {
        self.log
            .lock()
            .unwrap()
            .played
            .last()
            .map(|(id, _)| *id)
            .expect("nothing was played")
    }
}

#[async_trait]
impl AudioTransport for MockTransport {
    async fn join(
        &self,
        channel: &VoiceChannelRef,
        _signals: SignalSender,
    ) -> Result<ConnectionHandle, TransportError> {
        if let Some(reason) = self.refused_join.lock().unwrap().clone() {
            return Err(TransportError::Join(reason));
        }
        self.log.lock().unwrap().joins += 1;
        let mut next = self.next_connection.lock().unwrap();
        *next += 1;
        Ok(ConnectionHandle {
            id: *next,
            channel: channel.clone(),
        })
    }

    async fn play(
        &self,
        connection: &ConnectionHandle,
        source_ref: &str,
        playback: PlaybackId,
        _signals: SignalSender,
    ) -> Result<PlaybackHandle, TransportError> {
        let failing = self
            .failing_sources
            .lock()
            .unwrap()
            .iter()
            .any(|pattern| source_ref.contains(pattern.as_str()));
        if failing {
            return Err(TransportError::Play(format!("cannot open {source_ref}")));
        }

        self.log.lock().unwrap().played.push((playback, source_ref.to_string()));
        Ok(PlaybackHandle {
            id: playback,
            connection: connection.clone(),
        })
    }

    async fn pause(&self, _playback: &PlaybackHandle) -> Result<(), TransportError> {
        self.log.lock().unwrap().pauses += 1;
        Ok(())
    }

    async fn resume(&self, _playback: &PlaybackHandle) -> Result<(), TransportError> {
        self.log.lock().unwrap().resumes += 1;
        Ok(())
    }

    async fn stop(&self, playback: &PlaybackHandle) -> Result<(), TransportError> {
        self.log.lock().unwrap().stopped.push(playback.id);
        Ok(())
    }

    async fn leave(&self, _connection: &ConnectionHandle) -> Result<(), TransportError> {
        self.log.lock().unwrap().leaves += 1;
        Ok(())
    }
}

// ===== Resolver =====

/// Resolves every keyword to `src:<keyword>` except `missing`, and continues
/// any track with `<title> (related)`
#[derive(Default)]
pub struct MockResolver {
    pub continuations: Mutex<usize>,
}

#[async_trait]
impl TrackResolver for MockResolver {
    async fn resolve(&self, keyword: &str) -> Result<Option<Track>, ResolveError> {
        match keyword {
            "missing" => Ok(None),
            "offline" => Err(ResolveError::Unavailable("backend down".to_string())),
            _ => Ok(Some(Track::new(format!("src:{keyword}"), keyword))),
        }
    }

    async fn continuation(&self, previous: &Track) -> Result<Option<Track>, ResolveError> {
        *self.continuations.lock().unwrap() += 1;
        Ok(Some(Track::new(
            format!("{}:related", previous.source_ref),
            format!("{} (related)", previous.title),
        )))
    }
}

// ===== Surface =====

#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCall {
    Send {
        channel: ChannelRef,
        message: MessageId,
        payload: StatusPayload,
    },
    Edit {
        message: MessageId,
        payload: StatusPayload,
    },
    Update {
        interaction: InteractionId,
        payload: StatusPayload,
    },
    Reply {
        interaction: InteractionId,
        content: String,
    },
    Notify {
        channel: ChannelRef,
        content: String,
    },
}

#[derive(Default)]
pub struct RecordingSurface {
    calls: Mutex<Vec<SurfaceCall>>,
    next_message: Mutex<u64>,
}

impl RecordingSurface {
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sent_messages(&self) -> Vec<MessageId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::Send { message, .. } => Some(message),
                _ => None,
            })
            .collect()
    }

    /// The most recently rendered player, from any kind of update
    pub fn last_view(&self) -> Option<ViewModel> {
        self.calls().into_iter().rev().find_map(|call| match call {
            SurfaceCall::Send { payload: StatusPayload::Player(vm), .. }
            | SurfaceCall::Edit { payload: StatusPayload::Player(vm), .. }
            | SurfaceCall::Update { payload: StatusPayload::Player(vm), .. } => Some(vm),
            _ => None,
        })
    }

    pub fn replies_to(&self, interaction: &InteractionId) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::Reply { interaction: id, content } if &id == interaction => Some(content),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::Notify { content, .. } => Some(content),
                _ => None,
            })
            .collect()
    }

    /// Whether `message` was last edited into the expiry notice
    pub fn is_expired(&self, message: &MessageId) -> bool {
        self.calls()
            .into_iter()
            .rev()
            .find_map(|call| match call {
                SurfaceCall::Edit { message: id, payload } if &id == message => Some(payload),
                _ => None,
            })
            .is_some_and(|payload| matches!(payload, StatusPayload::Expired { .. }))
    }

    fn record(&self, call: SurfaceCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl UiSurface for RecordingSurface {
    async fn send(&self, channel: &ChannelRef, payload: &StatusPayload)
        -> Result<MessageId, SurfaceError> {
        let message = {
            let mut next = self.next_message.lock().unwrap();
            *next += 1;
            MessageId::new(format!("msg-{}", *next))
        };
        self.record(SurfaceCall::Send {
            channel: channel.clone(),
            message: message.clone(),
            payload: payload.clone(),
        });
        Ok(message)
    }

    async fn fetch(&self, channel: &ChannelRef, message: &MessageId)
        -> Result<MessageHandle, SurfaceError> {
        Ok(MessageHandle {
            channel: channel.clone(),
            id: message.clone(),
        })
    }

    async fn edit(&self, message: &MessageHandle, payload: &StatusPayload)
        -> Result<(), SurfaceError> {
        self.record(SurfaceCall::Edit {
            message: message.id.clone(),
            payload: payload.clone(),
        });
        Ok(())
    }

    async fn update_interaction(&self, interaction: &InteractionId, payload: &StatusPayload)
        -> Result<(), SurfaceError> {
        self.record(SurfaceCall::Update {
            interaction: interaction.clone(),
            payload: payload.clone(),
        });
        Ok(())
    }

    async fn reply(&self, interaction: &InteractionId, content: &str) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::Reply {
            interaction: interaction.clone(),
            content: content.to_string(),
        });
        Ok(())
    }

    async fn notify(&self, channel: &ChannelRef, content: &str) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::Notify {
            channel: channel.clone(),
            content: content.to_string(),
        });
        Ok(())
    }
}

// ===== Harness =====

pub struct Harness {
    pub transport: Arc<MockTransport>,
    pub resolver: Arc<MockResolver>,
    pub surface: Arc<RecordingSurface>,
    pub controller: PlayerController,
    next_interaction: Mutex<u64>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_idle_timeout(Duration::from_secs(300))
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        let transport = Arc::new(MockTransport::default());
        let resolver = Arc::new(MockResolver::default());
        let surface = Arc::new(RecordingSurface::default());
        let controller = PlayerController::new(
            GuildId::new(GUILD),
            collaborators(&transport, &resolver, &surface),
            Arc::new(ControllerConfig { idle_timeout }),
        );

        Self {
            transport,
            resolver,
            surface,
            controller,
            next_interaction: Mutex::new(0),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        collaborators(&self.transport, &self.resolver, &self.surface)
    }

    /// A fresh interaction from a user sitting in the voice channel
    pub fn interaction(&self) -> Interaction {
        let mut next = self.next_interaction.lock().unwrap();
        *next += 1;
        interaction(&format!("int-{}", *next), Some(VOICE_CHANNEL))
    }

    pub async fn command(&self, command: SlashCommand) -> Interaction {
        let interaction = self.interaction();
        self.controller
            .handle_event(InboundEvent::SlashCommand {
                interaction: interaction.clone(),
                command,
            })
            .await;
        interaction
    }

    pub async fn play(&self, keyword: &str) -> Interaction {
        self.command(SlashCommand::Play {
            keyword: keyword.to_string(),
        })
        .await
    }

    pub async fn press(&self, control: Control, message: &MessageId) -> Interaction {
        let interaction = self.interaction();
        self.controller
            .handle_event(InboundEvent::ButtonPress {
                interaction: interaction.clone(),
                custom_id: control.custom_id().to_string(),
                source_message: message.clone(),
            })
            .await;
        interaction
    }

    pub async fn select(&self, value: &str, message: &MessageId) -> Interaction {
        let interaction = self.interaction();
        self.controller
            .handle_event(InboundEvent::MenuSelect {
                interaction: interaction.clone(),
                custom_id: TRACK_MENU_ID.to_string(),
                values: vec![value.to_string()],
                source_message: message.clone(),
            })
            .await;
        interaction
    }

    /// Deliver a track event for the most recently started playback
    pub async fn signal_current(&self, event: PlaybackEvent) {
        let playback = self.transport.last_playback();
        self.controller
            .handle_signal(PlaybackSignal::Track { playback, event })
            .await;
    }

    /// The bound status message
    pub async fn live_message(&self) -> MessageId {
        self.controller
            .snapshot()
            .await
            .message
            .expect("no status message bound")
    }
}

pub fn collaborators(
    transport: &Arc<MockTransport>,
    resolver: &Arc<MockResolver>,
    surface: &Arc<RecordingSurface>,
) -> Collaborators {
    Collaborators {
        transport: transport.clone(),
        resolver: resolver.clone(),
        surface: surface.clone(),
    }
}

pub fn interaction(id: &str, voice_channel: Option<&str>) -> Interaction {
    Interaction {
        id: InteractionId::new(id),
        guild: GuildId::new(GUILD),
        channel: ChannelRef::new(TEXT_CHANNEL),
        voice_channel: voice_channel.map(VoiceChannelRef::new),
    }
}

pub fn track(title: &str) -> Track {
    Track::new(format!("src:{title}"), title)
}
