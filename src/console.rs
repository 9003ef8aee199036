//! Local console harness
//!
//! Stands in for the chat platform so a session can be driven from a
//! terminal: stdin lines become inbound events, status messages are printed
//! to stdout, and a simulated transport "plays" every track for a fixed time.
//!
//! Source refs containing `broken` fail to start, and ones containing
//! `glitch` fail halfway through, to exercise fault handling.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{watch, Mutex};
use tokio::task::AbortHandle;
use tokio::time::Instant;

use crate::audio::{
    AudioTransport, ConnectionHandle, PlaybackEvent, PlaybackHandle, PlaybackId, PlaybackSignal,
    SignalSender,
};
use crate::controller::{
    InboundEvent, Interaction, SessionRegistry, SlashCommand, VoiceStateChange,
};
use crate::error::{ResolveError, SurfaceError, TransportError};
use crate::model::{
    is_locator, ChannelRef, GuildId, InteractionId, MessageId, Track, TrackResolver,
    VoiceChannelRef,
};
use crate::view::{Control, MessageHandle, StatusPayload, UiSurface, TRACK_MENU_ID};

const HELP: &str = "\
commands:
  /join  /play <keyword or url>  /player  /pause  /resume  /skip  /stop  /clear
  press <pause|skip|delete|playNow|autoPlay> [message]
  select <n> [message]      pick the n-th pending track
  alone                     everyone else leaves the voice channel
  kicked                    the bot is removed from the voice channel
  drop                      the voice connection fails
  status  help  quit";

// ============================================================================
// UI surface
// ============================================================================

/// Prints every message operation to stdout
#[derive(Default)]
pub struct ConsoleSurface {
    next_message: AtomicU64,
    last_player: Mutex<Option<MessageId>>,
}

impl ConsoleSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently posted player, the default target of `press`/`select`
    pub async fn last_player(&self) -> Option<MessageId> {
        self.last_player.lock().await.clone()
    }
}

#[async_trait]
impl UiSurface for ConsoleSurface {
    async fn send(&self, channel: &ChannelRef, payload: &StatusPayload)
        -> Result<MessageId, SurfaceError> {
        let id = MessageId::new(format!("m{}", self.next_message.fetch_add(1, Ordering::Relaxed) + 1));
        if matches!(payload, StatusPayload::Player(_)) {
            *self.last_player.lock().await = Some(id.clone());
        }
        println!("[{channel}] new message {id}\n{}", render_plain(payload));
        Ok(id)
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
        println!("[{}] edited {}\n{}", message.channel, message.id, render_plain(payload));
        Ok(())
    }

    async fn update_interaction(&self, interaction: &InteractionId, payload: &StatusPayload)
        -> Result<(), SurfaceError> {
        println!("({interaction}) updated player\n{}", render_plain(payload));
        Ok(())
    }

    async fn reply(&self, interaction: &InteractionId, content: &str) -> Result<(), SurfaceError> {
        println!("({interaction}) {content}");
        Ok(())
    }

    async fn notify(&self, channel: &ChannelRef, content: &str) -> Result<(), SurfaceError> {
        println!("[{channel}] {content}");
        Ok(())
    }
}

/// Plain-text rendering of a status payload
pub fn render_plain(payload: &StatusPayload) -> String {
    let vm = match payload {
        StatusPayload::Expired { content } => return format!("  | {content}"),
        StatusPayload::Player(vm) => vm,
    };

    let mut lines = vec![format!("  +-- {}", vm.embed.title)];
    for field in &vm.embed.fields {
        lines.push(format!("  | {}: {}", field.name, field.value));
    }

    let state = if vm.menu.disabled { " (disabled)" } else { "" };
    lines.push(format!("  | queue{state}: {}", vm.menu.placeholder));
    if !vm.menu.disabled {
        for (n, option) in vm.menu.options.iter().enumerate() {
            let marker = if option.default { '>' } else { ' ' };
            lines.push(format!("  | {marker} {}. {}", n + 1, option.label));
        }
    }

    let buttons: Vec<String> = vm
        .controls
        .iter()
        .map(|button| {
            if button.disabled {
                format!("({})", button.label)
            } else {
                format!("[{}]", button.label)
            }
        })
        .collect();
    lines.push(format!("  | {}", buttons.join(" ")));
    lines.push("  +--".to_string());
    lines.join("\n")
}

// ============================================================================
// Simulated audio transport
// ============================================================================

struct SimulatedPlayback {
    connection: u64,
    paused: watch::Sender<bool>,
    signals: SignalSender,
    task: AbortHandle,
}

type PlaybackMap = Arc<Mutex<HashMap<PlaybackId, SimulatedPlayback>>>;

/// Plays every track for a fixed length of (pausable) time
pub struct SimulatedTransport {
    track_length: Duration,
    next_connection: AtomicU64,
    connections: Mutex<HashMap<u64, SignalSender>>,
    playbacks: PlaybackMap,
}

impl SimulatedTransport {
    pub fn new(track_length: Duration) -> Self {
        Self {
            track_length,
            next_connection: AtomicU64::new(0),
            connections: Mutex::new(HashMap::new()),
            playbacks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Fail every open connection
    pub async fn drop_connections(&self) {
        let connections: Vec<(u64, SignalSender)> = self.connections.lock().await.drain().collect();
        let mut playbacks = self.playbacks.lock().await;
        for (id, signals) in connections {
            playbacks.retain(|_, playback| {
                let keep = playback.connection != id;
                if !keep {
                    playback.task.abort();
                }
                keep
            });
            let _ = signals.send(PlaybackSignal::Disconnected {
                reason: format!("connection {id} reset"),
            });
        }
    }

    async fn set_paused(&self, handle: &PlaybackHandle, paused: bool) -> Result<(), TransportError> {
        let playbacks = self.playbacks.lock().await;
        let playback = playbacks
            .get(&handle.id)
            .ok_or_else(|| TransportError::Command(format!("playback {} not active", handle.id)))?;
        playback.paused.send_replace(paused);
        let event = if paused { PlaybackEvent::Paused } else { PlaybackEvent::Resumed };
        let _ = playback.signals.send(PlaybackSignal::Track {
            playback: handle.id,
            event,
        });
        Ok(())
    }
}

async fn simulate_track(
    playback: PlaybackId,
    length: Duration,
    glitch: bool,
    mut paused: watch::Receiver<bool>,
    signals: SignalSender,
    playbacks: PlaybackMap,
) {
    let _ = signals.send(PlaybackSignal::Track {
        playback,
        event: PlaybackEvent::Started,
    });

    let mut remaining = if glitch { length / 2 } else { length };
    while !remaining.is_zero() {
        let is_paused = *paused.borrow_and_update();
        if is_paused {
            if paused.changed().await.is_err() {
                return;
            }
            continue;
        }

        let started = Instant::now();
        tokio::select! {
            _ = tokio::time::sleep(remaining) => remaining = Duration::ZERO,
            changed = paused.changed() => {
                if changed.is_err() {
                    return;
                }
                remaining = remaining.saturating_sub(started.elapsed());
            }
        }
    }

    // finished on its own, nobody will stop it
    playbacks.lock().await.remove(&playback);

    let event = if glitch {
        PlaybackEvent::Error("stream interrupted".to_string())
    } else {
        PlaybackEvent::Idle
    };
    let _ = signals.send(PlaybackSignal::Track { playback, event });
}

#[async_trait]
impl AudioTransport for SimulatedTransport {
    async fn join(
        &self,
        channel: &VoiceChannelRef,
        signals: SignalSender,
    ) -> Result<ConnectionHandle, TransportError> {
        let id = self.next_connection.fetch_add(1, Ordering::Relaxed) + 1;
        self.connections.lock().await.insert(id, signals);
        Ok(ConnectionHandle {
            id,
            channel: channel.clone(),
        })
    }

    async fn play(
        &self,
        connection: &ConnectionHandle,
        source_ref: &str,
        playback: PlaybackId,
        signals: SignalSender,
    ) -> Result<PlaybackHandle, TransportError> {
        if !self.connections.lock().await.contains_key(&connection.id) {
            return Err(TransportError::NotConnected);
        }
        if source_ref.contains("broken") {
            return Err(TransportError::Play(format!("cannot open {source_ref}")));
        }

        // held until the entry is in, so a short track cannot finish first
        let mut playbacks = self.playbacks.lock().await;
        let (paused_tx, paused_rx) = watch::channel(false);
        let task = tokio::spawn(simulate_track(
            playback,
            self.track_length,
            source_ref.contains("glitch"),
            paused_rx,
            signals.clone(),
            self.playbacks.clone(),
        ));

        playbacks.insert(
            playback,
            SimulatedPlayback {
                connection: connection.id,
                paused: paused_tx,
                signals,
                task: task.abort_handle(),
            },
        );

        Ok(PlaybackHandle {
            id: playback,
            connection: connection.clone(),
        })
    }

    async fn pause(&self, playback: &PlaybackHandle) -> Result<(), TransportError> {
        self.set_paused(playback, true).await
    }

    async fn resume(&self, playback: &PlaybackHandle) -> Result<(), TransportError> {
        self.set_paused(playback, false).await
    }

    async fn stop(&self, playback: &PlaybackHandle) -> Result<(), TransportError> {
        if let Some(active) = self.playbacks.lock().await.remove(&playback.id) {
            active.task.abort();
        }
        Ok(())
    }

    async fn leave(&self, connection: &ConnectionHandle) -> Result<(), TransportError> {
        self.playbacks.lock().await.retain(|_, playback| {
            let keep = playback.connection != connection.id;
            if !keep {
                playback.task.abort();
            }
            keep
        });
        self.connections
            .lock()
            .await
            .remove(&connection.id)
            .map(|_| ())
            .ok_or(TransportError::NotConnected)
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Treats URLs as direct locators and anything else as a search whose top
/// match is named after the keyword. Keywords containing `notfound` match
/// nothing.
pub struct ConsoleResolver;

#[async_trait]
impl TrackResolver for ConsoleResolver {
    async fn resolve(&self, keyword: &str) -> Result<Option<Track>, ResolveError> {
        let keyword = keyword.trim();
        if keyword.is_empty() || keyword.contains("notfound") {
            return Ok(None);
        }

        if is_locator(keyword) {
            let title = keyword
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .filter(|segment| !segment.is_empty())
                .ok_or_else(|| ResolveError::InvalidLocator(keyword.to_string()))?;
            return Ok(Some(Track::new(keyword, title)));
        }

        let slug = keyword.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-");
        Ok(Some(Track::new(format!("search:{slug}"), keyword)))
    }

    async fn continuation(&self, previous: &Track) -> Result<Option<Track>, ResolveError> {
        Ok(Some(Track::new(
            format!("{}#radio", previous.source_ref),
            format!("{} (radio)", previous.title),
        )))
    }
}

// ============================================================================
// Gateway
// ============================================================================

/// One parsed console line
#[derive(Debug, PartialEq, Eq)]
pub enum ConsoleInput {
    Event(InboundEvent),
    DropConnection,
    Status,
    Help,
    Quit,
    Empty,
}

/// Turns console lines into inbound events for a single guild
pub struct ConsoleGateway {
    guild: GuildId,
    channel: ChannelRef,
    voice: VoiceChannelRef,
    next_interaction: u64,
}

impl ConsoleGateway {
    pub fn new(guild: GuildId) -> Self {
        Self {
            guild,
            channel: ChannelRef::new("console-text"),
            voice: VoiceChannelRef::new("console-voice"),
            next_interaction: 0,
        }
    }

    fn interaction(&mut self) -> Interaction {
        self.next_interaction += 1;
        Interaction {
            id: InteractionId::new(format!("i{}", self.next_interaction)),
            guild: self.guild.clone(),
            channel: self.channel.clone(),
            voice_channel: Some(self.voice.clone()),
        }
    }

    /// Parse one line. `live_player` is targeted by `press`/`select` unless a
    /// message id is given.
    pub fn parse(&mut self, line: &str, live_player: Option<&MessageId>) -> Result<ConsoleInput, String> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(ConsoleInput::Empty);
        };
        let rest: Vec<String> = words.map(str::to_string).collect();

        if let Some(name) = head.strip_prefix('/') {
            let command = SlashCommand::parse(name, &rest).map_err(|e| e.to_string())?;
            return Ok(ConsoleInput::Event(InboundEvent::SlashCommand {
                interaction: self.interaction(),
                command,
            }));
        }

        let target = |explicit: Option<&String>| -> Result<MessageId, String> {
            explicit
                .map(MessageId::new)
                .or_else(|| live_player.cloned())
                .ok_or_else(|| "no player is open, run /player first".to_string())
        };

        match head {
            "press" => {
                let control: Control = rest
                    .first()
                    .ok_or("usage: press <control> [message]")?
                    .parse()
                    .map_err(|e: crate::error::UserInputError| e.to_string())?;
                let source_message = target(rest.get(1))?;
                Ok(ConsoleInput::Event(InboundEvent::ButtonPress {
                    interaction: self.interaction(),
                    custom_id: control.custom_id().to_string(),
                    source_message,
                }))
            }
            "select" => {
                let n: usize = rest
                    .first()
                    .and_then(|n| n.parse().ok())
                    .filter(|n| *n > 0)
                    .ok_or("usage: select <n> [message]")?;
                let source_message = target(rest.get(1))?;
                Ok(ConsoleInput::Event(InboundEvent::MenuSelect {
                    interaction: self.interaction(),
                    custom_id: TRACK_MENU_ID.to_string(),
                    values: vec![(n - 1).to_string()],
                    source_message,
                }))
            }
            "alone" => Ok(ConsoleInput::Event(InboundEvent::VoiceState {
                guild: self.guild.clone(),
                change: VoiceStateChange::BotAlone,
            })),
            "kicked" => Ok(ConsoleInput::Event(InboundEvent::VoiceState {
                guild: self.guild.clone(),
                change: VoiceStateChange::BotDisconnected,
            })),
            "drop" => Ok(ConsoleInput::DropConnection),
            "status" => Ok(ConsoleInput::Status),
            "help" => Ok(ConsoleInput::Help),
            "quit" | "exit" => Ok(ConsoleInput::Quit),
            other => Err(format!("unknown input: {other} (try `help`)")),
        }
    }
}

pub fn print_help() {
    println!("{HELP}");
}

/// Read stdin until EOF, `quit` or Ctrl-C, dispatching every line
pub async fn run(
    registry: &SessionRegistry,
    gateway: &mut ConsoleGateway,
    surface: &ConsoleSurface,
    transport: &SimulatedTransport,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                None
            }
        };
        let Some(line) = line else {
            break;
        };

        let live_player = surface.last_player().await;
        match gateway.parse(&line, live_player.as_ref()) {
            Ok(ConsoleInput::Event(event)) => registry.dispatch(event).await,
            Ok(ConsoleInput::DropConnection) => transport.drop_connections().await,
            Ok(ConsoleInput::Status) => {
                match registry.get(&gateway.guild).await {
                    Some(controller) => println!("{:#?}", controller.snapshot().await),
                    None => println!("no voice session"),
                }
            }
            Ok(ConsoleInput::Help) => print_help(),
            Ok(ConsoleInput::Quit) => break,
            Ok(ConsoleInput::Empty) => {}
            Err(message) => println!("{message}"),
        }
    }

    Ok(())
}
