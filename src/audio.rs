//! Audio transport contract and the playback signal channel
//!
//! The transport owns the voice connection and the audio resources. It reports
//! everything that happens to them through one [`SignalSender`] per session,
//! which the controller subscribes to once.

use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::TransportError;
use crate::model::VoiceChannelRef;

/// Opaque handle to a voice connection
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConnectionHandle {
    pub id: u64,
    pub channel: VoiceChannelRef,
}

/// Identifies one started audio resource. A fresh id is issued for every
/// track start, so signals from a track that has since been replaced can be
/// told apart from signals about the active one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaybackId(pub u64);

impl fmt::Display for PlaybackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to the active audio resource
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaybackHandle {
    pub id: PlaybackId,
    pub connection: ConnectionHandle,
}

/// Lifecycle events of one audio resource
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaybackEvent {
    Started,
    Paused,
    Resumed,
    /// Finished naturally or was stopped
    Idle,
    /// Streaming failed mid-track
    Error(String),
}

/// Everything the transport reports back to the controller
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaybackSignal {
    Track {
        playback: PlaybackId,
        event: PlaybackEvent,
    },
    /// The voice connection went away without being asked to
    Disconnected { reason: String },
}

pub type SignalSender = mpsc::UnboundedSender<PlaybackSignal>;
pub type SignalReceiver = mpsc::UnboundedReceiver<PlaybackSignal>;

pub fn signal_channel() -> (SignalSender, SignalReceiver) {
    mpsc::unbounded_channel()
}

/// Voice connection and audio playback
#[async_trait]
pub trait AudioTransport: Send + Sync {
    /// Connect to `channel`. Connection-level signals go to `signals`.
    async fn join(
        &self,
        channel: &VoiceChannelRef,
        signals: SignalSender,
    ) -> Result<ConnectionHandle, TransportError>;

    /// Start streaming `source_ref`. Events for the resource are tagged with
    /// `playback` and sent to `signals`.
    async fn play(
        &self,
        connection: &ConnectionHandle,
        source_ref: &str,
        playback: PlaybackId,
        signals: SignalSender,
    ) -> Result<PlaybackHandle, TransportError>;

    async fn pause(&self, playback: &PlaybackHandle) -> Result<(), TransportError>;

    async fn resume(&self, playback: &PlaybackHandle) -> Result<(), TransportError>;

    /// Release the audio resource
    async fn stop(&self, playback: &PlaybackHandle) -> Result<(), TransportError>;

    /// Release the voice connection
    async fn leave(&self, connection: &ConnectionHandle) -> Result<(), TransportError>;
}
