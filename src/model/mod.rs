//! Model module - Session state and data types
//!
//! This module contains the data structures and state management for a voice
//! session. It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (ids, tracks, status message binding)
//! - `queue`: Pending track queue
//! - `playback`: Playback state machine state
//! - `player_model`: Queue + selection + playback with selection-clearing mutations
//! - `resolver`: Track resolution backend contract

mod types;
mod queue;
mod playback;
mod player_model;
mod resolver;

pub use types::{
    ChannelRef, GuildId, InteractionId, MessageId, StatusMessage, Track, VoiceChannelRef,
};

pub use queue::TrackQueue;

pub use playback::{PlaybackState, PlaybackStatus};

pub use player_model::{PlayerModel, Selection};

pub use resolver::{is_locator, TrackResolver};
