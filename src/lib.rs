//! jukebox-rs - audio queue controller for a chat-platform voice channel
//!
//! One [`controller::PlayerController`] per voice session owns the playback
//! queue, the play/pause/skip state machine and the single live status
//! message. The chat gateway, the audio transport, the track resolver and the
//! UI surface are collaborators behind traits.

pub mod audio;
pub mod config;
pub mod console;
pub mod controller;
pub mod error;
pub mod logging;
pub mod model;
pub mod view;

pub use controller::{Collaborators, InboundEvent, PlayerController, SessionRegistry};
pub use error::{ControllerError, Result};
