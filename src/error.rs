//! Error types for the queue controller

use thiserror::Error;

use crate::model::MessageId;

/// Problems with what the user asked for. Nothing is mutated when one of
/// these is returned, and the message is shown to the requester verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserInputError {
    #[error("Join a voice channel first.")]
    NotInVoiceChannel,

    /// The transport refused to connect; no connection was ever established
    #[error("Could not join your voice channel: {0}")]
    JoinFailed(String),

    #[error("Please provide a keyword to search for a track.")]
    MissingKeyword,

    #[error("No track found for \"{0}\".")]
    NotFound(String),

    #[error("There is no next track to skip to.")]
    NothingToSkip,

    #[error("Nothing is playing right now.")]
    NothingPlaying,

    #[error("Select a track from the queue first.")]
    NoSelection,

    #[error("The selected track (#{}) is no longer in the queue.", .0 + 1)]
    SelectionOutOfRange(usize),

    #[error("Unknown command: /{0}")]
    UnknownCommand(String),

    #[error("Unknown control: {0}")]
    UnknownControl(String),
}

/// Audio transport failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Failed to join voice channel: {0}")]
    Join(String),

    #[error("Failed to start audio resource: {0}")]
    Play(String),

    #[error("Player command failed: {0}")]
    Command(String),

    #[error("Not connected to a voice channel")]
    NotConnected,
}

/// UI surface failures (message send/fetch/edit, interaction responses)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Message {0} not found")]
    MessageNotFound(MessageId),

    #[error("Interaction already acknowledged")]
    AlreadyAcknowledged,

    #[error("Request failed: {0}")]
    Request(String),
}

/// Track resolution backend failures. Treated as "not found" by callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Resolver unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid locator: {0}")]
    InvalidLocator(String),
}

/// Errors returned by controller entry points
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    UserInput(#[from] UserInputError),

    /// The interaction targeted a superseded status message
    #[error("This player has expired. Run /player to open a new one.")]
    StaleControl { message: MessageId },

    /// A track could not be played; the session keeps running
    #[error("Could not play \"{track}\": {reason}")]
    PlaybackFault { track: String, reason: String },

    /// The voice connection is gone; the session has been torn down
    #[error("Voice connection lost: {0}")]
    TransportFault(#[from] TransportError),

    #[error("Could not update the player: {0}")]
    Surface(#[from] SurfaceError),
}

impl ControllerError {
    /// Whether the dispatcher still has to tell the user about this error.
    /// Stale controls are answered while being detected.
    pub fn needs_reply(&self) -> bool {
        !matches!(self, ControllerError::StaleControl { .. })
    }
}

/// Result type for controller operations
pub type Result<T> = std::result::Result<T, ControllerError>;
