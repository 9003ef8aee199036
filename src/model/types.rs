//! Core type definitions for the controller

use std::fmt;

use serde::Serialize;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

opaque_id!(
    /// Chat-platform message id
    MessageId
);
opaque_id!(
    /// Text channel the status message lives in
    ChannelRef
);
opaque_id!(
    /// Voice channel the audio transport connects to
    VoiceChannelRef
);
opaque_id!(
    /// Guild (server) a voice session belongs to
    GuildId
);
opaque_id!(
    /// Token identifying a single inbound interaction, used to respond to it
    InteractionId
);

/// A playable track. Immutable once enqueued.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Track {
    /// URL or provider id handed to the audio transport
    pub source_ref: String,
    pub title: String,
}

impl Track {
    pub fn new(source_ref: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            source_ref: source_ref.into(),
            title: title.into(),
        }
    }
}

/// Identity of the one live status message of a session
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusMessage {
    pub message: Option<MessageId>,
    pub channel: Option<ChannelRef>,
}

impl StatusMessage {
    pub fn bind(&mut self, channel: ChannelRef, message: MessageId) {
        self.channel = Some(channel);
        self.message = Some(message);
    }

    /// Clears the binding, returning what was bound
    pub fn unbind(&mut self) -> Option<(ChannelRef, MessageId)> {
        let message = self.message.take();
        let channel = self.channel.take();
        channel.zip(message)
    }

    pub fn is_bound_to(&self, message: &MessageId) -> bool {
        self.message.as_ref() == Some(message)
    }

    pub fn is_bound(&self) -> bool {
        self.message.is_some()
    }
}
