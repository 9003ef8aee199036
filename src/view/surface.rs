//! UI surface contract (messages and interaction responses)

use async_trait::async_trait;

use crate::error::SurfaceError;
use crate::model::{ChannelRef, InteractionId, MessageId};
use super::components::StatusPayload;

/// A fetched message that can be edited
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageHandle {
    pub channel: ChannelRef,
    pub id: MessageId,
}

#[async_trait]
pub trait UiSurface: Send + Sync {
    /// Post a new message, returning its id
    async fn send(&self, channel: &ChannelRef, payload: &StatusPayload)
        -> Result<MessageId, SurfaceError>;

    async fn fetch(&self, channel: &ChannelRef, message: &MessageId)
        -> Result<MessageHandle, SurfaceError>;

    async fn edit(&self, message: &MessageHandle, payload: &StatusPayload)
        -> Result<(), SurfaceError>;

    /// Replace the message a component interaction came from, in place
    async fn update_interaction(&self, interaction: &InteractionId, payload: &StatusPayload)
        -> Result<(), SurfaceError>;

    /// Text reply to the requester of an interaction
    async fn reply(&self, interaction: &InteractionId, content: &str) -> Result<(), SurfaceError>;

    /// Channel notice not tied to any interaction
    async fn notify(&self, channel: &ChannelRef, content: &str) -> Result<(), SurfaceError>;
}
