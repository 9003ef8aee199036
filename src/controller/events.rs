//! Inbound events from the chat gateway

use crate::error::UserInputError;
use crate::model::{ChannelRef, GuildId, InteractionId, MessageId, VoiceChannelRef};

/// Who asked, and where to answer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interaction {
    pub id: InteractionId,
    pub guild: GuildId,
    /// Text channel the interaction happened in
    pub channel: ChannelRef,
    /// Voice channel the requester is connected to, if any
    pub voice_channel: Option<VoiceChannelRef>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlashCommand {
    Join,
    Play { keyword: String },
    Player,
    Pause,
    Resume,
    Skip,
    Stop,
    Clear,
}

impl SlashCommand {
    /// Parse a registered command name and its string options
    pub fn parse(name: &str, args: &[String]) -> Result<Self, UserInputError> {
        let command = match name {
            "join" => SlashCommand::Join,
            "play" => {
                let keyword = args.join(" ").trim().to_string();
                if keyword.is_empty() {
                    return Err(UserInputError::MissingKeyword);
                }
                SlashCommand::Play { keyword }
            }
            "player" => SlashCommand::Player,
            "pause" => SlashCommand::Pause,
            "resume" => SlashCommand::Resume,
            "skip" => SlashCommand::Skip,
            "stop" => SlashCommand::Stop,
            "clear" => SlashCommand::Clear,
            other => return Err(UserInputError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SlashCommand::Join => "join",
            SlashCommand::Play { .. } => "play",
            SlashCommand::Player => "player",
            SlashCommand::Pause => "pause",
            SlashCommand::Resume => "resume",
            SlashCommand::Skip => "skip",
            SlashCommand::Stop => "stop",
            SlashCommand::Clear => "clear",
        }
    }
}

/// Changes to the bot's own voice presence
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoiceStateChange {
    /// The bot was removed from its voice channel
    BotDisconnected,
    /// Everybody else left the bot's voice channel
    BotAlone,
}

/// Events are classified once here; nothing downstream re-inspects the kind
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundEvent {
    SlashCommand {
        interaction: Interaction,
        command: SlashCommand,
    },
    ButtonPress {
        interaction: Interaction,
        custom_id: String,
        source_message: MessageId,
    },
    MenuSelect {
        interaction: Interaction,
        custom_id: String,
        values: Vec<String>,
        source_message: MessageId,
    },
    VoiceState {
        guild: GuildId,
        change: VoiceStateChange,
    },
}

impl InboundEvent {
    pub fn guild(&self) -> &GuildId {
        match self {
            InboundEvent::SlashCommand { interaction, .. }
            | InboundEvent::ButtonPress { interaction, .. }
            | InboundEvent::MenuSelect { interaction, .. } => &interaction.guild,
            InboundEvent::VoiceState { guild, .. } => guild,
        }
    }

    pub fn interaction(&self) -> Option<&Interaction> {
        match self {
            InboundEvent::SlashCommand { interaction, .. }
            | InboundEvent::ButtonPress { interaction, .. }
            | InboundEvent::MenuSelect { interaction, .. } => Some(interaction),
            InboundEvent::VoiceState { .. } => None,
        }
    }
}
