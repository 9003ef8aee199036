//! View-model types for the status message

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::UserInputError;

/// Custom id of the track selection menu
pub const TRACK_MENU_ID: &str = "track";

/// Value of the placeholder option shown when nothing is pending
pub const EMPTY_OPTION_VALUE: &str = "empty";

/// Interactive buttons on the status message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Control {
    #[serde(rename = "pause")]
    Pause,
    #[serde(rename = "skip")]
    Skip,
    #[serde(rename = "delete")]
    Delete,
    #[serde(rename = "playNow")]
    PlayNow,
    #[serde(rename = "autoPlay")]
    AutoPlay,
}

impl Control {
    pub const ALL: [Control; 5] = [
        Control::Pause,
        Control::Skip,
        Control::Delete,
        Control::PlayNow,
        Control::AutoPlay,
    ];

    pub fn custom_id(self) -> &'static str {
        match self {
            Control::Pause => "pause",
            Control::Skip => "skip",
            Control::Delete => "delete",
            Control::PlayNow => "playNow",
            Control::AutoPlay => "autoPlay",
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.custom_id())
    }
}

impl FromStr for Control {
    type Err = UserInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Control::ALL
            .into_iter()
            .find(|control| control.custom_id() == s)
            .ok_or_else(|| UserInputError::UnknownControl(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Success,
    Danger,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Button {
    pub control: Control,
    pub label: String,
    pub style: ButtonStyle,
    pub disabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub description: String,
    pub value: String,
    pub default: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelectMenu {
    pub custom_id: &'static str,
    pub placeholder: String,
    pub disabled: bool,
    pub options: Vec<SelectOption>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub title: String,
    pub fields: Vec<EmbedField>,
}

/// Everything the live player shows
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub embed: Embed,
    pub menu: SelectMenu,
    pub controls: Vec<Button>,
}

impl ViewModel {
    pub fn button(&self, control: Control) -> Option<&Button> {
        self.controls.iter().find(|button| button.control == control)
    }

    pub fn is_enabled(&self, control: Control) -> bool {
        self.button(control).is_some_and(|button| !button.disabled)
    }
}

/// Content pushed into a status message
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatusPayload {
    /// The live player
    Player(ViewModel),
    /// Plain notice with embeds and components removed
    Expired { content: String },
}
