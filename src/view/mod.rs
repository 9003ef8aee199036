//! View module - status message rendering
//!
//! `render` is a pure function of the queue, the selection and the playback
//! state. It never touches the session, so every payload pushed to the chat
//! platform can be reproduced from those three inputs.
//!
//! - `components`: View-model types (embed, buttons, select menu)
//! - `utils`: Text truncation and platform limits
//! - `surface`: UI surface contract

mod components;
mod surface;
mod utils;

pub use components::{
    Button, ButtonStyle, Control, Embed, EmbedField, SelectMenu, SelectOption, StatusPayload,
    ViewModel, EMPTY_OPTION_VALUE, TRACK_MENU_ID,
};
pub use surface::{MessageHandle, UiSurface};
pub use utils::{truncate_string, MAX_OPTION_TEXT, MAX_SELECT_OPTIONS};

use crate::model::{PlaybackState, PlaybackStatus, Selection, TrackQueue};
use utils::{option_label, MAX_FIELD_VALUE};

pub const PLAYER_TITLE: &str = "Music Player";
pub const NOTHING_PLAYING: &str = "Nothing is playing right now.";
pub const EXPIRED_NOTICE: &str = "This music player has expired.";
pub const STALE_NOTICE: &str =
    "This player has expired. Run /player to open a new music player.";
pub const STOPPED_NOTICE: &str = "Stopping playback.";
pub const PLAYBACK_FAULT_NOTICE: &str =
    "An error occurred during playback, moving on to the next track.";
pub const TRANSPORT_FAULT_NOTICE: &str =
    "Lost the voice connection, the music player has been closed.";

pub fn render(queue: &TrackQueue, selection: Selection, playback: &PlaybackState) -> ViewModel {
    ViewModel {
        embed: render_embed(playback),
        menu: render_menu(queue, selection),
        controls: render_controls(queue, selection, playback),
    }
}

pub fn render_payload(
    queue: &TrackQueue,
    selection: Selection,
    playback: &PlaybackState,
) -> StatusPayload {
    StatusPayload::Player(render(queue, selection, playback))
}

pub fn expired_payload() -> StatusPayload {
    StatusPayload::Expired {
        content: EXPIRED_NOTICE.to_string(),
    }
}

fn render_embed(playback: &PlaybackState) -> Embed {
    let now_playing = match &playback.status {
        PlaybackStatus::Idle => NOTHING_PLAYING.to_string(),
        PlaybackStatus::Playing(track) => truncate_string(&track.title, MAX_FIELD_VALUE),
        PlaybackStatus::Paused(track) => {
            format!("{} (paused)", truncate_string(&track.title, MAX_FIELD_VALUE))
        }
    };

    Embed {
        title: PLAYER_TITLE.to_string(),
        fields: vec![EmbedField {
            name: "Now Playing".to_string(),
            value: now_playing,
        }],
    }
}

fn render_menu(queue: &TrackQueue, selection: Selection) -> SelectMenu {
    if queue.is_empty() {
        return SelectMenu {
            custom_id: TRACK_MENU_ID,
            placeholder: "No tracks in the queue.".to_string(),
            disabled: true,
            options: vec![SelectOption {
                label: "The queue is empty.".to_string(),
                description: "Add a new track with /play.".to_string(),
                value: EMPTY_OPTION_VALUE.to_string(),
                default: false,
            }],
        };
    }

    let options = queue
        .pending()
        .take(MAX_SELECT_OPTIONS)
        .enumerate()
        .map(|(index, track)| SelectOption {
            label: option_label(&track.title, index + 1),
            description: format!("Track {}", index + 1),
            value: index.to_string(),
            default: selection.get() == Some(index),
        })
        .collect();

    SelectMenu {
        custom_id: TRACK_MENU_ID,
        placeholder: "Select a track to remove or play now".to_string(),
        disabled: false,
        options,
    }
}

fn render_controls(
    queue: &TrackQueue,
    selection: Selection,
    playback: &PlaybackState,
) -> Vec<Button> {
    let active = !playback.status.is_idle();
    let paused = playback.status.is_paused();
    let can_skip = !queue.is_empty() || playback.autoplay;
    let can_edit = active && !selection.is_none();

    vec![
        Button {
            control: Control::Pause,
            label: if paused { "Resume" } else { "Pause" }.to_string(),
            style: if paused { ButtonStyle::Primary } else { ButtonStyle::Secondary },
            disabled: !active,
        },
        Button {
            control: Control::Skip,
            label: "Skip".to_string(),
            style: ButtonStyle::Secondary,
            disabled: !can_skip,
        },
        Button {
            control: Control::Delete,
            label: "Remove".to_string(),
            style: ButtonStyle::Danger,
            disabled: !can_edit,
        },
        Button {
            control: Control::PlayNow,
            label: "Play Now".to_string(),
            style: ButtonStyle::Success,
            disabled: !can_edit,
        },
        Button {
            control: Control::AutoPlay,
            label: format!("Autoplay {}", if playback.autoplay { "ON" } else { "OFF" }),
            style: if playback.autoplay { ButtonStyle::Success } else { ButtonStyle::Secondary },
            disabled: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PlayerModel, Track};

    fn track(title: &str) -> Track {
        Track::new(format!("https://example.com/{title}"), title)
    }

    fn playing_with_pending(pending: &[&str]) -> PlayerModel {
        let mut model = PlayerModel::new();
        model.start(track("Now"));
        for title in pending {
            model.enqueue(track(title));
        }
        model
    }

    fn view(model: &PlayerModel) -> ViewModel {
        render(model.queue(), model.selection(), &model.playback)
    }

    #[test]
    fn idle_player_disables_everything_but_autoplay() {
        let model = PlayerModel::new();
        let vm = view(&model);

        assert_eq!(vm.embed.fields[0].value, NOTHING_PLAYING);
        assert!(!vm.is_enabled(Control::Pause));
        assert!(!vm.is_enabled(Control::Skip));
        assert!(!vm.is_enabled(Control::Delete));
        assert!(!vm.is_enabled(Control::PlayNow));
        assert!(vm.is_enabled(Control::AutoPlay));

        assert!(vm.menu.disabled);
        assert_eq!(vm.menu.options.len(), 1);
        assert_eq!(vm.menu.options[0].value, EMPTY_OPTION_VALUE);
    }

    #[test]
    fn pause_button_reflects_paused_state() {
        let mut model = playing_with_pending(&[]);
        let playing = view(&model);
        let pause = playing.button(Control::Pause).unwrap();
        assert_eq!(pause.label, "Pause");
        assert_eq!(pause.style, ButtonStyle::Secondary);
        assert!(!pause.disabled);

        model.playback.toggle_pause();
        let paused = view(&model);
        let resume = paused.button(Control::Pause).unwrap();
        assert_eq!(resume.label, "Resume");
        assert_eq!(resume.style, ButtonStyle::Primary);
        assert_eq!(paused.embed.fields[0].value, "Now (paused)");
    }

    #[test]
    fn skip_enabled_by_autoplay_alone() {
        let mut model = playing_with_pending(&[]);
        assert!(!view(&model).is_enabled(Control::Skip));
        model.playback.toggle_autoplay();
        let vm = view(&model);
        assert!(vm.is_enabled(Control::Skip));
        assert_eq!(vm.button(Control::AutoPlay).unwrap().label, "Autoplay ON");
    }

    #[test]
    fn options_are_pending_relative_with_default_on_selection() {
        let mut model = playing_with_pending(&["B", "C"]);
        model.select(1);
        let vm = view(&model);

        assert!(!vm.menu.disabled);
        let values: Vec<_> = vm.menu.options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, ["0", "1"]);
        assert_eq!(vm.menu.options[1].label, "C");
        assert_eq!(vm.menu.options[1].description, "Track 2");
        assert!(vm.menu.options[1].default);
        assert!(!vm.menu.options[0].default);

        assert!(vm.is_enabled(Control::Delete));
        assert!(vm.is_enabled(Control::PlayNow));
    }

    #[test]
    fn selection_without_playback_keeps_edit_buttons_disabled() {
        let mut model = PlayerModel::new();
        model.enqueue(track("A"));
        model.select(0);
        let vm = view(&model);
        assert!(!vm.is_enabled(Control::Delete));
        assert!(!vm.is_enabled(Control::PlayNow));
        assert!(vm.is_enabled(Control::Skip));
    }

    #[test]
    fn menu_is_capped_at_platform_limit() {
        let titles: Vec<String> = (0..40).map(|i| format!("T{i}")).collect();
        let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
        let model = playing_with_pending(&refs);
        assert_eq!(view(&model).menu.options.len(), MAX_SELECT_OPTIONS);
    }

    #[test]
    fn render_is_deterministic() {
        let mut model = playing_with_pending(&["B", "C"]);
        model.select(0);
        let first = serde_json::to_vec(&render_payload(model.queue(), model.selection(), &model.playback)).unwrap();
        let second = serde_json::to_vec(&render_payload(model.queue(), model.selection(), &model.playback)).unwrap();
        assert_eq!(first, second);
    }
}
