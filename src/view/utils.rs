//! Utility functions for building view-model text

/// Platform cap on select menu options
pub const MAX_SELECT_OPTIONS: usize = 25;

/// Platform cap on option labels and descriptions, in characters
pub const MAX_OPTION_TEXT: usize = 100;

/// Cap embed field values well below the platform limit
pub const MAX_FIELD_VALUE: usize = 256;

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

/// Option label for a pending track, falling back to its position when the
/// title is blank
pub fn option_label(title: &str, position: usize) -> String {
    if title.trim().is_empty() {
        format!("Track {}", position)
    } else {
        truncate_string(title, MAX_OPTION_TEXT)
    }
}
