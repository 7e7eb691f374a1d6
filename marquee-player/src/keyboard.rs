//! Keyboard shortcuts for the player.

use std::str::FromStr;

/// Physical keys the player reacts to, named after their DOM `code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    KeyM,
    KeyF,
    Escape,
}

impl FromStr for Key {
    type Err = ();

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "Space" => Ok(Key::Space),
            "ArrowLeft" => Ok(Key::ArrowLeft),
            "ArrowRight" => Ok(Key::ArrowRight),
            "ArrowUp" => Ok(Key::ArrowUp),
            "ArrowDown" => Ok(Key::ArrowDown),
            "KeyM" => Ok(Key::KeyM),
            "KeyF" => Ok(Key::KeyF),
            "Escape" => Ok(Key::Escape),
            _ => Err(()),
        }
    }
}

/// What currently holds keyboard focus on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// Nothing in particular (the page body).
    Page,
    /// The player container or one of its controls.
    Player,
    /// A text field or other input-like element.
    TextInput,
}

impl FocusTarget {
    pub fn allows_shortcuts(&self) -> bool {
        !matches!(self, FocusTarget::TextInput)
    }
}

/// Player action bound to a key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyAction {
    TogglePlayback,
    /// Relative seek, in steps; -1 rewinds one step.
    Seek(i8),
    /// Relative volume change, in steps.
    Volume(i8),
    ToggleMute,
    ToggleFullscreen,
    ExitFullscreen,
}

impl KeyAction {
    /// Whether the key's default page behaviour (scrolling etc.) is suppressed.
    pub fn prevents_default(&self) -> bool {
        !matches!(self, KeyAction::ExitFullscreen)
    }
}

/// Resolve a key press to a player action, if shortcuts are active.
pub fn bind(key: Key, focus: FocusTarget) -> Option<KeyAction> {
    if !focus.allows_shortcuts() {
        return None;
    }

    Some(match key {
        Key::Space => KeyAction::TogglePlayback,
        Key::ArrowLeft => KeyAction::Seek(-1),
        Key::ArrowRight => KeyAction::Seek(1),
        Key::ArrowUp => KeyAction::Volume(1),
        Key::ArrowDown => KeyAction::Volume(-1),
        Key::KeyM => KeyAction::ToggleMute,
        Key::KeyF => KeyAction::ToggleFullscreen,
        Key::Escape => KeyAction::ExitFullscreen,
    })
}
