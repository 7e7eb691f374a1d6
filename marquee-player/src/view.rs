use crate::machine::PlaybackPhase;
use crate::volume::VolumeBand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayIcon {
    Play,
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenIcon {
    Enter,
    Exit,
}

/// Which top-level panel the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Loading,
    Video,
    Error,
}

/// Everything a renderer needs to draw the player, derived from the session.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlsView {
    pub phase: PlaybackPhase,
    pub surface: Surface,
    pub play_icon: PlayIcon,
    /// Filled fraction of the progress bar, `[0, 1]`.
    pub progress: f64,
    pub elapsed: String,
    pub total: String,
    /// Filled fraction of the volume slider (the audible level).
    pub volume: f64,
    pub volume_band: VolumeBand,
    pub fullscreen_icon: FullscreenIcon,
    pub overlay_visible: bool,
    pub notification: Option<String>,
    /// Whether the host should offer a manual retry.
    pub can_retry: bool,
}
