use crate::keyboard::KeyAction;
use crate::media::{LoadToken, MediaEvent, SourceDescriptor};
use crate::overlay::Activity;
use crate::progress::ControlLayout;

/// Everything the host can tell the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // Session control
    Load(SourceDescriptor),
    Retry,
    /// The host found no source for the requested fallback.
    FallbackUnavailable,

    // Playback control
    Play,
    Pause,
    PlayPause,

    // Seeking
    SeekRelative(f64),
    SeekTo(f64),
    ProgressClicked { x: f64 },
    ProgressPressed { x: f64 },

    // Volume
    SetVolume(f64),
    StepVolume(f64),
    ToggleMute,
    VolumeClicked { x: f64 },
    VolumePressed { x: f64 },

    // Drag gestures, tracked page-wide while a bar is held
    PointerMoved { x: f64 },
    PointerReleased,

    // Fullscreen
    ToggleFullscreen,
    ExitFullscreen,
    /// The platform reports that fullscreen was entered or left.
    FullscreenChanged(bool),

    // Overlay
    Activity(Activity),
    PointerLeft,

    Key(KeyAction),
    LayoutChanged(ControlLayout),

    /// Notification from the media element.
    Media { token: LoadToken, event: MediaEvent },
}
