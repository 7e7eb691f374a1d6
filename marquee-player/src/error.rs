use thiserror::Error;

/// Reasons a playback session can fail to become playable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum PlaybackError {
    #[error("Video loading timed out")]
    LoadTimeout,

    #[error("Video source is not supported")]
    UnsupportedSource,

    #[error("Network failure while loading video")]
    NetworkFailure,

    #[error("No playable source available")]
    NoPlayableSource,
}

impl PlaybackError {
    /// Stable identifier, suitable for logs and host-side retry UIs.
    pub fn code(&self) -> &'static str {
        match self {
            PlaybackError::LoadTimeout => "LoadTimeout",
            PlaybackError::UnsupportedSource => "UnsupportedSource",
            PlaybackError::NetworkFailure => "NetworkFailure",
            PlaybackError::NoPlayableSource => "NoPlayableSource",
        }
    }
}

/// Errors returned by [`crate::runtime::PlayerHandle`] once the event loop is gone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("Player runtime has shut down")]
    Closed,
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
