//! Playback phase state machine
//!
//! `Idle → Loading → Ready ⇄ {Playing, Paused} → Ended`, with `Error`
//! reachable from `Loading` or `Ready`. Transitions are named and checked in
//! one place; callers never assign a phase directly.

use std::fmt;

use crate::error::PlaybackError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaybackPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Playing,
    Paused,
    Ended,
    Error(PlaybackError),
}

/// Named transitions between phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A source was supplied and loading started.
    Load,
    /// The media resolved its metadata (duration known).
    MetadataReady,
    Play,
    Pause,
    /// The media played through to the end.
    Complete,
    Fail(PlaybackError),
    /// The session was torn down.
    Reset,
}

impl PlaybackPhase {
    /// Phase reached by applying `transition`, or `None` when the transition
    /// is not valid from here (including no-ops such as `Play` while
    /// `Playing`).
    pub fn apply(self, transition: Transition) -> Option<PlaybackPhase> {
        use PlaybackPhase::*;

        match (self, transition) {
            (_, Transition::Load) => Some(Loading),
            (Idle, Transition::Reset) => None,
            (_, Transition::Reset) => Some(Idle),

            (Loading, Transition::MetadataReady) => Some(Ready),

            (Ready | Paused | Ended, Transition::Play) => Some(Playing),
            (Playing, Transition::Pause) => Some(Paused),
            (Playing, Transition::Complete) => Some(Ended),

            (Loading | Ready, Transition::Fail(reason)) => Some(Error(reason)),

            _ => None,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackPhase::Playing)
    }

    /// Whether a media resource is attached and can be seeked or re-volumed.
    pub fn has_media(&self) -> bool {
        !matches!(self, PlaybackPhase::Idle | PlaybackPhase::Error(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PlaybackPhase::Loading)
    }

    pub fn error(&self) -> Option<PlaybackError> {
        match self {
            PlaybackPhase::Error(reason) => Some(*reason),
            _ => None,
        }
    }
}

impl fmt::Display for PlaybackPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackPhase::Idle => write!(f, "Idle"),
            PlaybackPhase::Loading => write!(f, "Loading"),
            PlaybackPhase::Ready => write!(f, "Ready"),
            PlaybackPhase::Playing => write!(f, "Playing"),
            PlaybackPhase::Paused => write!(f, "Paused"),
            PlaybackPhase::Ended => write!(f, "Ended"),
            PlaybackPhase::Error(reason) => write!(f, "Error({})", reason.code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let phase = PlaybackPhase::Idle;
        let phase = phase.apply(Transition::Load).unwrap();
        assert_eq!(phase, PlaybackPhase::Loading);

        let phase = phase.apply(Transition::MetadataReady).unwrap();
        assert_eq!(phase, PlaybackPhase::Ready);

        let phase = phase.apply(Transition::Play).unwrap();
        let phase = phase.apply(Transition::Pause).unwrap();
        assert_eq!(phase, PlaybackPhase::Paused);

        let phase = phase.apply(Transition::Play).unwrap();
        assert_eq!(phase.apply(Transition::Complete), Some(PlaybackPhase::Ended));
    }

    #[test]
    fn test_repeated_requests_are_noops() {
        assert_eq!(PlaybackPhase::Playing.apply(Transition::Play), None);
        assert_eq!(PlaybackPhase::Paused.apply(Transition::Pause), None);
        assert_eq!(PlaybackPhase::Idle.apply(Transition::Reset), None);
    }

    #[test]
    fn test_errors_only_from_loading_or_ready() {
        let reason = PlaybackError::NetworkFailure;
        assert_eq!(
            PlaybackPhase::Loading.apply(Transition::Fail(reason)),
            Some(PlaybackPhase::Error(reason))
        );
        assert_eq!(
            PlaybackPhase::Ready.apply(Transition::Fail(reason)),
            Some(PlaybackPhase::Error(reason))
        );
        assert_eq!(PlaybackPhase::Playing.apply(Transition::Fail(reason)), None);
        assert_eq!(PlaybackPhase::Idle.apply(Transition::Fail(reason)), None);
    }

    #[test]
    fn test_playback_requests_ignored_before_ready() {
        for phase in [
            PlaybackPhase::Idle,
            PlaybackPhase::Loading,
            PlaybackPhase::Error(PlaybackError::LoadTimeout),
        ] {
            assert_eq!(phase.apply(Transition::Play), None, "{phase}");
        }
    }

    #[test]
    fn test_load_restarts_from_anywhere() {
        for phase in [
            PlaybackPhase::Playing,
            PlaybackPhase::Ended,
            PlaybackPhase::Error(PlaybackError::UnsupportedSource),
        ] {
            assert_eq!(phase.apply(Transition::Load), Some(PlaybackPhase::Loading));
        }
    }
}
