//! The media element seam: the video resource the controller drives.

use marquee_metadata::SourceKind;
use url::Url;

use crate::error::PlaybackError;

/// Identifies one load attempt. Events tagged with an older token belong to
/// a torn-down attempt and are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct LoadToken(pub u64);

impl LoadToken {
    pub fn next(self) -> Self {
        LoadToken(self.0.wrapping_add(1))
    }
}

/// A source to load, as resolved by the metadata provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub url: Url,
    pub kind: SourceKind,
}

impl SourceDescriptor {
    pub fn new(url: Url, kind: SourceKind) -> Self {
        Self { url, kind }
    }
}

/// Asynchronous notifications from the media element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    /// Enough metadata resolved to know the duration.
    MetadataLoaded { duration: f64 },
    TimeUpdate { current_time: f64 },
    Played,
    Paused,
    Ended,
    Failed(PlaybackError),
}

/// The video resource. Commands are fire-and-forget; outcomes come back as
/// [`MediaEvent`]s tagged with the token passed to [`MediaElement::load`].
#[cfg_attr(test, mockall::automock)]
pub trait MediaElement {
    fn load(&mut self, token: LoadToken, url: &Url);
    fn play(&mut self);
    fn pause(&mut self);
    fn set_current_time(&mut self, seconds: f64);
    fn set_volume(&mut self, volume: f64);
    /// Release the current source and stop emitting events for it.
    fn unload(&mut self);
}
