//! The navigation host seam: the page around the player.

use marquee_metadata::SourceKind;

use crate::error::PlaybackError;
use crate::notification::Notification;

/// Callbacks from the controller to whatever embeds it.
///
/// Fullscreen changes are requested here and confirmed later through
/// [`crate::messages::Command::FullscreenChanged`]; the controller never
/// assumes a request succeeded.
#[cfg_attr(test, mockall::automock)]
pub trait PlayerHost {
    fn request_fullscreen(&mut self);
    fn exit_fullscreen(&mut self);

    /// A non-fallback source failed; resolve a source of `kind` and load it.
    fn request_fallback(&mut self, kind: SourceKind);

    /// The fallback source failed too. Fired once per failed session.
    fn on_terminal_error(&mut self, reason: PlaybackError);

    fn notify(&mut self, notification: &Notification);
}
