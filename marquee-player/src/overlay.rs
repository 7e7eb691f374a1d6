//! Auto-hiding control overlay.

use std::time::{Duration, Instant};

/// Pointer and touch activity inside the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    PointerMove,
    TouchStart,
    TouchEnd,
}

/// Visibility of the control overlay and its pending hide timer.
///
/// The overlay is always visible unless playback is running and the hide
/// timer has fired since the last activity.
#[derive(Debug, Clone)]
pub struct ControlOverlay {
    visible: bool,
    hide_at: Option<Instant>,
    hide_delay: Duration,
}

impl ControlOverlay {
    pub fn new(hide_delay: Duration) -> Self {
        Self {
            visible: true,
            hide_at: None,
            hide_delay,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// When the pending hide timer fires, if one is armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.hide_at
    }

    /// Activity inside the player: show the controls and restart the idle
    /// countdown when playing.
    pub fn reveal(&mut self, now: Instant, playing: bool) {
        self.visible = true;
        self.hide_at = None;
        if playing {
            self.arm(now);
        }
    }

    /// (Re)arm the hide timer, e.g. when the pointer leaves the player.
    pub fn arm(&mut self, now: Instant) {
        self.hide_at = Some(now + self.hide_delay);
    }

    /// Playback stopped (paused, ended, failed, loading): pin the controls.
    pub fn pin(&mut self) {
        self.visible = true;
        self.hide_at = None;
    }

    /// Fire the hide timer if it is due. Hides only while `playing`.
    ///
    /// Returns true when visibility changed.
    pub fn on_deadline(&mut self, now: Instant, playing: bool) -> bool {
        match self.hide_at {
            Some(at) if at <= now => {
                self.hide_at = None;
                if playing && self.visible {
                    self.visible = false;
                    return true;
                }
                false
            }
            _ => false,
        }
    }
}
