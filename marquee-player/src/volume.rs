//! Volume level with a mute flag layered on top.

use crate::progress::clamp_unit;

/// Indicator band for the volume icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeBand {
    /// Muted, or volume at zero.
    Muted,
    /// `0 < volume < 0.5`
    Low,
    /// `volume >= 0.5`
    Normal,
}

impl VolumeBand {
    /// Band for a mute flag and level. Recomputed on every change.
    pub fn for_state(muted: bool, volume: f64) -> Self {
        if muted || volume <= 0.0 {
            VolumeBand::Muted
        } else if volume < 0.5 {
            VolumeBand::Low
        } else {
            VolumeBand::Normal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeState {
    level: f64,
    muted: bool,
}

impl Default for VolumeState {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl VolumeState {
    pub fn new(level: f64) -> Self {
        Self {
            level: clamp_unit(level),
            muted: false,
        }
    }

    /// Level that reaches the speakers: 0 while muted.
    pub fn effective(&self) -> f64 {
        if self.muted { 0.0 } else { self.level }
    }

    /// The stored level, kept across mute/unmute.
    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn band(&self) -> VolumeBand {
        VolumeBand::for_state(self.muted, self.level)
    }

    /// Set an absolute level. Unmutes.
    pub fn set(&mut self, level: f64) {
        self.level = clamp_unit(level);
        self.muted = false;
    }

    /// Step relative to what is currently audible. Unmutes.
    ///
    /// While muted the audible level is 0, so stepping up from mute starts
    /// from silence rather than from the stored level.
    pub fn step(&mut self, delta: f64) {
        let base = self.effective();
        self.set(base + delta);
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }
}
