//! Seek and progress-bar math.

use std::fmt;

/// Horizontal extent of a bar-shaped control, in the host's pointer coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarRect {
    pub left: f64,
    pub width: f64,
}

impl BarRect {
    pub const fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Fractional position `f ∈ [0, 1]` of a pointer at `x` along the bar.
    ///
    /// Positions left of the bar map to 0, right of it to 1. A bar with no
    /// rendered width maps everything to 0.
    pub fn fraction_at(&self, x: f64) -> f64 {
        if self.width.is_nan() || self.width <= 0.0 {
            return 0.0;
        }
        clamp_unit((x - self.left) / self.width)
    }
}

/// Bounding boxes of the bar-shaped controls, supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlLayout {
    pub progress_bar: BarRect,
    pub volume_slider: BarRect,
}

impl Default for ControlLayout {
    fn default() -> Self {
        Self {
            progress_bar: BarRect::new(0.0, 0.0),
            volume_slider: BarRect::new(0.0, 0.0),
        }
    }
}

/// Clamp into `[0, 1]`, treating NaN as 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

/// Sanitize a duration reported by the media: negative, NaN or infinite
/// durations are unknown (0).
pub fn sanitize_duration(duration: f64) -> f64 {
    if duration.is_finite() && duration > 0.0 {
        duration
    } else {
        0.0
    }
}

/// Clamp a playback position into `[0, duration]`.
pub fn clamp_time(time: f64, duration: f64) -> f64 {
    if time.is_nan() {
        return 0.0;
    }
    time.clamp(0.0, sanitize_duration(duration))
}

/// Format seconds as `m:ss`; minutes unpadded, seconds padded to two digits.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// User-visible acknowledgement of a relative seek.
///
/// Carries the requested delta, not the clamped distance actually moved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekAck {
    pub delta: f64,
}

impl SeekAck {
    pub fn is_rewind(&self) -> bool {
        self.delta < 0.0
    }
}

impl fmt::Display for SeekAck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.is_rewind() { "Rewind" } else { "Forward" };
        write!(f, "{} {}s", label, self.delta.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_maps_offset_within_bar() {
        let bar = BarRect::new(100.0, 400.0);
        assert_eq!(bar.fraction_at(100.0), 0.0);
        assert_eq!(bar.fraction_at(300.0), 0.5);
        assert_eq!(bar.fraction_at(500.0), 1.0);
    }

    #[test]
    fn fraction_clamps_outside_bar() {
        let bar = BarRect::new(100.0, 400.0);
        assert_eq!(bar.fraction_at(20.0), 0.0);
        assert_eq!(bar.fraction_at(900.0), 1.0);
        assert_eq!(BarRect::new(0.0, 0.0).fraction_at(10.0), 0.0);
        assert_eq!(bar.fraction_at(f64::NAN), 0.0);
    }

    #[test]
    fn clamp_time_stays_in_range() {
        for duration in [0.0, 1.0, 120.0, 5400.5] {
            for time in [-50.0, -0.1, 0.0, 3.0, 119.9, 120.0, 10_000.0] {
                let clamped = clamp_time(time, duration);
                assert!((0.0..=duration).contains(&clamped), "{time} in {duration}");
            }
        }
        assert_eq!(clamp_time(f64::NAN, 120.0), 0.0);
        assert_eq!(clamp_time(30.0, f64::NAN), 0.0);
    }

    #[test]
    fn formats_minutes_and_padded_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(5.9), "0:05");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(600.0), "10:00");
        assert_eq!(format_time(7384.0), "123:04");
        assert_eq!(format_time(f64::NAN), "0:00");
    }

    #[test]
    fn ack_reports_requested_delta() {
        assert_eq!(SeekAck { delta: -10.0 }.to_string(), "Rewind 10s");
        assert_eq!(SeekAck { delta: 10.0 }.to_string(), "Forward 10s");
        assert_eq!(SeekAck { delta: 2.5 }.to_string(), "Forward 2.5s");
    }
}
