use crate::machine::{PlaybackPhase, Transition};
use crate::media::{LoadToken, SourceDescriptor};
use crate::progress::{SeekAck, clamp_time, sanitize_duration};
use crate::volume::VolumeState;

/// The single live playback session of a controller.
///
/// Volume and fullscreen survive a source change; everything else is reset
/// by [`PlaybackSession::begin_load`].
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    pub source: Option<SourceDescriptor>,
    pub token: LoadToken,
    phase: PlaybackPhase,
    current_time: f64,
    duration: f64,
    pub volume: VolumeState,
    pub fullscreen: bool,
}

impl PlaybackSession {
    pub fn new(volume: VolumeState) -> Self {
        Self {
            source: None,
            token: LoadToken::default(),
            phase: PlaybackPhase::Idle,
            current_time: 0.0,
            duration: 0.0,
            volume,
            fullscreen: false,
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_playing(&self) -> bool {
        self.phase.is_playing()
    }

    /// Whether the current source is already the fallback class.
    pub fn is_fallback(&self) -> bool {
        self.source
            .as_ref()
            .map(|source| source.kind.is_fallback())
            .unwrap_or(false)
    }

    /// Apply a transition; returns the new phase when it changed.
    pub fn transition(&mut self, transition: Transition) -> Option<PlaybackPhase> {
        let next = self.phase.apply(transition)?;
        log::debug!("[Player] {} --{:?}--> {}", self.phase, transition, next);
        self.phase = next;
        Some(next)
    }

    /// Start a new load attempt, invalidating the previous token.
    pub fn begin_load(&mut self, source: SourceDescriptor) -> LoadToken {
        self.token = self.token.next();
        self.source = Some(source);
        self.current_time = 0.0;
        self.duration = 0.0;
        self.transition(Transition::Load);
        self.token
    }

    pub fn end(&mut self) {
        self.transition(Transition::Reset);
        self.source = None;
        self.current_time = 0.0;
        self.duration = 0.0;
        self.token = self.token.next();
    }

    pub fn set_duration(&mut self, duration: f64) {
        self.duration = sanitize_duration(duration);
        self.current_time = clamp_time(self.current_time, self.duration);
    }

    /// Absolute seek, clamped to `[0, duration]`. Returns the applied time.
    pub fn seek_to(&mut self, time: f64) -> f64 {
        self.current_time = clamp_time(time, self.duration);
        self.current_time
    }

    /// Relative seek. The acknowledgement carries the requested delta.
    pub fn seek_by(&mut self, delta: f64) -> SeekAck {
        self.seek_to(self.current_time + delta);
        SeekAck { delta }
    }

    /// Seek to a fraction of the duration.
    pub fn seek_fraction(&mut self, fraction: f64) -> f64 {
        self.seek_to(fraction * self.duration)
    }

    pub fn progress_fraction(&self) -> f64 {
        if self.duration > 0.0 {
            self.current_time / self.duration
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_metadata::SourceKind;
    use url::Url;

    fn loaded_session(duration: f64) -> PlaybackSession {
        let mut session = PlaybackSession::new(VolumeState::default());
        let url = Url::parse("https://example.com/clip.mp4").unwrap();
        session.begin_load(SourceDescriptor::new(url, SourceKind::Full));
        session.set_duration(duration);
        session.transition(Transition::MetadataReady);
        session
    }

    #[test]
    fn rewind_past_start_clamps_to_zero() {
        let mut session = loaded_session(120.0);
        session.seek_to(5.0);

        let ack = session.seek_by(-10.0);

        assert_eq!(session.current_time(), 0.0);
        assert_eq!(ack.to_string(), "Rewind 10s");
    }

    #[test]
    fn relative_seeks_stay_within_duration() {
        for duration in [0.0, 30.0, 120.0] {
            for start in [0.0, 5.0, 29.0, 119.0] {
                for delta in [-1000.0, -10.0, -0.5, 0.0, 0.5, 10.0, 1000.0] {
                    let mut session = loaded_session(duration);
                    session.seek_to(start);
                    session.seek_by(delta);
                    let t = session.current_time();
                    assert!(
                        (0.0..=duration).contains(&t),
                        "start {start} delta {delta} duration {duration} -> {t}"
                    );
                }
            }
        }
    }

    #[test]
    fn fractional_seek_hits_exact_positions() {
        let mut session = loaded_session(120.0);
        for (fraction, expected) in [(0.0, 0.0), (0.5, 60.0), (1.0, 120.0)] {
            session.seek_fraction(fraction);
            assert_eq!(session.current_time(), expected);
        }
    }

    #[test]
    fn each_load_gets_a_fresh_token() {
        let mut session = loaded_session(10.0);
        let first = session.token;
        let url = Url::parse("https://example.com/trailer.mp4").unwrap();
        let second = session.begin_load(SourceDescriptor::new(url, SourceKind::Trailer));

        assert!(second > first);
        assert_eq!(session.phase(), PlaybackPhase::Loading);
        assert_eq!(session.duration(), 0.0);
        assert!(session.is_fallback());
    }
}
