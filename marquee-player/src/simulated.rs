//! A media element that plays a silent clock instead of a video.
//!
//! Used by the `marquee` binary and by runtime tests. Events are delivered
//! through a [`PlayerHandle`], so it must be used inside a tokio runtime.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use log::trace;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use url::Url;

use crate::error::PlaybackError;
use crate::media::{LoadToken, MediaElement, MediaEvent};
use crate::runtime::PlayerHandle;

#[derive(Debug, Clone)]
pub struct SimulatedClip {
    /// Reported duration in seconds.
    pub duration: f64,
    /// Time from `load` until metadata (or failure) is reported.
    pub metadata_delay: Duration,
    /// Interval between progress reports while playing.
    pub tick: Duration,
}

impl Default for SimulatedClip {
    fn default() -> Self {
        Self {
            duration: 30.0,
            metadata_delay: Duration::from_millis(200),
            tick: Duration::from_millis(250),
        }
    }
}

#[derive(Debug)]
pub struct SimulatedMedia {
    handle: PlayerHandle,
    clip: SimulatedClip,
    failures: HashMap<Url, PlaybackError>,
    stalled: HashSet<Url>,
    fail_next: Option<PlaybackError>,
    token: Option<LoadToken>,
    position: f64,
    playing_since: Option<Instant>,
    loader: Option<JoinHandle<()>>,
    ticker: Option<JoinHandle<()>>,
}

impl SimulatedMedia {
    pub fn new(handle: PlayerHandle, clip: SimulatedClip) -> Self {
        Self {
            handle,
            clip,
            failures: HashMap::new(),
            stalled: HashSet::new(),
            fail_next: None,
            token: None,
            position: 0.0,
            playing_since: None,
            loader: None,
            ticker: None,
        }
    }

    /// Loads of `url` fail with `reason` once the metadata delay passes.
    pub fn fail_on(mut self, url: Url, reason: PlaybackError) -> Self {
        self.failures.insert(url, reason);
        self
    }

    /// The next load fails with `reason`, whatever its URL.
    pub fn fail_next(mut self, reason: PlaybackError) -> Self {
        self.fail_next = Some(reason);
        self
    }

    /// Loads of `url` never report anything.
    pub fn stall_on(mut self, url: Url) -> Self {
        self.stalled.insert(url);
        self
    }

    fn current_position(&self) -> f64 {
        match self.playing_since {
            Some(since) => (self.position + since.elapsed().as_secs_f64()).min(self.clip.duration),
            None => self.position,
        }
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    fn start_ticker(&mut self, token: LoadToken) {
        self.stop_ticker();
        let since = Instant::now();
        self.playing_since = Some(since);

        let from = self.position;
        let duration = self.clip.duration;
        let tick = self.clip.tick;
        let handle = self.handle.clone();

        self.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(since + tick, tick);
            loop {
                interval.tick().await;
                let current_time = (from + since.elapsed().as_secs_f64()).min(duration);
                if handle
                    .media_event(token, MediaEvent::TimeUpdate { current_time })
                    .is_err()
                {
                    break;
                }
                if current_time >= duration {
                    let _ = handle.media_event(token, MediaEvent::Ended);
                    break;
                }
            }
        }));
    }

    fn release(&mut self) {
        self.stop_ticker();
        if let Some(loader) = self.loader.take() {
            loader.abort();
        }
        self.playing_since = None;
        self.position = 0.0;
        self.token = None;
    }
}

impl MediaElement for SimulatedMedia {
    fn load(&mut self, token: LoadToken, url: &Url) {
        self.release();
        self.token = Some(token);

        if self.stalled.contains(url) {
            trace!("[Simulated] {} stalls", url);
            return;
        }

        let failure = self.fail_next.take().or_else(|| self.failures.get(url).copied());
        let event = match failure {
            Some(reason) => MediaEvent::Failed(reason),
            None => MediaEvent::MetadataLoaded {
                duration: self.clip.duration,
            },
        };
        let delay = self.clip.metadata_delay;
        let handle = self.handle.clone();
        self.loader = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = handle.media_event(token, event);
        }));
    }

    fn play(&mut self) {
        let Some(token) = self.token else {
            return;
        };
        if self.playing_since.is_some() {
            return;
        }
        let _ = self.handle.media_event(token, MediaEvent::Played);
        self.start_ticker(token);
    }

    fn pause(&mut self) {
        let Some(token) = self.token else {
            return;
        };
        if self.playing_since.is_none() {
            return;
        }
        self.position = self.current_position();
        self.playing_since = None;
        self.stop_ticker();
        let _ = self.handle.media_event(token, MediaEvent::Paused);
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.position = seconds.max(0.0).min(self.clip.duration);
        // Restart the clock from the new position when running
        if let (Some(token), Some(_)) = (self.token, self.playing_since) {
            self.start_ticker(token);
        }
    }

    fn set_volume(&mut self, volume: f64) {
        trace!("[Simulated] Volume {:.2}", volume);
    }

    fn unload(&mut self) {
        self.release();
    }
}

impl Drop for SimulatedMedia {
    fn drop(&mut self) {
        self.release();
    }
}
