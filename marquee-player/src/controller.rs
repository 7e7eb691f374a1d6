//! The playback controller: one session, one media element, one host.

use std::fmt;
use std::time::Instant;

use log::{debug, info, trace, warn};

use crate::config::PlayerConfig;
use crate::error::PlaybackError;
use crate::host::PlayerHost;
use crate::keyboard::KeyAction;
use crate::machine::{PlaybackPhase, Transition};
use crate::media::{LoadToken, MediaElement, MediaEvent, SourceDescriptor};
use crate::messages::Command;
use crate::notification::Notification;
use crate::overlay::ControlOverlay;
use crate::progress::{ControlLayout, format_time};
use crate::session::PlaybackSession;
use crate::view::{ControlsView, FullscreenIcon, PlayIcon, Surface};
use crate::volume::VolumeState;

/// Bar currently held down by the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    Progress,
    Volume,
}

pub struct PlaybackController<M, H> {
    config: PlayerConfig,
    media: M,
    host: H,
    session: PlaybackSession,
    overlay: ControlOverlay,
    layout: ControlLayout,
    drag: Option<DragTarget>,
    load_deadline: Option<Instant>,
    notification: Option<Notification>,
    terminal_reported: bool,
    fallback_pending: bool,
    attached: bool,
}

impl<M, H> fmt::Debug for PlaybackController<M, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackController")
            .field("session", &self.session)
            .field("overlay", &self.overlay)
            .field("drag", &self.drag)
            .field("load_deadline", &self.load_deadline)
            .field("attached", &self.attached)
            .finish()
    }
}

impl<M: MediaElement, H: PlayerHost> PlaybackController<M, H> {
    pub fn new(config: PlayerConfig, media: M, host: H, layout: ControlLayout) -> Self {
        let volume = VolumeState::new(config.initial_volume);
        let overlay = ControlOverlay::new(config.controls_hide_delay);
        Self {
            config,
            media,
            host,
            session: PlaybackSession::new(volume),
            overlay,
            layout,
            drag: None,
            load_deadline: None,
            notification: None,
            terminal_reported: false,
            fallback_pending: false,
            attached: false,
        }
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.session.phase()
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay.is_visible()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn drag(&self) -> Option<DragTarget> {
        self.drag
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Begin a session on `source`.
    pub fn attach(&mut self, source: SourceDescriptor, now: Instant) {
        info!("[Player] Attaching to {} source {}", source.kind, source.url);
        self.attached = true;
        self.load(source, now);
    }

    /// Tear the session down: cancel every timer and release the source.
    /// Events from the released source are ignored afterwards.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        info!("[Player] Detaching");
        self.media.unload();
        self.session.end();
        self.load_deadline = None;
        self.overlay.pin();
        self.notification = None;
        self.drag = None;
        self.terminal_reported = false;
        self.fallback_pending = false;
        self.attached = false;
    }

    /// Earliest pending timer, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.load_deadline, self.overlay.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Fire every timer due at `now`.
    pub fn on_deadline(&mut self, now: Instant) {
        if let Some(deadline) = self.load_deadline
            && deadline <= now
        {
            self.load_deadline = None;
            if self.session.phase().is_loading() {
                warn!(
                    "[Player] Metadata not resolved within {:?}",
                    self.config.load_timeout
                );
                self.fail(PlaybackError::LoadTimeout, now);
            }
        }

        if self.overlay.on_deadline(now, self.session.is_playing()) {
            trace!("[Player] Controls hidden after idle timeout");
        }
    }

    /// Apply one command from the host.
    pub fn update(&mut self, command: Command, now: Instant) {
        match command {
            Command::Load(source) => {
                self.attached = true;
                self.load(source, now);
            }
            Command::Retry => self.retry(now),
            Command::FallbackUnavailable => self.fallback_unavailable(),

            Command::Play => self.play(now),
            Command::Pause => self.pause(),
            Command::PlayPause => self.toggle_playback(now),

            Command::SeekRelative(delta) => self.seek_relative(delta, now),
            Command::SeekTo(time) => {
                if self.can_seek() {
                    let applied = self.session.seek_to(time);
                    self.media.set_current_time(applied);
                    self.overlay.reveal(now, self.session.is_playing());
                }
            }
            Command::ProgressClicked { x } => self.seek_to_pointer(x, now),
            Command::ProgressPressed { x } => {
                if self.can_seek() {
                    self.drag = Some(DragTarget::Progress);
                    self.seek_to_pointer(x, now);
                }
            }

            Command::SetVolume(level) => {
                self.session.volume.set(level);
                self.sync_volume();
            }
            Command::StepVolume(delta) => {
                self.session.volume.step(delta);
                self.sync_volume();
            }
            Command::ToggleMute => {
                self.session.volume.toggle_mute();
                self.sync_volume();
            }
            Command::VolumeClicked { x } => self.volume_to_pointer(x),
            Command::VolumePressed { x } => {
                self.drag = Some(DragTarget::Volume);
                self.volume_to_pointer(x);
            }

            Command::PointerMoved { x } => match self.drag {
                Some(DragTarget::Progress) => self.seek_to_pointer(x, now),
                Some(DragTarget::Volume) => self.volume_to_pointer(x),
                None => {}
            },
            Command::PointerReleased => {
                if let Some(target) = self.drag.take() {
                    trace!("[Player] Drag on {:?} released", target);
                }
            }

            Command::ToggleFullscreen => self.toggle_fullscreen(),
            Command::ExitFullscreen => {
                if self.session.fullscreen {
                    self.host.exit_fullscreen();
                }
            }
            Command::FullscreenChanged(fullscreen) => {
                debug!("[Player] Fullscreen changed: {}", fullscreen);
                self.session.fullscreen = fullscreen;
            }

            Command::Activity(_) => self.overlay.reveal(now, self.session.is_playing()),
            Command::PointerLeft => self.overlay.arm(now),

            Command::Key(action) => self.apply_key(action, now),
            Command::LayoutChanged(layout) => self.layout = layout,

            Command::Media { token, event } => self.on_media_event(token, event, now),
        }
    }

    /// Snapshot for rendering. Expired notifications are left out.
    pub fn view(&self, now: Instant) -> ControlsView {
        let phase = self.session.phase();
        let surface = match phase {
            PlaybackPhase::Idle | PlaybackPhase::Loading => Surface::Loading,
            PlaybackPhase::Error(_) => Surface::Error,
            _ => Surface::Video,
        };

        ControlsView {
            phase,
            surface,
            play_icon: if phase.is_playing() {
                PlayIcon::Pause
            } else {
                PlayIcon::Play
            },
            progress: self.session.progress_fraction(),
            elapsed: format_time(self.session.current_time()),
            total: format_time(self.session.duration()),
            volume: self.session.volume.effective(),
            volume_band: self.session.volume.band(),
            fullscreen_icon: if self.session.fullscreen {
                FullscreenIcon::Exit
            } else {
                FullscreenIcon::Enter
            },
            overlay_visible: self.overlay.is_visible(),
            notification: self
                .notification
                .as_ref()
                .filter(|n| n.is_live(now))
                .map(|n| n.message.clone()),
            can_retry: phase.error().is_some() && !self.fallback_pending,
        }
    }

    fn load(&mut self, source: SourceDescriptor, now: Instant) {
        let url = source.url.clone();
        let token = self.session.begin_load(source);
        self.load_deadline = Some(now + self.config.load_timeout);
        self.terminal_reported = false;
        self.fallback_pending = false;
        self.drag = None;
        self.overlay.pin();

        debug!("[Player] Loading {} (token {})", url, token.0);
        self.media.load(token, &url);
        self.media.set_volume(self.session.volume.effective());
    }

    fn retry(&mut self, now: Instant) {
        if self.session.phase().error().is_none() {
            return;
        }
        match self.session.source.clone() {
            Some(source) => {
                info!("[Player] Retrying {} source", source.kind);
                self.load(source, now);
            }
            None => debug!("[Player] Retry requested with no source"),
        }
    }

    fn play(&mut self, now: Instant) {
        let restarting = self.session.phase() == PlaybackPhase::Ended;
        if self.session.transition(Transition::Play).is_none() {
            return;
        }
        if restarting {
            self.session.seek_to(0.0);
            self.media.set_current_time(0.0);
        }
        self.media.play();
        self.overlay.reveal(now, true);
    }

    fn pause(&mut self) {
        if self.session.transition(Transition::Pause).is_none() {
            return;
        }
        self.media.pause();
        self.overlay.pin();
    }

    fn toggle_playback(&mut self, now: Instant) {
        if self.session.is_playing() {
            self.pause();
        } else {
            self.play(now);
        }
    }

    /// Seeking needs a known duration: media attached and metadata resolved.
    fn can_seek(&self) -> bool {
        let phase = self.session.phase();
        phase.has_media() && !phase.is_loading()
    }

    fn seek_relative(&mut self, delta: f64, now: Instant) {
        if !self.can_seek() {
            return;
        }
        let ack = self.session.seek_by(delta);
        self.media.set_current_time(self.session.current_time());
        self.overlay.reveal(now, self.session.is_playing());
        self.show(Notification::seek(ack, now, self.config.notification_ttl));
    }

    fn seek_to_pointer(&mut self, x: f64, now: Instant) {
        if !self.can_seek() {
            return;
        }
        let fraction = self.layout.progress_bar.fraction_at(x);
        let applied = self.session.seek_fraction(fraction);
        self.media.set_current_time(applied);
        self.overlay.reveal(now, self.session.is_playing());
    }

    fn volume_to_pointer(&mut self, x: f64) {
        let fraction = self.layout.volume_slider.fraction_at(x);
        self.session.volume.set(fraction);
        self.sync_volume();
    }

    fn sync_volume(&mut self) {
        let volume = self.session.volume;
        trace!(
            "[Player] Volume {:.2} (muted: {}, band: {:?})",
            volume.level(),
            volume.is_muted(),
            volume.band()
        );
        self.media.set_volume(volume.effective());
    }

    fn toggle_fullscreen(&mut self) {
        if self.session.fullscreen {
            self.host.exit_fullscreen();
        } else {
            self.host.request_fullscreen();
        }
    }

    fn apply_key(&mut self, action: KeyAction, now: Instant) {
        match action {
            KeyAction::TogglePlayback => self.toggle_playback(now),
            KeyAction::Seek(steps) => {
                self.seek_relative(f64::from(steps) * self.config.seek_step_secs, now)
            }
            KeyAction::Volume(steps) => {
                self.session
                    .volume
                    .step(f64::from(steps) * self.config.volume_step);
                self.sync_volume();
            }
            KeyAction::ToggleMute => {
                self.session.volume.toggle_mute();
                self.sync_volume();
            }
            KeyAction::ToggleFullscreen => self.toggle_fullscreen(),
            KeyAction::ExitFullscreen => {
                if self.session.fullscreen {
                    self.host.exit_fullscreen();
                }
            }
        }
    }

    fn on_media_event(&mut self, token: LoadToken, event: MediaEvent, now: Instant) {
        if !self.attached || token != self.session.token {
            trace!(
                "[Player] Dropping stale {:?} (token {}, current {})",
                event, token.0, self.session.token.0
            );
            return;
        }

        match event {
            MediaEvent::MetadataLoaded { duration } => {
                self.session.set_duration(duration);
                if self.session.transition(Transition::MetadataReady).is_some() {
                    self.load_deadline = None;
                    info!(
                        "[Player] Ready: duration {}",
                        format_time(self.session.duration())
                    );
                }
            }
            MediaEvent::TimeUpdate { current_time } => {
                if self.drag != Some(DragTarget::Progress) {
                    self.session.seek_to(current_time);
                }
            }
            MediaEvent::Played => {
                if self.session.transition(Transition::Play).is_some() {
                    self.overlay.reveal(now, true);
                }
            }
            MediaEvent::Paused => {
                if self.session.transition(Transition::Pause).is_some() {
                    self.overlay.pin();
                }
            }
            MediaEvent::Ended => {
                let duration = self.session.duration();
                self.session.seek_to(duration);
                if self.session.transition(Transition::Complete).is_some() {
                    info!("[Player] Playback ended");
                    self.overlay.pin();
                    self.show(Notification::ended(now, self.config.notification_ttl));
                }
            }
            MediaEvent::Failed(reason) => self.fail(reason, now),
        }
    }

    /// Enter `Error` and apply the fallback policy: one retry with the
    /// fallback class, then a single terminal report.
    fn fail(&mut self, reason: PlaybackError, now: Instant) {
        if self.session.transition(Transition::Fail(reason)).is_none() {
            debug!(
                "[Player] Ignoring {} in phase {}",
                reason.code(),
                self.session.phase()
            );
            return;
        }
        self.load_deadline = None;
        self.drag = None;
        self.overlay.pin();

        let fallback = self
            .session
            .source
            .as_ref()
            .and_then(|source| source.kind.fallback());

        match fallback {
            Some(kind) => {
                warn!(
                    "[Player] Source failed ({}); retrying with {}",
                    reason.code(),
                    kind
                );
                self.show(Notification::fallback(now, self.config.notification_ttl));
                self.fallback_pending = true;
                self.host.request_fallback(kind);
            }
            None => {
                warn!("[Player] Fallback source failed: {}", reason);
                self.report_terminal(reason);
            }
        }
    }

    /// The host could not resolve the fallback it was asked for.
    fn fallback_unavailable(&mut self) {
        if !self.fallback_pending {
            debug!("[Player] Ignoring unavailable fallback; none was requested");
            return;
        }
        self.fallback_pending = false;
        warn!("[Player] No fallback source available");
        self.report_terminal(PlaybackError::NoPlayableSource);
    }

    fn report_terminal(&mut self, reason: PlaybackError) {
        if !self.terminal_reported {
            self.terminal_reported = true;
            self.host.on_terminal_error(reason);
        }
    }

    fn show(&mut self, notification: Notification) {
        self.host.notify(&notification);
        self.notification = Some(notification);
    }
}
