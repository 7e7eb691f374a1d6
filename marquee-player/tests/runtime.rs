use std::time::Duration;

use marquee_metadata::SourceKind;
use marquee_player::host::PlayerHost;
use marquee_player::keyboard::{FocusTarget, Key, bind};
use marquee_player::runtime::{self, PlayerHandle};
use marquee_player::simulated::{SimulatedClip, SimulatedMedia};
use marquee_player::{
    Command, ControlLayout, Notification, PlaybackController, PlaybackError, PlaybackPhase,
    PlayerConfig, RuntimeError, SourceDescriptor,
};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use url::Url;

#[derive(Debug, Clone, PartialEq)]
enum HostCall {
    Fullscreen(bool),
    Fallback(SourceKind),
    Terminal(PlaybackError),
    Notify(String),
}

/// Records every callback; answers fallback requests with `trailer`, or
/// reports the fallback unavailable when there is none.
#[derive(Debug)]
struct RecordingHost {
    handle: PlayerHandle,
    trailer: Option<SourceDescriptor>,
    calls: Vec<HostCall>,
}

impl PlayerHost for RecordingHost {
    fn request_fullscreen(&mut self) {
        self.calls.push(HostCall::Fullscreen(true));
        self.handle.send(Command::FullscreenChanged(true)).unwrap();
    }

    fn exit_fullscreen(&mut self) {
        self.calls.push(HostCall::Fullscreen(false));
        self.handle.send(Command::FullscreenChanged(false)).unwrap();
    }

    fn request_fallback(&mut self, kind: SourceKind) {
        self.calls.push(HostCall::Fallback(kind));
        let command = match self.trailer.clone() {
            Some(trailer) => Command::Load(trailer),
            None => Command::FallbackUnavailable,
        };
        self.handle.send(command).unwrap();
    }

    fn on_terminal_error(&mut self, reason: PlaybackError) {
        self.calls.push(HostCall::Terminal(reason));
    }

    fn notify(&mut self, notification: &Notification) {
        self.calls.push(HostCall::Notify(notification.message.clone()));
    }
}

type Player = PlaybackController<SimulatedMedia, RecordingHost>;

fn feature() -> SourceDescriptor {
    SourceDescriptor::new(
        Url::parse("https://cdn.example.com/feature.mp4").unwrap(),
        SourceKind::Full,
    )
}

fn trailer() -> SourceDescriptor {
    SourceDescriptor::new(
        Url::parse("https://cdn.example.com/trailer.mp4").unwrap(),
        SourceKind::Trailer,
    )
}

fn clip() -> SimulatedClip {
    SimulatedClip {
        duration: 5.0,
        metadata_delay: Duration::from_millis(200),
        tick: Duration::from_millis(250),
    }
}

fn spawn_player(
    configure: impl FnOnce(SimulatedMedia) -> SimulatedMedia,
    fallback: Option<SourceDescriptor>,
) -> (PlayerHandle, JoinHandle<Player>) {
    let (handle, inbox) = runtime::channel();
    let media = configure(SimulatedMedia::new(handle.clone(), clip()));
    let host = RecordingHost {
        handle: handle.clone(),
        trailer: fallback,
        calls: Vec::new(),
    };
    let controller = PlaybackController::new(
        PlayerConfig::default(),
        media,
        host,
        ControlLayout::default(),
    );
    (handle, tokio::spawn(runtime::run(controller, inbox)))
}

async fn finish(handle: PlayerHandle, player: JoinHandle<Player>) -> Vec<HostCall> {
    handle.shutdown().unwrap();
    let controller = player.await.unwrap();
    assert!(!controller.is_attached());
    controller.host().calls.clone()
}

#[tokio::test(start_paused = true)]
async fn trailer_plays_through_to_the_end() {
    let (handle, player) = spawn_player(|media| media, None);
    handle.attach(trailer()).unwrap();

    sleep(Duration::from_millis(300)).await;
    let view = handle.snapshot().await.unwrap();
    assert_eq!(view.phase, PlaybackPhase::Ready);
    assert_eq!(view.total, "0:05");

    let space = bind(Key::Space, FocusTarget::Player).unwrap();
    handle.send(Command::Key(space)).unwrap();

    sleep(Duration::from_millis(3100)).await;
    let view = handle.snapshot().await.unwrap();
    assert_eq!(view.phase, PlaybackPhase::Playing);
    assert!(!view.overlay_visible);
    assert_eq!(view.elapsed, "0:03");

    sleep(Duration::from_secs(3)).await;
    let view = handle.snapshot().await.unwrap();
    assert_eq!(view.phase, PlaybackPhase::Ended);
    assert!(view.overlay_visible);
    assert_eq!(view.elapsed, "0:05");

    let calls = finish(handle, player).await;
    assert_eq!(
        calls,
        vec![HostCall::Notify(
            "Video ended. Check out related content below!".to_string()
        )]
    );
}

#[tokio::test(start_paused = true)]
async fn failed_feature_falls_back_to_trailer() {
    let (handle, player) = spawn_player(
        |media| media.fail_on(feature().url, PlaybackError::NetworkFailure),
        Some(trailer()),
    );
    handle.attach(feature()).unwrap();

    sleep(Duration::from_millis(600)).await;
    let view = handle.snapshot().await.unwrap();
    assert_eq!(view.phase, PlaybackPhase::Ready);

    handle.send(Command::Play).unwrap();
    sleep(Duration::from_millis(100)).await;
    assert_eq!(
        handle.snapshot().await.unwrap().phase,
        PlaybackPhase::Playing
    );

    let calls = finish(handle, player).await;
    assert_eq!(
        calls,
        vec![
            HostCall::Notify("Movie not available. Trying to load trailer...".to_string()),
            HostCall::Fallback(SourceKind::Trailer),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn failing_fallback_reports_once() {
    let (handle, player) = spawn_player(
        |media| {
            media
                .fail_on(feature().url, PlaybackError::NetworkFailure)
                .fail_on(trailer().url, PlaybackError::UnsupportedSource)
        },
        Some(trailer()),
    );
    handle.attach(feature()).unwrap();

    sleep(Duration::from_secs(1)).await;
    let view = handle.snapshot().await.unwrap();
    assert_eq!(
        view.phase,
        PlaybackPhase::Error(PlaybackError::UnsupportedSource)
    );
    assert!(view.can_retry);

    // Nothing else fires while sitting in the error state
    sleep(Duration::from_secs(30)).await;

    let calls = finish(handle, player).await;
    let terminal: Vec<_> = calls
        .iter()
        .filter(|call| matches!(call, HostCall::Terminal(_)))
        .collect();
    assert_eq!(
        terminal,
        vec![&HostCall::Terminal(PlaybackError::UnsupportedSource)]
    );
}

#[tokio::test(start_paused = true)]
async fn missing_trailer_is_reported_as_no_playable_source() {
    let (handle, player) = spawn_player(
        |media| media.fail_on(feature().url, PlaybackError::NetworkFailure),
        None,
    );
    handle.attach(feature()).unwrap();

    sleep(Duration::from_secs(60)).await;
    let view = handle.snapshot().await.unwrap();
    assert_eq!(
        view.phase,
        PlaybackPhase::Error(PlaybackError::NetworkFailure)
    );
    assert!(view.can_retry);

    let calls = finish(handle, player).await;
    assert_eq!(
        calls,
        vec![
            HostCall::Notify("Movie not available. Trying to load trailer...".to_string()),
            HostCall::Fallback(SourceKind::Trailer),
            HostCall::Terminal(PlaybackError::NoPlayableSource),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn stalled_load_times_out() {
    let (handle, player) = spawn_player(|media| media.stall_on(trailer().url), None);
    handle.attach(trailer()).unwrap();

    sleep(Duration::from_millis(9_900)).await;
    assert_eq!(
        handle.snapshot().await.unwrap().phase,
        PlaybackPhase::Loading
    );

    sleep(Duration::from_millis(200)).await;
    assert_eq!(
        handle.snapshot().await.unwrap().phase,
        PlaybackPhase::Error(PlaybackError::LoadTimeout)
    );

    let calls = finish(handle, player).await;
    assert_eq!(calls, vec![HostCall::Terminal(PlaybackError::LoadTimeout)]);
}

#[tokio::test(start_paused = true)]
async fn fullscreen_round_trip_through_host() {
    let (handle, player) = spawn_player(|media| media, None);
    handle.attach(trailer()).unwrap();
    sleep(Duration::from_millis(300)).await;

    handle.send(Command::ToggleFullscreen).unwrap();
    sleep(Duration::from_millis(10)).await;
    let escape = bind(Key::Escape, FocusTarget::Page).unwrap();
    handle.send(Command::Key(escape)).unwrap();
    sleep(Duration::from_millis(10)).await;

    let calls = finish(handle, player).await;
    assert_eq!(
        calls,
        vec![HostCall::Fullscreen(true), HostCall::Fullscreen(false)]
    );
}

#[tokio::test(start_paused = true)]
async fn detached_player_ignores_late_media() {
    let (handle, player) = spawn_player(|media| media, None);
    handle.attach(trailer()).unwrap();
    handle.detach().unwrap();

    sleep(Duration::from_secs(1)).await;
    let view = handle.snapshot().await.unwrap();
    assert_eq!(view.phase, PlaybackPhase::Idle);
    assert_eq!(view.total, "0:00");

    assert!(finish(handle, player).await.is_empty());
}

#[tokio::test]
async fn handle_reports_closed_runtime() {
    let (handle, player) = spawn_player(|media| media, None);
    let other = handle.clone();
    finish(handle, player).await;

    assert_eq!(other.send(Command::Play), Err(RuntimeError::Closed));
    assert_eq!(other.snapshot().await, Err(RuntimeError::Closed));
}
