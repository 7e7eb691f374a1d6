//! Drives a [`PlaybackController`] from a tokio task.
//!
//! The loop owns the controller. Everything else talks to it through a
//! cloneable [`PlayerHandle`]; timers are served by sleeping until the
//! controller's next deadline.

use std::future;
use std::time::Instant;

use log::{debug, info};
use tokio::sync::{mpsc, oneshot};

use crate::controller::PlaybackController;
use crate::error::{Result, RuntimeError};
use crate::host::PlayerHost;
use crate::media::{LoadToken, MediaElement, MediaEvent, SourceDescriptor};
use crate::messages::Command;
use crate::view::ControlsView;

#[derive(Debug)]
enum RuntimeMessage {
    Command(Command),
    Attach(SourceDescriptor),
    Detach,
    Snapshot(oneshot::Sender<ControlsView>),
    Shutdown,
}

/// Sending side of the player loop.
///
/// Sends never block, so media elements and hosts may use a handle from
/// inside synchronous callbacks.
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    tx: mpsc::UnboundedSender<RuntimeMessage>,
}

/// Receiving side, consumed by [`run`].
#[derive(Debug)]
pub struct PlayerInbox {
    rx: mpsc::UnboundedReceiver<RuntimeMessage>,
}

pub fn channel() -> (PlayerHandle, PlayerInbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (PlayerHandle { tx }, PlayerInbox { rx })
}

impl PlayerHandle {
    fn post(&self, message: RuntimeMessage) -> Result<()> {
        self.tx.send(message).map_err(|_| RuntimeError::Closed)
    }

    pub fn send(&self, command: Command) -> Result<()> {
        self.post(RuntimeMessage::Command(command))
    }

    pub fn attach(&self, source: SourceDescriptor) -> Result<()> {
        self.post(RuntimeMessage::Attach(source))
    }

    pub fn detach(&self) -> Result<()> {
        self.post(RuntimeMessage::Detach)
    }

    /// Forward a media element event for load attempt `token`.
    pub fn media_event(&self, token: LoadToken, event: MediaEvent) -> Result<()> {
        self.send(Command::Media { token, event })
    }

    /// Current render state of the player.
    pub async fn snapshot(&self) -> Result<ControlsView> {
        let (reply, response) = oneshot::channel();
        self.post(RuntimeMessage::Snapshot(reply))?;
        response.await.map_err(|_| RuntimeError::Closed)
    }

    /// Stop the loop. The session is detached first.
    pub fn shutdown(&self) -> Result<()> {
        self.post(RuntimeMessage::Shutdown)
    }
}

/// Run the player loop until [`PlayerHandle::shutdown`] is called or every
/// handle is dropped. Hands the controller back on exit.
///
/// Handles held by the controller's own media element or host keep the
/// channel open, so such setups must shut down explicitly.
pub async fn run<M, H>(
    mut controller: PlaybackController<M, H>,
    mut inbox: PlayerInbox,
) -> PlaybackController<M, H>
where
    M: MediaElement,
    H: PlayerHost,
{
    info!("[Player] Runtime started");
    loop {
        let deadline = controller.next_deadline();

        tokio::select! {
            message = inbox.rx.recv() => match message {
                Some(RuntimeMessage::Command(command)) => controller.update(command, now()),
                Some(RuntimeMessage::Attach(source)) => controller.attach(source, now()),
                Some(RuntimeMessage::Detach) => controller.detach(),
                Some(RuntimeMessage::Snapshot(reply)) => {
                    let _ = reply.send(controller.view(now()));
                }
                Some(RuntimeMessage::Shutdown) | None => {
                    debug!("[Player] Runtime shutting down");
                    controller.detach();
                    break;
                }
            },
            _ = sleep_until(deadline) => controller.on_deadline(now()),
        }
    }
    controller
}

/// Current time on tokio's clock, so paused test clocks apply.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await,
        None => future::pending().await,
    }
}
