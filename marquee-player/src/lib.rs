//! Headless playback controller for Marquee.
//!
//! [`controller::PlaybackController`] owns one playback session and turns
//! [`messages::Command`]s from the host (clicks, drags, key presses, media
//! element events) into calls on a [`media::MediaElement`] and a
//! [`host::PlayerHost`]. It is synchronous and clock-agnostic: every entry
//! point takes the current `Instant`, and pending timers are exposed through
//! [`controller::PlaybackController::next_deadline`].
//!
//! [`runtime`] drives a controller from a tokio task.

pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod keyboard;
pub mod machine;
pub mod media;
pub mod messages;
pub mod notification;
pub mod overlay;
pub mod progress;
pub mod runtime;
pub mod session;
pub mod simulated;
pub mod view;
pub mod volume;

pub use config::{ConfigError, PlayerConfig};
pub use controller::{DragTarget, PlaybackController};
pub use error::{PlaybackError, RuntimeError};
pub use host::PlayerHost;
pub use keyboard::{FocusTarget, Key, KeyAction};
pub use machine::{PlaybackPhase, Transition};
pub use media::{LoadToken, MediaElement, MediaEvent, SourceDescriptor};
pub use messages::Command;
pub use notification::{Notification, NotificationKind};
pub use overlay::Activity;
pub use progress::{BarRect, ControlLayout};
pub use runtime::{PlayerHandle, PlayerInbox};
pub use view::ControlsView;
pub use volume::{VolumeBand, VolumeState};
