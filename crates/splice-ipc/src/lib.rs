//! Typed host<->orchestrator messages for splice.
//!
//! This crate defines the message and configuration types shared between
//! the host application (surface provider, UI) and the playback
//! orchestrator.

mod commands;
mod error;
mod events;
mod state;
mod types;

pub use commands::PlaybackCommand;
pub use error::ConfigError;
pub use events::PlaybackEvent;
pub use state::{EndReason, PlaybackStatus, PlayerRole};
pub use types::{
    ContentDescriptor, DeviceClass, PlaybackConfig, SessionStats, StreamingSettings,
    SurfaceHandle,
};

use crossbeam_channel::{Receiver, Sender};

/// Channel capacity for events (Orchestrator → host).
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Default reconciliation tick period in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 250;

/// Creates a bounded event channel.
pub fn event_channel() -> (Sender<PlaybackEvent>, Receiver<PlaybackEvent>) {
    crossbeam_channel::bounded(EVENT_CHANNEL_CAPACITY)
}
