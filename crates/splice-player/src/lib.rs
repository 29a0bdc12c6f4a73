//! Player lifecycle adapters and streaming engine seams.
//!
//! This crate defines the boundary between the orchestrator and the native
//! media pipeline: the [`PlayerAdapter`] trait wrapping one playback engine
//! instance, the [`StreamingEngine`] trait for adaptive streaming, and
//! in-memory simulated implementations of both.

mod adapter;
mod error;
mod listeners;
pub mod sim;
mod streaming;

pub use adapter::{Completion, EventListener, ListenerId, PlayerAdapter, PlayerEventKind};
pub use error::PlayerError;
pub use listeners::ListenerRegistry;
pub use streaming::{AbrRestrictions, DrmProfile, StreamingEngine, StreamingProfile};

/// Result type for player operations.
pub type PlayerResult<T> = Result<T, PlayerError>;
