//! The player lifecycle adapter boundary.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use splice_ipc::{ContentDescriptor, SurfaceHandle};

use crate::PlayerResult;

/// Semantic events a player emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerEventKind {
    /// Playback went from playing to paused.
    Paused,

    /// Enough data is buffered to start playback.
    CanPlay,

    /// Playback reached the end of the content.
    Ended,

    /// Current time advanced.
    TimeUpdate,
}

/// Identifies one registered listener on one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Wrap an adapter-assigned id.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Callback invoked when a subscribed event fires.
///
/// Listeners must not block; the orchestrator's listeners only post into
/// its inbox.
pub type EventListener = Arc<dyn Fn(PlayerEventKind) + Send + Sync>;

/// Completion callback for asynchronous lifecycle operations.
///
/// Consumed by value so an operation completes at most once.
pub struct Completion(Box<dyn FnOnce(PlayerResult<()>) + Send>);

impl Completion {
    /// Wrap a callback.
    pub fn new(callback: impl FnOnce(PlayerResult<()>) + Send + 'static) -> Self {
        Self(Box::new(callback))
    }

    /// Report the outcome of the operation.
    pub fn complete(self, result: PlayerResult<()>) {
        (self.0)(result)
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Completion")
    }
}

/// Wraps one native playback engine instance.
///
/// `initialize` must complete before any other operation is issued.
/// Listener registration is paired: every id returned by
/// `add_event_listener` is eventually passed to `remove_event_listener`.
pub trait PlayerAdapter: Send {
    /// Start initializing native resources; `done` fires when finished.
    fn initialize(&mut self, done: Completion);

    /// Release all native resources. Idempotent; safe while `initialize`
    /// is still pending.
    fn deinitialize(&mut self, done: Completion);

    /// Assign the content to play.
    fn set_source(&mut self, content: &ContentDescriptor) -> PlayerResult<()>;

    /// Start presenting frames on `surface`.
    fn attach_surface(&mut self, surface: &SurfaceHandle) -> PlayerResult<()>;

    /// Stop presenting frames on `surface`.
    fn detach_surface(&mut self, surface: &SurfaceHandle) -> PlayerResult<()>;

    /// Set or clear the caption surface.
    fn set_caption_surface(&mut self, surface: Option<&SurfaceHandle>) -> PlayerResult<()>;

    /// Resume playback.
    fn play(&mut self) -> PlayerResult<()>;

    /// Pause playback; emits [`PlayerEventKind::Paused`] if it was playing.
    fn pause(&mut self) -> PlayerResult<()>;

    /// Whether playback is paused.
    fn is_paused(&self) -> bool;

    /// Current position in seconds.
    fn current_time(&self) -> f64;

    /// Subscribe to an event kind.
    fn add_event_listener(&mut self, kind: PlayerEventKind, listener: EventListener) -> ListenerId;

    /// Unsubscribe. Returns false if `id` was not registered.
    fn remove_event_listener(&mut self, id: ListenerId) -> bool;
}
