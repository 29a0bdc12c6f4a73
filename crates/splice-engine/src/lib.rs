//! Dual-source playback orchestration.
//!
//! This crate coordinates a main content player and an ad player that share
//! one video surface, switching between them as the session moves through
//! its states.

mod error;
mod input;
mod metrics;
mod orchestrator;
mod players;
mod policy;
mod session;
mod surface;
mod timer;

pub use error::{OrchestratorError, OrchestratorResult};
pub use input::{Generation, Input, LifecycleOp};
pub use metrics::SessionMetrics;
pub use orchestrator::{Orchestrator, OrchestratorHandle};
pub use policy::{ad_break_finished, should_prepare_ad};
pub use session::PlaybackSession;
pub use timer::{ReconciliationTimer, TimerId};

use crossbeam_channel::Sender;
use splice_ipc::PlaybackEvent;
use splice_player::{PlayerAdapter, StreamingEngine};

/// Create an orchestrator and a handle for feeding it commands.
pub fn create_orchestrator(
    main: Box<dyn PlayerAdapter>,
    ad: Box<dyn PlayerAdapter>,
    engine: Box<dyn StreamingEngine>,
    event_tx: Sender<PlaybackEvent>,
) -> (Orchestrator, OrchestratorHandle) {
    let orchestrator = Orchestrator::new(main, ad, engine, event_tx);
    let handle = orchestrator.handle();
    (orchestrator, handle)
}
