//! In-memory player and streaming engine.
//!
//! [`SimulatedPlayer`] follows media element semantics closely enough to run
//! whole sessions without a native pipeline. Time only moves when the owner
//! calls [`SimPlayerHandle::advance`], which keeps tests deterministic. Every
//! command the player receives is recorded as a [`SimCall`].

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use splice_ipc::{ContentDescriptor, StreamingSettings, SurfaceHandle};

use crate::adapter::{Completion, EventListener, ListenerId, PlayerAdapter, PlayerEventKind};
use crate::listeners::ListenerRegistry;
use crate::streaming::{StreamingEngine, StreamingProfile};
use crate::{PlayerError, PlayerResult};

/// How lifecycle operations complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleMode {
    /// Completion fires from inside the call.
    Immediate,

    /// Completion is held until the handle completes it.
    Manual,
}

/// A command received by a simulated player.
#[derive(Debug, Clone, PartialEq)]
pub enum SimCall {
    Initialize,
    Deinitialize,
    SetSource(String),
    AttachSurface(SurfaceHandle),
    DetachSurface(SurfaceHandle),
    SetCaptionSurface(Option<SurfaceHandle>),
    Play,
    Pause,
}

struct SimState {
    name: String,
    mode: LifecycleMode,
    fail_next_initialize: Option<String>,
    fail_next_attach: Option<String>,
    initialized: bool,
    pending_initialize: Option<Completion>,
    pending_deinitialize: Option<Completion>,
    source: Option<String>,
    surface: Option<SurfaceHandle>,
    caption_surface: Option<SurfaceHandle>,
    paused: bool,
    current_time: f64,
    duration: Option<f64>,
    ended: bool,
    listeners: ListenerRegistry,
    calls: Vec<SimCall>,
}

impl SimState {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            mode: LifecycleMode::Immediate,
            fail_next_initialize: None,
            fail_next_attach: None,
            initialized: false,
            pending_initialize: None,
            pending_deinitialize: None,
            source: None,
            surface: None,
            caption_surface: None,
            paused: true,
            current_time: 0.0,
            duration: None,
            ended: false,
            listeners: ListenerRegistry::new(),
            calls: Vec::new(),
        }
    }

    fn reset_media(&mut self) {
        self.source = None;
        self.surface = None;
        self.caption_surface = None;
        self.paused = true;
        self.current_time = 0.0;
        self.ended = false;
    }

    fn require_initialized(&self) -> PlayerResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(PlayerError::NotInitialized)
        }
    }
}

type Shared = Arc<Mutex<SimState>>;

/// Invoke listeners for `kind` without holding the state lock.
fn emit(shared: &Shared, kind: PlayerEventKind) {
    let listeners = shared.lock().listeners.listeners_for(kind);
    for listener in listeners {
        listener(kind);
    }
}

fn pause_shared(shared: &Shared) -> PlayerResult<()> {
    let was_playing = {
        let mut state = shared.lock();
        state.require_initialized()?;
        let was_playing = !state.paused;
        state.paused = true;
        was_playing
    };
    if was_playing {
        emit(shared, PlayerEventKind::Paused);
    }
    Ok(())
}

/// A player with no native backing.
pub struct SimulatedPlayer {
    shared: Shared,
}

impl SimulatedPlayer {
    /// Create a player; `name` only appears in logs.
    pub fn new(name: &str) -> Self {
        Self {
            shared: Arc::new(Mutex::new(SimState::new(name))),
        }
    }

    /// Control and inspection handle sharing this player's state.
    pub fn handle(&self) -> SimPlayerHandle {
        SimPlayerHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl PlayerAdapter for SimulatedPlayer {
    fn initialize(&mut self, done: Completion) {
        let mut state = self.shared.lock();
        state.calls.push(SimCall::Initialize);
        debug!(player = %state.name, mode = ?state.mode, "Initialize");

        if let Some(message) = state.fail_next_initialize.take() {
            drop(state);
            done.complete(Err(PlayerError::InitializationFailed(message)));
            return;
        }

        match state.mode {
            LifecycleMode::Immediate => {
                state.initialized = true;
                state.paused = true;
                drop(state);
                done.complete(Ok(()));
            }
            LifecycleMode::Manual => {
                let replaced = state.pending_initialize.replace(done);
                drop(state);
                if let Some(replaced) = replaced {
                    replaced.complete(Err(PlayerError::Cancelled));
                }
            }
        }
    }

    fn deinitialize(&mut self, done: Completion) {
        let mut state = self.shared.lock();
        state.calls.push(SimCall::Deinitialize);
        debug!(player = %state.name, "Deinitialize");

        let cancelled = state.pending_initialize.take();
        state.initialized = false;
        state.reset_media();

        let immediate = match state.mode {
            LifecycleMode::Immediate => Some(done),
            LifecycleMode::Manual => state.pending_deinitialize.replace(done),
        };
        drop(state);

        if let Some(cancelled) = cancelled {
            cancelled.complete(Err(PlayerError::Cancelled));
        }
        if let Some(done) = immediate {
            done.complete(Ok(()));
        }
    }

    fn set_source(&mut self, content: &ContentDescriptor) -> PlayerResult<()> {
        {
            let mut state = self.shared.lock();
            state.require_initialized()?;
            if content.uri.trim().is_empty() {
                return Err(PlayerError::InvalidSource("empty uri".to_string()));
            }
            state.calls.push(SimCall::SetSource(content.uri.clone()));
            state.source = Some(content.uri.clone());
            state.current_time = 0.0;
            state.ended = false;
            state.paused = true;
        }
        emit(&self.shared, PlayerEventKind::CanPlay);
        Ok(())
    }

    fn attach_surface(&mut self, surface: &SurfaceHandle) -> PlayerResult<()> {
        let mut state = self.shared.lock();
        state.require_initialized()?;
        state.calls.push(SimCall::AttachSurface(surface.clone()));
        if let Some(message) = state.fail_next_attach.take() {
            return Err(PlayerError::Surface(message));
        }
        state.surface = Some(surface.clone());
        Ok(())
    }

    fn detach_surface(&mut self, surface: &SurfaceHandle) -> PlayerResult<()> {
        let mut state = self.shared.lock();
        state.calls.push(SimCall::DetachSurface(surface.clone()));
        if state.surface.as_ref() == Some(surface) {
            state.surface = None;
        }
        Ok(())
    }

    fn set_caption_surface(&mut self, surface: Option<&SurfaceHandle>) -> PlayerResult<()> {
        let mut state = self.shared.lock();
        state.require_initialized()?;
        state.calls.push(SimCall::SetCaptionSurface(surface.cloned()));
        state.caption_surface = surface.cloned();
        Ok(())
    }

    fn play(&mut self) -> PlayerResult<()> {
        let mut state = self.shared.lock();
        state.require_initialized()?;
        if state.source.is_none() {
            return Err(PlayerError::NoSource);
        }
        state.calls.push(SimCall::Play);
        if !state.ended {
            state.paused = false;
        }
        Ok(())
    }

    fn pause(&mut self) -> PlayerResult<()> {
        self.shared.lock().calls.push(SimCall::Pause);
        pause_shared(&self.shared)
    }

    fn is_paused(&self) -> bool {
        self.shared.lock().paused
    }

    fn current_time(&self) -> f64 {
        self.shared.lock().current_time
    }

    fn add_event_listener(&mut self, kind: PlayerEventKind, listener: EventListener) -> ListenerId {
        self.shared.lock().listeners.add(kind, listener)
    }

    fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.shared.lock().listeners.remove(id)
    }
}

/// Drives and inspects a [`SimulatedPlayer`] from outside the orchestrator.
#[derive(Clone)]
pub struct SimPlayerHandle {
    shared: Shared,
}

impl SimPlayerHandle {
    /// Advance the media clock by `seconds` if playing.
    ///
    /// Emits `TimeUpdate`, and `Paused` followed by `Ended` when the
    /// configured duration is reached.
    pub fn advance(&self, seconds: f64) {
        let events = {
            let mut state = self.shared.lock();
            if !state.initialized || state.paused || state.ended {
                return;
            }
            state.current_time += seconds;
            trace!(player = %state.name, time = state.current_time, "Advance");

            let mut events = vec![PlayerEventKind::TimeUpdate];
            if let Some(duration) = state.duration {
                if state.current_time >= duration {
                    state.current_time = duration;
                    state.ended = true;
                    state.paused = true;
                    events.push(PlayerEventKind::Paused);
                    events.push(PlayerEventKind::Ended);
                }
            }
            events
        };

        for kind in events {
            emit(&self.shared, kind);
        }
    }

    /// Move the media clock without emitting events.
    pub fn seek(&self, seconds: f64) {
        self.shared.lock().current_time = seconds;
    }

    /// Pause from outside, as a remote control or collaborator would.
    pub fn pause(&self) -> PlayerResult<()> {
        pause_shared(&self.shared)
    }

    /// Content duration; `None` plays forever.
    pub fn set_duration(&self, seconds: Option<f64>) {
        self.shared.lock().duration = seconds;
    }

    /// Choose how lifecycle operations complete.
    pub fn set_lifecycle_mode(&self, mode: LifecycleMode) {
        self.shared.lock().mode = mode;
    }

    /// Make the next `initialize` fail with `message`.
    pub fn fail_next_initialize(&self, message: impl Into<String>) {
        self.shared.lock().fail_next_initialize = Some(message.into());
    }

    /// Make the next `attach_surface` fail with `message`.
    pub fn fail_next_attach(&self, message: impl Into<String>) {
        self.shared.lock().fail_next_attach = Some(message.into());
    }

    /// Complete a held `initialize`. Returns false if none was pending.
    pub fn complete_initialize(&self, result: PlayerResult<()>) -> bool {
        let pending = {
            let mut state = self.shared.lock();
            let pending = state.pending_initialize.take();
            if pending.is_some() && result.is_ok() {
                state.initialized = true;
                state.paused = true;
            }
            pending
        };
        match pending {
            Some(done) => {
                done.complete(result);
                true
            }
            None => false,
        }
    }

    /// Complete a held `deinitialize`. Returns false if none was pending.
    pub fn complete_deinitialize(&self) -> bool {
        let pending = self.shared.lock().pending_deinitialize.take();
        match pending {
            Some(done) => {
                done.complete(Ok(()));
                true
            }
            None => false,
        }
    }

    pub fn name(&self) -> String {
        self.shared.lock().name.clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.shared.lock().initialized
    }

    pub fn has_pending_initialize(&self) -> bool {
        self.shared.lock().pending_initialize.is_some()
    }

    pub fn attached_surface(&self) -> Option<SurfaceHandle> {
        self.shared.lock().surface.clone()
    }

    pub fn caption_surface(&self) -> Option<SurfaceHandle> {
        self.shared.lock().caption_surface.clone()
    }

    pub fn source(&self) -> Option<String> {
        self.shared.lock().source.clone()
    }

    pub fn is_paused(&self) -> bool {
        self.shared.lock().paused
    }

    pub fn current_time(&self) -> f64 {
        self.shared.lock().current_time
    }

    /// Number of listeners still registered.
    pub fn listener_count(&self) -> usize {
        self.shared.lock().listeners.len()
    }

    /// Commands received so far.
    pub fn calls(&self) -> Vec<SimCall> {
        self.shared.lock().calls.clone()
    }

    /// Number of times `call` was received.
    pub fn count(&self, call: &SimCall) -> usize {
        self.shared.lock().calls.iter().filter(|c| *c == call).count()
    }
}

/// Content currently loaded by a [`SimulatedStreamingEngine`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedContent {
    pub uri: String,
    pub autoplay: bool,
    pub profile: StreamingProfile,
}

struct EngineState {
    settings: StreamingSettings,
    loaded: Option<LoadedContent>,
    fail_next_load: Option<String>,
    load_count: usize,
    unload_count: usize,
}

/// Streaming engine that only sets the player's source.
///
/// Autoplay is recorded but not acted on; the orchestrator resumes playback
/// when main playback starts.
pub struct SimulatedStreamingEngine {
    shared: Arc<Mutex<EngineState>>,
}

impl SimulatedStreamingEngine {
    pub fn new(settings: StreamingSettings) -> Self {
        Self {
            shared: Arc::new(Mutex::new(EngineState {
                settings,
                loaded: None,
                fail_next_load: None,
                load_count: 0,
                unload_count: 0,
            })),
        }
    }

    pub fn handle(&self) -> SimEngineHandle {
        SimEngineHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl StreamingEngine for SimulatedStreamingEngine {
    fn load(
        &mut self,
        player: &mut dyn PlayerAdapter,
        content: &ContentDescriptor,
        autoplay: bool,
    ) -> PlayerResult<()> {
        let profile = {
            let mut state = self.shared.lock();
            if let Some(message) = state.fail_next_load.take() {
                return Err(PlayerError::Streaming(message));
            }
            StreamingProfile::for_content(&state.settings, content)
        };

        player.set_source(content)?;

        debug!(
            uri = %content.uri,
            abr_enabled = profile.abr.enabled,
            max_width = profile.abr.max_width,
            max_height = profile.abr.max_height,
            drm = ?profile.drm.as_ref().map(|drm| drm.key_system.as_str()),
            "Content loaded"
        );

        let mut state = self.shared.lock();
        state.loaded = Some(LoadedContent {
            uri: content.uri.clone(),
            autoplay,
            profile,
        });
        state.load_count += 1;
        Ok(())
    }

    fn unload(&mut self) {
        let mut state = self.shared.lock();
        if state.loaded.take().is_some() {
            state.unload_count += 1;
            debug!("Content unloaded");
        }
    }
}

/// Inspects a [`SimulatedStreamingEngine`].
#[derive(Clone)]
pub struct SimEngineHandle {
    shared: Arc<Mutex<EngineState>>,
}

impl SimEngineHandle {
    pub fn loaded(&self) -> Option<LoadedContent> {
        self.shared.lock().loaded.clone()
    }

    pub fn fail_next_load(&self, message: impl Into<String>) {
        self.shared.lock().fail_next_load = Some(message.into());
    }

    pub fn load_count(&self) -> usize {
        self.shared.lock().load_count
    }

    pub fn unload_count(&self) -> usize {
        self.shared.lock().unload_count
    }
}
