//! Playback orchestrator.
//!
//! All state lives on the thread that drains the inbox. Player callbacks,
//! lifecycle completions and timer ticks are posted to the inbox tagged with
//! the generation or timer run they belong to, so anything that outlives its
//! session is discarded on arrival.

use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, error, info, instrument, warn};

use splice_ipc::{
    EndReason, PlaybackCommand, PlaybackConfig, PlaybackEvent, PlaybackStatus, PlayerRole,
    SessionStats, SurfaceHandle, DEFAULT_TICK_INTERVAL_MS,
};
use splice_player::{PlayerAdapter, PlayerError, PlayerEventKind, StreamingEngine};

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::input::{Generation, Input, LifecycleOp, Transition};
use crate::metrics::SessionMetrics;
use crate::players::PlayerSlots;
use crate::policy;
use crate::session::PlaybackSession;
use crate::surface::SurfaceOwnership;
use crate::timer::{ReconciliationTimer, TimerId};

const MAIN_EVENTS: [PlayerEventKind; 3] = [
    PlayerEventKind::Paused,
    PlayerEventKind::Ended,
    PlayerEventKind::TimeUpdate,
];

const AD_EVENTS: [PlayerEventKind; 3] = [
    PlayerEventKind::Paused,
    PlayerEventKind::CanPlay,
    PlayerEventKind::TimeUpdate,
];

/// Sends inputs to an [`Orchestrator`] from any thread.
#[derive(Clone)]
pub struct OrchestratorHandle {
    inbox: Sender<Input>,
}

impl OrchestratorHandle {
    /// Queue a host command.
    pub fn send(&self, command: PlaybackCommand) -> OrchestratorResult<()> {
        self.post(Input::Command(command))
    }

    /// Queue a raw input.
    pub fn post(&self, input: Input) -> OrchestratorResult<()> {
        self.inbox
            .send(input)
            .map_err(|_| OrchestratorError::ChannelClosed)
    }

    /// Start a session with `config`.
    pub fn start(&self, config: PlaybackConfig) -> OrchestratorResult<()> {
        self.send(PlaybackCommand::Start { config })
    }

    /// End the current session.
    pub fn end(&self) -> OrchestratorResult<()> {
        self.send(PlaybackCommand::End)
    }

    /// Report a new video surface.
    pub fn surface_created(&self, surface: SurfaceHandle) -> OrchestratorResult<()> {
        self.send(PlaybackCommand::SurfaceCreated(surface))
    }

    /// Report that a video surface is gone.
    pub fn surface_destroyed(&self, surface: SurfaceHandle) -> OrchestratorResult<()> {
        self.send(PlaybackCommand::SurfaceDestroyed(surface))
    }

    /// End any session and stop the loop.
    pub fn shutdown(&self) -> OrchestratorResult<()> {
        self.send(PlaybackCommand::Shutdown)
    }
}

/// Teardown waiting on deinitialize completions.
struct Teardown {
    generation: Generation,
    pending: Vec<PlayerRole>,
    reason: EndReason,
}

/// Coordinates the main and ad players through one session at a time.
pub struct Orchestrator {
    inbox_tx: Sender<Input>,
    inbox_rx: Receiver<Input>,
    event_tx: Sender<PlaybackEvent>,
    players: PlayerSlots,
    engine: Box<dyn StreamingEngine>,
    engine_loaded: bool,
    surfaces: SurfaceOwnership,
    caption_surface: Option<SurfaceHandle>,
    timer: ReconciliationTimer,
    metrics: SessionMetrics,
    session: Option<PlaybackSession>,
    generation: Generation,
    disposed: bool,
    teardown: Option<Teardown>,
    shutdown_requested: bool,
}

impl Orchestrator {
    /// Create an orchestrator owning both players and the streaming engine.
    pub fn new(
        main: Box<dyn PlayerAdapter>,
        ad: Box<dyn PlayerAdapter>,
        engine: Box<dyn StreamingEngine>,
        event_tx: Sender<PlaybackEvent>,
    ) -> Self {
        let (inbox_tx, inbox_rx) = crossbeam_channel::unbounded();
        Self {
            inbox_tx,
            inbox_rx,
            event_tx,
            players: PlayerSlots::new(main, ad),
            engine,
            engine_loaded: false,
            surfaces: SurfaceOwnership::new(),
            caption_surface: None,
            timer: ReconciliationTimer::new(Duration::from_millis(DEFAULT_TICK_INTERVAL_MS)),
            metrics: SessionMetrics::default(),
            session: None,
            generation: Generation::default(),
            disposed: false,
            teardown: None,
            shutdown_requested: false,
        }
    }

    /// Get a handle for sending inputs from other threads.
    pub fn handle(&self) -> OrchestratorHandle {
        OrchestratorHandle {
            inbox: self.inbox_tx.clone(),
        }
    }

    /// Run the loop until shutdown (blocking).
    #[instrument(name = "orchestrator_run", skip(self))]
    pub fn run(&mut self) {
        info!("Orchestrator starting");
        self.send_event(PlaybackEvent::Ready);

        while let Ok(input) = self.inbox_rx.recv() {
            if !self.dispatch(input) {
                break;
            }
        }

        info!("Orchestrator stopped");
    }

    /// Process queued inputs without blocking. Returns how many were handled.
    pub fn run_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(input) = self.inbox_rx.try_recv() {
            processed += 1;
            if !self.dispatch(input) {
                break;
            }
        }
        processed
    }

    /// Process one input. Returns false once the loop should stop.
    pub fn dispatch(&mut self, input: Input) -> bool {
        match input {
            Input::Command(command) => self.handle_command(command),
            Input::Player {
                role,
                generation,
                event,
            } => self.on_player_event(role, generation, event),
            Input::Lifecycle {
                role,
                generation,
                op,
                result,
            } => self.on_lifecycle(role, generation, op, result),
            Input::Tick { timer } => self.on_tick(timer),
        }

        if self.shutdown_requested && self.session.is_none() {
            self.send_event(PlaybackEvent::Shutdown);
            return false;
        }
        true
    }

    /// Status of the current session, `None` between sessions.
    pub fn status(&self) -> Option<PlaybackStatus> {
        self.session.as_ref().map(|s| s.status)
    }

    /// The current session, if any.
    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    /// Player currently holding the video surface.
    pub fn surface_holder(&self) -> Option<PlayerRole> {
        self.surfaces.holder()
    }

    /// The cached video surface.
    pub fn current_surface(&self) -> Option<&SurfaceHandle> {
        self.surfaces.current()
    }

    /// Id of the running reconciliation timer.
    pub fn active_timer(&self) -> Option<TimerId> {
        self.timer.active_id()
    }

    /// Whether the current or most recent session has entered teardown.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Current session generation.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Snapshot of the session counters.
    pub fn stats(&self) -> SessionStats {
        self.metrics.snapshot()
    }

    fn handle_command(&mut self, command: PlaybackCommand) {
        debug!(command = command.name(), "Handling command");

        match command {
            PlaybackCommand::Start { config } => self.start_session(config),
            PlaybackCommand::End => self.request(Transition::ExplicitEnd {
                reason: EndReason::Requested,
            }),
            PlaybackCommand::SurfaceCreated(surface) => self.on_surface_created(surface),
            PlaybackCommand::SurfaceDestroyed(surface) => self.on_surface_destroyed(&surface),
            PlaybackCommand::CaptionSurfaceCreated(surface) => {
                self.caption_surface = Some(surface);
                self.apply_caption_surface();
            }
            PlaybackCommand::CaptionSurfaceDestroyed(surface) => {
                if self.caption_surface.as_ref() != Some(&surface) {
                    debug!(%surface, "Ignoring destroy for stale caption surface");
                    return;
                }
                self.caption_surface = None;
                self.apply_caption_surface();
            }
            PlaybackCommand::GetState => self.send_state(),
            PlaybackCommand::Shutdown => {
                info!("Shutdown requested");
                self.shutdown_requested = true;
                if self.is_active() {
                    self.request(Transition::ExplicitEnd {
                        reason: EndReason::Requested,
                    });
                }
            }
        }
    }

    #[instrument(name = "start_session", skip(self, config))]
    fn start_session(&mut self, config: PlaybackConfig) {
        if self.session.is_some() {
            debug!("Session already active, ignoring start command");
            return;
        }

        if let Err(e) = config.validate() {
            error!(error = %e, "Rejected session configuration");
            self.send_event(PlaybackEvent::Error {
                recoverable: true,
                message: e.to_string(),
            });
            return;
        }

        self.generation = self.generation.next();
        self.disposed = false;
        self.metrics = SessionMetrics::new(self.generation.value());
        self.metrics.start();
        self.timer.set_interval(config.tick_interval());

        info!(
            generation = %self.generation,
            main = %config.main.uri,
            ad = %config.ad.uri,
            ad_start = config.ad_start_offset(),
            ad_end = config.ad_end_offset(),
            "Starting session"
        );
        self.session = Some(PlaybackSession::new(self.generation, config));

        if !self
            .players
            .begin_initialize(PlayerRole::Main, self.generation, &self.inbox_tx)
        {
            self.fail_initialization(
                PlayerRole::Main,
                PlayerError::InitializationFailed("player still in use".to_string()),
            );
        }
    }

    /// Apply `request` and log it if no table row matches.
    fn request(&mut self, request: Transition) {
        match self.transition(request) {
            Ok(_) => {}
            Err(e @ OrchestratorError::InvalidTransition { .. }) => {
                warn!(error = %e, "Ignoring transition");
                self.metrics.record_ignored_transition();
            }
            Err(e) => warn!(error = %e, "Transition failed"),
        }
    }

    /// Move to the next status and run its entry actions.
    fn transition(&mut self, request: Transition) -> OrchestratorResult<PlaybackStatus> {
        let Some(current) = self.status() else {
            return Err(OrchestratorError::InvalidTransition {
                state: "NoSession",
                event: request.name(),
            });
        };

        let next = match (current, &request) {
            (PlaybackStatus::Init, Transition::InitComplete { surface_cached: true }) => {
                PlaybackStatus::MainPlaying
            }
            (PlaybackStatus::Init, Transition::InitComplete { surface_cached: false }) => {
                PlaybackStatus::Idle
            }
            (PlaybackStatus::Idle, Transition::SurfaceCreated { surface }) => {
                debug!(%surface, "Surface arrived while idle");
                PlaybackStatus::MainPlaying
            }
            (PlaybackStatus::MainPlaying, Transition::MainPaused)
                if self.players.is_ready(PlayerRole::Ad) =>
            {
                PlaybackStatus::AdPlaying
            }
            (PlaybackStatus::AdPlaying, Transition::AdPaused) => PlaybackStatus::MainPostAdPlaying,
            (
                PlaybackStatus::MainPlaying | PlaybackStatus::MainPostAdPlaying,
                Transition::MainEnded,
            ) => PlaybackStatus::End,
            (status, Transition::ExplicitEnd { .. }) if !status.is_terminal() => {
                PlaybackStatus::End
            }
            _ => {
                return Err(OrchestratorError::InvalidTransition {
                    state: current.name(),
                    event: request.name(),
                })
            }
        };

        self.set_status(current, next);

        match next {
            PlaybackStatus::Init => {}
            PlaybackStatus::Idle => debug!("Waiting for a video surface"),
            PlaybackStatus::MainPlaying | PlaybackStatus::MainPostAdPlaying => {
                self.enter_main_playback(next)
            }
            PlaybackStatus::AdPlaying => self.enter_ad_playback(),
            PlaybackStatus::End => {
                let reason = match request {
                    Transition::ExplicitEnd { reason } => reason,
                    _ => EndReason::MainEnded,
                };
                self.enter_end(reason);
            }
        }

        Ok(next)
    }

    fn set_status(&mut self, previous: PlaybackStatus, current: PlaybackStatus) {
        if let Some(session) = self.session.as_mut() {
            session.status = current;
        }

        debug!(
            previous = %previous.name(),
            current = %current.name(),
            "State transition"
        );

        self.send_event(PlaybackEvent::StateChanged { previous, current });
    }

    fn enter_main_playback(&mut self, status: PlaybackStatus) {
        self.hand_off(PlayerRole::Main);

        if self
            .players
            .ready(PlayerRole::Main)
            .is_some_and(|p| p.is_paused())
        {
            debug!("Resuming main player");
            if let Some(Err(e)) = self.players.with_ready(PlayerRole::Main, |p| p.play()) {
                warn!(error = %e, "Failed to resume main player");
            }
        }

        if status == PlaybackStatus::MainPlaying {
            self.maybe_prepare_ad();
            self.ensure_timer();
        } else {
            self.stop_timer();
        }
    }

    fn enter_ad_playback(&mut self) {
        self.hand_off(PlayerRole::Ad);

        if let Some(session) = self.session.as_mut() {
            session.ad_played = true;
        }
        self.metrics.mark_ad_played();

        info!("Starting ad playback");
        if let Some(Err(e)) = self.players.with_ready(PlayerRole::Ad, |p| p.play()) {
            warn!(error = %e, "Failed to start ad player");
        }
        self.check_ad_end();
    }

    /// Begin teardown. Terminal for the session; inputs arriving from here on
    /// only advance the teardown.
    #[instrument(name = "end_session", skip(self))]
    fn enter_end(&mut self, reason: EndReason) {
        info!(reason = %reason.message(), "Ending session");
        self.disposed = true;
        self.stop_timer();

        if self.engine_loaded {
            self.engine.unload();
            self.engine_loaded = false;
        }

        for role in PlayerRole::ALL {
            let removed = self.players.unsubscribe(role);
            debug!(%role, removed, "Listeners removed");
        }

        // Completions for work issued under the session generation are stale now.
        self.generation = self.generation.next();
        let generation = self.generation;

        let mut pending = Vec::new();
        for role in PlayerRole::ALL {
            if self
                .players
                .begin_deinitialize(role, generation, &self.inbox_tx)
            {
                pending.push(role);
            }
        }

        self.teardown = Some(Teardown {
            generation,
            pending,
            reason,
        });
        self.maybe_finish_teardown();
    }

    fn on_deinitialized(
        &mut self,
        role: PlayerRole,
        generation: Generation,
        result: Result<(), PlayerError>,
    ) {
        let Some(teardown) = self.teardown.as_mut() else {
            debug!(%role, "Discarding deinitialize completion with no teardown");
            self.metrics.record_stale_signal();
            return;
        };
        if teardown.generation != generation {
            debug!(%role, %generation, "Discarding stale deinitialize completion");
            self.metrics.record_stale_signal();
            return;
        }

        if let Err(e) = result {
            warn!(%role, error = %e, "Deinitialize reported an error");
        }
        teardown.pending.retain(|r| *r != role);
        self.players.mark_released(role);
        self.maybe_finish_teardown();
    }

    fn maybe_finish_teardown(&mut self) {
        if !self.teardown.as_ref().is_some_and(|t| t.pending.is_empty()) {
            return;
        }
        let Some(teardown) = self.teardown.take() else {
            return;
        };

        if let Some(role) = self.surfaces.release() {
            debug!(%role, "Surface ownership released");
        }
        for role in PlayerRole::ALL {
            self.players.mark_released(role);
        }

        let stats = self.metrics.snapshot();
        self.metrics.stop();
        self.session = None;

        info!(reason = %teardown.reason.message(), "Session finished");
        self.send_event(PlaybackEvent::Finished {
            reason: teardown.reason,
            stats,
        });
    }

    fn on_lifecycle(
        &mut self,
        role: PlayerRole,
        generation: Generation,
        op: LifecycleOp,
        result: Result<(), PlayerError>,
    ) {
        match op {
            LifecycleOp::Deinitialize => self.on_deinitialized(role, generation, result),
            LifecycleOp::Initialize => {
                if !self.is_live(generation) {
                    debug!(%role, %generation, "Discarding stale initialize completion");
                    self.metrics.record_stale_signal();
                    return;
                }
                match result {
                    Ok(()) => self.on_initialized(role),
                    Err(e) => self.fail_initialization(role, e),
                }
            }
        }
    }

    fn on_initialized(&mut self, role: PlayerRole) {
        if !self.players.mark_ready(role) {
            return;
        }
        info!(%role, "Player initialized");

        match role {
            PlayerRole::Main => self.on_main_initialized(),
            PlayerRole::Ad => self.on_ad_initialized(),
        }
    }

    fn on_main_initialized(&mut self) {
        let Some((content, autoplay)) = self
            .session
            .as_ref()
            .map(|s| (s.config.main.clone(), s.config.autoplay))
        else {
            return;
        };

        self.players.subscribe(
            PlayerRole::Main,
            &MAIN_EVENTS,
            self.generation,
            &self.inbox_tx,
        );
        self.apply_caption_surface();

        let engine = &mut self.engine;
        let loaded = self
            .players
            .with_ready(PlayerRole::Main, |player| engine.load(player, &content, autoplay))
            .unwrap_or(Err(PlayerError::NotInitialized));
        if let Err(e) = loaded {
            self.fail_initialization(PlayerRole::Main, e);
            return;
        }
        self.engine_loaded = true;

        let surface_cached = self.surfaces.current().is_some();
        self.request(Transition::InitComplete { surface_cached });
    }

    fn on_ad_initialized(&mut self) {
        let Some(content) = self.session.as_ref().map(|s| s.config.ad.clone()) else {
            return;
        };

        self.players.subscribe(
            PlayerRole::Ad,
            &AD_EVENTS,
            self.generation,
            &self.inbox_tx,
        );

        match self
            .players
            .with_ready(PlayerRole::Ad, |p| p.set_source(&content))
            .unwrap_or(Err(PlayerError::NotInitialized))
        {
            Ok(()) => {
                info!(uri = %content.uri, "Ad player prepared");
                self.send_event(PlaybackEvent::AdPrepared);
            }
            Err(e) => self.fail_initialization(PlayerRole::Ad, e),
        }
    }

    fn fail_initialization(&mut self, role: PlayerRole, source: PlayerError) {
        let message = source.to_string();
        let err = OrchestratorError::InitializationFailure { role, source };
        error!(error = %err, "Initialization failed");

        self.send_event(PlaybackEvent::Error {
            recoverable: false,
            message: err.to_string(),
        });
        self.request(Transition::ExplicitEnd {
            reason: EndReason::InitializationFailed { role, message },
        });
    }

    fn on_player_event(&mut self, role: PlayerRole, generation: Generation, event: PlayerEventKind) {
        if !self.is_live(generation) {
            debug!(%role, ?event, "Discarding stale player event");
            self.metrics.record_stale_signal();
            return;
        }

        match (role, event) {
            (PlayerRole::Main, PlayerEventKind::Paused) => self.request(Transition::MainPaused),
            (PlayerRole::Main, PlayerEventKind::Ended) => self.request(Transition::MainEnded),
            (PlayerRole::Ad, PlayerEventKind::Paused) => self.request(Transition::AdPaused),
            (PlayerRole::Ad, PlayerEventKind::CanPlay) => self.on_ad_ready(),
            (_, PlayerEventKind::TimeUpdate) => self.reconcile(),
            (role, event) => debug!(%role, ?event, "Unhandled player event"),
        }
    }

    fn on_ad_ready(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if session.status != PlaybackStatus::MainPlaying {
            debug!(status = %session.status, "Ad ready outside main playback");
            return;
        }
        if !session.config.pause_main_on_ad_ready {
            debug!("Ad ready, waiting for main player to pause");
            return;
        }

        let main_paused = self
            .players
            .ready(PlayerRole::Main)
            .is_some_and(|p| p.is_paused());
        if main_paused {
            // The pause edge already went by; it will not be reported again.
            self.request(Transition::MainPaused);
            return;
        }

        info!("Ad ready, pausing main player");
        if let Some(Err(e)) = self.players.with_ready(PlayerRole::Main, |p| p.pause()) {
            warn!(error = %e, "Failed to pause main player");
        }
    }

    fn on_tick(&mut self, timer: TimerId) {
        let live = !self.disposed
            && self
                .session
                .as_ref()
                .is_some_and(|s| s.timer == Some(timer));
        if !live {
            debug!(?timer, "Discarding tick from stopped timer");
            self.metrics.record_stale_signal();
            return;
        }

        if let Some(session) = self.session.as_mut() {
            session.tick += 1;
        }
        self.metrics.record_tick();
        self.reconcile();
    }

    /// Re-evaluate time-based rules for the current status.
    fn reconcile(&mut self) {
        match self.status() {
            Some(PlaybackStatus::MainPlaying) => self.maybe_prepare_ad(),
            Some(PlaybackStatus::AdPlaying) => self.check_ad_end(),
            _ => {}
        }
    }

    fn maybe_prepare_ad(&mut self) {
        let Some(current_time) = self.players.ready(PlayerRole::Main).map(|p| p.current_time())
        else {
            return;
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let ad_start = session.config.ad_start_offset();
        if !policy::should_prepare_ad(
            session.status,
            current_time,
            ad_start,
            session.ad_player_initialized,
        ) || !session.latch_ad_player_initialized()
        {
            return;
        }

        info!(current_time, ad_start, "Preparing ad player");
        let generation = session.generation;
        self.players
            .begin_initialize(PlayerRole::Ad, generation, &self.inbox_tx);
    }

    fn check_ad_end(&mut self) {
        let Some(ad_end) = self
            .session
            .as_ref()
            .filter(|s| s.status == PlaybackStatus::AdPlaying)
            .map(|s| s.config.ad_end_offset())
        else {
            return;
        };
        let Some((current_time, paused)) = self
            .players
            .ready(PlayerRole::Ad)
            .map(|p| (p.current_time(), p.is_paused()))
        else {
            return;
        };
        if paused || !policy::ad_break_finished(current_time, ad_end) {
            return;
        }

        info!(current_time, ad_end, "Ad break finished, pausing ad player");
        if let Some(Err(e)) = self.players.with_ready(PlayerRole::Ad, |p| p.pause()) {
            warn!(error = %e, "Failed to pause ad player");
        }
    }

    fn on_surface_created(&mut self, surface: SurfaceHandle) {
        info!(%surface, "Surface created");
        if !self.surfaces.on_created(surface.clone(), &mut self.players) {
            debug!(%surface, "Surface already cached");
        }

        if !self.is_active() {
            debug!("No active session, surface cached");
            return;
        }

        match self.status() {
            Some(PlaybackStatus::Idle) => self.request(Transition::SurfaceCreated { surface }),
            Some(status) => {
                if let Some(owner) = status.surface_owner() {
                    self.hand_off(owner);
                }
            }
            None => {}
        }
    }

    fn on_surface_destroyed(&mut self, surface: &SurfaceHandle) {
        if self.surfaces.on_destroyed(surface, &mut self.players) {
            info!(%surface, "Surface destroyed");
        }
    }

    /// Give the cached surface to `role`. Missing surfaces and unready
    /// players defer the hand-off to the next surface or status change.
    fn hand_off(&mut self, role: PlayerRole) {
        match self.surfaces.assign_current(role, &mut self.players) {
            Ok(true) => {
                self.metrics.record_handoff();
                if let Some(surface) = self.surfaces.current().cloned() {
                    info!(%role, %surface, "Surface assigned");
                    self.send_event(PlaybackEvent::SurfaceAssigned { role, surface });
                }
            }
            Ok(false) => debug!(%role, "Player already holds the surface"),
            Err(e @ (OrchestratorError::SurfaceUnavailable | OrchestratorError::PlayerNotReady(_))) => {
                debug!(%role, error = %e, "Surface hand-off deferred");
            }
            Err(e) => warn!(%role, error = %e, "Surface hand-off failed"),
        }
    }

    fn apply_caption_surface(&mut self) {
        if !self.is_active() {
            return;
        }
        let caption = self.caption_surface.clone();
        if let Some(Err(e)) = self
            .players
            .with_ready(PlayerRole::Main, |p| p.set_caption_surface(caption.as_ref()))
        {
            warn!(error = %e, "Failed to set caption surface");
        }
    }

    fn ensure_timer(&mut self) {
        let inbox = self.inbox_tx.clone();
        let id = self
            .timer
            .start(move |timer| inbox.send(Input::Tick { timer }).is_ok());
        if let Some(session) = self.session.as_mut() {
            session.timer = Some(id);
        }
    }

    fn stop_timer(&mut self) {
        self.timer.stop();
        if let Some(session) = self.session.as_mut() {
            session.timer = None;
        }
    }

    fn is_active(&self) -> bool {
        !self.disposed && self.session.is_some()
    }

    fn is_live(&self, generation: Generation) -> bool {
        !self.disposed
            && self
                .session
                .as_ref()
                .is_some_and(|s| s.generation == generation)
    }

    fn send_state(&self) {
        if let Some(status) = self.status() {
            self.send_event(PlaybackEvent::StateChanged {
                previous: status,
                current: status,
            });
        }
        self.send_event(PlaybackEvent::Stats(self.metrics.snapshot()));
    }

    fn send_event(&self, event: PlaybackEvent) {
        if let Err(e) = self.event_tx.try_send(event) {
            warn!("Failed to send event: {}", e);
        }
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        self.timer.stop();
    }
}
