//! Shared harness driving an orchestrator with simulated players.

#![allow(dead_code)]

use crossbeam_channel::Receiver;

use splice_engine::{create_orchestrator, Input, Orchestrator, OrchestratorHandle};
use splice_ipc::{event_channel, PlaybackCommand, PlaybackConfig, PlaybackEvent, StreamingSettings, SurfaceHandle};
use splice_player::sim::{SimEngineHandle, SimPlayerHandle, SimulatedPlayer, SimulatedStreamingEngine};

/// Long enough that the timer thread never fires during a test.
pub const QUIET_TICK_MS: u64 = 3_600_000;

pub struct Harness {
    pub orchestrator: Orchestrator,
    pub handle: OrchestratorHandle,
    pub main: SimPlayerHandle,
    pub ad: SimPlayerHandle,
    pub engine: SimEngineHandle,
    pub events: Receiver<PlaybackEvent>,
}

impl Harness {
    pub fn new() -> Self {
        let main = SimulatedPlayer::new("main");
        let ad = SimulatedPlayer::new("ad");
        let engine = SimulatedStreamingEngine::new(StreamingSettings::default());
        let (main_handle, ad_handle, engine_handle) = (main.handle(), ad.handle(), engine.handle());
        let (event_tx, events) = event_channel();
        let (orchestrator, handle) =
            create_orchestrator(Box::new(main), Box::new(ad), Box::new(engine), event_tx);

        Self {
            orchestrator,
            handle,
            main: main_handle,
            ad: ad_handle,
            engine: engine_handle,
            events,
        }
    }

    /// Queue a command and process everything it cascades into.
    pub fn send(&mut self, command: PlaybackCommand) {
        self.handle.send(command).unwrap();
        self.pump();
    }

    pub fn post(&mut self, input: Input) {
        self.handle.post(input).unwrap();
        self.pump();
    }

    pub fn pump(&mut self) -> usize {
        self.orchestrator.run_pending()
    }

    pub fn start(&mut self, config: PlaybackConfig) {
        self.send(PlaybackCommand::Start { config });
    }

    pub fn surface(&mut self, name: &str) {
        self.send(PlaybackCommand::SurfaceCreated(SurfaceHandle::new(name)));
    }

    /// Advance the main player and process the resulting events.
    pub fn advance_main(&mut self, seconds: f64) {
        self.main.advance(seconds);
        self.pump();
    }

    pub fn advance_ad(&mut self, seconds: f64) {
        self.ad.advance(seconds);
        self.pump();
    }

    /// Post a tick from the running timer, if any.
    pub fn tick(&mut self) -> bool {
        match self.orchestrator.active_timer() {
            Some(timer) => {
                self.post(Input::Tick { timer });
                true
            }
            None => false,
        }
    }

    pub fn drain_events(&self) -> Vec<PlaybackEvent> {
        self.events.try_iter().collect()
    }

    /// Number of players that currently have a surface attached.
    pub fn attached_count(&self) -> usize {
        [&self.main, &self.ad]
            .iter()
            .filter(|p| p.attached_surface().is_some())
            .count()
    }
}

pub fn quiet_config() -> PlaybackConfig {
    PlaybackConfig {
        tick_interval_ms: QUIET_TICK_MS,
        ..PlaybackConfig::default()
    }
}
