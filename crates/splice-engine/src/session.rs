//! Per-session state owned by the orchestrator.

use splice_ipc::{PlaybackConfig, PlaybackStatus};

use crate::input::Generation;
use crate::timer::TimerId;

/// State of one playback session.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    pub(crate) generation: Generation,
    pub(crate) status: PlaybackStatus,
    pub(crate) tick: u64,
    pub(crate) ad_played: bool,
    pub(crate) ad_player_initialized: bool,
    pub(crate) timer: Option<TimerId>,
    pub(crate) config: PlaybackConfig,
}

impl PlaybackSession {
    pub(crate) fn new(generation: Generation, config: PlaybackConfig) -> Self {
        Self {
            generation,
            status: PlaybackStatus::Init,
            tick: 0,
            ad_played: false,
            ad_player_initialized: false,
            timer: None,
            config,
        }
    }

    /// Latch the ad initialize. Returns true only the first time.
    pub(crate) fn latch_ad_player_initialized(&mut self) -> bool {
        if self.ad_player_initialized {
            return false;
        }
        self.ad_player_initialized = true;
        true
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    /// Reconciliation ticks processed.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn ad_played(&self) -> bool {
        self.ad_played
    }

    /// Whether the ad initialize has been issued.
    pub fn ad_player_initialized(&self) -> bool {
        self.ad_player_initialized
    }

    /// Live reconciliation timer, if any.
    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ad_latch_is_one_shot() {
        let mut session = PlaybackSession::new(Generation::default().next(), PlaybackConfig::default());
        assert_eq!(session.status(), PlaybackStatus::Init);
        assert!(session.latch_ad_player_initialized());
        assert!(!session.latch_ad_player_initialized());
        assert!(session.ad_player_initialized());
    }
}
