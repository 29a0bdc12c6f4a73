//! Orchestrator state machine types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of a playback session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaybackStatus {
    /// Main player is being initialized.
    #[default]
    Init,

    /// Main player is ready, waiting for a video surface.
    Idle,

    /// Main content is playing, ad not yet inserted.
    MainPlaying,

    /// Ad content is playing on the shared surface.
    AdPlaying,

    /// Main content resumed after the ad.
    MainPostAdPlaying,

    /// Session is over; teardown runs on entry.
    End,
}

impl PlaybackStatus {
    /// Returns true for the terminal status.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::End)
    }

    /// Returns true while main content is the active source.
    pub fn is_main_playback(self) -> bool {
        matches!(self, Self::MainPlaying | Self::MainPostAdPlaying)
    }

    /// Player that should hold the video surface in this status, if any.
    pub fn surface_owner(self) -> Option<PlayerRole> {
        match self {
            Self::MainPlaying | Self::MainPostAdPlaying => Some(PlayerRole::Main),
            Self::AdPlaying => Some(PlayerRole::Ad),
            Self::Init | Self::Idle | Self::End => None,
        }
    }

    /// Returns a simple string representation of the status.
    pub fn name(self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::Idle => "Idle",
            Self::MainPlaying => "MainPlaying",
            Self::AdPlaying => "AdPlaying",
            Self::MainPostAdPlaying => "MainPostAdPlaying",
            Self::End => "End",
        }
    }
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The two players sharing the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerRole {
    /// Primary content player.
    Main,

    /// Inserted ad player.
    Ad,
}

impl PlayerRole {
    /// Both roles, main first.
    pub const ALL: [PlayerRole; 2] = [PlayerRole::Main, PlayerRole::Ad];

    /// Returns the display name for this role.
    pub fn name(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Ad => "ad",
        }
    }
}

impl fmt::Display for PlayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reason a session ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Main content played to the end.
    MainEnded,

    /// Host requested the end.
    Requested,

    /// A player failed to initialize.
    InitializationFailed { role: PlayerRole, message: String },
}

impl EndReason {
    /// Returns a display message for this reason.
    pub fn message(&self) -> String {
        match self {
            Self::MainEnded => "Main content ended".to_string(),
            Self::Requested => "Session ended by host".to_string(),
            Self::InitializationFailed { role, message } => {
                format!("The {role} player failed to initialize: {message}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_owner_per_status() {
        assert_eq!(PlaybackStatus::Init.surface_owner(), None);
        assert_eq!(PlaybackStatus::Idle.surface_owner(), None);
        assert_eq!(
            PlaybackStatus::MainPlaying.surface_owner(),
            Some(PlayerRole::Main)
        );
        assert_eq!(PlaybackStatus::AdPlaying.surface_owner(), Some(PlayerRole::Ad));
        assert_eq!(
            PlaybackStatus::MainPostAdPlaying.surface_owner(),
            Some(PlayerRole::Main)
        );
        assert_eq!(PlaybackStatus::End.surface_owner(), None);
    }

    #[test]
    fn test_only_end_is_terminal() {
        assert!(PlaybackStatus::End.is_terminal());
        assert!(!PlaybackStatus::MainPostAdPlaying.is_terminal());
        assert!(PlaybackStatus::MainPostAdPlaying.is_main_playback());
        assert!(!PlaybackStatus::AdPlaying.is_main_playback());
    }

    #[test]
    fn test_end_reason_message() {
        let reason = EndReason::InitializationFailed {
            role: PlayerRole::Ad,
            message: "decoder busy".to_string(),
        };
        assert_eq!(
            reason.message(),
            "The ad player failed to initialize: decoder busy"
        );
    }
}
