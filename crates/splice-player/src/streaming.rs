//! Streaming engine seam and the configuration it is loaded with.

use serde::{Deserialize, Serialize};

use splice_ipc::{ContentDescriptor, DeviceClass, StreamingSettings};

use crate::adapter::PlayerAdapter;
use crate::PlayerResult;

/// Smallest resolution ABR may select.
pub const ABR_MIN_WIDTH: u32 = 320;
pub const ABR_MIN_HEIGHT: u32 = 240;

/// Largest resolution allowed on non-TV devices.
pub const NON_TV_MAX_WIDTH: u32 = 1919;
pub const NON_TV_MAX_HEIGHT: u32 = 1079;

/// Seconds of media to buffer ahead.
pub const BUFFERING_GOAL_SECS: f32 = 5.0;

/// Seconds of media needed to resume after a stall.
pub const REBUFFERING_GOAL_SECS: f32 = 0.01;

/// Network retry attempts for manifest and segment requests.
pub const MAX_RETRY_ATTEMPTS: u32 = 3;

const PLAYREADY: &str = "com.microsoft.playready";
const SW_SECURE_CRYPTO: &str = "SW_SECURE_CRYPTO";

/// Adaptive streaming engine driving one player's buffering, ABR and DRM.
///
/// Opaque to the orchestrator, which only loads and unloads content.
pub trait StreamingEngine: Send {
    /// Attach to `player` and load `content`.
    fn load(
        &mut self,
        player: &mut dyn PlayerAdapter,
        content: &ContentDescriptor,
        autoplay: bool,
    ) -> PlayerResult<()>;

    /// Detach from the player and release engine resources. Idempotent.
    fn unload(&mut self);
}

/// ABR resolution restrictions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbrRestrictions {
    pub enabled: bool,
    pub min_width: u32,
    pub min_height: u32,
    pub max_width: u32,
    pub max_height: u32,
}

/// DRM key system configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrmProfile {
    /// Preferred key system.
    pub key_system: String,

    /// License server for the key system.
    pub license_uri: String,

    /// Required video robustness level.
    pub video_robustness: String,

    /// Required audio robustness level.
    pub audio_robustness: String,
}

impl DrmProfile {
    /// Robustness levels for `content`, or `None` for clear content.
    pub fn for_content(content: &ContentDescriptor) -> Option<Self> {
        if !content.has_drm() {
            return None;
        }

        let playready = content.drm_scheme == PLAYREADY;
        let video_robustness = match (playready, content.secure) {
            (true, true) => "3000",
            (true, false) => "150",
            (false, true) => "HW_SECURE_ALL",
            (false, false) => SW_SECURE_CRYPTO,
        };

        Some(Self {
            key_system: content.drm_scheme.clone(),
            license_uri: content.drm_license_uri.clone(),
            video_robustness: video_robustness.to_string(),
            audio_robustness: SW_SECURE_CRYPTO.to_string(),
        })
    }
}

/// Engine configuration derived from settings and content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamingProfile {
    pub abr: AbrRestrictions,
    pub drm: Option<DrmProfile>,
    pub secure_buffers: bool,
    pub buffering_goal_secs: f32,
    pub rebuffering_goal_secs: f32,
    pub max_retry_attempts: u32,
}

impl StreamingProfile {
    /// Build the profile for loading `content`.
    pub fn for_content(settings: &StreamingSettings, content: &ContentDescriptor) -> Self {
        let (mut max_width, mut max_height) = (settings.abr_max_width, settings.abr_max_height);
        if settings.device != DeviceClass::Tv {
            max_width = max_width.min(NON_TV_MAX_WIDTH);
            max_height = max_height.min(NON_TV_MAX_HEIGHT);
        }

        Self {
            abr: AbrRestrictions {
                enabled: settings.abr_enabled,
                min_width: ABR_MIN_WIDTH,
                min_height: ABR_MIN_HEIGHT,
                max_width,
                max_height,
            },
            drm: DrmProfile::for_content(content),
            secure_buffers: content.secure,
            buffering_goal_secs: BUFFERING_GOAL_SECS,
            rebuffering_goal_secs: REBUFFERING_GOAL_SECS,
            max_retry_attempts: MAX_RETRY_ATTEMPTS,
        }
    }
}
