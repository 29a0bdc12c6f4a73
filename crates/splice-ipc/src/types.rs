//! Common types used across host messages.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;
use crate::DEFAULT_TICK_INTERVAL_MS;

/// Opaque platform identifier of a rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceHandle(String);

impl SurfaceHandle {
    /// Wrap a platform handle.
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// The raw platform handle.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A piece of content to play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDescriptor {
    /// Manifest or media URL.
    pub uri: String,

    /// Use secure video buffers.
    #[serde(default)]
    pub secure: bool,

    /// DRM key system (e.g. "com.widevine.alpha"), empty for clear content.
    #[serde(default)]
    pub drm_scheme: String,

    /// License server URL, required when `drm_scheme` is set.
    #[serde(default)]
    pub drm_license_uri: String,

    /// Position on this content's timeline at which the ad is prepared.
    #[serde(default)]
    pub ad_start_offset_seconds: f64,

    /// Position on the ad timeline at which the ad break ends.
    #[serde(default)]
    pub ad_end_offset_seconds: f64,
}

impl ContentDescriptor {
    /// Clear content at `uri` with no ad window.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            secure: false,
            drm_scheme: String::new(),
            drm_license_uri: String::new(),
            ad_start_offset_seconds: 0.0,
            ad_end_offset_seconds: 0.0,
        }
    }

    /// Set the ad window.
    pub fn with_ad_window(mut self, start_seconds: f64, end_seconds: f64) -> Self {
        self.ad_start_offset_seconds = start_seconds;
        self.ad_end_offset_seconds = end_seconds;
        self
    }

    /// Returns true if the content is DRM protected.
    pub fn has_drm(&self) -> bool {
        !self.drm_scheme.is_empty()
    }

    /// Check URIs and the ad window.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.uri.trim().is_empty() {
            return Err(ConfigError::EmptyUri);
        }
        parse_uri(&self.uri)?;

        if self.has_drm() {
            if self.drm_license_uri.trim().is_empty() {
                return Err(ConfigError::MissingLicenseUri {
                    scheme: self.drm_scheme.clone(),
                });
            }
            parse_uri(&self.drm_license_uri)?;
        }

        let (start, end) = (self.ad_start_offset_seconds, self.ad_end_offset_seconds);
        if !start.is_finite() || !end.is_finite() || start < 0.0 || start > end {
            return Err(ConfigError::InvalidAdWindow { start, end });
        }

        Ok(())
    }
}

fn parse_uri(uri: &str) -> Result<Url, ConfigError> {
    Url::parse(uri).map_err(|e| ConfigError::InvalidUri {
        uri: uri.to_string(),
        reason: e.to_string(),
    })
}

/// Class of device the streaming engine runs on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceClass {
    /// Television, allowed to stream up to UHD.
    #[default]
    Tv,

    /// Any other device, capped at FHD.
    Other,
}

/// Streaming engine settings applied when loading main content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingSettings {
    /// Device class used to cap ABR resolution.
    pub device: DeviceClass,

    /// Enables adaptive bitrate switching.
    pub abr_enabled: bool,

    /// Maximum width allowed for ABR.
    pub abr_max_width: u32,

    /// Maximum height allowed for ABR.
    pub abr_max_height: u32,
}

impl StreamingSettings {
    /// Defaults for the given device class.
    pub fn for_device(device: DeviceClass) -> Self {
        let (abr_max_width, abr_max_height) = match device {
            DeviceClass::Tv => (3840, 2160),
            DeviceClass::Other => (1919, 1079),
        };
        Self {
            device,
            abr_enabled: true,
            abr_max_width,
            abr_max_height,
        }
    }
}

impl Default for StreamingSettings {
    fn default() -> Self {
        Self::for_device(DeviceClass::Tv)
    }
}

/// Configuration for a playback session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Main content; its ad window positions the ad break.
    pub main: ContentDescriptor,

    /// Ad content.
    pub ad: ContentDescriptor,

    /// Passed to the streaming engine when loading main content.
    pub autoplay: bool,

    /// Reconciliation tick period in milliseconds.
    pub tick_interval_ms: u64,

    /// Pause main playback as soon as the ad player reports it can play.
    pub pause_main_on_ad_ready: bool,

    /// Streaming engine settings.
    pub streaming: StreamingSettings,
}

impl PlaybackConfig {
    /// Position on the main timeline at which the ad is prepared.
    pub fn ad_start_offset(&self) -> f64 {
        self.main.ad_start_offset_seconds
    }

    /// Position on the ad timeline at which the ad break ends.
    pub fn ad_end_offset(&self) -> f64 {
        self.main.ad_end_offset_seconds
    }

    /// Reconciliation tick period.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Validate both descriptors and the tick period.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.main.validate()?;
        self.ad.validate()?;
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidTickInterval);
        }
        Ok(())
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            main: ContentDescriptor::new(
                "https://storage.googleapis.com/exoplayer-test-media-1/60fps/bbb-clear-2160/manifest.mpd",
            )
            .with_ad_window(10.0, 10.0),
            ad: ContentDescriptor::new(
                "https://storage.googleapis.com/exoplayer-test-media-1/gen-3/screens/dash-vod-single-segment/video-137.mp4",
            ),
            autoplay: true,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            pause_main_on_ad_ready: true,
            streaming: StreamingSettings::default(),
        }
    }
}

/// Statistics for the current or last session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Session generation these stats belong to.
    pub generation: u64,

    /// Reconciliation ticks processed.
    pub ticks: u64,

    /// Successful surface hand-offs.
    pub surface_handoffs: u64,

    /// Transition requests with no matching table row.
    pub ignored_transitions: u64,

    /// Events and completions discarded as stale.
    pub stale_signals: u64,

    /// Whether the ad was played.
    pub ad_played: bool,

    /// Session uptime in seconds.
    pub uptime_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PlaybackConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ad_start_offset(), 10.0);
        assert_eq!(config.ad_end_offset(), 10.0);
        assert_eq!(config.tick_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_ad_window_must_be_ordered() {
        let content = ContentDescriptor::new("https://example.com/a.mpd").with_ad_window(12.0, 4.0);
        assert!(matches!(
            content.validate(),
            Err(ConfigError::InvalidAdWindow { .. })
        ));
    }

    #[test]
    fn test_drm_requires_license_uri() {
        let mut content = ContentDescriptor::new("https://example.com/a.mpd");
        content.drm_scheme = "com.widevine.alpha".to_string();
        assert!(matches!(
            content.validate(),
            Err(ConfigError::MissingLicenseUri { .. })
        ));

        content.drm_license_uri = "https://license.example.com/wv".to_string();
        assert!(content.validate().is_ok());
    }

    #[test]
    fn test_rejects_unparseable_uri() {
        let content = ContentDescriptor::new("not a url");
        assert!(matches!(content.validate(), Err(ConfigError::InvalidUri { .. })));
        assert!(matches!(
            ContentDescriptor::new("  ").validate(),
            Err(ConfigError::EmptyUri)
        ));
    }

    #[test]
    fn test_descriptor_wire_shape() {
        let json = r#"{
            "uri": "https://example.com/main.mpd",
            "secure": true,
            "drmScheme": "com.microsoft.playready",
            "drmLicenseUri": "https://license.example.com/pr",
            "adStartOffsetSeconds": 5,
            "adEndOffsetSeconds": 15
        }"#;
        let content: ContentDescriptor = serde_json::from_str(json).unwrap();
        assert!(content.secure);
        assert_eq!(content.drm_scheme, "com.microsoft.playready");
        assert_eq!(content.ad_start_offset_seconds, 5.0);
        assert_eq!(content.ad_end_offset_seconds, 15.0);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: PlaybackConfig = serde_json::from_str(r#"{ "tick_interval_ms": 100 }"#).unwrap();
        assert_eq!(config.tick_interval_ms, 100);
        assert!(config.pause_main_on_ad_ready);
        assert_eq!(config.streaming.abr_max_width, 3840);
    }

    #[test]
    fn test_non_tv_settings_cap_resolution() {
        let settings = StreamingSettings::for_device(DeviceClass::Other);
        assert_eq!((settings.abr_max_width, settings.abr_max_height), (1919, 1079));
    }
}
