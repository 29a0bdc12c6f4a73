//! Configuration errors.

use thiserror::Error;

/// Errors found while validating a playback configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Content URI is empty.
    #[error("Content URI is empty")]
    EmptyUri,

    /// URI could not be parsed.
    #[error("Invalid URI {uri}: {reason}")]
    InvalidUri { uri: String, reason: String },

    /// DRM scheme set without a license server.
    #[error("DRM scheme {scheme} requires a license URI")]
    MissingLicenseUri { scheme: String },

    /// Ad window is negative, not finite, or ends before it starts.
    #[error("Invalid ad window: start {start}s, end {end}s")]
    InvalidAdWindow { start: f64, end: f64 },

    /// Tick interval of zero.
    #[error("Tick interval must be greater than zero")]
    InvalidTickInterval,
}
