//! # Effect Error Types
//!
//! Errors only come out of configuration and surface acquisition. The
//! per-frame path never fails: an effect without a drawing context is inert.

use thiserror::Error;

/// Errors that can occur while configuring or attaching an effect.
#[derive(Error, Debug)]
pub enum EffectError {
    /// The host could not provide a 2D drawing context.
    #[error("drawing context unavailable: {0}")]
    ContextUnavailable(String),

    /// A profile failed validation.
    #[error("invalid profile `{profile}`: {reason}")]
    InvalidProfile {
        /// Profile name.
        profile: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A profile file could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A preset name did not match any known preset.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    /// Reading a profile file failed.
    #[error("failed to read profile file: {0}")]
    Io(#[from] std::io::Error),
}

impl EffectError {
    /// Shorthand for [`EffectError::InvalidProfile`].
    pub(crate) fn invalid(profile: &str, reason: impl Into<String>) -> Self {
        Self::InvalidProfile {
            profile: profile.to_owned(),
            reason: reason.into(),
        }
    }
}

impl From<toml::de::Error> for EffectError {
    fn from(err: toml::de::Error) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

/// Result type for effect operations.
pub type EffectResult<T> = Result<T, EffectError>;
