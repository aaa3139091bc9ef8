//! Controls error types

use thiserror::Error;

/// Errors raised while configuring controls
///
/// Dispatch itself never fails; unmatched events are ignored and missing
/// callbacks are skipped.
#[derive(Error, Debug)]
pub enum ControlsError {
    /// Flag file could not be parsed
    #[error("Invalid controls configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type for controls operations
pub type Result<T> = std::result::Result<T, ControlsError>;
