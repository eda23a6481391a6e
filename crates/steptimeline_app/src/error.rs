// SPDX-License-Identifier: MIT OR Apache-2.0
//! Driver errors.

use steptimeline_sequencer::TimelineError;
use thiserror::Error;

/// Errors raised while loading or running a scene
#[derive(Debug, Error)]
pub enum AppError {
    /// Timeline rejected the scene
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    /// Scene file could not be parsed
    #[error("Scene error: {0}")]
    Scene(#[from] ron::error::SpannedError),

    /// Plan could not be encoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading the scene or writing output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Run settings out of range
    #[error("Invalid settings: {0}")]
    Settings(String),
}
