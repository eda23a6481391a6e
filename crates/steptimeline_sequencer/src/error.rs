// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for the timeline.

use crate::config::ItemId;
use thiserror::Error;

/// Timeline errors
#[derive(Debug, Error)]
pub enum TimelineError {
    /// The timeline has no items
    #[error("Timeline has no items")]
    EmptyTimeline,

    /// Initial index does not address an item
    #[error("Initial index {index} out of range for {len} items")]
    InitialIndexOutOfRange {
        /// Requested initial index
        index: usize,
        /// Number of items
        len: usize,
    },

    /// Two items share the same identity key
    #[error("Duplicate item id: {0}")]
    DuplicateItemId(ItemId),

    /// No item with this identity key
    #[error("Unknown item id: {0}")]
    UnknownItem(ItemId),

    /// Options file could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] ron::error::SpannedError),

    /// Options could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// Filesystem error while loading or saving options
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for timeline operations
pub type Result<T> = std::result::Result<T, TimelineError>;
