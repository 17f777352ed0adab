//! Error types for the Flock rule engine

use thiserror::Error;

/// Main error type for rule evaluation
#[derive(Error, Debug)]
pub enum EngineError {
    /// A rule's bounds are inverted
    #[error("Invalid rule range: min_size {min_size} exceeds max_size {max_size}")]
    InvalidRange { min_size: u32, max_size: u32 },

    /// A rule mandates fewer than one resulting group
    #[error("Invalid split count: {0} (must be at least 1)")]
    InvalidSplitCount(u32),

    /// Two rules cover the same group size
    #[error("Overlapping rule ranges: [{first_min}, {first_max}] and [{second_min}, {second_max}]")]
    OverlappingRanges {
        first_min: u32,
        first_max: u32,
        second_min: u32,
        second_max: u32,
    },
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
