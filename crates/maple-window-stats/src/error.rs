use thiserror::Error;

/// Errors from the window statistics engines.
///
/// Stale or empty windows are not errors; they produce zero results. These
/// variants cover malformed input handed over by a collector, and the
/// decode/config plumbing around it.
#[derive(Debug, Error)]
pub enum WindowStatsError {
    #[error("invariant violation: {invariant} -- {detail}")]
    InvariantViolation { invariant: String, detail: String },

    #[error(
        "reservoir length mismatch: {values} values, {times} timestamps, samples_size {samples_size}"
    )]
    LengthMismatch {
        values: usize,
        times: usize,
        samples_size: usize,
    },

    #[error("counter ring has {actual} slots, expected {expected}")]
    SlotCountMismatch { expected: usize, actual: usize },

    #[error("invalid window configuration: {0}")]
    InvalidConfig(String),

    #[error("snapshot decode error: {0}")]
    Decode(String),

    #[error("config parse error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for WindowStatsError {
    fn from(e: serde_json::Error) -> Self {
        WindowStatsError::Decode(e.to_string())
    }
}

impl From<toml::de::Error> for WindowStatsError {
    fn from(e: toml::de::Error) -> Self {
        WindowStatsError::Config(e.to_string())
    }
}

impl From<std::io::Error> for WindowStatsError {
    fn from(e: std::io::Error) -> Self {
        WindowStatsError::Io(e.to_string())
    }
}

/// Convenience type alias for window statistics results.
pub type WindowStatsResult<T> = Result<T, WindowStatsError>;
