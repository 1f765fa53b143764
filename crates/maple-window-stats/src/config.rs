//! Window configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{WindowStatsError, WindowStatsResult};
use crate::invariants::{SECS_PER_HOUR, SECS_PER_MINUTE};

/// Lengths of the minute and hour windows.
///
/// The counter ring holds one slot per minute of the hour, so the hour must
/// be a whole number of minutes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Seconds in the minute window.
    pub minute_secs: i64,
    /// Seconds in the hour window.
    pub hour_secs: i64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            minute_secs: SECS_PER_MINUTE,
            hour_secs: SECS_PER_HOUR,
        }
    }
}

impl WindowConfig {
    /// Number of minute slots in the counter ring.
    pub fn counter_slots(&self) -> usize {
        (self.hour_secs / self.minute_secs) as usize
    }

    pub fn validate(&self) -> WindowStatsResult<()> {
        if self.minute_secs <= 0 {
            return Err(WindowStatsError::InvalidConfig(format!(
                "minute_secs must be positive, got {}",
                self.minute_secs
            )));
        }
        if self.hour_secs <= self.minute_secs {
            return Err(WindowStatsError::InvalidConfig(format!(
                "hour_secs {} must exceed minute_secs {}",
                self.hour_secs, self.minute_secs
            )));
        }
        if self.hour_secs % self.minute_secs != 0 {
            return Err(WindowStatsError::InvalidConfig(format!(
                "hour_secs {} is not a whole number of {}s minutes",
                self.hour_secs, self.minute_secs
            )));
        }
        Ok(())
    }

    /// Parse and validate a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> WindowStatsResult<Self> {
        let config: WindowConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> WindowStatsResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "window config not found, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
