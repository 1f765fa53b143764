//! Trailing windows a statistic can be asked for.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::WindowConfig;

/// A trailing time span ending at the query time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsWindow {
    LastMinute,
    LastHour,
    AllTime,
}

impl StatsWindow {
    /// Every window, shortest first.
    pub const ALL: [StatsWindow; 3] = [Self::LastMinute, Self::LastHour, Self::AllTime];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LastMinute => "last_minute",
            Self::LastHour => "last_hour",
            Self::AllTime => "all_time",
        }
    }

    /// Length of the window, `None` for all-time.
    pub fn duration(&self, config: &WindowConfig) -> Option<Duration> {
        match self {
            Self::LastMinute => Some(Duration::from_secs(config.minute_secs as u64)),
            Self::LastHour => Some(Duration::from_secs(config.hour_secs as u64)),
            Self::AllTime => None,
        }
    }
}

impl std::fmt::Display for StatsWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StatsWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "last_minute" => Ok(Self::LastMinute),
            "last_hour" => Ok(Self::LastHour),
            "all_time" => Ok(Self::AllTime),
            other => Err(format!("unknown stats window: {}", other)),
        }
    }
}

/// Absolute minute number containing `time_sec`, flooring toward negative
/// infinity.
pub fn minute_index(time_sec: i64, minute_secs: i64) -> i64 {
    time_sec.div_euclid(minute_secs)
}
