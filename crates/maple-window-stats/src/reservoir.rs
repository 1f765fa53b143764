//! Sample reservoirs in their two roles.
//!
//! A reservoir is a size-bounded subsample of a larger population of
//! events. The minute reservoir is replaced wholesale every minute and is
//! only ever used as a unit. The all-time reservoir carries a timestamp per
//! sample and is filtered to arbitrary trailing windows. The two roles
//! window differently, so they are separate types over the same data.

use serde::{Deserialize, Serialize};

use crate::error::WindowStatsResult;
use crate::invariants::InvariantChecker;

/// Raw reservoir contents as produced by a collector.
///
/// `sample_values[i]` was observed at `sample_times_sec[i]`. Ordering is
/// not significant; windowing filters and then sorts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleReservoir {
    /// Retained sample values.
    pub sample_values: Vec<i64>,
    /// Epoch seconds, one per value.
    pub sample_times_sec: Vec<i64>,
    /// Number of retained samples.
    pub samples_size: usize,
    /// True number of events the reservoir stands for.
    pub num_events: u64,
}

impl SampleReservoir {
    /// Build a reservoir from paired values and timestamps.
    ///
    /// `samples_size` is taken from `values`; call [`validate`](Self::validate)
    /// to check the pairing.
    pub fn new(values: Vec<i64>, times_sec: Vec<i64>, num_events: u64) -> Self {
        let samples_size = values.len();
        Self {
            sample_values: values,
            sample_times_sec: times_sec,
            samples_size,
            num_events,
        }
    }

    pub fn len(&self) -> usize {
        self.samples_size
    }

    pub fn is_empty(&self) -> bool {
        self.samples_size == 0
    }

    /// Iterate `(time_sec, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.sample_times_sec
            .iter()
            .copied()
            .zip(self.sample_values.iter().copied())
    }

    pub fn validate(&self, role: &str) -> WindowStatsResult<()> {
        InvariantChecker::check_reservoir(role, self)
    }
}

// ── Minute reservoir ────────────────────────────────────────────────────

/// The short, atomically refreshed reservoir covering the capture minute.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinuteReservoir(SampleReservoir);

impl MinuteReservoir {
    pub fn new(reservoir: SampleReservoir) -> Self {
        Self(reservoir)
    }

    pub fn reservoir(&self) -> &SampleReservoir {
        &self.0
    }

    /// All retained values; the minute reservoir is never sub-filtered.
    pub fn values(&self) -> &[i64] {
        &self.0.sample_values
    }

    pub fn num_events(&self) -> u64 {
        self.0.num_events
    }

    pub fn validate(&self) -> WindowStatsResult<()> {
        self.0.validate("minute")
    }
}

// ── All-time reservoir ──────────────────────────────────────────────────

/// The long-lived reservoir spanning the whole retained history.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllTimeReservoir(SampleReservoir);

impl AllTimeReservoir {
    pub fn new(reservoir: SampleReservoir) -> Self {
        Self(reservoir)
    }

    pub fn reservoir(&self) -> &SampleReservoir {
        &self.0
    }

    pub fn values(&self) -> &[i64] {
        &self.0.sample_values
    }

    pub fn num_events(&self) -> u64 {
        self.0.num_events
    }

    /// Values whose timestamp falls in `(after_sec, until_sec]`.
    pub fn select_window(&self, after_sec: i64, until_sec: i64) -> Vec<i64> {
        self.0
            .iter()
            .filter(|&(t, _)| t > after_sec && t <= until_sec)
            .map(|(_, v)| v)
            .collect()
    }

    /// Estimated true event count for `selected` of the retained samples.
    ///
    /// Every sample carries the same weight `num_events / samples_size`, so
    /// the estimate is `round(num_events * selected / samples_size)`,
    /// rounding halves up.
    pub fn scaled_event_count(&self, selected: usize) -> u64 {
        let n = self.0.samples_size as u128;
        if n == 0 {
            return 0;
        }
        let scaled = self.0.num_events as u128 * selected as u128;
        ((2 * scaled + n) / (2 * n)) as u64
    }

    pub fn validate(&self) -> WindowStatsResult<()> {
        self.0.validate("all-time")
    }
}
