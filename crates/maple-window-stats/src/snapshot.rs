//! Snapshots handed over by the collector.
//!
//! Both snapshots are immutable value objects: built once, borrowed by an
//! engine for the duration of a query, then dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WindowStatsResult;
use crate::invariants::InvariantChecker;
use crate::reservoir::{AllTimeReservoir, MinuteReservoir};

fn epoch_to_datetime(time_sec: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(time_sec, 0)
}

/// Sample reservoirs captured at `latest_time_sec`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerSnapshot {
    /// Capture time, epoch seconds.
    pub latest_time_sec: i64,
    /// Reservoir covering roughly the minute ending at `latest_time_sec`.
    pub last_minute_samples: MinuteReservoir,
    /// Reservoir covering the full retained history.
    pub all_time_samples: AllTimeReservoir,
}

impl SamplerSnapshot {
    pub fn new(
        latest_time_sec: i64,
        last_minute_samples: MinuteReservoir,
        all_time_samples: AllTimeReservoir,
    ) -> Self {
        Self {
            latest_time_sec,
            last_minute_samples,
            all_time_samples,
        }
    }

    /// Decode a snapshot from JSON and check its invariants.
    pub fn from_json(json: &str) -> WindowStatsResult<Self> {
        let snapshot: SamplerSnapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn validate(&self) -> WindowStatsResult<()> {
        self.last_minute_samples.validate()?;
        self.all_time_samples.validate()
    }

    /// Capture time as a UTC timestamp, if representable.
    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        epoch_to_datetime(self.latest_time_sec)
    }
}

/// Per-minute event counters captured at `latest_time_sec`.
///
/// Slot `i` of `min_counters` holds the count for the absolute minute `m`
/// with `m mod slots == i` most recently written before the capture.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    /// One count per minute of the hour.
    pub min_counters: Vec<u64>,
    /// Time of the most recent minute written into the ring, epoch seconds.
    pub latest_time_sec: i64,
    /// Running total of every event ever recorded.
    pub all_time_count: u64,
}

impl CounterSnapshot {
    pub fn new(min_counters: Vec<u64>, latest_time_sec: i64, all_time_count: u64) -> Self {
        Self {
            min_counters,
            latest_time_sec,
            all_time_count,
        }
    }

    /// Decode a snapshot from JSON and check it against a ring of
    /// `expected_slots` minutes.
    pub fn from_json(json: &str, expected_slots: usize) -> WindowStatsResult<Self> {
        let snapshot: CounterSnapshot = serde_json::from_str(json)?;
        snapshot.validate(expected_slots)?;
        Ok(snapshot)
    }

    pub fn validate(&self, expected_slots: usize) -> WindowStatsResult<()> {
        InvariantChecker::check_counter_ring(&self.min_counters, expected_slots)
    }

    /// Sum of every slot, whichever minute currently owns it.
    pub fn ring_total(&self) -> u64 {
        self.min_counters.iter().sum()
    }

    /// Time of the last ring update as a UTC timestamp, if representable.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        epoch_to_datetime(self.latest_time_sec)
    }
}
