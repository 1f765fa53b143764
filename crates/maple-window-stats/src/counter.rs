//! Counter window engine.
//!
//! Reads a ring of per-minute counters without mutating it. Which absolute
//! minute owns a slot is reconstructed from the snapshot's update time: the
//! slot for minute `m` is `m mod slots`, and after the last update the ring
//! holds minutes `latest - slots + 1 ..= latest`.
//!
//! ```text
//!   ring updated at minute L holds      L-59 ..= L
//!   query at minute L+o, 0 <= o < 60:
//!     L-59 ..= L-60+o    evicted, subtracted from the ring total
//!     L-59+o ..= L       counted
//!     L+1 ..= L+o        never written, counted as zero
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::WindowConfig;
use crate::error::WindowStatsResult;
use crate::snapshot::CounterSnapshot;
use crate::window::{minute_index, StatsWindow};

/// Counts for every window at one query time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterReport {
    pub query_time_sec: i64,
    pub last_minute: u64,
    pub last_hour: u64,
    pub all_time: u64,
}

/// Event counts over a borrowed counter snapshot.
#[derive(Clone, Copy, Debug)]
pub struct CounterStats<'a> {
    snapshot: &'a CounterSnapshot,
    query_time_sec: i64,
    config: WindowConfig,
}

impl<'a> CounterStats<'a> {
    /// Bind `snapshot` to `query_time_sec` with the default 60-slot ring.
    ///
    /// Fails if the ring does not hold exactly one slot per minute.
    pub fn new(snapshot: &'a CounterSnapshot, query_time_sec: i64) -> WindowStatsResult<Self> {
        Self::with_config(snapshot, query_time_sec, WindowConfig::default())
    }

    pub fn with_config(
        snapshot: &'a CounterSnapshot,
        query_time_sec: i64,
        config: WindowConfig,
    ) -> WindowStatsResult<Self> {
        config.validate()?;
        snapshot.validate(config.counter_slots())?;
        Ok(Self {
            snapshot,
            query_time_sec,
            config,
        })
    }

    /// Bind `snapshot` to the current wall-clock time.
    pub fn at_now(snapshot: &'a CounterSnapshot) -> WindowStatsResult<Self> {
        Self::new(snapshot, Utc::now().timestamp())
    }

    pub fn query_time_sec(&self) -> i64 {
        self.query_time_sec
    }

    pub fn snapshot(&self) -> &'a CounterSnapshot {
        self.snapshot
    }

    fn latest_minute(&self) -> i64 {
        minute_index(self.snapshot.latest_time_sec, self.config.minute_secs)
    }

    /// Minutes between the last ring update and the query. Negative when
    /// the query asks about a minute before the update.
    pub fn offset_minutes(&self) -> i64 {
        minute_index(self.query_time_sec, self.config.minute_secs) - self.latest_minute()
    }

    fn slot(&self, minute: i64) -> u64 {
        let slots = self.snapshot.min_counters.len() as i64;
        self.snapshot.min_counters[minute.rem_euclid(slots) as usize]
    }

    /// Count for the query minute, or 0 unless the ring was last updated
    /// in that same minute.
    pub fn last_minute_count(&self) -> u64 {
        let offset = self.offset_minutes();
        if offset != 0 {
            debug!(
                query_time_sec = self.query_time_sec,
                latest_time_sec = self.snapshot.latest_time_sec,
                offset_minutes = offset,
                "counter ring not updated for query minute"
            );
            return 0;
        }
        self.slot(self.latest_minute())
    }

    /// Count for the hour ending at the query minute.
    ///
    /// Minutes that slid out of the hour since the last update are
    /// subtracted; minutes after the update have no data and count as zero.
    /// A query before the update, or a full hour or more after it, shares
    /// no minute with the ring and yields 0.
    pub fn last_hour_count(&self) -> u64 {
        let slots = self.config.counter_slots() as i64;
        let offset = self.offset_minutes();
        if !(0..slots).contains(&offset) {
            debug!(
                query_time_sec = self.query_time_sec,
                latest_time_sec = self.snapshot.latest_time_sec,
                offset_minutes = offset,
                "counter ring shares no minute with query hour"
            );
            return 0;
        }

        // Oldest `offset` minutes of the ring: latest - slots + 1 + j, whose
        // slot equals that of latest + 1 + j.
        let latest = self.latest_minute();
        let evicted: u64 = (0..offset).map(|j| self.slot(latest + 1 + j)).sum();
        self.snapshot.ring_total() - evicted
    }

    /// Running total; never stale.
    pub fn all_time_count(&self) -> u64 {
        self.snapshot.all_time_count
    }

    pub fn count(&self, window: StatsWindow) -> u64 {
        match window {
            StatsWindow::LastMinute => self.last_minute_count(),
            StatsWindow::LastHour => self.last_hour_count(),
            StatsWindow::AllTime => self.all_time_count(),
        }
    }

    pub fn report(&self) -> CounterReport {
        CounterReport {
            query_time_sec: self.query_time_sec,
            last_minute: self.last_minute_count(),
            last_hour: self.last_hour_count(),
            all_time: self.all_time_count(),
        }
    }
}
