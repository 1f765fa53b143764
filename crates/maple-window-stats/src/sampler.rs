//! Quantile window engine.
//!
//! Answers minute, hour and all-time rank statistics from a
//! [`SamplerSnapshot`] as of an explicit query time. The minute window is
//! trusted only while the query falls in the capture minute; the hour window
//! is a timestamp filter over the all-time reservoir and shrinks smoothly as
//! the query drifts past the capture time.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::WindowConfig;
use crate::error::WindowStatsResult;
use crate::quantile::{rank_summary, QuantileSummary};
use crate::snapshot::SamplerSnapshot;
use crate::window::{minute_index, StatsWindow};

/// Rank statistics for every window at one query time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerReport {
    pub query_time_sec: i64,
    pub last_minute: QuantileSummary,
    pub last_hour: QuantileSummary,
    pub all_time: QuantileSummary,
}

/// Quantile statistics over a borrowed sampler snapshot.
#[derive(Clone, Copy, Debug)]
pub struct SamplerStats<'a> {
    snapshot: &'a SamplerSnapshot,
    query_time_sec: i64,
    config: WindowConfig,
}

impl<'a> SamplerStats<'a> {
    /// Bind `snapshot` to `query_time_sec` with the default windows.
    ///
    /// Fails if the snapshot's reservoirs violate their invariants.
    pub fn new(snapshot: &'a SamplerSnapshot, query_time_sec: i64) -> WindowStatsResult<Self> {
        Self::with_config(snapshot, query_time_sec, WindowConfig::default())
    }

    pub fn with_config(
        snapshot: &'a SamplerSnapshot,
        query_time_sec: i64,
        config: WindowConfig,
    ) -> WindowStatsResult<Self> {
        config.validate()?;
        snapshot.validate()?;
        Ok(Self {
            snapshot,
            query_time_sec,
            config,
        })
    }

    /// Bind `snapshot` to the current wall-clock time.
    pub fn at_now(snapshot: &'a SamplerSnapshot) -> WindowStatsResult<Self> {
        Self::new(snapshot, Utc::now().timestamp())
    }

    pub fn query_time_sec(&self) -> i64 {
        self.query_time_sec
    }

    pub fn snapshot(&self) -> &'a SamplerSnapshot {
        self.snapshot
    }

    /// Statistics for the capture minute.
    ///
    /// The minute reservoir is refreshed as a whole, so it is either the
    /// query's minute or useless: any other minute yields the zero summary.
    pub fn last_minute_stats(&self) -> QuantileSummary {
        let minute_secs = self.config.minute_secs;
        let query_minute = minute_index(self.query_time_sec, minute_secs);
        let capture_minute = minute_index(self.snapshot.latest_time_sec, minute_secs);
        if query_minute != capture_minute {
            debug!(
                query_time_sec = self.query_time_sec,
                latest_time_sec = self.snapshot.latest_time_sec,
                offset_minutes = query_minute - capture_minute,
                "minute reservoir stale for query minute"
            );
            return QuantileSummary::ZERO;
        }

        let minute = &self.snapshot.last_minute_samples;
        let summary = rank_summary(minute.values().to_vec(), minute.num_events());
        trace!(window = StatsWindow::LastMinute.as_str(), ?summary, "computed");
        summary
    }

    /// Statistics over all-time samples stamped within the hour ending at
    /// the query time.
    pub fn last_hour_stats(&self) -> QuantileSummary {
        let all_time = &self.snapshot.all_time_samples;
        let hour_start = self.query_time_sec - self.config.hour_secs;
        let selected = all_time.select_window(hour_start, self.query_time_sec);
        if selected.is_empty() {
            debug!(
                query_time_sec = self.query_time_sec,
                latest_time_sec = self.snapshot.latest_time_sec,
                "no all-time samples within the last hour"
            );
            return QuantileSummary::ZERO;
        }

        let count = all_time.scaled_event_count(selected.len());
        let summary = rank_summary(selected, count);
        trace!(window = StatsWindow::LastHour.as_str(), ?summary, "computed");
        summary
    }

    /// Statistics over the whole all-time reservoir.
    pub fn all_time_stats(&self) -> QuantileSummary {
        let all_time = &self.snapshot.all_time_samples;
        rank_summary(all_time.values().to_vec(), all_time.num_events())
    }

    pub fn stats(&self, window: StatsWindow) -> QuantileSummary {
        match window {
            StatsWindow::LastMinute => self.last_minute_stats(),
            StatsWindow::LastHour => self.last_hour_stats(),
            StatsWindow::AllTime => self.all_time_stats(),
        }
    }

    pub fn report(&self) -> SamplerReport {
        SamplerReport {
            query_time_sec: self.query_time_sec,
            last_minute: self.last_minute_stats(),
            last_hour: self.last_hour_stats(),
            all_time: self.all_time_stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WindowStatsError;
    use crate::reservoir::{AllTimeReservoir, MinuteReservoir, SampleReservoir};

    const T: i64 = 60 * 1_000;

    /// `n` samples valued `0..n`, stamped every `step` seconds back from `start`.
    fn stepped(start: i64, step: i64, n: usize, events: u64) -> SampleReservoir {
        let values = (0..n as i64).collect();
        let times = (0..n as i64).map(|i| start - i * step).collect();
        SampleReservoir::new(values, times, events)
    }

    fn snapshot(minute: SampleReservoir, all_time: SampleReservoir) -> SamplerSnapshot {
        SamplerSnapshot::new(
            T,
            MinuteReservoir::new(minute),
            AllTimeReservoir::new(all_time),
        )
    }

    #[test]
    fn rejects_malformed_snapshot() {
        let bad = SampleReservoir {
            sample_values: vec![1, 2],
            sample_times_sec: vec![T],
            samples_size: 2,
            num_events: 2,
        };
        let snap = snapshot(bad, SampleReservoir::default());
        assert!(matches!(
            SamplerStats::new(&snap, T),
            Err(WindowStatsError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn rejects_invalid_config() {
        let snap = SamplerSnapshot::default();
        let cfg = WindowConfig {
            minute_secs: 0,
            hour_secs: 3600,
        };
        assert!(SamplerStats::with_config(&snap, 0, cfg).is_err());
    }

    #[test]
    fn minute_window_same_minute() {
        let snap = snapshot(stepped(T, 1, 10, 40), SampleReservoir::default());
        let stats = SamplerStats::new(&snap, T + 30).unwrap();
        let s = stats.last_minute_stats();
        assert_eq!(s.median, 5);
        assert_eq!(s.largest_value, 9);
        assert_eq!(s.count, 40);
    }

    #[test]
    fn minute_window_earlier_minute_is_stale() {
        let snap = snapshot(stepped(T, 1, 10, 40), SampleReservoir::default());
        let stats = SamplerStats::new(&snap, T - 1).unwrap();
        assert!(stats.last_minute_stats().is_zero());
    }

    #[test]
    fn minute_window_ignores_sample_timestamps() {
        // Samples stamped well outside the minute still count; the reservoir
        // is scoped by its refresh, not by its timestamps.
        let snap = snapshot(stepped(T - 600, 60, 4, 4), SampleReservoir::default());
        let stats = SamplerStats::new(&snap, T).unwrap();
        assert_eq!(stats.last_minute_stats().count, 4);
    }

    #[test]
    fn minute_window_empty_reservoir() {
        let snap = snapshot(SampleReservoir::default(), SampleReservoir::default());
        let stats = SamplerStats::new(&snap, T).unwrap();
        assert!(stats.last_minute_stats().is_zero());
    }

    #[test]
    fn hour_window_filters_by_timestamp() {
        // One sample every 10 minutes for 5 hours: 30 samples, 300 events.
        let snap = snapshot(SampleReservoir::default(), stepped(T, 600, 30, 300));
        let stats = SamplerStats::new(&snap, T).unwrap();
        let s = stats.last_hour_stats();
        // (T - 3600, T] keeps offsets 0, 600, ..., 3000: six samples.
        assert_eq!(s.largest_value, 5);
        assert_eq!(s.quartile_1, 1);
        assert_eq!(s.count, 60);
    }

    #[test]
    fn hour_window_query_before_capture_uses_filter_only() {
        let snap = snapshot(SampleReservoir::default(), stepped(T, 600, 30, 300));
        let stats = SamplerStats::new(&snap, T - 1200).unwrap();
        let s = stats.last_hour_stats();
        // (T - 4800, T - 1200] keeps offsets 1200..=4200: six samples, values 2..=7.
        assert_eq!(s.largest_value, 7);
        assert_eq!(s.count, 60);
    }

    #[test]
    fn hour_window_empty_reservoir() {
        let snap = SamplerSnapshot::default();
        let stats = SamplerStats::new(&snap, 0).unwrap();
        assert!(stats.last_hour_stats().is_zero());
    }

    #[test]
    fn all_time_ignores_query_time() {
        let snap = snapshot(SampleReservoir::default(), stepped(T, 600, 30, 300));
        let now = SamplerStats::new(&snap, T).unwrap().all_time_stats();
        let later = SamplerStats::new(&snap, T + 86_400).unwrap().all_time_stats();
        assert_eq!(now, later);
        assert_eq!(now.count, 300);
        assert_eq!(now.largest_value, 29);
    }

    #[test]
    fn stats_dispatches_by_window() {
        let snap = snapshot(stepped(T, 1, 10, 10), stepped(T, 600, 30, 300));
        let stats = SamplerStats::new(&snap, T).unwrap();
        assert_eq!(
            stats.stats(StatsWindow::LastMinute),
            stats.last_minute_stats()
        );
        assert_eq!(stats.stats(StatsWindow::LastHour), stats.last_hour_stats());
        assert_eq!(stats.stats(StatsWindow::AllTime), stats.all_time_stats());
    }

    #[test]
    fn report_collects_all_windows() {
        let snap = snapshot(stepped(T, 1, 10, 10), stepped(T, 600, 30, 300));
        let stats = SamplerStats::new(&snap, T + 60).unwrap();
        let report = stats.report();
        assert_eq!(report.query_time_sec, T + 60);
        assert!(report.last_minute.is_zero());
        assert!(!report.last_hour.is_zero());
        assert_eq!(report.all_time.count, 300);

        let json = serde_json::to_value(report).unwrap();
        assert_eq!(json["all_time"]["count"], 300);
    }

    #[test]
    fn custom_config_shortens_windows() {
        let cfg = WindowConfig {
            minute_secs: 10,
            hour_secs: 600,
        };
        let snap = snapshot(stepped(T, 1, 10, 10), stepped(T, 600, 30, 300));
        let stats = SamplerStats::with_config(&snap, T + 10, cfg).unwrap();
        assert!(stats.last_minute_stats().is_zero());
        // (T - 590, T + 10] keeps only the sample stamped at T.
        assert_eq!(stats.last_hour_stats().count, 10);
    }
}
