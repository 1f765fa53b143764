//! # maple-window-stats
//!
//! Last-minute, last-hour and all-time statistics reconstructed from
//! pre-aggregated telemetry snapshots.
//!
//! ## Architecture
//!
//! ```text
//!   collector (external)
//!        │ snapshot
//!        ├──────────────────────────────┐
//!        ▼                              ▼
//!   ┌──────────────────┐        ┌──────────────────┐
//!   │ SamplerSnapshot  │        │ CounterSnapshot  │
//!   │  MinuteReservoir │        │  60 minute slots │
//!   │  AllTimeReservoir│        │  all-time total  │
//!   └────────┬─────────┘        └────────┬─────────┘
//!            │ + query_time_sec          │ + query_time_sec
//!            ▼                           ▼
//!   ┌──────────────────┐        ┌──────────────────┐
//!   │  SamplerStats    │        │  CounterStats    │
//!   │  nearest-rank    │        │  modular minute  │
//!   │  quantiles       │        │  eviction        │
//!   └────────┬─────────┘        └────────┬─────────┘
//!            ▼                           ▼
//!      QuantileSummary                  u64
//! ```
//!
//! Both engines borrow an immutable snapshot and an explicit query time.
//! Separating "when was this captured" from "as of when" is what lets them
//! detect staleness: a window whose data cannot describe the query time
//! comes back as zero, not as an error. Malformed snapshots are rejected
//! when an engine is constructed.
//!
//! ## Quick Start
//!
//! ```rust
//! use maple_window_stats::{CounterSnapshot, CounterStats};
//!
//! let snapshot = CounterSnapshot::new((0..60).collect(), 615 * 60, 5000);
//! let stats = CounterStats::new(&snapshot, 620 * 60).unwrap();
//! assert_eq!(stats.last_minute_count(), 0);
//! assert_eq!(stats.last_hour_count(), 1770 - (16 + 17 + 18 + 19 + 20));
//! assert_eq!(stats.all_time_count(), 5000);
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod counter;
pub mod error;
pub mod invariants;
pub mod quantile;
pub mod reservoir;
pub mod sampler;
pub mod snapshot;
pub mod window;

// ── Re-exports ──────────────────────────────────────────────────────────

pub use config::WindowConfig;
pub use counter::{CounterReport, CounterStats};
pub use error::{WindowStatsError, WindowStatsResult};
pub use invariants::{InvariantChecker, COUNTER_SLOTS, SECS_PER_HOUR, SECS_PER_MINUTE};
pub use quantile::{rank_index, rank_summary, QuantileSummary};
pub use reservoir::{AllTimeReservoir, MinuteReservoir, SampleReservoir};
pub use sampler::{SamplerReport, SamplerStats};
pub use snapshot::{CounterSnapshot, SamplerSnapshot};
pub use window::StatsWindow;
