//! Snapshot invariants and the constants the windows are built from.
//!
//! Violations here mean the collector handed over a malformed snapshot.
//! They are reported as errors at engine construction, never folded into
//! zero results.

use crate::error::{WindowStatsError, WindowStatsResult};
use crate::reservoir::SampleReservoir;

/// Seconds in the minute window.
pub const SECS_PER_MINUTE: i64 = 60;

/// Seconds in the hour window.
pub const SECS_PER_HOUR: i64 = 3_600;

/// Slots in the per-minute counter ring (one hour of minutes).
pub const COUNTER_SLOTS: usize = 60;

/// Rank positions reported by a quantile summary, in percent.
pub const QUARTILE_1_PERCENT: usize = 25;
pub const MEDIAN_PERCENT: usize = 50;
pub const QUARTILE_3_PERCENT: usize = 75;
pub const PERCENTILE_95_PERCENT: usize = 95;

/// Stateless invariant checks over snapshot contents.
pub struct InvariantChecker;

impl InvariantChecker {
    /// Values, timestamps and `samples_size` must agree, and the reservoir
    /// cannot stand for fewer events than it retains.
    pub fn check_reservoir(role: &str, reservoir: &SampleReservoir) -> WindowStatsResult<()> {
        let values = reservoir.sample_values.len();
        let times = reservoir.sample_times_sec.len();
        if values != times || values != reservoir.samples_size {
            return Err(WindowStatsError::LengthMismatch {
                values,
                times,
                samples_size: reservoir.samples_size,
            });
        }
        if reservoir.num_events < reservoir.samples_size as u64 {
            return Err(WindowStatsError::InvariantViolation {
                invariant: "num_events >= samples_size".into(),
                detail: format!(
                    "{} reservoir: num_events {} < samples_size {}",
                    role, reservoir.num_events, reservoir.samples_size
                ),
            });
        }
        Ok(())
    }

    /// The counter ring must hold exactly one slot per minute of the hour.
    pub fn check_counter_ring(slots: &[u64], expected: usize) -> WindowStatsResult<()> {
        if slots.len() != expected {
            return Err(WindowStatsError::SlotCountMismatch {
                expected,
                actual: slots.len(),
            });
        }
        Ok(())
    }
}
