//! Per-run sweep metrics.
//!
//! [`SweepMetrics`] counts what the scheduler did, enabling telemetry
//! and the acceptance-rate checks in tests. The scheduler populates the
//! counters as it goes; consumers read them between sweeps.

/// Counters accumulated over a scheduler's lifetime.
#[derive(Clone, Debug, Default)]
pub struct SweepMetrics {
    /// Completed sweeps.
    pub sweeps: u64,
    /// Rejection-sampling proposals made.
    pub proposals: u64,
    /// Rejection-sampling proposals accepted.
    pub accepted: u64,
    /// Sites skipped because their mask flag was set.
    pub masked_skips: u64,
    /// Strict-style picks discarded because a stencil neighbor was
    /// perturbed earlier in the same color pass.
    pub strict_discards: u64,
    /// Exact events fired across all sectors.
    pub events: u64,
    /// Sector visits that ended with zero total propensity.
    pub frozen_sectors: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = SweepMetrics::default();
        assert_eq!(m.sweeps, 0);
        assert_eq!(m.proposals, 0);
        assert_eq!(m.accepted, 0);
        assert_eq!(m.masked_skips, 0);
        assert_eq!(m.strict_discards, 0);
        assert_eq!(m.events, 0);
        assert_eq!(m.frozen_sectors, 0);
    }
}
