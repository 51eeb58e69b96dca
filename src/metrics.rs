//! Enumeration metrics collection for profiling and analysis.
//!
//! This module provides aggregate counters for the enumeration loop.
//! When the `tracing` feature is enabled, metrics are collected during
//! enumeration. When disabled, all operations are no-ops with zero overhead.

#[cfg(feature = "tracing")]
use std::sync::atomic::{AtomicU64, Ordering};

/// Aggregate metrics collected during enumeration.
///
/// All counters use relaxed ordering for minimal overhead; the report read
/// after a session completes is accurate.
#[cfg(feature = "tracing")]
pub struct EnumMetrics {
    /// Candidates popped from the frontier
    pub steps: AtomicU64,
    /// Successor expressions produced by refinement
    pub expansions: AtomicU64,
    /// Successors dropped by the redundancy filter
    pub redundant_pruned: AtomicU64,
    /// Concrete expressions emitted
    pub concrete_emitted: AtomicU64,
    /// Abstract expressions pushed back onto the frontier
    pub abstract_requeued: AtomicU64,
    /// Cost layers completed
    pub layers_finished: AtomicU64,
    /// Maximum frontier size observed
    pub max_frontier_len: AtomicU64,
}

#[cfg(feature = "tracing")]
impl EnumMetrics {
    /// Create a new metrics collector with all counters at zero.
    pub fn new() -> Self {
        Self {
            steps: AtomicU64::new(0),
            expansions: AtomicU64::new(0),
            redundant_pruned: AtomicU64::new(0),
            concrete_emitted: AtomicU64::new(0),
            abstract_requeued: AtomicU64::new(0),
            layers_finished: AtomicU64::new(0),
            max_frontier_len: AtomicU64::new(0),
        }
    }

    /// Record a popped candidate.
    #[inline]
    pub fn record_step(&self) {
        self.steps.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a surviving successor expression.
    #[inline]
    pub fn record_expansion(&self) {
        self.expansions.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successor dropped as redundant.
    #[inline]
    pub fn record_redundant(&self) {
        self.redundant_pruned.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a concrete emission.
    #[inline]
    pub fn record_concrete(&self) {
        self.concrete_emitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an abstract candidate pushed back onto the frontier.
    #[inline]
    pub fn record_requeue(&self) {
        self.abstract_requeued.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed cost layer.
    #[inline]
    pub fn record_layer_finished(&self) {
        self.layers_finished.fetch_add(1, Ordering::Relaxed);
    }

    /// Update the maximum frontier size if the new length is higher.
    #[inline]
    pub fn observe_frontier_len(&self, len: u64) {
        let mut current = self.max_frontier_len.load(Ordering::Relaxed);
        while len > current {
            match self.max_frontier_len.compare_exchange_weak(
                current,
                len,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(c) => current = c,
            }
        }
    }

    /// Generate a snapshot report of all metrics.
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            steps: self.steps.load(Ordering::Relaxed),
            expansions: self.expansions.load(Ordering::Relaxed),
            redundant_pruned: self.redundant_pruned.load(Ordering::Relaxed),
            concrete_emitted: self.concrete_emitted.load(Ordering::Relaxed),
            abstract_requeued: self.abstract_requeued.load(Ordering::Relaxed),
            layers_finished: self.layers_finished.load(Ordering::Relaxed),
            max_frontier_len: self.max_frontier_len.load(Ordering::Relaxed),
        }
    }

    /// Reset all metrics to zero.
    pub fn reset(&self) {
        self.steps.store(0, Ordering::Relaxed);
        self.expansions.store(0, Ordering::Relaxed);
        self.redundant_pruned.store(0, Ordering::Relaxed);
        self.concrete_emitted.store(0, Ordering::Relaxed);
        self.abstract_requeued.store(0, Ordering::Relaxed);
        self.layers_finished.store(0, Ordering::Relaxed);
        self.max_frontier_len.store(0, Ordering::Relaxed);
    }
}

#[cfg(feature = "tracing")]
impl Default for EnumMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsReport {
    pub steps: u64,
    pub expansions: u64,
    pub redundant_pruned: u64,
    pub concrete_emitted: u64,
    pub abstract_requeued: u64,
    pub layers_finished: u64,
    pub max_frontier_len: u64,
}

impl MetricsReport {
    /// Fraction of refined successors that survived the redundancy filter.
    pub fn survival_rate(&self) -> f64 {
        let total = self.expansions + self.redundant_pruned;
        if total == 0 {
            1.0
        } else {
            self.expansions as f64 / total as f64
        }
    }
}

impl std::fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Enumeration Metrics ===")?;
        writeln!(f, "Steps:              {}", self.steps)?;
        writeln!(
            f,
            "Expansions:         {} ({} pruned, {:.1}% kept)",
            self.expansions,
            self.redundant_pruned,
            self.survival_rate() * 100.0
        )?;
        writeln!(f, "Concrete emitted:   {}", self.concrete_emitted)?;
        writeln!(f, "Abstract requeued:  {}", self.abstract_requeued)?;
        writeln!(f, "Layers finished:    {}", self.layers_finished)?;
        writeln!(f, "Max frontier size:  {}", self.max_frontier_len)?;
        Ok(())
    }
}

// No-op implementation when tracing is disabled
#[cfg(not(feature = "tracing"))]
pub struct EnumMetrics;

#[cfg(not(feature = "tracing"))]
impl EnumMetrics {
    #[inline]
    pub fn new() -> Self {
        EnumMetrics
    }
    #[inline]
    pub fn record_step(&self) {}
    #[inline]
    pub fn record_expansion(&self) {}
    #[inline]
    pub fn record_redundant(&self) {}
    #[inline]
    pub fn record_concrete(&self) {}
    #[inline]
    pub fn record_requeue(&self) {}
    #[inline]
    pub fn record_layer_finished(&self) {}
    #[inline]
    pub fn observe_frontier_len(&self, _len: u64) {}
    #[inline]
    pub fn report(&self) -> MetricsReport {
        MetricsReport::default()
    }
    #[inline]
    pub fn reset(&self) {}
}

#[cfg(not(feature = "tracing"))]
impl Default for EnumMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_report_is_zeroed() {
        let metrics = EnumMetrics::new();
        assert_eq!(metrics.report(), MetricsReport::default());
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn counters_accumulate() {
        let metrics = EnumMetrics::new();
        metrics.record_step();
        metrics.record_step();
        metrics.record_expansion();
        metrics.record_redundant();
        metrics.observe_frontier_len(7);
        metrics.observe_frontier_len(3);

        let report = metrics.report();
        assert_eq!(report.steps, 2);
        assert_eq!(report.expansions, 1);
        assert_eq!(report.redundant_pruned, 1);
        assert_eq!(report.max_frontier_len, 7, "max must not regress");

        metrics.reset();
        assert_eq!(metrics.report(), MetricsReport::default());
    }
}
