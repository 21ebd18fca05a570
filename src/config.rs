//! Engine configuration.
//!
//! Everything tunable is caller-supplied here and validated once, up front;
//! nothing in the engine reads hidden globals. Defaults mirror the parameter
//! ranges the engine was tuned with (a ~20 fps audio-reactive feed).

use crate::error::{Error, Result};

/// Configuration for [`crate::Engine`], validated at construction.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Sample buffer capacity.
    pub max_samples: usize,
    /// Number of k-means cluster centres per pass.
    pub cluster_centres: usize,
    /// Fixed RNG seed for k-means, keeping cluster output stable across runs.
    pub random_seed: u64,
    /// Squared-distance threshold under which a fresh centroid reinforces an
    /// existing tracked centroid instead of creating a new one.
    pub same_cluster_tolerance: f32,
    /// Weight of the fresh observation when nudging a matched centroid
    /// (0.05 = move 5% of the way toward the new position).
    pub smoothing_factor: f32,
    /// Multiplicative per-tick age decay, in (0, 1].
    pub decay_rate: f32,
    /// Minimum age for a tracked centroid to qualify as "long-lived" and
    /// anchor the unconstrained divider lines.
    pub age_threshold: f32,
    /// Cap on the number of unconstrained divider lines.
    pub max_unconstrained_lines: usize,
    /// Constrained-line count above which capacity maintenance evicts.
    pub constrained_line_ceiling: usize,
    /// Number of oldest constrained lines evicted per maintenance pass.
    pub evict_batch: usize,
    /// Outer boundary extents of the normalized space.
    pub bounds_width: f32,
    /// See [`bounds_width`](Self::bounds_width).
    pub bounds_height: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_samples: 4000,
            cluster_centres: 15,
            random_seed: 1000,
            same_cluster_tolerance: 0.2,
            smoothing_factor: 0.05,
            decay_rate: 0.98,
            age_threshold: 4.0,
            max_unconstrained_lines: 5,
            constrained_line_ceiling: 2000,
            evict_batch: 50,
            bounds_width: 1.0,
            bounds_height: 1.0,
        }
    }
}

impl EngineConfig {
    /// Reject configurations the engine cannot run with.
    ///
    /// Fatal at startup by design: a bad parameter is a programming error,
    /// not a condition to limp along under.
    pub fn validate(&self) -> Result<()> {
        if self.max_samples == 0 {
            return Err(Error::InvalidParameter {
                name: "max_samples",
                message: "must be positive",
            });
        }
        if self.cluster_centres == 0 {
            return Err(Error::InvalidParameter {
                name: "cluster_centres",
                message: "must be at least 1",
            });
        }
        if !(self.decay_rate > 0.0 && self.decay_rate <= 1.0) {
            return Err(Error::InvalidParameter {
                name: "decay_rate",
                message: "must be in (0, 1]",
            });
        }
        if !(self.same_cluster_tolerance >= 0.0) {
            return Err(Error::InvalidParameter {
                name: "same_cluster_tolerance",
                message: "must be non-negative",
            });
        }
        if !(0.0..=1.0).contains(&self.smoothing_factor) {
            return Err(Error::InvalidParameter {
                name: "smoothing_factor",
                message: "must be in [0, 1]",
            });
        }
        if !(self.bounds_width > 0.0) || !(self.bounds_height > 0.0) {
            return Err(Error::InvalidParameter {
                name: "bounds",
                message: "extents must be positive",
            });
        }
        if self.constrained_line_ceiling == 0 {
            return Err(Error::InvalidParameter {
                name: "constrained_line_ceiling",
                message: "must be at least 1",
            });
        }
        if self.evict_batch == 0 {
            return Err(Error::InvalidParameter {
                name: "evict_batch",
                message: "must be at least 1",
            });
        }
        Ok(())
    }
}
