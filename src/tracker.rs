//! Identity-preserving centroid tracking across clustering passes.
//!
//! K-means labels are meaningless between passes, so persistence is recovered
//! here instead: every fresh batch of centroids is merged into a long-lived
//! set by proximity, and each tracked centroid carries an age that is
//! reinforced on a match and decays multiplicatively every tick. A centroid
//! that keeps reappearing in roughly the same place accumulates age; one that
//! stops being observed decays back below the survival threshold and is
//! dropped.

use crate::geom::Point;

/// A persistent centroid with a scalar persistence score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackedCentroid {
    pub position: Point,
    /// Persistence score: incremented on reinforcement, multiplied by the
    /// decay rate every tick, evicted at `<= 1.0`.
    pub age: f32,
}

/// Decaying, deduplicated set of cluster centres.
#[derive(Clone, Debug)]
pub struct CentroidTracker {
    centroids: Vec<TrackedCentroid>,
    /// Threshold on *squared* distance for "same cluster".
    same_cluster_tolerance: f32,
    /// Weight of the fresh observation when nudging a matched centroid.
    smoothing_factor: f32,
    decay_rate: f32,
}

impl CentroidTracker {
    pub fn new(same_cluster_tolerance: f32, smoothing_factor: f32, decay_rate: f32) -> Self {
        Self {
            centroids: Vec::new(),
            same_cluster_tolerance,
            smoothing_factor,
            decay_rate,
        }
    }

    /// Merge a fresh batch of k-means centroids into the tracked set.
    ///
    /// Each fresh centroid either reinforces the first tracked centroid
    /// within tolerance (position nudged `smoothing_factor` of the way toward
    /// the observation, age incremented by one) or is appended as a new
    /// centroid at age 1.0. Empty input is a no-op.
    pub fn update(&mut self, fresh: &[Point]) {
        for observed in fresh {
            match self
                .centroids
                .iter_mut()
                .find(|c| c.position.distance_squared(observed) < self.same_cluster_tolerance)
            {
                Some(existing) => {
                    existing.position = existing.position.lerp(observed, self.smoothing_factor);
                    existing.age += 1.0;
                }
                None => {
                    self.centroids.push(TrackedCentroid {
                        position: *observed,
                        age: 1.0,
                    });
                }
            }
        }
    }

    /// Age every centroid by the decay rate and drop the ones at or below
    /// the survival threshold.
    ///
    /// Runs exactly once per tick, after [`update`](Self::update), whether or
    /// not new samples arrived. A centroid created this tick only survives
    /// its first decay if another fresh centroid reinforced it in the same
    /// pass.
    pub fn decay(&mut self) {
        for c in &mut self.centroids {
            c.age *= self.decay_rate;
        }
        self.centroids.retain(|c| c.age > 1.0);
    }

    pub fn len(&self) -> usize {
        self.centroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centroids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedCentroid> {
        self.centroids.iter()
    }

    pub fn as_slice(&self) -> &[TrackedCentroid] {
        &self.centroids
    }

    /// Centroids whose age has reached `min_age` (the "long-lived" set used
    /// for divider generation and emphasis in rendering).
    pub fn long_lived(&self, min_age: f32) -> impl Iterator<Item = &TrackedCentroid> {
        self.centroids.iter().filter(move |c| c.age >= min_age)
    }
}
