//! Batch clustering over the sample buffer.
//!
//! One algorithm is needed here: seeded k-means over 2D points. Each tick the
//! engine re-clusters the entire sample buffer from scratch; the per-pass
//! labels are *not* stable across passes (cluster ids are an artifact of the
//! seeding order), which is exactly why the [`crate::tracker`] exists.
//!
//! ## K-means
//!
//! The classic algorithm: assign each point to the nearest centroid, then
//! update centroids to the mean of their points. Repeat.
//!
//! **Objective**: Minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! Determinism is a requirement, not an optimization: the seed is fixed so
//! the same sample sequence always yields the same centroid ordering and
//! membership, which keeps the downstream centroid tracking (and tests)
//! reproducible.

mod kmeans;
mod traits;

pub use kmeans::{Kmeans, KmeansFit};
pub use traits::Clustering;
