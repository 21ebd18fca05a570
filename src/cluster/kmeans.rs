//! Seeded k-means (k-means++ seeding, Lloyd iterations) over 2D points.

use rand::prelude::*;

use super::traits::Clustering;
use crate::error::{Error, Result};
use crate::geom::Point;

/// K-means clusterer with a fixed random seed.
///
/// # Example
///
/// ```
/// use parcel::cluster::{Clustering, Kmeans};
/// use parcel::geom::Point;
///
/// let data = vec![
///     Point::new(0.0, 0.0),
///     Point::new(0.1, 0.1),
///     Point::new(0.9, 0.9),
///     Point::new(1.0, 1.0),
/// ];
///
/// let labels = Kmeans::new(2).with_seed(42).fit_predict(&data).unwrap();
/// assert_eq!(labels[0], labels[1]);
/// assert_ne!(labels[0], labels[2]);
/// ```
#[derive(Clone, Debug)]
pub struct Kmeans {
    k: usize,
    seed: u64,
    max_iter: usize,
    tolerance: f32,
}

/// Result of a k-means pass: `k` centroids and a label per input point.
///
/// `labels` is parallel to the input order; each entry indexes `centroids`.
#[derive(Clone, Debug)]
pub struct KmeansFit {
    pub centroids: Vec<Point>,
    pub labels: Vec<usize>,
    /// Lloyd iterations actually run before convergence (or the cap).
    pub iterations: usize,
}

impl Kmeans {
    /// Create a k-means clusterer for `k` clusters.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            seed: 0,
            max_iter: 64,
            tolerance: 1e-6,
        }
    }

    /// Set the RNG seed used for k-means++ seeding.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Cap the number of Lloyd iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the centroid-shift threshold below which iteration stops.
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Run the full pass and return centroids plus labels.
    ///
    /// Always returns *some* partition within the iteration cap; convergence
    /// failure is not surfaced as an error.
    pub fn fit(&self, data: &[Point]) -> Result<KmeansFit> {
        let n = data.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if self.k == 0 || self.k > n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centroids = plus_plus_seeds(data, self.k, &mut rng);
        let mut labels = vec![0usize; n];
        let mut iterations = 0;

        for iter in 0..self.max_iter {
            iterations = iter + 1;

            // Assignment step.
            let mut changed = false;
            for (i, p) in data.iter().enumerate() {
                let nearest = nearest_centroid(p, &centroids);
                if labels[i] != nearest {
                    labels[i] = nearest;
                    changed = true;
                }
            }
            if !changed && iter > 0 {
                break;
            }

            // Update step: mean of each cluster's members.
            let mut sums = vec![Point::default(); self.k];
            let mut counts = vec![0usize; self.k];
            for (p, &label) in data.iter().zip(labels.iter()) {
                sums[label].x += p.x;
                sums[label].y += p.y;
                counts[label] += 1;
            }

            let mut shift = 0.0f32;
            for c in 0..self.k {
                let next = if counts[c] == 0 {
                    // Re-seed an emptied cluster from the point farthest from
                    // its current centroid, deterministically.
                    farthest_point(data, &centroids[c])
                } else {
                    Point::new(
                        sums[c].x / counts[c] as f32,
                        sums[c].y / counts[c] as f32,
                    )
                };
                shift = shift.max(centroids[c].distance_squared(&next));
                centroids[c] = next;
            }

            if shift <= self.tolerance {
                // One final assignment against the settled centroids.
                for (i, p) in data.iter().enumerate() {
                    labels[i] = nearest_centroid(p, &centroids);
                }
                break;
            }
        }

        Ok(KmeansFit {
            centroids,
            labels,
            iterations,
        })
    }
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: &[Point]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

#[inline]
fn nearest_centroid(p: &Point, centroids: &[Point]) -> usize {
    let mut best = 0;
    let mut best_d = f32::INFINITY;
    for (c, centroid) in centroids.iter().enumerate() {
        let d = p.distance_squared(centroid);
        if d < best_d {
            best_d = d;
            best = c;
        }
    }
    best
}

fn farthest_point(data: &[Point], from: &Point) -> Point {
    let mut best = data[0];
    let mut best_d = -1.0f32;
    for p in data {
        let d = p.distance_squared(from);
        if d > best_d {
            best_d = d;
            best = *p;
        }
    }
    best
}

/// K-means++ seeding: first centroid uniform, each subsequent one sampled
/// with probability proportional to squared distance from the nearest
/// already-chosen centroid.
fn plus_plus_seeds(data: &[Point], k: usize, rng: &mut StdRng) -> Vec<Point> {
    let n = data.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(data[rng.random_range(0..n)]);

    let mut dists: Vec<f32> = data
        .iter()
        .map(|p| p.distance_squared(&centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f32 = dists.iter().sum();
        let next = if total <= f32::EPSILON {
            // All remaining points coincide with a centroid; any choice is
            // equivalent, keep it deterministic.
            data[rng.random_range(0..n)]
        } else {
            let mut target = rng.random::<f32>() * total;
            let mut chosen = n - 1;
            for (i, &d) in dists.iter().enumerate() {
                target -= d;
                if target <= 0.0 {
                    chosen = i;
                    break;
                }
            }
            data[chosen]
        };
        centroids.push(next);
        for (d, p) in dists.iter_mut().zip(data.iter()) {
            *d = d.min(p.distance_squared(&next));
        }
    }

    centroids
}
