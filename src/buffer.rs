//! Bounded, insertion-ordered buffer of raw 2D samples.
//!
//! Recency matters downstream (clustering re-runs over the whole buffer each
//! tick, and consumers sample the most recent points by cluster membership),
//! so this is a plain ordered `Vec` with a batch trim rather than a ring: when
//! the buffer reaches capacity, the oldest tenth of the capacity is dropped
//! in one `drain` to amortize the shift.

use crate::geom::Point;

/// Capacity-bounded ordered sequence of samples.
#[derive(Clone, Debug)]
pub struct SampleBuffer {
    samples: Vec<Point>,
    max_samples: usize,
}

impl SampleBuffer {
    /// Create a buffer holding at most `max_samples` points.
    ///
    /// `max_samples` must be positive; the engine validates this before
    /// construction.
    pub fn new(max_samples: usize) -> Self {
        debug_assert!(max_samples > 0);
        Self {
            samples: Vec::with_capacity(max_samples),
            max_samples,
        }
    }

    /// Append a sample, trimming the oldest batch first if at capacity.
    ///
    /// The trim removes `max_samples / 10` entries (at least one), so the
    /// length never exceeds `max_samples` at any observable moment.
    pub fn push(&mut self, sample: Point) {
        if self.samples.len() >= self.max_samples {
            let trim = (self.max_samples / 10).max(1);
            self.samples.drain(..trim.min(self.samples.len()));
        }
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterate in insertion order (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.samples.iter()
    }

    /// The buffered samples, oldest first.
    pub fn as_slice(&self) -> &[Point] {
        &self.samples
    }
}
