//! Persistent planar subdivision driven by tracked centroids and ad-hoc
//! point-pair events.
//!
//! Two line populations share one representation but have different
//! lifecycles:
//!
//! - **Unconstrained** lines are derived wholesale from the current
//!   long-lived centroid set: the infinite line through each consecutive
//!   anchor pair, clipped to the outer frame. Whenever the anchor set
//!   changes the whole collection is discarded and regenerated.
//! - **Constrained** lines come from arbitrary point pairs. Each endpoint is
//!   extended outward along the line's direction until it meets existing
//!   geometry (the outer frame, an unconstrained line, or an earlier
//!   constrained line; nearest hit wins), then stored individually. They
//!   accumulate over time and are evicted FIFO in batches when a caller asks
//!   for capacity maintenance.
//!
//! Invariant: every stored segment lies within the outer frame, and a
//! constrained segment's endpoints always rest on the frame or on another
//! line; nothing dangles past the geometry it was clipped against.

use crate::geom::{self, DividerLine, Point, Rect};
use crate::tracker::TrackedCentroid;

/// Planar arrangement of divider lines inside a fixed outer frame.
#[derive(Clone, Debug)]
pub struct DividedArea {
    bounds: Rect,
    max_unconstrained: usize,
    unconstrained: Vec<DividerLine>,
    constrained: Vec<DividerLine>,
    /// Anchor points the current unconstrained set was built from, used to
    /// detect when a rebuild is due.
    anchors: Vec<Point>,
}

impl DividedArea {
    /// Create an empty arrangement with the given outer frame and a cap on
    /// the number of unconstrained lines.
    pub fn new(bounds: Rect, max_unconstrained: usize) -> Self {
        Self {
            bounds,
            max_unconstrained,
            unconstrained: Vec::new(),
            constrained: Vec::new(),
            anchors: Vec::new(),
        }
    }

    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    /// Rebuild the unconstrained lines if the qualifying centroid set moved.
    ///
    /// Anchors are the qualifying centroids ordered by age (oldest first,
    /// position as tie-break) and truncated to one more than the line cap;
    /// one line is generated per consecutive anchor pair. Returns `true`
    /// when the set was rebuilt so the caller can refresh any derived state
    /// it keeps (e.g. a frozen snapshot of what the dividers looked like).
    pub fn update_unconstrained(&mut self, centroids: &[TrackedCentroid]) -> bool {
        let mut qualifying: Vec<&TrackedCentroid> = centroids.iter().collect();
        qualifying.sort_by(|a, b| {
            b.age
                .total_cmp(&a.age)
                .then(a.position.x.total_cmp(&b.position.x))
                .then(a.position.y.total_cmp(&b.position.y))
        });
        qualifying.truncate(self.max_unconstrained + 1);
        let anchors: Vec<Point> = qualifying.iter().map(|c| c.position).collect();

        if anchors == self.anchors {
            return false;
        }

        self.unconstrained.clear();
        for pair in anchors.windows(2) {
            if let Some(line) = geom::clip_line_to_rect(pair[0], pair[1], &self.bounds) {
                self.unconstrained.push(line);
            }
        }
        self.anchors = anchors;
        true
    }

    /// Compute the constrained divider a point pair would produce, without
    /// storing it.
    ///
    /// Returns `None` for a degenerate pair (coincident points), never a
    /// zero-length segment.
    pub fn create_constrained(&self, p1: Point, p2: Point) -> Option<DividerLine> {
        if p1.distance_squared(&p2) <= geom::EPSILON {
            return None;
        }
        let dir = Point::new(p2.x - p1.x, p2.y - p1.y);
        let start = self.extend(p1, Point::new(-dir.x, -dir.y));
        let end = self.extend(p2, dir);
        Some(DividerLine::new(start, end))
    }

    /// Create a constrained divider from a point pair and persist it.
    pub fn add_constrained(&mut self, p1: Point, p2: Point) -> Option<DividerLine> {
        let line = self.create_constrained(p1, p2)?;
        self.constrained.push(line);
        Some(line)
    }

    /// Evict the oldest `evict_batch` constrained lines if the count is over
    /// `ceiling`.
    ///
    /// Caller-triggered maintenance, intended to be invoked periodically
    /// rather than per insert; a no-op when already at or under the ceiling.
    pub fn maintain_capacity(&mut self, ceiling: usize, evict_batch: usize) {
        if self.constrained.len() > ceiling {
            let batch = evict_batch.min(self.constrained.len());
            self.constrained.drain(..batch);
        }
    }

    pub fn unconstrained_lines(&self) -> &[DividerLine] {
        &self.unconstrained
    }

    pub fn constrained_lines(&self) -> &[DividerLine] {
        &self.constrained
    }

    /// Extend `origin` along `dir` to the nearest existing geometry: the
    /// outer frame or any stored divider line.
    fn extend(&self, origin: Point, dir: Point) -> Point {
        let mut best = geom::ray_rect_exit(origin, dir, &self.bounds);
        for line in self.unconstrained.iter().chain(self.constrained.iter()) {
            if let Some(t) = geom::ray_segment_intersection(origin, dir, line.start, line.end) {
                if best.is_none_or(|b| t < b) {
                    best = Some(t);
                }
            }
        }
        match best {
            Some(t) => Point::new(origin.x + t * dir.x, origin.y + t * dir.y),
            // Origin already on the frame heading outward: nothing to extend
            // into, keep the endpoint where it is.
            None => origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_area() -> DividedArea {
        DividedArea::new(Rect::new(1.0, 1.0), 5)
    }

    fn tracked(x: f32, y: f32, age: f32) -> TrackedCentroid {
        TrackedCentroid {
            position: Point::new(x, y),
            age,
        }
    }

    fn on_frame(p: &Point) -> bool {
        let e = 1e-5;
        p.x.abs() < e || p.y.abs() < e || (p.x - 1.0).abs() < e || (p.y - 1.0).abs() < e
    }

    #[test]
    fn unconstrained_rebuild_only_on_change() {
        let mut area = unit_area();
        let centroids = vec![tracked(0.2, 0.2, 6.0), tracked(0.8, 0.8, 5.0)];

        assert!(area.update_unconstrained(&centroids));
        assert_eq!(area.unconstrained_lines().len(), 1);

        // Same set again: no rebuild.
        assert!(!area.update_unconstrained(&centroids));

        // A moved centroid triggers a wholesale rebuild.
        let moved = vec![tracked(0.2, 0.2, 6.0), tracked(0.8, 0.7, 5.0)];
        assert!(area.update_unconstrained(&moved));
        assert_eq!(area.unconstrained_lines().len(), 1);
    }

    #[test]
    fn unconstrained_lines_span_the_frame() {
        let mut area = unit_area();
        let centroids = vec![
            tracked(0.3, 0.5, 9.0),
            tracked(0.7, 0.5, 8.0),
            tracked(0.5, 0.2, 7.0),
        ];
        area.update_unconstrained(&centroids);
        assert_eq!(area.unconstrained_lines().len(), 2);
        for line in area.unconstrained_lines() {
            assert!(on_frame(&line.start), "start not on frame: {:?}", line);
            assert!(on_frame(&line.end), "end not on frame: {:?}", line);
        }
    }

    #[test]
    fn unconstrained_capped_by_max() {
        let mut area = DividedArea::new(Rect::new(1.0, 1.0), 2);
        let centroids: Vec<TrackedCentroid> = (0..8)
            .map(|i| tracked(0.1 + 0.1 * i as f32, 0.5 - 0.05 * i as f32, 10.0 - i as f32))
            .collect();
        area.update_unconstrained(&centroids);
        assert_eq!(area.unconstrained_lines().len(), 2);
    }

    #[test]
    fn clearing_centroids_clears_lines() {
        let mut area = unit_area();
        area.update_unconstrained(&[tracked(0.2, 0.2, 6.0), tracked(0.8, 0.8, 5.0)]);
        assert!(area.update_unconstrained(&[]));
        assert!(area.unconstrained_lines().is_empty());
    }

    #[test]
    fn constrained_line_extends_to_frame() {
        let mut area = unit_area();
        let line = area
            .add_constrained(Point::new(0.4, 0.5), Point::new(0.6, 0.5))
            .unwrap();
        assert!((line.start.x - 0.0).abs() < 1e-5 || (line.start.x - 1.0).abs() < 1e-5);
        assert!((line.end.x - 0.0).abs() < 1e-5 || (line.end.x - 1.0).abs() < 1e-5);
        assert!((line.start.y - 0.5).abs() < 1e-5);
        assert!((line.end.y - 0.5).abs() < 1e-5);
        assert_eq!(area.constrained_lines().len(), 1);
    }

    #[test]
    fn constrained_line_stops_at_existing_divider() {
        let mut area = unit_area();
        // Vertical divider at x = 0.5.
        area.add_constrained(Point::new(0.5, 0.4), Point::new(0.5, 0.6))
            .unwrap();
        // Horizontal line heading right from x = 0.1 should stop at it.
        let line = area
            .add_constrained(Point::new(0.1, 0.5), Point::new(0.2, 0.5))
            .unwrap();
        assert!((line.start.x - 0.0).abs() < 1e-5);
        assert!((line.end.x - 0.5).abs() < 1e-5);
    }

    #[test]
    fn probe_does_not_store() {
        let area = unit_area();
        let line = area
            .create_constrained(Point::new(0.4, 0.5), Point::new(0.6, 0.5))
            .unwrap();
        assert!(line.length() > 0.9);
        assert!(area.constrained_lines().is_empty());
    }

    #[test]
    fn degenerate_pair_rejected() {
        let mut area = unit_area();
        let p = Point::new(0.3, 0.3);
        assert!(area.add_constrained(p, p).is_none());
        assert!(area.constrained_lines().is_empty());
    }

    #[test]
    fn containment_holds_for_stored_lines() {
        let mut area = unit_area();
        area.update_unconstrained(&[tracked(0.1, 0.9, 6.0), tracked(0.9, 0.1, 5.0)]);
        area.add_constrained(Point::new(0.2, 0.3), Point::new(0.7, 0.8));
        area.add_constrained(Point::new(0.9, 0.2), Point::new(0.8, 0.25));
        let bounds = *area.bounds();
        for line in area
            .unconstrained_lines()
            .iter()
            .chain(area.constrained_lines())
        {
            assert!(bounds.contains(&line.start), "escaped: {:?}", line);
            assert!(bounds.contains(&line.end), "escaped: {:?}", line);
        }
    }

    #[test]
    fn capacity_eviction_is_fifo() {
        let mut area = unit_area();
        for i in 0..60 {
            let y = 0.01 + 0.015 * i as f32;
            area.add_constrained(Point::new(0.4, y), Point::new(0.6, y))
                .unwrap();
        }
        assert_eq!(area.constrained_lines().len(), 60);

        area.maintain_capacity(50, 10);
        assert_eq!(area.constrained_lines().len(), 50);
        // Oldest ten (lowest y) are gone.
        let first = area.constrained_lines()[0];
        assert!((first.start.y - (0.01 + 0.015 * 10.0)).abs() < 1e-4);

        // Under the ceiling now: idempotent no-op.
        area.maintain_capacity(50, 10);
        assert_eq!(area.constrained_lines().len(), 50);
    }
}
