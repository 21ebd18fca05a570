//! Small computational-geometry kernel for the divided-area arrangement.
//!
//! Everything here works in the normalized coordinate space the engine
//! operates in. The only numerically delicate pieces are the ray
//! intersections used to extend divider lines; they live here so the
//! parallel/near-parallel and boundary-tangency cases can be tested in
//! isolation rather than buried in arrangement bookkeeping.

/// Tolerance for "effectively parallel" and "effectively coincident" checks.
pub(crate) const EPSILON: f32 = 1e-9;

/// A 2D point (or vector) in normalized coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`.
    #[inline]
    pub fn distance_squared(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Move `t` of the way from `self` toward `target`.
    ///
    /// `t = 0` returns `self`, `t = 1` returns `target`.
    #[inline]
    pub fn lerp(&self, target: &Point, t: f32) -> Point {
        Point {
            x: self.x + t * (target.x - self.x),
            y: self.y + t * (target.y - self.y),
        }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Point { x, y }
    }
}

/// Axis-aligned outer boundary, anchored at the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether `p` lies inside or on the boundary, with a small slack for
    /// points produced by clipping arithmetic.
    #[inline]
    pub fn contains(&self, p: &Point) -> bool {
        let e = 1e-5;
        p.x >= -e && p.y >= -e && p.x <= self.width + e && p.y <= self.height + e
    }
}

/// A boundary segment of the divided area.
///
/// Both unconstrained and constrained divider lines share this
/// representation; only their lifecycle differs (see [`crate::divided`]).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DividerLine {
    pub start: Point,
    pub end: Point,
}

impl DividerLine {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f32 {
        self.start.distance_squared(&self.end).sqrt()
    }
}

/// Intersection of the ray `origin + t * dir` (`t > 0`) with the segment
/// `a..b`. Returns the ray parameter `t` of the hit, if any.
///
/// Near-parallel ray/segment pairs report no hit: an overlapping collinear
/// pair has no single crossing point, and treating it as a miss lets the ray
/// run on to the next divider or the outer frame.
pub(crate) fn ray_segment_intersection(
    origin: Point,
    dir: Point,
    a: Point,
    b: Point,
) -> Option<f32> {
    let sx = b.x - a.x;
    let sy = b.y - a.y;
    let denom = dir.x * sy - dir.y * sx;
    if denom.abs() <= EPSILON {
        return None;
    }
    let qx = a.x - origin.x;
    let qy = a.y - origin.y;
    let t = (qx * sy - qy * sx) / denom;
    let u = (qx * dir.y - qy * dir.x) / denom;
    // Endpoint tangency (u == 0 or 1) counts as a hit.
    if t > EPSILON && (-EPSILON..=1.0 + EPSILON).contains(&u) {
        Some(t)
    } else {
        None
    }
}

/// Parameter `t > 0` at which the ray `origin + t * dir` leaves `rect`.
///
/// The origin is expected to lie inside (or on) the rect; the exit always
/// exists for a non-zero direction. Returns `None` only for a degenerate
/// zero direction.
pub(crate) fn ray_rect_exit(origin: Point, dir: Point, rect: &Rect) -> Option<f32> {
    if dir.x.abs() <= EPSILON && dir.y.abs() <= EPSILON {
        return None;
    }
    let mut best: Option<f32> = None;
    let mut consider = |t: f32| {
        if t > EPSILON && best.is_none_or(|b| t < b) {
            best = Some(t);
        }
    };
    if dir.x.abs() > EPSILON {
        consider((0.0 - origin.x) / dir.x);
        consider((rect.width - origin.x) / dir.x);
    }
    if dir.y.abs() > EPSILON {
        consider((0.0 - origin.y) / dir.y);
        consider((rect.height - origin.y) / dir.y);
    }
    // For an origin inside a convex rect the first edge-line crossing is the
    // exit, so the smallest positive candidate is it.
    best.filter(|&t| {
        let p = Point::new(origin.x + t * dir.x, origin.y + t * dir.y);
        rect.contains(&p)
    })
}

/// Clip the infinite line through `a` and `b` to `rect`, returning the
/// chord as a segment. `None` when the two points coincide or the line
/// misses the rect entirely.
pub(crate) fn clip_line_to_rect(a: Point, b: Point, rect: &Rect) -> Option<DividerLine> {
    let dir = Point::new(b.x - a.x, b.y - a.y);
    if dir.x.abs() <= EPSILON && dir.y.abs() <= EPSILON {
        return None;
    }
    // Collect the parameters where the infinite line crosses each edge line,
    // keep the crossings that land on the rect, and take the extremes.
    let mut ts: Vec<f32> = Vec::with_capacity(4);
    if dir.x.abs() > EPSILON {
        ts.push((0.0 - a.x) / dir.x);
        ts.push((rect.width - a.x) / dir.x);
    }
    if dir.y.abs() > EPSILON {
        ts.push((0.0 - a.y) / dir.y);
        ts.push((rect.height - a.y) / dir.y);
    }
    let mut lo: Option<f32> = None;
    let mut hi: Option<f32> = None;
    for t in ts {
        let p = Point::new(a.x + t * dir.x, a.y + t * dir.y);
        if !rect.contains(&p) {
            continue;
        }
        if lo.is_none_or(|v| t < v) {
            lo = Some(t);
        }
        if hi.is_none_or(|v| t > v) {
            hi = Some(t);
        }
    }
    match (lo, hi) {
        (Some(lo), Some(hi)) if hi - lo > EPSILON => Some(DividerLine::new(
            Point::new(a.x + lo * dir.x, a.y + lo * dir.y),
            Point::new(a.x + hi * dir.x, a.y + hi * dir.y),
        )),
        _ => None,
    }
}
