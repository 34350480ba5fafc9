//! Seam path type.

use weldseam_math::{Point3, Tolerance};

/// An ordered polyline of at least two points, optionally closed.
///
/// A closed line stores its closing point once: a triangle is three
/// points with `is_closed() == true`, and the segment from the last point
/// back to the first is implied.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    points: Vec<Point3>,
    closed: bool,
}

impl Line {
    /// Build a line, detecting closure within `tolerance`.
    ///
    /// When the first and last of at least four points coincide, the last
    /// point is dropped and the line is closed. Returns `None` for fewer
    /// than two points.
    pub fn new(mut points: Vec<Point3>, tolerance: f64) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let tol = Tolerance::linear(tolerance);
        let closed = points.len() >= 4 && tol.points_equal(&points[0], &points[points.len() - 1]);
        if closed {
            points.pop();
        }
        Some(Self { points, closed })
    }

    /// Build an open line without closure detection.
    pub fn open(points: Vec<Point3>) -> Option<Self> {
        (points.len() >= 2).then_some(Self {
            points,
            closed: false,
        })
    }

    /// Stored points, without a repeated closing point.
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Consume the line, returning its stored points.
    pub fn into_points(self) -> Vec<Point3> {
        self.points
    }

    /// Whether the line returns to its first point.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a line has at least two points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First point.
    pub fn start(&self) -> &Point3 {
        &self.points[0]
    }

    /// Last stored point.
    pub fn end(&self) -> &Point3 {
        &self.points[self.points.len() - 1]
    }

    /// Segments in order, including the closing one of a closed line.
    pub fn segments(&self) -> impl Iterator<Item = (&Point3, &Point3)> + '_ {
        let closing = self
            .closed
            .then(|| (&self.points[self.points.len() - 1], &self.points[0]));
        self.points
            .windows(2)
            .map(|w| (&w[0], &w[1]))
            .chain(closing)
    }

    /// Total length along the line.
    pub fn length(&self) -> f64 {
        self.segments().map(|(a, b)| (b - a).norm()).sum()
    }

    /// Same line traversed the other way.
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self {
            points,
            closed: self.closed,
        }
    }

    /// Shortest distance from `p` to any segment of the line.
    pub fn distance_to(&self, p: &Point3) -> f64 {
        self.segments()
            .map(|(a, b)| point_segment_distance(p, a, b))
            .fold(f64::INFINITY, f64::min)
    }
}

/// Distance from `p` to the segment `[a, b]`.
pub fn point_segment_distance(p: &Point3, a: &Point3, b: &Point3) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}
