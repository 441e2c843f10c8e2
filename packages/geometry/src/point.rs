//! Coordinate and bounding-box primitives.

use serde::{Deserialize, Serialize};

/// A geographic position: longitude in `x`, latitude in `y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Longitude in decimal degrees.
    pub x: f64,
    /// Latitude in decimal degrees.
    pub y: f64,
}

impl Point {
    /// Creates a point from a longitude/latitude pair.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point, in coordinate units.
    #[must_use]
    pub fn distance(&self, other: Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx.hypot(dy)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// An inverted box that expands to the first point it absorbs.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Grows the box to cover `point`.
    pub fn extend(&mut self, point: Point) {
        self.min_x = self.min_x.min(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_x = self.max_x.max(point.x);
        self.max_y = self.max_y.max(point.y);
    }

    /// Builds the box covering every point in `points`.
    #[must_use]
    pub fn of(points: &[Point]) -> Self {
        let mut bbox = Self::empty();
        for &p in points {
            bbox.extend(p);
        }
        bbox
    }

    /// Whether `point` lies inside the box (boundary included).
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Whether this box and `other` overlap at all.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// Whether `other` lies entirely inside this box.
    #[must_use]
    pub fn covers(&self, other: &Self) -> bool {
        self.min_x <= other.min_x
            && self.max_x >= other.max_x
            && self.min_y <= other.min_y
            && self.max_y >= other.max_y
    }

    /// Length of the box diagonal.
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        if self.min_x > self.max_x {
            return 0.0;
        }
        (self.max_x - self.min_x).hypot(self.max_y - self.min_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_covers_all_points() {
        let bbox = BoundingBox::of(&[
            Point::new(2.0, 48.0),
            Point::new(2.5, 48.9),
            Point::new(1.8, 48.4),
        ]);
        assert!((bbox.min_x - 1.8).abs() < f64::EPSILON);
        assert!((bbox.max_x - 2.5).abs() < f64::EPSILON);
        assert!((bbox.min_y - 48.0).abs() < f64::EPSILON);
        assert!((bbox.max_y - 48.9).abs() < f64::EPSILON);
    }

    #[test]
    fn bbox_contains_boundary_point() {
        let bbox = BoundingBox::of(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        assert!(bbox.contains(Point::new(0.0, 0.5)));
        assert!(bbox.contains(Point::new(1.0, 1.0)));
        assert!(!bbox.contains(Point::new(1.1, 0.5)));
    }

    #[test]
    fn disjoint_boxes_do_not_overlap() {
        let a = BoundingBox::of(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        let b = BoundingBox::of(&[Point::new(2.0, 2.0), Point::new(3.0, 3.0)]);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&a));
    }

    #[test]
    fn empty_bbox_has_zero_diagonal() {
        assert!(BoundingBox::empty().diagonal() == 0.0);
    }

    #[test]
    fn diagonal_is_euclidean() {
        let bbox = BoundingBox::of(&[Point::new(0.0, 0.0), Point::new(3.0, 4.0)]);
        assert!((bbox.diagonal() - 5.0).abs() < 1e-12);
    }
}
