//! Query-polygon simplification.
//!
//! Drawn query areas can arrive with thousands of vertices. When the outer
//! ring crosses the complexity threshold it is reduced with the
//! Ramer-Douglas-Peucker algorithm, with an epsilon scaled from the ring's
//! bounding-box diagonal and vertex count. Zone polygons loaded from the
//! datasets are never simplified.

use crate::{Point, Polygon, Ring};

/// Below this vertex count a ring is never simplified.
const MIN_POINTS: usize = 400;

/// Above this vertex count a ring is always simplified.
const MAX_POINTS: usize = 700;

/// Vertices-per-area threshold that also triggers simplification.
const DENSITY_THRESHOLD: f64 = 700.0;

/// Base epsilon as a fraction of the bounding-box diagonal.
const BASE_EPSILON_FRACTION: f64 = 0.001;

/// Epsilon is capped at this fraction of the diagonal.
const MAX_EPSILON_FRACTION: f64 = 0.01;

/// Simplifies the outer ring of `polygon` when it crosses the complexity
/// threshold; holes are carried over untouched. Returns the input unchanged
/// otherwise.
#[must_use]
pub fn simplify_polygon(polygon: &Polygon) -> Polygon {
    let Some(epsilon) = simplification_epsilon(polygon.exterior()) else {
        return polygon.clone();
    };

    let before = polygon.exterior().len();
    let reduced = rdp(polygon.exterior().points(), epsilon);
    log::debug!(
        "query polygon simplified from {before} to {} points (epsilon {epsilon})",
        reduced.len(),
    );

    Polygon::new(Ring::new(reduced), polygon.interiors().to_vec())
}

/// Decides whether a ring needs simplification and, if so, with which
/// epsilon.
///
/// Rings under [`MIN_POINTS`] vertices are left alone. Past that, a ring is
/// simplified when it exceeds [`MAX_POINTS`] vertices or its vertex density
/// (count per unit of area) exceeds [`DENSITY_THRESHOLD`]. The epsilon grows
/// with vertex count as `(n / 400)^0.55` over a base of 0.1% of the
/// bounding-box diagonal, capped at 1% of the diagonal.
fn simplification_epsilon(ring: &Ring) -> Option<f64> {
    let num_points = ring.len();
    if num_points < MIN_POINTS {
        return None;
    }

    let density = num_points as f64 / ring.area();
    if num_points <= MAX_POINTS && density <= DENSITY_THRESHOLD {
        return None;
    }

    let diagonal = ring.bounding_box().diagonal();
    let base = diagonal * BASE_EPSILON_FRACTION;
    let epsilon = base * (num_points as f64 / MIN_POINTS as f64).powf(0.55);
    Some(epsilon.min(diagonal * MAX_EPSILON_FRACTION))
}

/// Recursive Ramer-Douglas-Peucker reduction. The first and last points are
/// always retained.
fn rdp(points: &[Point], epsilon: f64) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let first = points[0];
    let last = points[points.len() - 1];

    let mut max_distance = 0.0;
    let mut max_index = 0;
    for (i, &p) in points.iter().enumerate().take(points.len() - 1).skip(1) {
        let distance = perpendicular_distance(p, first, last);
        if distance > max_distance {
            max_distance = distance;
            max_index = i;
        }
    }

    if max_distance > epsilon {
        let mut left = rdp(&points[..=max_index], epsilon);
        let right = rdp(&points[max_index..], epsilon);
        left.pop();
        left.extend(right);
        left
    } else {
        vec![first, last]
    }
}

/// Perpendicular distance from `p` to the segment `start..end`, via the
/// doubled-triangle-area formula. A degenerate segment falls back to the
/// Euclidean distance to `start`.
fn perpendicular_distance(p: Point, start: Point, end: Point) -> f64 {
    if start == end {
        return p.distance(start);
    }

    let doubled_area =
        ((end.y - start.y) * p.x - (end.x - start.x) * p.y + end.x * start.y - end.y * start.x)
            .abs();
    doubled_area / start.distance(end)
}
