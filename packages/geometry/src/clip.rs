//! Polygon-polygon intersection.
//!
//! The area computation short-circuits through the cheap predicates first
//! (disjoint, equal, contained) and only falls back to an actual clip for
//! partial overlaps. Clipping is Sutherland-Hodgman against the query
//! polygon's edges; the result is exact whenever the clip region is convex,
//! which holds for the drawn query areas this engine receives.

use crate::polygon::cross;
use crate::{Point, Polygon, Ring};

const PARALLEL_EPS: f64 = 1e-15;

/// Intersection area between a query polygon and a zone polygon.
///
/// Disjoint pairs yield 0; equal or fully covered zones yield the zone's
/// own area; anything else is clipped.
#[must_use]
pub fn intersection_area(query: &Polygon, zone: &Polygon) -> f64 {
    if !query.intersects(zone) {
        return 0.0;
    }
    if query.equals(zone) {
        return zone.area();
    }
    if query.contains(zone) {
        return zone.area();
    }
    query.intersection(zone).area()
}

/// Clips `subject` against the edges of `clip`, returning the remaining
/// polygon (possibly empty).
pub(crate) fn clip_polygon(subject: &Polygon, clip: &Polygon) -> Polygon {
    if subject.is_degenerate() || clip.is_degenerate() {
        return Polygon::new(Ring::new(Vec::new()), Vec::new());
    }

    // Walk the clip ring counter-clockwise so "inside" is a fixed side.
    let mut clip_pts: Vec<Point> = clip.exterior().open_points().to_vec();
    if clip.exterior().signed_area() < 0.0 {
        clip_pts.reverse();
    }

    let inside = |a: Point, b: Point, p: Point| cross(a, b, p) >= 0.0;

    let mut output: Vec<Point> = subject.exterior().open_points().to_vec();
    for i in 0..clip_pts.len() {
        if output.is_empty() {
            break;
        }
        let a = clip_pts[i];
        let b = clip_pts[(i + 1) % clip_pts.len()];

        let input = std::mem::take(&mut output);
        let Some(&last) = input.last() else {
            break;
        };
        let mut prev = last;
        for curr in input {
            let curr_inside = inside(a, b, curr);
            let prev_inside = inside(a, b, prev);
            if curr_inside {
                if !prev_inside {
                    output.push(edge_intersection(prev, curr, a, b));
                }
                output.push(curr);
            } else if prev_inside {
                output.push(edge_intersection(prev, curr, a, b));
            }
            prev = curr;
        }
    }

    if let Some(&first) = output.first() {
        output.push(first);
    }
    Polygon::new(Ring::new(output), Vec::new())
}

/// Intersection of segment `p1..p2` with the infinite line through `a..b`.
fn edge_intersection(p1: Point, p2: Point, a: Point, b: Point) -> Point {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let ex = b.x - a.x;
    let ey = b.y - a.y;

    let denom = dx * ey - dy * ex;
    if denom.abs() < PARALLEL_EPS {
        // Segment runs along the clip edge; either endpoint works.
        return p2;
    }

    let t = ((a.x - p1.x) * ey - (a.y - p1.y) * ex) / denom;
    Point::new(dx.mul_add(t, p1.x), dy.mul_add(t, p1.y))
}
