//! Polygon and ring value types, GeoJSON conversion, and predicates.

use serde::Deserialize;

use crate::{BoundingBox, GeometryError, Point};

/// Tolerance for treating a cross product as collinear.
const COLLINEAR_EPS: f64 = 1e-12;

/// Tolerance for coordinate equality between rings.
const COORD_EPS: f64 = 1e-9;

/// A closed sequence of points (first point repeated last).
#[derive(Debug, Clone, PartialEq)]
pub struct Ring(Vec<Point>);

impl Ring {
    /// Wraps a point sequence as a ring. The sequence is taken as-is; the
    /// closing duplicate is tolerated but not required.
    #[must_use]
    pub fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// The raw point sequence, closing duplicate included when present.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Number of stored points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the ring stores no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Vertices without the closing duplicate.
    #[must_use]
    pub fn open_points(&self) -> &[Point] {
        match self.0.as_slice() {
            [first, .., last] if first == last => &self.0[..self.0.len() - 1],
            other => other,
        }
    }

    /// Axis-aligned bounding box of the ring.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::of(&self.0)
    }

    /// Unsigned area by the shoelace formula. Orientation-insensitive;
    /// degenerate rings yield 0.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub(crate) fn signed_area(&self) -> f64 {
        let pts = &self.0;
        if pts.len() < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        let mut j = pts.len() - 1;
        for i in 0..pts.len() {
            sum += (pts[j].x + pts[i].x) * (pts[j].y - pts[i].y);
            j = i;
        }
        sum / 2.0
    }

    /// Even-odd ray-casting point-in-ring test.
    ///
    /// A point exactly on an edge counts as inside. The crossing parity is
    /// decided with a cross-product side test, toggling on upward edges the
    /// point lies strictly left of and downward edges it lies strictly right
    /// of.
    #[must_use]
    pub fn contains_point(&self, p: Point) -> bool {
        let pts = &self.0;
        if pts.len() < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = pts.len() - 1;
        for i in 0..pts.len() {
            let a = pts[j];
            let b = pts[i];
            j = i;
            if on_segment(p, a, b) {
                return true;
            }
            if (a.y > p.y) == (b.y > p.y) {
                continue;
            }
            let side = cross(a, b, p);
            if b.y > a.y {
                if side > 0.0 {
                    inside = !inside;
                }
            } else if side < 0.0 {
                inside = !inside;
            }
        }
        inside
    }
}

/// A polygon with one exterior ring and any number of holes.
///
/// Holes round-trip through GeoJSON untouched but are ignored by every
/// measure: the engine only evaluates exterior rings.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    exterior: Ring,
    interiors: Vec<Ring>,
}

/// Minimal GeoJSON geometry document.
#[derive(Deserialize)]
struct GeometryDoc {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: serde_json::Value,
}

impl Polygon {
    /// Builds a polygon from rings.
    #[must_use]
    pub fn new(exterior: Ring, interiors: Vec<Ring>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    /// Parses a GeoJSON `Polygon` or `MultiPolygon` geometry object.
    ///
    /// A `MultiPolygon` collapses to its first polygon; the remaining
    /// sub-polygons are dropped. Surrounding quotes (as found in CSV cells)
    /// are tolerated.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Parse`] for malformed JSON,
    /// [`GeometryError::Unsupported`] for any other geometry type, and
    /// [`GeometryError::EmptyGeometry`] when the coordinates array is empty.
    pub fn from_geojson(input: &str) -> Result<Self, GeometryError> {
        let input = input.trim().trim_matches('"');
        let doc: GeometryDoc = serde_json::from_str(input)?;

        match doc.kind.as_str() {
            "Polygon" => {
                let rings: Vec<Vec<Vec<f64>>> = serde_json::from_value(doc.coordinates)?;
                Self::from_rings(&rings)
            }
            "MultiPolygon" => {
                let polygons: Vec<Vec<Vec<Vec<f64>>>> = serde_json::from_value(doc.coordinates)?;
                let first = polygons.first().ok_or(GeometryError::EmptyGeometry)?;
                Self::from_rings(first)
            }
            other => Err(GeometryError::Unsupported(other.to_owned())),
        }
    }

    fn from_rings(rings: &[Vec<Vec<f64>>]) -> Result<Self, GeometryError> {
        let mut converted = rings
            .iter()
            .map(|ring| {
                ring.iter()
                    .map(|position| match position.as_slice() {
                        [x, y, ..] => Ok(Point::new(*x, *y)),
                        _ => Err(GeometryError::Parse(
                            "position with fewer than two coordinates".to_owned(),
                        )),
                    })
                    .collect::<Result<Vec<Point>, GeometryError>>()
                    .map(Ring::new)
            })
            .collect::<Result<Vec<Ring>, GeometryError>>()?;

        if converted.is_empty() || converted[0].is_empty() {
            return Err(GeometryError::EmptyGeometry);
        }

        let exterior = converted.remove(0);
        Ok(Self {
            exterior,
            interiors: converted,
        })
    }

    /// Serialises back to a GeoJSON `Polygon` geometry string, holes
    /// included.
    #[must_use]
    pub fn to_geojson(&self) -> String {
        let ring_coords = |ring: &Ring| -> Vec<[f64; 2]> {
            ring.points().iter().map(|p| [p.x, p.y]).collect()
        };
        let mut coordinates = vec![ring_coords(&self.exterior)];
        coordinates.extend(self.interiors.iter().map(ring_coords));
        serde_json::json!({
            "type": "Polygon",
            "coordinates": coordinates,
        })
        .to_string()
    }

    /// The outer ring.
    #[must_use]
    pub const fn exterior(&self) -> &Ring {
        &self.exterior
    }

    /// The holes, in input order.
    #[must_use]
    pub fn interiors(&self) -> &[Ring] {
        &self.interiors
    }

    /// Number of vertices in the outer ring.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.exterior.len()
    }

    /// Whether the polygon has no usable outer ring.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.exterior.open_points().len() < 3
    }

    /// Unsigned area of the outer ring (holes ignored).
    #[must_use]
    pub fn area(&self) -> f64 {
        self.exterior.area()
    }

    /// Bounding box of the outer ring.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        self.exterior.bounding_box()
    }

    /// Point-in-polygon against the outer ring; boundary counts as inside.
    #[must_use]
    pub fn contains_point(&self, p: Point) -> bool {
        self.exterior.contains_point(p)
    }

    /// Whether the outer rings of the two polygons touch or overlap.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        if !self.bounding_box().overlaps(&other.bounding_box()) {
            return false;
        }
        if other
            .exterior
            .points()
            .iter()
            .any(|&p| self.contains_point(p))
        {
            return true;
        }
        if self
            .exterior
            .points()
            .iter()
            .any(|&p| other.contains_point(p))
        {
            return true;
        }
        edge_pairs_intersect(&self.exterior, &other.exterior)
    }

    /// Whether this polygon fully contains `other`.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        if !self.bounding_box().covers(&other.bounding_box()) {
            return false;
        }
        if !other
            .exterior
            .points()
            .iter()
            .all(|&p| self.contains_point(p))
        {
            return false;
        }
        !edge_pairs_cross(&self.exterior, &other.exterior)
    }

    /// Whether the two outer rings trace the same boundary.
    ///
    /// Rings are compared up to starting offset and direction.
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        let a = self.exterior.open_points();
        let b = other.exterior.open_points();
        if a.len() != b.len() {
            return false;
        }
        if a.is_empty() {
            return true;
        }

        let matches = |offset: usize, reversed: bool| {
            (0..a.len()).all(|i| {
                let j = if reversed {
                    (offset + a.len() - i) % a.len()
                } else {
                    (offset + i) % a.len()
                };
                (a[i].x - b[j].x).abs() < COORD_EPS && (a[i].y - b[j].y).abs() < COORD_EPS
            })
        };

        (0..a.len()).any(|offset| matches(offset, false) || matches(offset, true))
    }

    /// Clips `other` against this polygon; see [`crate::intersection_area`].
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        crate::clip::clip_polygon(other, self)
    }
}

/// Cross product of `(b - a)` and `(p - a)`.
pub(crate) fn cross(a: Point, b: Point, p: Point) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Whether `p` lies on the closed segment `a..b`.
pub(crate) fn on_segment(p: Point, a: Point, b: Point) -> bool {
    if cross(a, b, p).abs() > COLLINEAR_EPS {
        return false;
    }
    p.x >= a.x.min(b.x) - COLLINEAR_EPS
        && p.x <= a.x.max(b.x) + COLLINEAR_EPS
        && p.y >= a.y.min(b.y) - COLLINEAR_EPS
        && p.y <= a.y.max(b.y) + COLLINEAR_EPS
}

/// Whether segments `a1..a2` and `b1..b2` intersect, endpoints included.
fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let d1 = cross(b1, b2, a1);
    let d2 = cross(b1, b2, a2);
    let d3 = cross(a1, a2, b1);
    let d4 = cross(a1, a2, b2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    on_segment(a1, b1, b2)
        || on_segment(a2, b1, b2)
        || on_segment(b1, a1, a2)
        || on_segment(b2, a1, a2)
}

/// Whether segments cross strictly through each other's interior.
fn segments_cross(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let d1 = cross(b1, b2, a1);
    let d2 = cross(b1, b2, a2);
    let d3 = cross(a1, a2, b1);
    let d4 = cross(a1, a2, b2);
    ((d1 > COLLINEAR_EPS && d2 < -COLLINEAR_EPS) || (d1 < -COLLINEAR_EPS && d2 > COLLINEAR_EPS))
        && ((d3 > COLLINEAR_EPS && d4 < -COLLINEAR_EPS)
            || (d3 < -COLLINEAR_EPS && d4 > COLLINEAR_EPS))
}

fn for_edge_pairs(a: &Ring, b: &Ring, test: impl Fn(Point, Point, Point, Point) -> bool) -> bool {
    let pa = a.points();
    let pb = b.points();
    if pa.len() < 2 || pb.len() < 2 {
        return false;
    }
    for i in 0..pa.len() - 1 {
        for j in 0..pb.len() - 1 {
            if test(pa[i], pa[i + 1], pb[j], pb[j + 1]) {
                return true;
            }
        }
    }
    false
}

fn edge_pairs_intersect(a: &Ring, b: &Ring) -> bool {
    for_edge_pairs(a, b, segments_intersect)
}

fn edge_pairs_cross(a: &Ring, b: &Ring) -> bool {
    for_edge_pairs(a, b, segments_cross)
}
