#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Planar geometry kernel for the geoscope query engine.
//!
//! Provides the polygon value types parsed from GeoJSON, the point-in-ring
//! and polygon-polygon predicates used by the request pipeline, area and
//! clipping computations, and the Ramer-Douglas-Peucker query-polygon
//! simplifier.
//!
//! Coordinates are geographic degrees with longitude in `x` and latitude in
//! `y` (GeoJSON position order). All measures work directly on degree
//! coordinates; the engine only ever consumes ratios of areas, so no
//! projection is applied.

mod clip;
mod point;
mod polygon;
mod simplify;

pub use clip::intersection_area;
pub use point::{BoundingBox, Point};
pub use polygon::{Polygon, Ring};
pub use simplify::simplify_polygon;

/// Errors produced while parsing or evaluating geometries.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    /// The input was not valid GeoJSON geometry.
    #[error("invalid GeoJSON geometry: {0}")]
    Parse(String),

    /// The geometry type is not one the engine evaluates.
    #[error("unsupported geometry type: {0}")]
    Unsupported(String),

    /// The geometry carried no coordinates at all.
    #[error("geometry has no coordinates")]
    EmptyGeometry,
}

impl From<serde_json::Error> for GeometryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
