//! Business search inside a query polygon.

use geoscope_datasets::{load_businesses, DataConfig};
use geoscope_geometry::{simplify_polygon, BoundingBox, Point, Polygon};
use geoscope_models::Business;

use crate::{artifacts, EngineError};

pub(crate) fn run(
    config: &DataConfig,
    polygon_json: &str,
    naf_code: &str,
    detail: bool,
) -> Result<Vec<Business>, EngineError> {
    let polygon = simplify_polygon(&Polygon::from_geojson(polygon_json)?);

    let businesses = load_businesses(&config.business_path(), naf_code)?;
    log::debug!(
        "{} businesses with NAF {naf_code} before spatial filtering",
        businesses.len()
    );

    let matched = filter_inside(&polygon, businesses);
    log::info!("{} businesses matched inside the query polygon", matched.len());

    if detail {
        artifacts::write_search_results(&matched, naf_code);
    }
    Ok(matched)
}

/// Keeps the businesses whose point falls inside the polygon, preserving
/// input order. Candidates are rejected against the polygon's bounding box
/// before the ring test; a business cloud entirely outside the box
/// short-circuits to nothing.
fn filter_inside(polygon: &Polygon, businesses: Vec<Business>) -> Vec<Business> {
    let polygon_bbox = polygon.bounding_box();

    let cloud_bbox = BoundingBox::of(
        &businesses
            .iter()
            .map(|b| Point::new(b.longitude, b.latitude))
            .collect::<Vec<_>>(),
    );
    if !businesses.is_empty() && !polygon_bbox.overlaps(&cloud_bbox) {
        return Vec::new();
    }

    businesses
        .into_iter()
        .filter(|business| {
            let point = Point::new(business.longitude, business.latitude);
            polygon_bbox.contains(point) && polygon.contains_point(point)
        })
        .collect()
}
