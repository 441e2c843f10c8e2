//! Administrative zone records loaded from the IRIS, commune, and priority
//! neighborhood datasets.

use std::collections::HashMap;

use geoscope_geometry::Polygon;

/// One IRIS statistical zone with its demographic attribute vector.
///
/// Rows without a parseable polygon are dropped at load time, so a loaded
/// zone always satisfies `polygon.area() > 0` for non-degenerate data.
#[derive(Debug, Clone)]
pub struct IrisZone {
    /// INSEE code of the commune the zone belongs to.
    pub commune_code: String,
    pub polygon: Polygon,
    /// Pre-computed zone area carried by the dataset.
    pub area: f64,
    /// Canonical demographic key to numeric value.
    pub attributes: HashMap<&'static str, f64>,
    /// Copy of the `population_total` attribute.
    pub total_population: f64,
}

/// A "Quartier Prioritaire" priority neighborhood polygon.
#[derive(Debug, Clone)]
pub struct SpecialZone {
    /// Load index within the dataset.
    pub id: String,
    pub code: String,
    pub label: String,
    /// Name of the commune the neighborhood belongs to.
    pub commune: String,
    pub polygon: Polygon,
}

/// One commune (municipality) record.
#[derive(Debug, Clone, PartialEq)]
pub struct Commune {
    /// Load index within the dataset.
    pub id: String,
    pub insee_code: String,
    pub name: String,
    pub postal_code: String,
    pub population: f64,
    /// Surface area in the dataset's unit.
    pub surface_area: f64,
    /// `None` when the polygon cell was absent or unparseable; such
    /// communes contribute a zero intersection.
    pub polygon: Option<Polygon>,
    /// Average declared income, when the dataset carries one.
    pub average_income: Option<f64>,
}
