//! Zone aggregation pipeline.
//!
//! Two phases per request: a parallel, read-only zone pass that emits
//! `(zone index, intersection percentage)` pairs, and a single-threaded
//! reduce pass that owns every accumulator. Communes are loaded only for
//! the codes the zone pass discovered.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;

use geoscope_datasets::{
    load_commune_crimes, load_communes, load_department_crimes, load_iris_zones,
    load_special_zones, DataConfig,
};
use geoscope_geometry::{intersection_area, simplify_polygon, Polygon};
use geoscope_models::{
    Commune, CommuneEntry, IrisResponse, IrisZone, MedianIncome, PostalCodeEntry,
    SpecialZoneEntry,
};

use crate::{artifacts, criminality, CancelToken, EngineError};

/// Intersection shares below this percentage are treated as no overlap.
const MIN_OVERLAP_PERCENT: f64 = 5.0;

pub(crate) fn run(
    config: &DataConfig,
    polygon_json: &str,
    cancel: &CancelToken,
) -> Result<IrisResponse, EngineError> {
    let polygon = simplify_polygon(&Polygon::from_geojson(polygon_json)?);
    if polygon.is_degenerate() {
        return Err(EngineError::BadInput(
            "query polygon has fewer than three vertices".to_owned(),
        ));
    }

    let zones = load_iris_zones(&config.iris_path())?;

    // Zone pass: pure workers over immutable shares, unordered emissions.
    // The indexed collect keeps the reduce pass deterministic regardless of
    // completion order.
    let emissions: Vec<(usize, f64)> = zones
        .par_iter()
        .enumerate()
        .filter_map(|(index, zone)| {
            if cancel.is_cancelled() {
                return None;
            }
            let percentage = intersection_percentage(&polygon, &zone.polygon);
            (percentage > 0.0).then_some((index, percentage))
        })
        .collect();

    if cancel.is_cancelled() {
        return Err(EngineError::Cancelled);
    }
    if emissions.is_empty() {
        return Err(EngineError::NoIntersection);
    }
    log::info!("{} intersecting zones", emissions.len());

    // Reduce pass: one owner for every accumulator.
    let mut attribute_sums: HashMap<&'static str, f64> = HashMap::new();
    let mut total_population = 0.0;
    let mut commune_codes: HashSet<String> = HashSet::new();

    for &(index, percentage) in &emissions {
        let zone: &IrisZone = &zones[index];
        let factor = percentage / 100.0;
        total_population += zone.total_population * factor;
        for (&key, &value) in &zone.attributes {
            *attribute_sums.entry(key).or_insert(0.0) += value * factor;
        }
        commune_codes.insert(zone.commune_code.clone());
    }

    let communes = load_communes(&config.commune_path(), &commune_codes)?;
    let included = included_communes(&polygon, communes);

    let mut response = IrisResponse {
        data: attribute_sums
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value.round() as i64))
            .collect(),
        total_population: total_population.round() as i64,
        ..IrisResponse::default()
    };

    for (commune, percentage) in &included {
        response.administrative.communes.push(CommuneEntry {
            id: commune.id.clone(),
            commune_code: commune.insee_code.clone(),
            name: commune.name.clone(),
            postal_code: commune.postal_code.clone(),
            population: commune.population,
            surface_area: commune.surface_area,
            percentage: *percentage,
        });
        response.administrative.postal_codes.push(PostalCodeEntry {
            postal_code: commune.postal_code.clone(),
            percentage: *percentage,
        });
    }

    for zone in load_special_zones(&config.qp_path())? {
        let percentage = intersection_percentage(&polygon, &zone.polygon);
        if percentage > 0.0 {
            response.administrative.special_zones.push(SpecialZoneEntry {
                id: zone.id,
                code: zone.code,
                label: zone.label,
                commune: zone.commune,
                percentage,
            });
        }
    }

    let commune_crimes = load_commune_crimes(&config.commune_crimes_path())?;
    let department_crimes = load_department_crimes(&config.department_crimes_path())?;
    response.criminality = criminality::reduce(&included, &commune_crimes, &department_crimes);

    response.median_income = median_income(&included);

    artifacts::write_iris_results(&response);
    Ok(response)
}

/// Intersection percentage of the query polygon with a zone polygon,
/// relative to the zone's area. Shares under [`MIN_OVERLAP_PERCENT`] clamp
/// to 0.
fn intersection_percentage(query: &Polygon, zone: &Polygon) -> f64 {
    let area = intersection_area(query, zone);
    if area <= 0.0 {
        return 0.0;
    }
    let zone_area = zone.area();
    if zone_area <= 0.0 {
        return 0.0;
    }
    let percentage = area / zone_area * 100.0;
    if percentage < MIN_OVERLAP_PERCENT {
        0.0
    } else {
        percentage
    }
}

/// Communes whose polygon clears the overlap threshold, deduplicated by
/// record equality and kept in dataset order.
fn included_communes(query: &Polygon, communes: Vec<Commune>) -> Vec<(Commune, f64)> {
    let mut included: Vec<(Commune, f64)> = Vec::with_capacity(communes.len());
    for commune in communes {
        let Some(polygon) = &commune.polygon else {
            continue;
        };
        let percentage = intersection_percentage(query, polygon);
        if percentage <= 0.0 {
            continue;
        }
        if included.iter().any(|(existing, _)| *existing == commune) {
            continue;
        }
        included.push((commune, percentage));
    }
    included
}

/// Population-share-weighted mean of the declared commune incomes, with
/// coverage flags. `None` when no included commune declares an income.
fn median_income(included: &[(Commune, f64)]) -> Option<MedianIncome> {
    let mut weighted_income = 0.0;
    let mut declared_population = 0.0;
    let mut covered_population = 0.0;
    let mut all_declared = true;

    for (commune, percentage) in included {
        let population_share = commune.population * percentage / 100.0;
        covered_population += population_share;
        if let Some(income) = commune.average_income {
            weighted_income += income * population_share;
            declared_population += population_share;
        } else {
            all_declared = false;
        }
    }

    if declared_population <= 0.0 {
        return None;
    }

    let coverage_percentage = if covered_population > 0.0 {
        declared_population / covered_population * 100.0
    } else {
        0.0
    };

    Some(MedianIncome {
        value: weighted_income / declared_population,
        coverage_percentage,
        is_total: all_declared,
    })
}
