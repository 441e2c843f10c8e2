//! Criminality indicator reducer.
//!
//! Folds per-commune crime rates, weighted by each commune's intersection
//! share, and relates the resulting area rate to a reference rate built
//! from the departments the query touches.

use std::collections::HashMap;

use geoscope_datasets::{CommuneCrimes, DepartmentCrimes};
use geoscope_models::{Commune, CrimeStats, CriminalityResponse};

/// Accumulator for one crime type across the included communes.
struct CrimeAccum {
    crimes_total: f64,
    covered_area: f64,
    partial_covered_area: f64,
    covered_residence: f64,
    is_total: bool,
}

impl Default for CrimeAccum {
    fn default() -> Self {
        Self {
            crimes_total: 0.0,
            covered_area: 0.0,
            partial_covered_area: 0.0,
            covered_residence: 0.0,
            is_total: true,
        }
    }
}

#[derive(Default)]
struct DepartmentAccum {
    rate_sum: f64,
    population_sum: f64,
}

/// Reduces the included communes (with their intersection percentages)
/// into the fixed criminality response.
pub(crate) fn reduce(
    communes: &[(Commune, f64)],
    commune_crimes: &CommuneCrimes,
    department_crimes: &HashMap<String, DepartmentCrimes>,
) -> CriminalityResponse {
    let mut accums: HashMap<String, CrimeAccum> = HashMap::new();
    let mut touched_departments: HashMap<String, &DepartmentCrimes> = HashMap::new();

    for (commune, percentage) in communes {
        let code = commune.insee_code.trim_start_matches('0');
        let department_code = extract_department_code(code);

        if let Some(reference) = department_crimes.get(department_code) {
            touched_departments.insert(department_code.to_owned(), reference);
        }

        let Some(rates) = commune_crimes.get(code) else {
            continue;
        };

        let population_share = commune.population * percentage / 100.0;
        let area_share = commune.surface_area * percentage / 100.0;

        for (crime_type, &rate) in rates {
            let accum = accums.entry(crime_type.clone()).or_default();
            accum.crimes_total += population_share * rate / 1000.0;
            accum.covered_area += area_share;
            if rate > 0.0 {
                accum.partial_covered_area += area_share;
            }
            accum.covered_residence += population_share;
            accum.is_total &= rate > 0.0;
        }
    }

    // Each touched department contributes its reference rate and population
    // once per crime type, regardless of how many of its communes the
    // query covers.
    let mut department_totals: HashMap<&str, DepartmentAccum> = HashMap::new();
    for reference in touched_departments.values() {
        for (crime_type, &rate) in &reference.rates {
            let total = department_totals.entry(crime_type.as_str()).or_default();
            total.rate_sum += rate;
            total.population_sum += reference.population;
        }
    }

    let mut response = CriminalityResponse::default();
    for (crime_type, accum) in accums {
        let departmental_rate = department_totals
            .get(crime_type.as_str())
            .filter(|total| total.population_sum > 0.0)
            .map_or(0.0, |total| total.rate_sum * 1000.0 / total.population_sum);

        let area_rate = if accum.covered_residence > 0.0 {
            accum.crimes_total * 1000.0 / accum.covered_residence
        } else {
            0.0
        };

        let percentage_covered_crimes = if accum.covered_area > 0.0 {
            100.0 * accum.partial_covered_area / accum.covered_area
        } else {
            0.0
        };

        // Crime types with no covered data keep a null slot.
        if percentage_covered_crimes <= 0.0 {
            continue;
        }

        let percentage_relative_to_departmental = if departmental_rate > 0.0 {
            (area_rate - departmental_rate) / departmental_rate * 100.0
        } else {
            0.0
        };

        response.set(
            &crime_type,
            CrimeStats {
                crimes_total: area_rate,
                covered_area: accum.covered_area,
                partial_covered_area: accum.partial_covered_area,
                covered_residence: accum.covered_residence,
                percentage_covered_crimes,
                percentage_relative_to_departmental,
                is_total: accum.is_total,
            },
        );
    }

    response
}

/// Department code of an INSEE commune code (leading zeros already
/// stripped): first two characters, with the Corsican special cases.
fn extract_department_code(insee_code: &str) -> &str {
    if let Some(rest) = insee_code.strip_prefix("20") {
        if matches!(rest.as_bytes().first(), Some(b'A' | b'B')) {
            return &insee_code[..3];
        }
        return "2A";
    }
    if insee_code.len() >= 2 {
        &insee_code[..2]
    } else {
        insee_code
    }
}
