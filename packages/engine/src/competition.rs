//! Competitor financial statistics reducer.
//!
//! Matched businesses are grouped by NAF code and joined with their
//! financial snapshot by SIRET. Per-group statistics and an overall
//! `averages` record are produced; the overall averages are computed over
//! the flattened union of the per-group arrays, not as a mean of means.

use std::collections::BTreeMap;

use geoscope_datasets::{load_financials, DataConfig};
use geoscope_models::{
    Business, CompetitionResponseByNaf, CompetitionStats, CompetitorSummary, FinancialRecord,
    NafCodeCompetition,
};

use crate::EngineError;

/// Sentinel for a declared value withheld by the company.
const CONFIDENTIAL: &str = "Confidentiel";

pub(crate) fn run(
    config: &DataConfig,
    businesses: &[Business],
) -> Result<CompetitionResponseByNaf, EngineError> {
    let sirets = businesses.iter().map(|b| b.siret.clone()).collect();
    let financials = load_financials(&config.competition_path(), &sirets)?;
    log::debug!(
        "{} financial snapshots joined for {} matched businesses",
        financials.len(),
        businesses.len()
    );

    // BTreeMap keys the response blocks deterministically by NAF code.
    let mut groups: BTreeMap<&str, Vec<&Business>> = BTreeMap::new();
    for business in businesses {
        groups.entry(&business.naf_code).or_default().push(business);
    }

    let mut response = CompetitionResponseByNaf::default();
    let mut overall = Accumulator::default();

    for (naf_code, group) in groups {
        let mut accum = Accumulator::default();
        let mut competitors = Vec::with_capacity(group.len());

        for business in &group {
            let Some(record) = financials.get(&business.siret) else {
                continue;
            };
            competitors.push(CompetitorSummary {
                name: record.name.clone(),
                siret: business.siret.clone(),
                latitude: record.latitude,
                longitude: record.longitude,
            });
            accum.absorb(record);
        }

        overall.merge(&accum);
        response.naf_codes.push(NafCodeCompetition {
            naf_code: naf_code.to_owned(),
            number_of_competitors: competitors.len(),
            competitors,
            competition_stats: accum.into_stats(group.len()),
        });
    }

    response.averages = overall.into_stats(businesses.len());
    Ok(response)
}

/// Shared accumulation shape for one NAF group and for the overall record.
#[derive(Default)]
struct Accumulator {
    band_counts: [u32; 5],
    revenue: [Vec<f64>; 3],
    result: [Vec<f64>; 3],
    employees: [Vec<f64>; 3],
    consistent_increase: u32,
    consistent_decrease: u32,
    mixed_trend: u32,
    old_data_used: bool,
}

impl Accumulator {
    /// Folds one financial snapshot in.
    fn absorb(&mut self, record: &FinancialRecord) {
        let chosen_band = record.range_ca.iter().position(|band| !band.is_empty());
        if chosen_band != Some(0) {
            self.old_data_used = true;
        }
        if let Some(index) = chosen_band {
            match record.range_ca[index].as_bytes().first() {
                Some(b'A') => self.band_counts[0] += 1,
                Some(b'B') => self.band_counts[1] += 1,
                Some(b'C') => self.band_counts[2] += 1,
                Some(b'D') => self.band_counts[3] += 1,
                Some(b'E') => self.band_counts[4] += 1,
                _ => {}
            }
        }

        let mut revenues = [None; 3];
        for (year, exercise) in record.exercises.iter().enumerate() {
            revenues[year] = declared_value(&exercise.revenue);
            if let Some(value) = revenues[year] {
                self.revenue[year].push(value);
            }
            if let Some(value) = declared_value(&exercise.result) {
                self.result[year].push(value);
            }
            if let Some(value) = declared_value(&exercise.employees) {
                self.employees[year].push(value);
            }
        }

        // Trend is classified on parsed values, only when all three years
        // are declared. Exercise 0 is the most recent.
        if let [Some(ca1), Some(ca2), Some(ca3)] = revenues {
            if ca1 > ca2 && ca2 > ca3 {
                self.consistent_increase += 1;
            } else if ca1 < ca2 && ca2 < ca3 {
                self.consistent_decrease += 1;
            } else {
                self.mixed_trend += 1;
            }
        }
    }

    /// Concatenates another accumulator into this one (used to build the
    /// overall record from the group records).
    fn merge(&mut self, other: &Self) {
        for (count, other_count) in self.band_counts.iter_mut().zip(other.band_counts) {
            *count += other_count;
        }
        for year in 0..3 {
            self.revenue[year].extend(&other.revenue[year]);
            self.result[year].extend(&other.result[year]);
            self.employees[year].extend(&other.employees[year]);
        }
        self.consistent_increase += other.consistent_increase;
        self.consistent_decrease += other.consistent_decrease;
        self.mixed_trend += other.mixed_trend;
        self.old_data_used |= other.old_data_used;
    }

    /// Produces the wire statistics with `denominator` as the coverage
    /// base (the group size, or the full matched set for the overall
    /// record).
    fn into_stats(self, denominator: usize) -> CompetitionStats {
        CompetitionStats {
            num_competitors_with_a_status: self.band_counts[0],
            num_competitors_with_b_status: self.band_counts[1],
            num_competitors_with_c_status: self.band_counts[2],
            num_competitors_with_d_status: self.band_counts[3],
            num_competitors_with_e_status: self.band_counts[4],

            competitors_average_ca_last_year: mean_rounded(&self.revenue[0]),
            competitors_average_ca_2_years_ago: mean_rounded(&self.revenue[1]),
            competitors_average_ca_3_years_ago: mean_rounded(&self.revenue[2]),

            competitors_average_revenue_last_year: mean_rounded(&self.result[0]),
            competitors_average_revenue_2_years_ago: mean_rounded(&self.result[1]),
            competitors_average_revenue_3_years_ago: mean_rounded(&self.result[2]),

            competitors_average_employees_last_year: mean_rounded(&self.employees[0]) as i64,
            competitors_average_employees_2_years_ago: mean_rounded(&self.employees[1]) as i64,
            competitors_average_employees_3_years_ago: mean_rounded(&self.employees[2]) as i64,

            percentage_competitors_with_declared_ca_last_year: percentage(
                self.revenue[0].len(),
                denominator,
            ),
            percentage_competitors_with_declared_ca_2_years_ago: percentage(
                self.revenue[1].len(),
                denominator,
            ),
            percentage_competitors_with_declared_ca_3_years_ago: percentage(
                self.revenue[2].len(),
                denominator,
            ),
            percentage_competitors_with_declared_revenue_last_year: percentage(
                self.result[0].len(),
                denominator,
            ),
            percentage_competitors_with_declared_revenue_2_years_ago: percentage(
                self.result[1].len(),
                denominator,
            ),
            percentage_competitors_with_declared_revenue_3_years_ago: percentage(
                self.result[2].len(),
                denominator,
            ),
            percentage_competitors_with_declared_employees_last_year: percentage(
                self.employees[0].len(),
                denominator,
            ),
            percentage_competitors_with_declared_employees_2_years_ago: percentage(
                self.employees[1].len(),
                denominator,
            ),
            percentage_competitors_with_declared_employees_3_years_ago: percentage(
                self.employees[2].len(),
                denominator,
            ),

            ca_array_last_year: self.revenue[0].clone(),
            ca_array_2_years_ago: self.revenue[1].clone(),
            ca_array_3_years_ago: self.revenue[2].clone(),
            revenue_array_last_year: self.result[0].clone(),
            revenue_array_2_years_ago: self.result[1].clone(),
            revenue_array_3_years_ago: self.result[2].clone(),
            employees_array_last_year: self.employees[0].clone(),
            employees_array_2_years_ago: self.employees[1].clone(),
            employees_array_3_years_ago: self.employees[2].clone(),

            num_competitors_with_consistent_increase: self.consistent_increase,
            num_competitors_with_consistent_decrease: self.consistent_decrease,
            num_competitors_with_mixed_trend: self.mixed_trend,

            old_data_used: self.old_data_used,
        }
    }
}

/// Parses a financial cell; empty cells and the confidentiality sentinel
/// count as undeclared.
fn declared_value(cell: &str) -> Option<f64> {
    if cell.is_empty() || cell == CONFIDENTIAL {
        return None;
    }
    cell.trim().parse().ok()
}

/// Arithmetic mean rounded to the nearest integer; 0 for an empty series.
fn mean_rounded(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    (values.iter().sum::<f64>() / values.len() as f64).round()
}

fn percentage(declared: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    declared as f64 / total as f64 * 100.0
}
