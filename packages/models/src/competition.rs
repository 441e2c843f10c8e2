//! Competitor financial statistics wire types.

use serde::Serialize;

/// Response of the competitor count endpoint.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CompetitorCountResponse {
    pub number_of_competitors: usize,
}

/// Identity of a matched competitor carried alongside the group stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitorSummary {
    pub name: String,
    pub siret: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Aggregate financial statistics over a set of competitors.
///
/// The same shape serves each per-NAF group and the overall `averages`
/// record, which is computed over the flattened union of the group arrays.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionStats {
    pub num_competitors_with_a_status: u32,
    pub num_competitors_with_b_status: u32,
    pub num_competitors_with_c_status: u32,
    pub num_competitors_with_d_status: u32,
    pub num_competitors_with_e_status: u32,

    #[serde(rename = "competitorsAverageCALastYear")]
    pub competitors_average_ca_last_year: f64,
    #[serde(rename = "competitorsAverageCA2YearsAgo")]
    pub competitors_average_ca_2_years_ago: f64,
    #[serde(rename = "competitorsAverageCA3YearsAgo")]
    pub competitors_average_ca_3_years_ago: f64,

    pub competitors_average_revenue_last_year: f64,
    #[serde(rename = "competitorsAverageRevenue2YearsAgo")]
    pub competitors_average_revenue_2_years_ago: f64,
    #[serde(rename = "competitorsAverageRevenue3YearsAgo")]
    pub competitors_average_revenue_3_years_ago: f64,

    pub competitors_average_employees_last_year: i64,
    #[serde(rename = "competitorsAverageEmployees2YearsAgo")]
    pub competitors_average_employees_2_years_ago: i64,
    #[serde(rename = "competitorsAverageEmployees3YearsAgo")]
    pub competitors_average_employees_3_years_ago: i64,

    #[serde(rename = "percentageCompetitorsWithDeclaredCALastYear")]
    pub percentage_competitors_with_declared_ca_last_year: f64,
    #[serde(rename = "percentageCompetitorsWithDeclaredCA2YearsAgo")]
    pub percentage_competitors_with_declared_ca_2_years_ago: f64,
    #[serde(rename = "percentageCompetitorsWithDeclaredCA3YearsAgo")]
    pub percentage_competitors_with_declared_ca_3_years_ago: f64,
    pub percentage_competitors_with_declared_revenue_last_year: f64,
    #[serde(rename = "percentageCompetitorsWithDeclaredRevenue2YearsAgo")]
    pub percentage_competitors_with_declared_revenue_2_years_ago: f64,
    #[serde(rename = "percentageCompetitorsWithDeclaredRevenue3YearsAgo")]
    pub percentage_competitors_with_declared_revenue_3_years_ago: f64,
    pub percentage_competitors_with_declared_employees_last_year: f64,
    #[serde(rename = "percentageCompetitorsWithDeclaredEmployees2YearsAgo")]
    pub percentage_competitors_with_declared_employees_2_years_ago: f64,
    #[serde(rename = "percentageCompetitorsWithDeclaredEmployees3YearsAgo")]
    pub percentage_competitors_with_declared_employees_3_years_ago: f64,

    #[serde(rename = "caArrayLastYear")]
    pub ca_array_last_year: Vec<f64>,
    #[serde(rename = "caArray2YearsAgo")]
    pub ca_array_2_years_ago: Vec<f64>,
    #[serde(rename = "caArray3YearsAgo")]
    pub ca_array_3_years_ago: Vec<f64>,
    pub revenue_array_last_year: Vec<f64>,
    #[serde(rename = "revenueArray2YearsAgo")]
    pub revenue_array_2_years_ago: Vec<f64>,
    #[serde(rename = "revenueArray3YearsAgo")]
    pub revenue_array_3_years_ago: Vec<f64>,
    pub employees_array_last_year: Vec<f64>,
    #[serde(rename = "employeesArray2YearsAgo")]
    pub employees_array_2_years_ago: Vec<f64>,
    #[serde(rename = "employeesArray3YearsAgo")]
    pub employees_array_3_years_ago: Vec<f64>,

    pub num_competitors_with_consistent_increase: u32,
    pub num_competitors_with_consistent_decrease: u32,
    pub num_competitors_with_mixed_trend: u32,

    /// Whether any competitor's revenue band came from an older exercise
    /// than the most recent one.
    pub old_data_used: bool,
}

/// Per-NAF competition block: the matched competitors plus their stats.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NafCodeCompetition {
    #[serde(rename = "nafCode")]
    pub naf_code: String,
    pub number_of_competitors: usize,
    pub competitors: Vec<CompetitorSummary>,
    pub competition_stats: CompetitionStats,
}

/// Response of the competition data endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompetitionResponseByNaf {
    #[serde(rename = "nafCodes")]
    pub naf_codes: Vec<NafCodeCompetition>,
    pub averages: CompetitionStats,
}
