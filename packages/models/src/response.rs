//! Aggregation response wire types.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::CriminalityResponse;

/// A commune included in the aggregation, with its intersection share.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommuneEntry {
    pub id: String,
    #[serde(rename = "communeCode")]
    pub commune_code: String,
    pub name: String,
    #[serde(rename = "postalCode")]
    pub postal_code: String,
    pub population: f64,
    #[serde(rename = "surfaceArea")]
    pub surface_area: f64,
    /// Intersection percentage of the query polygon with the commune.
    pub percentage: f64,
}

/// A postal code mirror of an included commune.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostalCodeEntry {
    #[serde(rename = "postalCode")]
    pub postal_code: String,
    pub percentage: f64,
}

/// A priority neighborhood touched by the query polygon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecialZoneEntry {
    pub id: String,
    #[serde(rename = "codeQP")]
    pub code: String,
    #[serde(rename = "libQP")]
    pub label: String,
    pub commune: String,
    #[serde(rename = "intersectionPercentage")]
    pub percentage: f64,
}

/// Administrative zones touched by the query polygon.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdministrativeData {
    pub communes: Vec<CommuneEntry>,
    #[serde(rename = "postalCodes")]
    pub postal_codes: Vec<PostalCodeEntry>,
    #[serde(rename = "specialZones")]
    pub special_zones: Vec<SpecialZoneEntry>,
}

/// Income aggregate over the included communes.
///
/// Kept as floats: this subobject is exempt from the integer rounding
/// applied to the demographic attribute map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedianIncome {
    /// Population-share-weighted mean of the declared average incomes.
    pub value: f64,
    /// Share of the covered population whose commune declared an income.
    #[serde(rename = "coveragePercentage")]
    pub coverage_percentage: f64,
    /// Whether every included commune declared an income.
    #[serde(rename = "isTotal")]
    pub is_total: bool,
}

/// Response of the zone aggregation endpoint.
///
/// Attribute values and the total population are rounded to integers; the
/// `median_income` subobject keeps floats and coverage flags.
#[derive(Debug, Default, Serialize)]
pub struct IrisResponse {
    /// Weighted demographic attribute sums, keyed canonically.
    pub data: BTreeMap<String, i64>,
    #[serde(rename = "totalPopulation")]
    pub total_population: i64,
    pub administrative: AdministrativeData,
    pub criminality: CriminalityResponse,
    pub median_income: Option<MedianIncome>,
}
