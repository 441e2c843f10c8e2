//! Criminality indicator wire types.

use serde::Serialize;

/// Canonical crime-type keys, matching the commune/department crime dataset
/// headers and the response slot names.
pub const CRIME_TYPE_KEYS: [&str; 14] = [
    "drug_usage",
    "vehicle_theft",
    "armed_robberies",
    "home_burglaries",
    "sexual_violence",
    "drug_trafficking",
    "voluntary_injuries",
    "theft_from_vehicles",
    "other_voluntary_injuries",
    "theft_of_vehicle_accessories",
    "intrafamily_voluntary_injuries",
    "voluntary_damage_and_vandalism",
    "violent_robberies_without_weapon",
    "robberies_without_violence_against_persons",
];

/// Indicators for one crime type over the queried area.
///
/// `crimes_total` ends up holding the rate per 1000 residents of the
/// covered area; the name is kept for wire compatibility.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrimeStats {
    #[serde(rename = "crimesTotal")]
    pub crimes_total: f64,
    /// Area share (weighted by intersection) the accumulation covered.
    #[serde(rename = "coveredArea")]
    pub covered_area: f64,
    /// Area share of communes that declared a non-zero rate.
    #[serde(rename = "partialCoveredArea")]
    pub partial_covered_area: f64,
    /// Population share the accumulation covered.
    #[serde(rename = "coveredResidence")]
    pub covered_residence: f64,
    #[serde(rename = "percentageCoveredCrimes")]
    pub percentage_covered_crimes: f64,
    /// Relative deviation of the area rate from the departmental rate.
    #[serde(rename = "percentageRelativeToDepartmental")]
    pub percentage_relative_to_departmental: f64,
    /// Whether every contributing commune declared a non-zero rate.
    #[serde(rename = "isTotal")]
    pub is_total: bool,
}

/// Fixed 14-slot criminality response. Slots for crime types with no
/// covered data stay `null`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CriminalityResponse {
    pub drug_usage: Option<CrimeStats>,
    pub vehicle_theft: Option<CrimeStats>,
    pub armed_robberies: Option<CrimeStats>,
    pub home_burglaries: Option<CrimeStats>,
    pub sexual_violence: Option<CrimeStats>,
    pub drug_trafficking: Option<CrimeStats>,
    pub voluntary_injuries: Option<CrimeStats>,
    pub theft_from_vehicles: Option<CrimeStats>,
    pub other_voluntary_injuries: Option<CrimeStats>,
    pub theft_of_vehicle_accessories: Option<CrimeStats>,
    pub intrafamily_voluntary_injuries: Option<CrimeStats>,
    pub voluntary_damage_and_vandalism: Option<CrimeStats>,
    pub violent_robberies_without_weapon: Option<CrimeStats>,
    pub robberies_without_violence_against_persons: Option<CrimeStats>,
}

impl CriminalityResponse {
    /// Fills the slot for `key`; unknown keys are ignored.
    pub fn set(&mut self, key: &str, stats: CrimeStats) {
        let slot = match key {
            "drug_usage" => &mut self.drug_usage,
            "vehicle_theft" => &mut self.vehicle_theft,
            "armed_robberies" => &mut self.armed_robberies,
            "home_burglaries" => &mut self.home_burglaries,
            "sexual_violence" => &mut self.sexual_violence,
            "drug_trafficking" => &mut self.drug_trafficking,
            "voluntary_injuries" => &mut self.voluntary_injuries,
            "theft_from_vehicles" => &mut self.theft_from_vehicles,
            "other_voluntary_injuries" => &mut self.other_voluntary_injuries,
            "theft_of_vehicle_accessories" => &mut self.theft_of_vehicle_accessories,
            "intrafamily_voluntary_injuries" => &mut self.intrafamily_voluntary_injuries,
            "voluntary_damage_and_vandalism" => &mut self.voluntary_damage_and_vandalism,
            "violent_robberies_without_weapon" => &mut self.violent_robberies_without_weapon,
            "robberies_without_violence_against_persons" => {
                &mut self.robberies_without_violence_against_persons
            }
            _ => return,
        };
        *slot = Some(stats);
    }

    /// Reads the slot for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CrimeStats> {
        match key {
            "drug_usage" => self.drug_usage.as_ref(),
            "vehicle_theft" => self.vehicle_theft.as_ref(),
            "armed_robberies" => self.armed_robberies.as_ref(),
            "home_burglaries" => self.home_burglaries.as_ref(),
            "sexual_violence" => self.sexual_violence.as_ref(),
            "drug_trafficking" => self.drug_trafficking.as_ref(),
            "voluntary_injuries" => self.voluntary_injuries.as_ref(),
            "theft_from_vehicles" => self.theft_from_vehicles.as_ref(),
            "other_voluntary_injuries" => self.other_voluntary_injuries.as_ref(),
            "theft_of_vehicle_accessories" => self.theft_of_vehicle_accessories.as_ref(),
            "intrafamily_voluntary_injuries" => self.intrafamily_voluntary_injuries.as_ref(),
            "voluntary_damage_and_vandalism" => self.voluntary_damage_and_vandalism.as_ref(),
            "violent_robberies_without_weapon" => self.violent_robberies_without_weapon.as_ref(),
            "robberies_without_violence_against_persons" => {
                self.robberies_without_violence_against_persons.as_ref()
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_canonical_key_has_a_slot() {
        let mut response = CriminalityResponse::default();
        for key in CRIME_TYPE_KEYS {
            assert!(response.get(key).is_none());
            response.set(key, CrimeStats::default());
            assert!(response.get(key).is_some(), "no slot for {key}");
        }
    }

    #[test]
    fn unknown_key_is_ignored() {
        let mut response = CriminalityResponse::default();
        response.set("jaywalking", CrimeStats::default());
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.as_object().unwrap().values().all(serde_json::Value::is_null));
    }
}
