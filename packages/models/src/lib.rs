#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Domain records and wire types shared across the geoscope crates.
//!
//! Dataset records (businesses, zones, communes, financial snapshots) are
//! owned per request and dropped with the response. Wire types mirror the
//! JSON contract of the HTTP surface.

mod business;
mod competition;
mod criminality;
mod financials;
mod request;
mod response;
mod zones;

pub use business::Business;
pub use competition::{
    CompetitionResponseByNaf, CompetitionStats, CompetitorCountResponse, CompetitorSummary,
    NafCodeCompetition,
};
pub use criminality::{CrimeStats, CriminalityResponse, CRIME_TYPE_KEYS};
pub use financials::{FinancialRecord, FiscalExercise};
pub use request::{Feature, GeoRequest};
pub use response::{
    AdministrativeData, CommuneEntry, IrisResponse, MedianIncome, PostalCodeEntry,
    SpecialZoneEntry,
};
pub use zones::{Commune, IrisZone, SpecialZone};
