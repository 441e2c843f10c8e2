//! Geocoded establishment record.

use serde::Serialize;

/// One establishment row from the business dataset.
///
/// Built during the filtered CSV scan and discarded with the response. The
/// SIRET is the 14-character national establishment identifier
/// (9-digit SIREN + 5-digit NIC).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Business {
    /// Display name of the establishment.
    pub name: String,
    /// National establishment identifier.
    pub siret: String,
    /// French activity classification code (e.g. `"56.30Z"`).
    #[serde(rename = "nafCode")]
    pub naf_code: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Street address assembled from the dataset's address columns.
    pub address: String,
}
