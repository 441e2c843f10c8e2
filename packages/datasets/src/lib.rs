#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Streaming CSV ingestion for the geoscope datasets.
//!
//! Every loader opens one semicolon-delimited CSV with a header row and
//! streams it into typed records, skipping malformed rows instead of
//! failing the request. Loaders that know an identifier filter (NAF code,
//! INSEE codes, SIRETs) reject rows before building any record.
//!
//! Numeric cells that fail to parse default to `0.0`; rows with too few
//! fields are skipped and counted. Skip counts are logged per dataset.

mod business;
mod commune;
mod config;
mod crimes;
mod financials;
mod iris;
mod reader;
mod special_zones;

pub use business::load_businesses;
pub use commune::load_communes;
pub use config::DataConfig;
pub use crimes::{load_commune_crimes, load_department_crimes, CommuneCrimes, DepartmentCrimes};
pub use financials::load_financials;
pub use iris::load_iris_zones;
pub use reader::LoadStats;
pub use special_zones::load_special_zones;

/// Errors raised while opening or reading a dataset file. Per-row problems
/// never surface here; they are skipped and counted instead.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The dataset file could not be opened.
    #[error("failed to open dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The header row could not be read.
    #[error("failed to read CSV header of {path}: {source}")]
    Header {
        path: String,
        #[source]
        source: csv::Error,
    },
}
