#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Per-request geospatial aggregation engine.
//!
//! The engine owns no data between requests: every entry point parses the
//! query polygon, streams the datasets it needs, computes, and drops
//! everything with the response. The zone pass runs on a rayon pool with
//! pure workers; a single-threaded reducer owns every accumulator.

mod aggregate;
mod artifacts;
mod cancel;
mod competition;
mod criminality;
mod search;

pub use cancel::CancelToken;

use geoscope_datasets::{DataConfig, DatasetError};
use geoscope_geometry::GeometryError;
use geoscope_models::{Business, CompetitionResponseByNaf, IrisResponse};

/// Errors surfaced by the engine entry points.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The query geometry could not be parsed.
    #[error("invalid query geometry: {0}")]
    BadInput(String),

    /// The query geometry is of a type the engine does not evaluate.
    #[error("unsupported geometry type: {0}")]
    Unsupported(String),

    /// A dataset could not be opened or its header read.
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// The query polygon intersects no IRIS zone.
    #[error("no intersecting zones found")]
    NoIntersection,

    /// The request was cancelled during the zone pass.
    #[error("request cancelled")]
    Cancelled,

    /// Unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<GeometryError> for EngineError {
    fn from(err: GeometryError) -> Self {
        match err {
            GeometryError::Unsupported(kind) => Self::Unsupported(kind),
            other => Self::BadInput(other.to_string()),
        }
    }
}

/// Stateless facade over the query pipelines. Holds only the dataset
/// configuration; every call opens its own file handles.
#[derive(Debug, Clone)]
pub struct Engine {
    config: DataConfig,
}

impl Engine {
    #[must_use]
    pub const fn new(config: DataConfig) -> Self {
        Self { config }
    }

    /// Businesses of `naf_code` inside the query polygon, in dataset order.
    ///
    /// With `detail` set the result list is also dumped to a best-effort
    /// artifact file; callers that only need the count pass `false`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::BadInput`] / [`EngineError::Unsupported`] for
    /// unusable geometry and [`EngineError::Dataset`] when the business
    /// dataset cannot be read.
    pub fn search(
        &self,
        polygon_json: &str,
        naf_code: &str,
        detail: bool,
    ) -> Result<Vec<Business>, EngineError> {
        search::run(&self.config, polygon_json, naf_code, detail)
    }

    /// Weighted demographic aggregation over every zone the query polygon
    /// touches.
    ///
    /// # Errors
    ///
    /// As [`Engine::search`], plus [`EngineError::NoIntersection`] when no
    /// zone overlaps the polygon and [`EngineError::Cancelled`] when
    /// `cancel` fires during the zone pass.
    pub fn aggregate(
        &self,
        polygon_json: &str,
        cancel: &CancelToken,
    ) -> Result<IrisResponse, EngineError> {
        aggregate::run(&self.config, polygon_json, cancel)
    }

    /// Competitor financial statistics for an already matched business set.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Dataset`] when the financials dataset cannot
    /// be read.
    pub fn competition(
        &self,
        businesses: &[Business],
    ) -> Result<CompetitionResponseByNaf, EngineError> {
        competition::run(&self.config, businesses)
    }
}
