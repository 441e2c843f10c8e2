//! Best-effort result dumps.
//!
//! Responses are mirrored into `results/` under a per-request timestamped
//! filename. A write failure is logged and never fails the request.

use std::fs;
use std::path::PathBuf;

use serde_json::to_string_pretty;

use geoscope_models::{Business, IrisResponse};

const RESULTS_DIR: &str = "results";

/// Millisecond precision keeps concurrent writers from colliding.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%3f";

fn write(file_name: &str, payload: Result<String, serde_json::Error>) {
    let result = payload.map_err(|err| err.to_string()).and_then(|json| {
        fs::create_dir_all(RESULTS_DIR).map_err(|err| err.to_string())?;
        let path: PathBuf = [RESULTS_DIR, file_name].iter().collect();
        fs::write(&path, json).map_err(|err| err.to_string())?;
        log::debug!("results written to {}", path.display());
        Ok(())
    });

    if let Err(err) = result {
        log::warn!("failed to write result artifact {file_name}: {err}");
    }
}

/// Dumps a business search result list.
pub(crate) fn write_search_results(businesses: &[Business], naf_code: &str) {
    let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT);
    write(
        &format!("results_{naf_code}_{timestamp}.json"),
        to_string_pretty(businesses),
    );
}

/// Dumps an aggregation response.
pub(crate) fn write_iris_results(response: &IrisResponse) {
    let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT);
    write(
        &format!("iris_results_{timestamp}.json"),
        to_string_pretty(response),
    );
}
