//! Commune dataset loader.
//!
//! Only the communes whose INSEE code is in the caller's target set are
//! materialised; the aggregation pipeline knows the intersecting commune
//! codes before this loader runs. Columns are addressed from both ends of
//! the row: code and population lead, polygon / postal code / name /
//! surface / income sit at fixed offsets from the tail.

use std::collections::HashSet;
use std::path::Path;

use geoscope_geometry::Polygon;
use geoscope_models::Commune;

use crate::reader::{open_reader, parse_float, read_header, LoadStats};
use crate::DatasetError;

/// The polygon column sits ten cells from the end of the row.
const MIN_COLUMNS: usize = 11;

/// Loads the commune records for the given INSEE codes, in dataset order.
///
/// A commune whose polygon cell is absent or unparseable is still returned
/// (with `polygon: None`); it contributes a zero intersection downstream.
///
/// # Errors
///
/// Returns [`DatasetError`] when the file cannot be opened or its header
/// cannot be read.
pub fn load_communes(
    path: &Path,
    target_codes: &HashSet<String>,
) -> Result<Vec<Commune>, DatasetError> {
    let mut reader = open_reader(path)?;
    read_header(&mut reader, path)?;

    let mut communes = Vec::with_capacity(target_codes.len());
    let mut stats = LoadStats::default();

    for row in reader.records() {
        let Ok(record) = row else {
            stats.skip();
            continue;
        };

        let len = record.len();
        if len < MIN_COLUMNS {
            stats.skip();
            continue;
        }

        let insee_code = &record[0];
        if !target_codes.contains(insee_code) {
            continue;
        }

        let polygon = Polygon::from_geojson(&record[len - 10]).ok();
        let income_cell = record[len - 2].trim();
        let average_income = if income_cell.is_empty() {
            None
        } else {
            income_cell.parse::<f64>().ok()
        };

        communes.push(Commune {
            id: communes.len().to_string(),
            insee_code: insee_code.to_owned(),
            name: record[len - 5].to_owned(),
            postal_code: record[len - 6].to_owned(),
            population: parse_float(&record[1]),
            surface_area: parse_float(&record[len - 4]),
            polygon,
            average_income,
        });
        stats.record();
    }

    stats.log("commune dataset");
    Ok(communes)
}
