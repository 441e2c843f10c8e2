//! Priority neighborhood (QP) dataset loader.

use std::path::Path;

use geoscope_geometry::Polygon;
use geoscope_models::SpecialZone;

use crate::reader::{open_reader, read_header, LoadStats};
use crate::DatasetError;

const MIN_COLUMNS: usize = 8;
const CODE_COLUMN: usize = 1;
const LABEL_COLUMN: usize = 2;
const COMMUNE_COLUMN: usize = 3;
const POLYGON_COLUMN: usize = 6;

/// Streams every priority neighborhood with a usable polygon, in dataset
/// order. The record id is the load index.
///
/// # Errors
///
/// Returns [`DatasetError`] when the file cannot be opened or its header
/// cannot be read.
pub fn load_special_zones(path: &Path) -> Result<Vec<SpecialZone>, DatasetError> {
    let mut reader = open_reader(path)?;
    read_header(&mut reader, path)?;

    let mut zones = Vec::new();
    let mut stats = LoadStats::default();

    for row in reader.records() {
        let Ok(record) = row else {
            stats.skip();
            continue;
        };

        if record.len() < MIN_COLUMNS {
            stats.skip();
            continue;
        }

        let polygon_cell = &record[POLYGON_COLUMN];
        if polygon_cell.is_empty() {
            stats.skip();
            continue;
        }
        let Ok(polygon) = Polygon::from_geojson(polygon_cell) else {
            stats.skip();
            continue;
        };

        zones.push(SpecialZone {
            id: zones.len().to_string(),
            code: record[CODE_COLUMN].to_owned(),
            label: record[LABEL_COLUMN].to_owned(),
            commune: record[COMMUNE_COLUMN].to_owned(),
            polygon,
        });
        stats.record();
    }

    stats.log("qp dataset");
    Ok(zones)
}
