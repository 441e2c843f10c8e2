//! Business dataset loader.
//!
//! The dataset is wide and its exact width varies between vintages, so the
//! engine addresses columns positionally from both ends: display name at 0,
//! SIRET at 1, NAF code five columns from the end, longitude and latitude
//! in the last two columns. The address is assembled from the six address
//! columns, skipping empty cells.

use std::path::Path;

use geoscope_models::Business;

use crate::reader::{open_reader, read_header, LoadStats};
use crate::DatasetError;

/// Indexes of the address fragments, in assembly order.
const ADDRESS_COLUMNS: [usize; 6] = [12, 13, 17, 18, 19, 20];

/// Minimum width for a row to be addressable.
const MIN_COLUMNS: usize = 21;

/// Streams the business dataset, keeping only rows whose NAF code equals
/// `naf_code`. The filter is applied before any allocation. Rows with a
/// missing name or unparseable coordinates are skipped.
///
/// # Errors
///
/// Returns [`DatasetError`] when the file cannot be opened or its header
/// cannot be read.
pub fn load_businesses(path: &Path, naf_code: &str) -> Result<Vec<Business>, DatasetError> {
    let mut reader = open_reader(path)?;
    read_header(&mut reader, path)?;

    let mut businesses = Vec::with_capacity(1000);
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

        // Cheapest rejection first: almost every row has the wrong code.
        let record_naf = &record[len - 5];
        if record_naf != naf_code {
            continue;
        }

        let name = &record[0];
        if name.is_empty() {
            stats.skip();
            continue;
        }

        let Ok(longitude) = record[len - 2].parse::<f64>() else {
            stats.skip();
            continue;
        };
        let Ok(latitude) = record[len - 1].parse::<f64>() else {
            stats.skip();
            continue;
        };

        let address = ADDRESS_COLUMNS
            .iter()
            .filter_map(|&i| record.get(i))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        businesses.push(Business {
            name: name.to_owned(),
            siret: record[1].to_owned(),
            naf_code: record_naf.to_owned(),
            latitude,
            longitude,
            address,
        });
        stats.record();
    }

    stats.log("business dataset");
    Ok(businesses)
}
