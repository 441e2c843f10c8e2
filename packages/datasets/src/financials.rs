//! Competitor financials dataset loader.
//!
//! The dataset carries one published financial snapshot per row, keyed by
//! SIRET (siren + nic). Only snapshots for the caller's matched SIRETs are
//! kept; when the same SIRET is published more than once, the row with the
//! strictly most recent publication date wins.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::NaiveDate;
use geoscope_models::{FinancialRecord, FiscalExercise};

use crate::reader::{open_reader, read_header, LoadStats};
use crate::DatasetError;

/// Fixed dataset width.
const MIN_COLUMNS: usize = 40;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Loads the financial snapshots for the given SIRETs.
///
/// # Errors
///
/// Returns [`DatasetError`] when the file cannot be opened or its header
/// cannot be read.
pub fn load_financials(
    path: &Path,
    target_sirets: &HashSet<String>,
) -> Result<HashMap<String, FinancialRecord>, DatasetError> {
    let mut reader = open_reader(path)?;
    read_header(&mut reader, path)?;

    let mut records: HashMap<String, FinancialRecord> = HashMap::new();
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

        let siret = format!("{}{}", &record[1], &record[2]);
        if !target_sirets.contains(&siret) {
            continue;
        }

        if let Some(existing) = records.get(&siret) {
            if !supersedes(&record[18], &existing.publication_date) {
                continue;
            }
        }

        let (latitude, longitude) = parse_geolocation(&record[17]);

        let exercise = |base: usize| FiscalExercise {
            millesime: record[base].to_owned(),
            close_date: record[base + 1].to_owned(),
            duration: record[base + 2].to_owned(),
            revenue: record[base + 3].to_owned(),
            result: record[base + 4].to_owned(),
            employees: record[base + 5].to_owned(),
        };

        records.insert(
            siret,
            FinancialRecord {
                name: record[0].to_owned(),
                siren: record[1].to_owned(),
                nic: record[2].to_owned(),
                legal_status: record[3].to_owned(),
                code_ape: record[4].to_owned(),
                label_ape: record[5].to_owned(),
                address: record[6].to_owned(),
                postal_code: record[7].to_owned(),
                city: record[8].to_owned(),
                department_number: record[9].to_owned(),
                department: record[10].to_owned(),
                region: record[11].to_owned(),
                registry_code: record[12].to_owned(),
                registry: record[13].to_owned(),
                registration_date: record[14].to_owned(),
                deregistration_date: record[15].to_owned(),
                status: record[16].to_owned(),
                latitude,
                longitude,
                publication_date: record[18].to_owned(),
                exercises: [exercise(19), exercise(25), exercise(31)],
                range_ca: [
                    record[37].to_owned(),
                    record[38].to_owned(),
                    record[39].to_owned(),
                ],
            },
        );
        stats.record();
    }

    stats.log("competitor financials dataset");
    Ok(records)
}

/// Whether a snapshot published on `candidate` replaces one published on
/// `existing`. An unparseable candidate date never replaces; an empty
/// existing date is always replaced.
fn supersedes(candidate: &str, existing: &str) -> bool {
    let Ok(candidate) = NaiveDate::parse_from_str(candidate, DATE_FORMAT) else {
        return false;
    };
    if existing.is_empty() {
        return true;
    }
    match NaiveDate::parse_from_str(existing, DATE_FORMAT) {
        Ok(existing) => candidate > existing,
        Err(_) => false,
    }
}

/// Parses a `"lat,lng"` cell; anything but two comma-separated parts, or a
/// malformed part, defaults to 0.
fn parse_geolocation(cell: &str) -> (f64, f64) {
    let parts: Vec<&str> = cell.split(',').collect();
    let [lat, lng] = parts.as_slice() else {
        return (0.0, 0.0);
    };
    (
        lat.trim().parse().unwrap_or(0.0),
        lng.trim().parse().unwrap_or(0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn financial_row(siren: &str, nic: &str, publication: &str, ca1: &str) -> String {
        let mut cells = vec![String::new(); MIN_COLUMNS];
        cells[0] = "SARL Exemple".to_owned();
        cells[1] = siren.to_owned();
        cells[2] = nic.to_owned();
        cells[17] = "48.85,2.35".to_owned();
        cells[18] = publication.to_owned();
        cells[22] = ca1.to_owned();
        cells[37] = "B".to_owned();
        cells.join(";")
    }

    fn write_fixture(rows: &[String]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let header: Vec<String> = (0..MIN_COLUMNS).map(|i| format!("col{i}")).collect();
        writeln!(file, "{}", header.join(";")).unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file
    }

    fn targets(sirets: &[&str]) -> HashSet<String> {
        sirets.iter().map(|&s| s.to_owned()).collect()
    }

    #[test]
    fn keeps_only_matched_sirets() {
        let file = write_fixture(&[
            financial_row("111111111", "00001", "2024-03-01", "50000"),
            financial_row("222222222", "00002", "2024-03-01", "60000"),
        ]);
        let records =
            load_financials(file.path(), &targets(&["11111111100001"])).unwrap();
        assert_eq!(records.len(), 1);

        let record = &records["11111111100001"];
        assert_eq!(record.siret(), "11111111100001");
        assert!((record.latitude - 48.85).abs() < f64::EPSILON);
        assert!((record.longitude - 2.35).abs() < f64::EPSILON);
        assert_eq!(record.exercises[0].revenue, "50000");
        assert_eq!(record.range_ca[0], "B");
    }

    #[test]
    fn most_recent_publication_wins_regardless_of_row_order() {
        let file = write_fixture(&[
            financial_row("111111111", "00001", "2024-06-01", "99000"),
            financial_row("111111111", "00001", "2023-06-01", "11000"),
        ]);
        let records =
            load_financials(file.path(), &targets(&["11111111100001"])).unwrap();
        assert_eq!(records["11111111100001"].exercises[0].revenue, "99000");

        let file = write_fixture(&[
            financial_row("111111111", "00001", "2023-06-01", "11000"),
            financial_row("111111111", "00001", "2024-06-01", "99000"),
        ]);
        let records =
            load_financials(file.path(), &targets(&["11111111100001"])).unwrap();
        assert_eq!(records["11111111100001"].exercises[0].revenue, "99000");
    }

    #[test]
    fn duplicate_with_unparseable_date_keeps_existing() {
        let file = write_fixture(&[
            financial_row("111111111", "00001", "2024-06-01", "99000"),
            financial_row("111111111", "00001", "soon", "11000"),
        ]);
        let records =
            load_financials(file.path(), &targets(&["11111111100001"])).unwrap();
        assert_eq!(records["11111111100001"].exercises[0].revenue, "99000");
    }

    #[test]
    fn same_publication_date_keeps_first_row() {
        let file = write_fixture(&[
            financial_row("111111111", "00001", "2024-06-01", "first"),
            financial_row("111111111", "00001", "2024-06-01", "second"),
        ]);
        let records =
            load_financials(file.path(), &targets(&["11111111100001"])).unwrap();
        assert_eq!(records["11111111100001"].exercises[0].revenue, "first");
    }
}
