//! Commune and department crime table loaders.
//!
//! Both tables are keyed by the code in the first column with one crime
//! type per remaining header cell. Codes are stored with leading zeros
//! stripped, matching the lookups done by the criminality reducer.

use std::collections::HashMap;
use std::path::Path;

use crate::reader::{open_reader, read_header, strip_leading_zeros, LoadStats};
use crate::DatasetError;

/// Commune code to per-crime-type rate per 1000 residents.
pub type CommuneCrimes = HashMap<String, HashMap<String, f64>>;

/// One department's reference crime figures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepartmentCrimes {
    pub population: f64,
    /// Crime type key to rate.
    pub rates: HashMap<String, f64>,
}

/// Loads the per-commune crime rate table.
///
/// Empty cells store a rate of `0.0` (a commune that declares no figure
/// still participates in coverage accounting); unparseable cells are
/// dropped.
///
/// # Errors
///
/// Returns [`DatasetError`] when the file cannot be opened or its header
/// cannot be read.
pub fn load_commune_crimes(path: &Path) -> Result<CommuneCrimes, DatasetError> {
    let mut reader = open_reader(path)?;
    let header = read_header(&mut reader, path)?;
    let crime_types: Vec<String> = header.iter().skip(1).map(ToOwned::to_owned).collect();

    let mut table: CommuneCrimes = HashMap::new();
    let mut stats = LoadStats::default();

    for row in reader.records() {
        let Ok(record) = row else {
            stats.skip();
            continue;
        };

        if record.len() < header.len() {
            stats.skip();
            continue;
        }

        let code = strip_leading_zeros(&record[0]).to_owned();
        let rates = table.entry(code).or_default();

        for (i, crime_type) in crime_types.iter().enumerate() {
            let cell = &record[i + 1];
            let rate = if cell.is_empty() {
                0.0
            } else {
                match cell.parse::<f64>() {
                    Ok(rate) => rate,
                    Err(_) => continue,
                }
            };
            rates.insert(crime_type.clone(), rate);
        }
        stats.record();
    }

    stats.log("commune crimes dataset");
    Ok(table)
}

/// Loads the per-department reference crime table.
///
/// The second column is the department population; a row with an
/// unparseable population is skipped. Empty rate cells are not stored.
///
/// # Errors
///
/// Returns [`DatasetError`] when the file cannot be opened or its header
/// cannot be read.
pub fn load_department_crimes(
    path: &Path,
) -> Result<HashMap<String, DepartmentCrimes>, DatasetError> {
    let mut reader = open_reader(path)?;
    let header = read_header(&mut reader, path)?;
    let crime_types: Vec<String> = header.iter().skip(2).map(ToOwned::to_owned).collect();

    let mut table: HashMap<String, DepartmentCrimes> = HashMap::new();
    let mut stats = LoadStats::default();

    for row in reader.records() {
        let Ok(record) = row else {
            stats.skip();
            continue;
        };

        if record.len() < header.len() {
            stats.skip();
            continue;
        }

        let Ok(population) = record[1].parse::<f64>() else {
            stats.skip();
            continue;
        };

        let code = strip_leading_zeros(&record[0]).to_owned();
        let entry = table.entry(code).or_default();
        entry.population = population;

        for (i, crime_type) in crime_types.iter().enumerate() {
            let cell = &record[i + 2];
            if cell.is_empty() {
                continue;
            }
            if let Ok(rate) = cell.parse::<f64>() {
                entry.rates.insert(crime_type.clone(), rate);
            }
        }
        stats.record();
    }

    stats.log("department crimes dataset");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn commune_crimes_strip_leading_zeros_and_default_empty_cells() {
        let file = write_file(
            "CODGEO_2023;drug_usage;vehicle_theft\n07001;1.5;\n2A004;2.0;0.4\n",
        );
        let table = load_commune_crimes(file.path()).unwrap();

        let ardeche = &table["7001"];
        assert!((ardeche["drug_usage"] - 1.5).abs() < f64::EPSILON);
        assert!(ardeche["vehicle_theft"] == 0.0);

        assert!((table["2A004"]["drug_usage"] - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn commune_crimes_skip_short_rows() {
        let file = write_file("CODGEO_2023;drug_usage;vehicle_theft\n75056;1.0\n");
        let table = load_commune_crimes(file.path()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn department_crimes_carry_population_and_rates() {
        let file = write_file(
            "code;POP;drug_usage;vehicle_theft\n2A;340000;1.5;2.5\n075;2100000;3.0;\n",
        );
        let table = load_department_crimes(file.path()).unwrap();

        let corse = &table["2A"];
        assert!((corse.population - 340_000.0).abs() < f64::EPSILON);
        assert!((corse.rates["drug_usage"] - 1.5).abs() < f64::EPSILON);

        let paris = &table["75"];
        assert!(!paris.rates.contains_key("vehicle_theft"));
    }

    #[test]
    fn department_row_with_bad_population_is_skipped() {
        let file = write_file("code;POP;drug_usage\n75;not-a-number;1.0\n");
        assert!(load_department_crimes(file.path()).unwrap().is_empty());
    }
}
