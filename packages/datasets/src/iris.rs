//! IRIS zone dataset loader.
//!
//! The dataset is a fixed 119-column export: identity columns first, the
//! demographic attribute block, the zone polygon as a GeoJSON cell at
//! column 76 with its pre-computed area at 77, then the housing attribute
//! block. Attribute cells default to `0.0` when unparseable; rows without
//! a usable polygon are dropped.

use std::collections::HashMap;
use std::path::Path;

use geoscope_geometry::Polygon;
use geoscope_models::IrisZone;

use crate::reader::{open_reader, parse_float, read_header, LoadStats};
use crate::DatasetError;

/// Fixed dataset width.
const MIN_COLUMNS: usize = 119;

/// Column carrying the zone polygon GeoJSON.
const POLYGON_COLUMN: usize = 76;

/// Column carrying the pre-computed zone area.
const AREA_COLUMN: usize = 77;

/// Canonical attribute key for each dataset column.
///
/// `employees_number` appears twice in the export; the later column wins.
const ATTRIBUTE_COLUMNS: &[(usize, &str)] = &[
    (4, "population_total"),
    (5, "population_general_age_0002"),
    (6, "population_general_age_0305"),
    (7, "population_general_age_0610"),
    (8, "population_general_age_1117"),
    (9, "population_general_age_1824"),
    (10, "population_general_age_2539"),
    (11, "population_general_age_4054"),
    (12, "population_general_age_5564"),
    (13, "population_general_age_6579"),
    (14, "population_general_age_80P"),
    (15, "population_total_age_0014"),
    (16, "population_total_age_1529"),
    (17, "population_total_age_3044"),
    (18, "population_total_age_4559"),
    (19, "population_total_age_6074"),
    (20, "population_total_age_75P"),
    (21, "population_total_age_0019"),
    (22, "population_total_age_2064"),
    (23, "population_total_age_65P"),
    (24, "population_male"),
    (25, "population_male_age_0014"),
    (26, "population_male_age_1529"),
    (27, "population_male_age_3044"),
    (28, "population_male_age_4559"),
    (29, "population_male_age_6074"),
    (30, "population_male_age_75P"),
    (31, "population_male_age_0019"),
    (32, "population_male_age_2064"),
    (33, "population_male_age_65P"),
    (34, "population_female"),
    (35, "population_female_age_0014"),
    (36, "population_female_age_1529"),
    (37, "population_female_age_3044"),
    (38, "population_female_age_4559"),
    (39, "population_female_age_6074"),
    (40, "population_female_age_75P"),
    (41, "population_female_age_0019"),
    (42, "population_female_age_2064"),
    (43, "population_female_age_65P"),
    (44, "employees_number"),
    (45, "employees_category_1"),
    (46, "employees_category_2"),
    (47, "employees_category_3"),
    (48, "employees_category_4"),
    (49, "employees_category_5"),
    (50, "employees_category_6"),
    (51, "employees_category_7"),
    (52, "employees_category_8"),
    (53, "employees_male"),
    (54, "employees_male_category_1"),
    (55, "employees_male_category_2"),
    (56, "employees_male_category_3"),
    (57, "employees_male_category_4"),
    (58, "employees_male_category_5"),
    (59, "employees_male_category_6"),
    (60, "employees_male_category_7"),
    (61, "employees_male_category_8"),
    (62, "employees_female"),
    (63, "employees_female_category_1"),
    (64, "employees_female_category_2"),
    (65, "employees_female_category_3"),
    (66, "employees_female_category_4"),
    (67, "employees_female_category_5"),
    (68, "employees_female_category_6"),
    (69, "employees_female_category_7"),
    (70, "employees_female_category_8"),
    (71, "population_french"),
    (72, "population_foreign"),
    (73, "population_immigrant"),
    (74, "housing_people_per_home"),
    (75, "housing_people_in_collective_housing"),
    (78, "families_only_number"),
    (79, "families_with_kids"),
    (80, "families_monoparental"),
    (81, "families_without_kids"),
    (82, "families_with_1_kids_under_25"),
    (83, "families_with_2_kids_under_25"),
    (84, "families_with_3_kids_under_25"),
    (85, "families_with_4p_kids_under_25"),
    (86, "families_number"),
    (87, "families_one_person"),
    (88, "families_living_without_family"),
    (89, "families_living_with_family"),
    (90, "employees_number"),
    (91, "students_number"),
    (92, "housing_total"),
    (93, "housing_primary_residence"),
    (94, "housing_secondary_residence"),
    (95, "housing_empty_residence"),
    (96, "housing_houses"),
    (97, "housing_apartments"),
    (98, "housing_rooms_1_rooms"),
    (99, "housing_rooms_2_rooms"),
    (100, "housing_rooms_3_rooms"),
    (101, "housing_rooms_4_rooms"),
    (102, "housing_rooms_5p_rooms"),
    (103, "housing_houses_constructed_before_19"),
    (104, "housing_houses_constructed_19_45"),
    (105, "housing_houses_constructed_46_70"),
    (106, "housing_houses_constructed_71_90"),
    (107, "housing_houses_constructed_91_05"),
    (108, "housing_houses_constructed_06_17"),
    (109, "housing_moved_since_0_2_years"),
    (110, "housing_moved_since_2_4_years"),
    (111, "housing_moved_since_5_9_years"),
    (112, "housing_moved_since_10p_years"),
    (113, "housing_owners"),
    (114, "housing_renters"),
    (115, "housing_with_parkings"),
    (116, "housing_with_atleast_1_cars"),
    (117, "housing_with_1_cars"),
    (118, "housing_with_2p_cars"),
];

/// Streams every IRIS zone of the dataset.
///
/// # Errors
///
/// Returns [`DatasetError`] when the file cannot be opened or its header
/// cannot be read.
pub fn load_iris_zones(path: &Path) -> Result<Vec<IrisZone>, DatasetError> {
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

        let mut attributes = HashMap::with_capacity(ATTRIBUTE_COLUMNS.len());
        for &(column, key) in ATTRIBUTE_COLUMNS {
            attributes.insert(key, parse_float(&record[column]));
        }

        let total_population = attributes.get("population_total").copied().unwrap_or(0.0);

        zones.push(IrisZone {
            commune_code: record[1].to_owned(),
            polygon,
            area: parse_float(&record[AREA_COLUMN]),
            attributes,
            total_population,
        });
        stats.record();
    }

    stats.log("iris dataset");
    Ok(zones)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    const UNIT_SQUARE: &str = r#"{""type"":""Polygon"",""coordinates"":[[[0.0,0.0],[1.0,0.0],[1.0,1.0],[0.0,1.0],[0.0,0.0]]]}"#;

    fn iris_row(commune: &str, population: &str, polygon: &str) -> String {
        let mut cells = vec![String::new(); MIN_COLUMNS];
        cells[0] = "930560101".to_owned();
        cells[1] = commune.to_owned();
        cells[4] = population.to_owned();
        cells[92] = "450".to_owned();
        cells[POLYGON_COLUMN] = format!("\"{polygon}\"");
        cells[AREA_COLUMN] = "1.0".to_owned();
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

    #[test]
    fn loads_zone_with_attributes_and_polygon() {
        let file = write_fixture(&[iris_row("93056", "1000", UNIT_SQUARE)]);
        let zones = load_iris_zones(file.path()).unwrap();
        assert_eq!(zones.len(), 1);

        let zone = &zones[0];
        assert_eq!(zone.commune_code, "93056");
        assert!((zone.total_population - 1000.0).abs() < f64::EPSILON);
        assert!((zone.attributes["housing_total"] - 450.0).abs() < f64::EPSILON);
        assert!((zone.polygon.area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn drops_rows_without_a_polygon() {
        let mut bad = iris_row("93056", "1000", UNIT_SQUARE);
        bad = bad.replace(UNIT_SQUARE, "");
        let file = write_fixture(&[bad, iris_row("75056", "500", UNIT_SQUARE)]);
        let zones = load_iris_zones(file.path()).unwrap();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].commune_code, "75056");
    }

    #[test]
    fn unparseable_attribute_cells_default_to_zero() {
        let file = write_fixture(&[iris_row("93056", "not-a-number", UNIT_SQUARE)]);
        let zones = load_iris_zones(file.path()).unwrap();
        assert!(zones[0].total_population == 0.0);
    }

    #[test]
    fn later_duplicate_attribute_column_wins() {
        let mut cells: Vec<String> = iris_row("93056", "10", UNIT_SQUARE)
            .split(';')
            .map(ToOwned::to_owned)
            .collect();
        cells[44] = "7".to_owned();
        cells[90] = "9".to_owned();
        let file = write_fixture(&[cells.join(";")]);
        let zones = load_iris_zones(file.path()).unwrap();
        assert!((zones[0].attributes["employees_number"] - 9.0).abs() < f64::EPSILON);
    }
}
