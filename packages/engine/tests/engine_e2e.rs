//! End-to-end engine scenarios over fixture datasets.
//!
//! Each test materialises the seven CSV files in a temporary data
//! directory with the default file names and drives the engine through its
//! public entry points.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use geoscope_datasets::DataConfig;
use geoscope_engine::{CancelToken, Engine, EngineError};
use geoscope_models::Business;

/// GeoJSON for an axis-aligned rectangle.
fn square_geojson(x0: f64, y0: f64, x1: f64, y1: f64) -> String {
    format!(
        r#"{{"type":"Polygon","coordinates":[[[{x0},{y0}],[{x1},{y0}],[{x1},{y1}],[{x0},{y1}],[{x0},{y0}]]]}}"#
    )
}

/// The same rectangle as a quoted CSV cell (embedded quotes doubled).
fn square_cell(x0: f64, y0: f64, x1: f64, y1: f64) -> String {
    format!("\"{}\"", square_geojson(x0, y0, x1, y1).replace('"', "\"\""))
}

struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        // Every dataset exists and is empty by default; tests overwrite the
        // ones they care about.
        let config = fixture.config();
        for (_, path) in config.all_paths() {
            fs::write(&path, "header\n").unwrap();
        }
        fixture
    }

    fn config(&self) -> DataConfig {
        DataConfig::with_data_dir(self.dir.path())
    }

    fn engine(&self) -> Engine {
        Engine::new(self.config())
    }

    fn write(&self, path: &Path, content: &str) {
        fs::write(path, content).unwrap();
    }

    /// 30-column business dataset; rows are (name, siret, naf, lng, lat).
    /// The width keeps the tail-addressed columns clear of the address
    /// block.
    fn write_businesses(&self, rows: &[(&str, &str, &str, f64, f64)]) {
        let mut content = format!(
            "{}\n",
            (0..30).map(|i| format!("c{i}")).collect::<Vec<_>>().join(";")
        );
        for &(name, siret, naf, lng, lat) in rows {
            let mut cells = vec![String::new(); 30];
            cells[0] = name.to_owned();
            cells[1] = siret.to_owned();
            cells[13] = "4".to_owned();
            cells[18] = "RUE DU TEST".to_owned();
            cells[25] = naf.to_owned();
            cells[28] = lng.to_string();
            cells[29] = lat.to_string();
            let _ = writeln!(content, "{}", cells.join(";"));
        }
        self.write(&self.config().business_path(), &content);
    }

    /// 119-column IRIS dataset; rows are (commune code, population, polygon
    /// cell).
    fn write_iris(&self, rows: &[(&str, f64, String)]) {
        let mut content = format!(
            "{}\n",
            (0..119).map(|i| format!("c{i}")).collect::<Vec<_>>().join(";")
        );
        for (commune, population, polygon) in rows {
            let mut cells = vec![String::new(); 119];
            cells[1] = (*commune).to_owned();
            cells[4] = population.to_string();
            cells[92] = "450".to_owned();
            cells[76] = polygon.clone();
            cells[77] = "1.0".to_owned();
            let _ = writeln!(content, "{}", cells.join(";"));
        }
        self.write(&self.config().iris_path(), &content);
    }

    /// 12-column commune dataset; rows are (code, population, surface,
    /// polygon cell, income).
    fn write_communes(&self, rows: &[(&str, f64, f64, String, &str)]) {
        let mut content =
            "code;population;polygon;a;b;c;postal;name;surface;d;income;e\n".to_owned();
        for (code, population, surface, polygon, income) in rows {
            let _ = writeln!(
                content,
                "{code};{population};{polygon};;;;75002;Commune {code};{surface};;{income};"
            );
        }
        self.write(&self.config().commune_path(), &content);
    }

    fn write_commune_crimes(&self, content: &str) {
        self.write(&self.config().commune_crimes_path(), content);
    }

    fn write_department_crimes(&self, content: &str) {
        self.write(&self.config().department_crimes_path(), content);
    }

    /// 8-column QP dataset; rows are (code, label, commune, polygon cell).
    fn write_special_zones(&self, rows: &[(&str, &str, &str, String)]) {
        let mut content = "id;code;label;commune;a;b;polygon;c\n".to_owned();
        for (i, (code, label, commune, polygon)) in rows.iter().enumerate() {
            let _ = writeln!(content, "{i};{code};{label};{commune};;;{polygon};");
        }
        self.write(&self.config().qp_path(), &content);
    }

    /// 40-column financials dataset; rows are (siren, nic, publication,
    /// [ca1, ca2, ca3], [range1, range2, range3]).
    fn write_financials(&self, rows: &[(&str, &str, &str, [&str; 3], [&str; 3])]) {
        let mut content = format!(
            "{}\n",
            (0..40).map(|i| format!("c{i}")).collect::<Vec<_>>().join(";")
        );
        for &(siren, nic, publication, ca, ranges) in rows {
            let mut cells = vec![String::new(); 40];
            cells[0] = "SARL Exemple".to_owned();
            cells[1] = siren.to_owned();
            cells[2] = nic.to_owned();
            cells[17] = "48.86,2.33".to_owned();
            cells[18] = publication.to_owned();
            cells[22] = ca[0].to_owned();
            cells[28] = ca[1].to_owned();
            cells[34] = ca[2].to_owned();
            cells[37] = ranges[0].to_owned();
            cells[38] = ranges[1].to_owned();
            cells[39] = ranges[2].to_owned();
            let _ = writeln!(content, "{}", cells.join(";"));
        }
        self.write(&self.config().competition_path(), &content);
    }
}

fn business(siret: &str, naf: &str) -> Business {
    Business {
        name: "SARL Exemple".to_owned(),
        siret: siret.to_owned(),
        naf_code: naf.to_owned(),
        latitude: 48.86,
        longitude: 2.33,
        address: String::new(),
    }
}

#[test]
fn search_returns_matching_businesses_inside_the_polygon() {
    let fixture = Fixture::new();
    fixture.write_businesses(&[
        ("Chez Marcel", "11111111100001", "56.30Z", 2.32, 48.87),
        ("Bar des Amis", "22222222200002", "56.30Z", 2.34, 48.88),
        ("Trop Loin", "33333333300003", "56.30Z", 2.50, 48.95),
        ("Superette", "44444444400004", "47.11F", 2.32, 48.87),
    ]);

    let polygon = square_geojson(2.30, 48.85, 2.35, 48.90);
    let results = fixture.engine().search(&polygon, "56.30Z", false).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].name, "Chez Marcel");
    assert_eq!(results[1].name, "Bar des Amis");
    assert!(results.iter().all(|b| b.naf_code == "56.30Z"));
    assert_eq!(results[0].address, "4 RUE DU TEST");
}

#[test]
fn search_with_no_match_returns_an_empty_list() {
    let fixture = Fixture::new();
    fixture.write_businesses(&[("Chez Marcel", "111", "56.30Z", 2.32, 48.87)]);

    let polygon = square_geojson(5.0, 45.0, 5.1, 45.1);
    let results = fixture.engine().search(&polygon, "56.30Z", false).unwrap();
    assert!(results.is_empty());
}

#[test]
fn search_rejects_non_polygon_geometry() {
    let fixture = Fixture::new();
    let err = fixture
        .engine()
        .search(r#"{"type":"Point","coordinates":[2.0,48.0]}"#, "56.30Z", false)
        .unwrap_err();
    assert!(matches!(err, EngineError::Unsupported(_)));
}

#[test]
fn aggregation_over_a_zone_equal_to_the_polygon() {
    let fixture = Fixture::new();
    fixture.write_iris(&[("75056", 1000.0, square_cell(2.30, 48.85, 2.35, 48.90))]);
    fixture.write_communes(&[(
        "75056",
        1000.0,
        10.0,
        square_cell(2.30, 48.85, 2.35, 48.90),
        "30000",
    )]);
    fixture.write_commune_crimes("CODGEO_2023;drug_usage\n75056;2.0\n");
    fixture.write_department_crimes("code;POP;drug_usage\n75;1000;1.5\n");
    fixture.write_special_zones(&[(
        "QP075001",
        "Exemple",
        "Paris",
        square_cell(2.31, 48.86, 2.34, 48.89),
    )]);

    let polygon = square_geojson(2.30, 48.85, 2.35, 48.90);
    let response = fixture
        .engine()
        .aggregate(&polygon, &CancelToken::new())
        .unwrap();

    // The zone contributes with factor 1.
    assert_eq!(response.total_population, 1000);
    assert_eq!(response.data["population_total"], 1000);
    assert_eq!(response.data["housing_total"], 450);

    // The commune covers the polygon fully; its postal code mirrors it.
    assert_eq!(response.administrative.communes.len(), 1);
    let commune = &response.administrative.communes[0];
    assert_eq!(commune.commune_code, "75056");
    assert!((commune.percentage - 100.0).abs() < 1e-9);
    assert_eq!(response.administrative.postal_codes[0].postal_code, "75002");

    // The QP lies inside the polygon.
    assert_eq!(response.administrative.special_zones.len(), 1);
    assert!((response.administrative.special_zones[0].percentage - 100.0).abs() < 1e-9);

    // drug_usage: area rate 2.0 vs departmental 1.5 -> +33.33%.
    let drug_usage = response.criminality.drug_usage.as_ref().unwrap();
    assert!((drug_usage.crimes_total - 2.0).abs() < 1e-9);
    assert!((drug_usage.percentage_relative_to_departmental - 33.333_333_333).abs() < 1e-6);

    // Every included commune declared an income.
    let income = response.median_income.as_ref().unwrap();
    assert!((income.value - 30_000.0).abs() < 1e-9);
    assert!(income.is_total);
}

#[test]
fn aggregation_weights_half_overlapping_zones() {
    let fixture = Fixture::new();
    fixture.write_iris(&[
        ("75056", 100.0, square_cell(-1.0, 0.0, 1.0, 1.0)),
        ("75056", 200.0, square_cell(1.0, 0.0, 3.0, 1.0)),
    ]);
    fixture.write_communes(&[(
        "75056",
        300.0,
        10.0,
        square_cell(0.0, 0.0, 2.0, 1.0),
        "",
    )]);
    fixture.write_commune_crimes("CODGEO_2023;drug_usage\n");
    fixture.write_department_crimes("code;POP;drug_usage\n");

    let polygon = square_geojson(0.0, 0.0, 2.0, 1.0);
    let response = fixture
        .engine()
        .aggregate(&polygon, &CancelToken::new())
        .unwrap();

    // Each zone overlaps at 50%: 0.5 * 100 + 0.5 * 200.
    assert_eq!(response.data["population_total"], 150);
    assert_eq!(response.total_population, 150);

    // No income declared anywhere.
    assert!(response.median_income.is_none());
    assert!(response.criminality.drug_usage.is_none());
}

#[test]
fn aggregation_is_invariant_under_zone_row_order() {
    let polygon = square_geojson(0.0, 0.0, 2.0, 1.0);
    let zones = [
        ("75056", 100.0, square_cell(-1.0, 0.0, 1.0, 1.0)),
        ("93056", 200.0, square_cell(1.0, 0.0, 3.0, 1.0)),
        ("13055", 400.0, square_cell(0.5, 0.0, 1.5, 1.0)),
    ];

    let run = |order: &[usize]| {
        let fixture = Fixture::new();
        let rows: Vec<(&str, f64, String)> = order.iter().map(|&i| zones[i].clone()).collect();
        fixture.write_iris(&rows);
        fixture.write_commune_crimes("CODGEO_2023;drug_usage\n");
        fixture.write_department_crimes("code;POP;drug_usage\n");
        fixture
            .engine()
            .aggregate(&polygon, &CancelToken::new())
            .unwrap()
    };

    let forward = run(&[0, 1, 2]);
    let reversed = run(&[2, 1, 0]);

    assert_eq!(forward.data, reversed.data);
    assert_eq!(forward.total_population, reversed.total_population);
    // 0.5 * 100 + 0.5 * 200 + 1.0 * 400.
    assert_eq!(forward.total_population, 550);
}

#[test]
fn aggregation_with_no_intersecting_zone_is_an_error() {
    let fixture = Fixture::new();
    fixture.write_iris(&[("75056", 1000.0, square_cell(2.30, 48.85, 2.35, 48.90))]);

    let polygon = square_geojson(7.0, 43.0, 7.1, 43.1);
    let err = fixture
        .engine()
        .aggregate(&polygon, &CancelToken::new())
        .unwrap_err();
    assert!(matches!(err, EngineError::NoIntersection));
}

#[test]
fn cancelled_token_aborts_the_zone_pass() {
    let fixture = Fixture::new();
    fixture.write_iris(&[("75056", 1000.0, square_cell(2.30, 48.85, 2.35, 48.90))]);

    let cancel = CancelToken::new();
    cancel.cancel();

    let polygon = square_geojson(2.30, 48.85, 2.35, 48.90);
    let err = fixture.engine().aggregate(&polygon, &cancel).unwrap_err();
    assert!(matches!(err, EngineError::Cancelled));
}

#[test]
fn competition_classifies_trends_and_bands() {
    let fixture = Fixture::new();
    fixture.write_financials(&[
        ("111111111", "00001", "2024-01-01", ["300", "200", "100"], ["A", "", ""]),
        ("222222222", "00002", "2024-01-01", ["900", "500", "400"], ["B", "", ""]),
        ("333333333", "00003", "2024-01-01", ["100", "200", "300"], ["B", "", ""]),
        ("444444444", "00004", "2024-01-01", ["100", "", "300"], ["C", "", ""]),
    ]);

    let businesses = [
        business("11111111100001", "56.30Z"),
        business("22222222200002", "56.30Z"),
        business("33333333300003", "56.30Z"),
        business("44444444400004", "56.30Z"),
    ];
    let response = fixture.engine().competition(&businesses).unwrap();

    assert_eq!(response.naf_codes.len(), 1);
    let group = &response.naf_codes[0];
    assert_eq!(group.naf_code, "56.30Z");
    assert_eq!(group.number_of_competitors, 4);

    let stats = &group.competition_stats;
    assert_eq!(stats.num_competitors_with_consistent_increase, 2);
    assert_eq!(stats.num_competitors_with_consistent_decrease, 1);
    assert_eq!(stats.num_competitors_with_mixed_trend, 0);
    assert!(!stats.old_data_used);

    assert_eq!(stats.num_competitors_with_a_status, 1);
    assert_eq!(stats.num_competitors_with_b_status, 2);
    assert_eq!(stats.num_competitors_with_c_status, 1);

    // CA1 declared by all four: mean(300, 900, 100, 100) = 350.
    assert!((stats.competitors_average_ca_last_year - 350.0).abs() < f64::EPSILON);
    assert!((stats.percentage_competitors_with_declared_ca_last_year - 100.0).abs() < 1e-9);
    // CA2 declared by three of four.
    assert!((stats.percentage_competitors_with_declared_ca_2_years_ago - 75.0).abs() < 1e-9);

    // The overall record mirrors the single group here.
    assert_eq!(response.averages.num_competitors_with_consistent_increase, 2);
    assert_eq!(response.averages.ca_array_last_year.len(), 4);
}

#[test]
fn competition_prefers_the_most_recent_publication() {
    let fixture = Fixture::new();
    fixture.write_financials(&[
        ("111111111", "00001", "2023-01-01", ["100", "", ""], ["A", "", ""]),
        ("111111111", "00001", "2024-01-01", ["500", "", ""], ["E", "", ""]),
    ]);

    let businesses = [business("11111111100001", "56.30Z")];
    let response = fixture.engine().competition(&businesses).unwrap();

    let stats = &response.naf_codes[0].competition_stats;
    assert_eq!(stats.num_competitors_with_e_status, 1);
    assert_eq!(stats.num_competitors_with_a_status, 0);
    assert_eq!(stats.ca_array_last_year, vec![500.0]);
}
