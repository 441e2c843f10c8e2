//! Dataset location configuration.
//!
//! Loaded once at startup: the data directory comes from the `DATA_DIR`
//! environment variable (default `./data`), and an optional `config.json`
//! in the working directory can override the individual file names. The
//! record is passed explicitly into the engine; no process-wide state.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// File names of the seven input datasets plus their base directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Base directory joined in front of every file name.
    #[serde(skip)]
    pub data_dir: PathBuf,
    pub business_data: String,
    pub competition_data: String,
    pub commune_crimes: String,
    pub department_crimes: String,
    pub iris_data: String,
    pub commune_data: String,
    pub qp_data: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            business_data: "StockEtablissement_open_only_and_geo_and_names.csv".to_owned(),
            competition_data: "chiffres-cles-2024.csv".to_owned(),
            commune_crimes: "crimes_per_commune.csv".to_owned(),
            department_crimes: "dep-indexed-crime-data.csv".to_owned(),
            iris_data: "iris-data-with-polygon-coord-standard-with-area-and-calculations.csv"
                .to_owned(),
            commune_data: "full_commune_from_iris-05092024.csv".to_owned(),
            qp_data: "final_special_zones-06092024.csv".to_owned(),
        }
    }
}

impl DataConfig {
    /// Resolves the configuration from the environment and the optional
    /// `config.json` override file.
    #[must_use]
    pub fn load() -> Self {
        let mut config = std::fs::File::open("config.json")
            .ok()
            .and_then(|file| match serde_json::from_reader::<_, Self>(file) {
                Ok(config) => Some(config),
                Err(err) => {
                    log::warn!("ignoring malformed config.json: {err}");
                    None
                }
            })
            .unwrap_or_default();

        if let Ok(dir) = std::env::var("DATA_DIR") {
            if !dir.is_empty() {
                config.data_dir = PathBuf::from(dir);
            }
        }

        config
    }

    fn path_of(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    #[must_use]
    pub fn business_path(&self) -> PathBuf {
        self.path_of(&self.business_data)
    }

    #[must_use]
    pub fn competition_path(&self) -> PathBuf {
        self.path_of(&self.competition_data)
    }

    #[must_use]
    pub fn commune_crimes_path(&self) -> PathBuf {
        self.path_of(&self.commune_crimes)
    }

    #[must_use]
    pub fn department_crimes_path(&self) -> PathBuf {
        self.path_of(&self.department_crimes)
    }

    #[must_use]
    pub fn iris_path(&self) -> PathBuf {
        self.path_of(&self.iris_data)
    }

    #[must_use]
    pub fn commune_path(&self) -> PathBuf {
        self.path_of(&self.commune_data)
    }

    #[must_use]
    pub fn qp_path(&self) -> PathBuf {
        self.path_of(&self.qp_data)
    }

    /// Every configured dataset path with a short label, for startup
    /// existence checks.
    #[must_use]
    pub fn all_paths(&self) -> Vec<(&'static str, PathBuf)> {
        vec![
            ("business", self.business_path()),
            ("competition", self.competition_path()),
            ("commune crimes", self.commune_crimes_path()),
            ("department crimes", self.department_crimes_path()),
            ("iris", self.iris_path()),
            ("commune", self.commune_path()),
            ("qp", self.qp_path()),
        ]
    }

    /// Convenience constructor pointing every file at `dir` with the
    /// default names.
    #[must_use]
    pub fn with_data_dir(dir: &Path) -> Self {
        Self {
            data_dir: dir.to_path_buf(),
            ..Self::default()
        }
    }
}
