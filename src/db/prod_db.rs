use std::env;

use super::diabetes::diabetes_archive::{DiabetesArchive, DATA_URL};

pub struct ProdDb {}

impl ProdDb {
    /// Files live in `data/raw` under the project root.
    pub fn diabetes() -> DiabetesArchive {
        DiabetesArchive::new(
            DATA_URL,
            concat!(env!("CARGO_MANIFEST_DIR"), "/data/raw"),
        )
    }

    /// Same as [`ProdDb::diabetes`] but `DIABETES_DATA_DIR`, if set, replaces
    /// the base directory.
    pub fn diabetes_from_env() -> DiabetesArchive {
        match env::var("DIABETES_DATA_DIR") {
            Ok(dir) if !dir.is_empty() => DiabetesArchive::new(DATA_URL, &dir),
            _ => ProdDb::diabetes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prod_paths() {
        let archive = ProdDb::diabetes();
        assert!(archive.filename().ends_with("/data/raw/diabetes_data.csv"));
        assert!(archive.duckdb_path.ends_with("/data/raw/diabetes_data.duckdb"));
        assert_eq!(archive.url, DATA_URL);
        assert_eq!(archive.timeout.as_secs(), 20);
    }
}
