// Pima Indians diabetes dataset, as published for the 4Geeks decision tree tutorial.
// https://github.com/4GeeksAcademy/decision-tree-project-tutorial

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use duckdb::{params, AccessMode, Connection};
use log::info;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use crate::db::lib_download::download_text;
use crate::errors::DiabetesError;
use crate::utils::lib_duckdb::{decimal_at, open, table_columns};

pub const DATA_URL: &str =
    "https://raw.githubusercontent.com/4GeeksAcademy/decision-tree-project-tutorial/main/diabetes.csv";

pub const TABLE_NAME: &str = "diabetes_data";

const COLUMNS: [(&str, &str); 10] = [
    ("id", "INTEGER"),
    ("Pregnancies", "INTEGER"),
    ("Glucose", "INTEGER"),
    ("BloodPressure", "INTEGER"),
    ("SkinThickness", "INTEGER"),
    ("Insulin", "INTEGER"),
    ("BMI", "DECIMAL(3,1)"),
    ("DiabetesPedigreeFunction", "DECIMAL(4,3)"),
    ("Age", "INTEGER"),
    ("Outcome", "BOOLEAN"),
];

const TABLE_SCHEMA: &str = r#"(
    id INTEGER PRIMARY KEY,
    Pregnancies INTEGER,
    Glucose INTEGER,
    BloodPressure INTEGER,
    SkinThickness INTEGER,
    Insulin INTEGER,
    BMI DECIMAL(3,1),
    DiabetesPedigreeFunction DECIMAL(4,3),
    Age INTEGER,
    Outcome BOOLEAN
)"#;

/// One observation of the dataset.  Field names follow the CSV header.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiabetesRecord {
    pub pregnancies: i32,
    pub glucose: i32,
    pub blood_pressure: i32,
    pub skin_thickness: i32,
    pub insulin: i32,
    #[serde(rename = "BMI", deserialize_with = "de_decimal")]
    pub bmi: Decimal,
    #[serde(deserialize_with = "de_decimal")]
    pub diabetes_pedigree_function: Decimal,
    pub age: i32,
    #[serde(deserialize_with = "de_outcome")]
    pub outcome: bool,
}

fn de_decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    let s = String::deserialize(deserializer)?;
    Decimal::from_str(s.trim()).map_err(serde::de::Error::custom)
}

/// The outcome is published as 0/1.
fn de_outcome<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let s = String::deserialize(deserializer)?;
    match s.trim() {
        "0" | "false" | "False" => Ok(false),
        "1" | "true" | "True" => Ok(true),
        other => Err(serde::de::Error::custom(format!(
            "invalid outcome {:?}, expecting 0 or 1",
            other
        ))),
    }
}

/// Parse the raw CSV text.  The header row is required, a file with only
/// the header is an empty dataset.
pub fn read_csv(csv_data: &str) -> Result<Vec<DiabetesRecord>, DiabetesError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_data.as_bytes());
    if rdr.headers()?.is_empty() {
        return Err(DiabetesError::MissingHeader);
    }
    let records = rdr
        .deserialize()
        .collect::<Result<Vec<DiabetesRecord>, csv::Error>>()?;
    Ok(records)
}

#[derive(Debug, Clone)]
pub struct DiabetesArchive {
    pub url: String,
    pub base_dir: String,
    pub duckdb_path: String,
    pub timeout: Duration,
}

impl DiabetesArchive {
    /// An archive rooted at `base_dir`, with the database file next to the CSV.
    pub fn new(url: &str, base_dir: &str) -> DiabetesArchive {
        DiabetesArchive {
            url: url.to_string(),
            base_dir: base_dir.to_string(),
            duckdb_path: format!("{}/{}.duckdb", base_dir, TABLE_NAME),
            timeout: Duration::from_secs(20),
        }
    }

    /// Path of the raw CSV file.  Does not check if the file exists.
    pub fn filename(&self) -> String {
        format!("{}/{}.csv", self.base_dir, TABLE_NAME)
    }

    /// Get the dataset as text.  Nothing is written to disk.
    pub fn download_file(&self) -> Result<String, DiabetesError> {
        download_text(&self.url, self.timeout)
    }

    /// Overwrite the raw CSV file with `csv_data`.
    pub fn save_raw_csv(&self, csv_data: &str) -> Result<(), DiabetesError> {
        let path = self.filename();
        if let Some(dir) = Path::new(&path).parent() {
            fs::create_dir_all(dir).map_err(|e| DiabetesError::io(dir, e))?;
        }
        fs::write(&path, csv_data).map_err(|e| DiabetesError::io(&path, e))?;
        info!("saved raw csv to {}", path);
        Ok(())
    }

    pub fn read_raw_csv(&self) -> Result<String, DiabetesError> {
        let path = self.filename();
        fs::read_to_string(&path).map_err(|e| DiabetesError::io(&path, e))
    }

    /// Create the table if it doesn't exist yet.
    pub fn create_table(&self, conn: &Connection) -> Result<(), DiabetesError> {
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} {};",
            TABLE_NAME, TABLE_SCHEMA
        ))?;
        info!("table {} is ready in {}", TABLE_NAME, self.duckdb_path);
        Ok(())
    }

    /// Fail if the existing table doesn't have the expected columns.
    fn check_schema(&self, conn: &Connection) -> Result<(), DiabetesError> {
        let actual = table_columns(conn, TABLE_NAME)?;
        let matches = actual.len() == COLUMNS.len()
            && actual.iter().zip(COLUMNS.iter()).all(|((name, kind), (n, k))| {
                name.eq_ignore_ascii_case(n) && kind.eq_ignore_ascii_case(k)
            });
        if !matches {
            let found = actual
                .iter()
                .map(|(name, kind)| format!("{} {}", name, kind))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(DiabetesError::SchemaConflict {
                table: TABLE_NAME.to_string(),
                details: format!("found columns [{}]", found),
            });
        }
        Ok(())
    }

    /// Replace the contents of the table with the rows in `csv_data`.
    /// Return the number of rows written.
    ///
    /// The replacement runs in a single transaction.  If anything fails (an
    /// incompatible existing table, no header row, a malformed row, a database
    /// error) the
    /// previous contents of the table are left untouched.
    pub fn update_duckdb(&self, csv_data: &str) -> Result<usize, DiabetesError> {
        if let Some(dir) = Path::new(&self.duckdb_path).parent() {
            fs::create_dir_all(dir).map_err(|e| DiabetesError::io(dir, e))?;
        }
        let mut conn = Connection::open(&self.duckdb_path)?;
        self.create_table(&conn)?;
        self.check_schema(&conn)?;
        let records = read_csv(csv_data)?;

        let tx = conn.transaction()?;
        tx.execute_batch(&format!(
            "CREATE OR REPLACE TABLE {} {};",
            TABLE_NAME, TABLE_SCHEMA
        ))?;
        {
            let mut stmt = tx.prepare(&format!(
                r#"
INSERT INTO {} VALUES (
    ?, ?, ?, ?, ?, ?, CAST(? AS DECIMAL(3,1)), CAST(? AS DECIMAL(4,3)), ?, ?
);"#,
                TABLE_NAME
            ))?;
            for (i, record) in records.iter().enumerate() {
                stmt.execute(params![
                    i as i32 + 1,
                    record.pregnancies,
                    record.glucose,
                    record.blood_pressure,
                    record.skin_thickness,
                    record.insulin,
                    record.bmi.to_string(),
                    record.diabetes_pedigree_function.to_string(),
                    record.age,
                    record.outcome,
                ])?;
            }
        }
        tx.commit()?;

        info!(
            "wrote {} rows to table {} in {}",
            records.len(),
            TABLE_NAME,
            self.duckdb_path
        );
        Ok(records.len())
    }

    /// All the records in the table, keyed by the surrogate id.
    pub fn get_data(&self, conn: &Connection) -> Result<BTreeMap<i32, DiabetesRecord>, duckdb::Error> {
        let query = format!(
            r#"
SELECT
    id,
    Pregnancies,
    Glucose,
    BloodPressure,
    SkinThickness,
    Insulin,
    BMI,
    DiabetesPedigreeFunction,
    Age,
    Outcome
FROM {}
ORDER BY id;
    "#,
            TABLE_NAME
        );
        let mut stmt = conn.prepare(&query)?;
        let rows_iter = stmt.query_map([], |row| {
            let id: i32 = row.get(0)?;
            Ok((
                id,
                DiabetesRecord {
                    pregnancies: row.get(1)?,
                    glucose: row.get(2)?,
                    blood_pressure: row.get(3)?,
                    skin_thickness: row.get(4)?,
                    insulin: row.get(5)?,
                    bmi: decimal_at(row, 6)?,
                    diabetes_pedigree_function: decimal_at(row, 7)?,
                    age: row.get(8)?,
                    outcome: row.get(9)?,
                },
            ))
        })?;
        let rows = rows_iter.collect::<Result<BTreeMap<i32, DiabetesRecord>, _>>()?;
        Ok(rows)
    }

    /// Read the whole table from the database file.
    pub fn load_all(&self) -> Result<BTreeMap<i32, DiabetesRecord>, DiabetesError> {
        let read_error = |source| DiabetesError::Read {
            path: self.duckdb_path.clone().into(),
            source,
        };
        let conn = open(Path::new(&self.duckdb_path), AccessMode::ReadOnly).map_err(read_error)?;
        let rows = self.get_data(&conn).map_err(read_error)?;
        info!("loaded {} rows from {}", rows.len(), self.duckdb_path);
        Ok(rows)
    }
}
