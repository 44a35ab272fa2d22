use std::collections::BTreeMap;
use std::error::Error;

use diabetes_data::db::{diabetes::diabetes_archive::DiabetesRecord, prod_db::ProdDb};
use log::error;
use tabled::{builder::Builder, settings::Style};

const MAX_ROWS: usize = 10;

/// Make an ASCII table with the first rows of the data
fn ascii_table(data: &BTreeMap<i32, DiabetesRecord>) -> tabled::Table {
    let mut builder = Builder::new();
    builder.push_record(vec![
        "id",
        "Pregnancies",
        "Glucose",
        "BloodPressure",
        "SkinThickness",
        "Insulin",
        "BMI",
        "DiabetesPedigreeFunction",
        "Age",
        "Outcome",
    ]);
    for (id, r) in data.iter().take(MAX_ROWS) {
        builder.push_record(vec![
            id.to_string(),
            r.pregnancies.to_string(),
            r.glucose.to_string(),
            r.blood_pressure.to_string(),
            r.skin_thickness.to_string(),
            r.insulin.to_string(),
            r.bmi.to_string(),
            r.diabetes_pedigree_function.to_string(),
            r.age.to_string(),
            r.outcome.to_string(),
        ]);
    }
    let mut table = builder.build();
    table.with(Style::sharp());
    table
}

/// Print the head of the table and the outcome counts.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    let _ = dotenvy::dotenv();

    let archive = ProdDb::diabetes_from_env();
    let data = match archive.load_all() {
        Ok(data) => data,
        Err(e) => {
            error!("{}", e);
            return Ok(());
        }
    };

    println!("{}", ascii_table(&data));
    let positive = data.values().filter(|r| r.outcome).count();
    println!(
        "{} rows, {} with a positive outcome, {} with a negative outcome",
        data.len(),
        positive,
        data.len() - positive
    );

    Ok(())
}
