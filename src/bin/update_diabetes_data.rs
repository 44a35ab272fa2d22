use std::error::Error;

use diabetes_data::db::prod_db::ProdDb;
use log::{error, info};

/// Download the dataset, keep a raw copy and reload the DuckDB table.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    if let Err(e) = dotenvy::dotenv() {
        info!("no .env file loaded: {}", e);
    }

    let archive = ProdDb::diabetes_from_env();

    // nothing to save or load without the data
    let csv_data = match archive.download_file() {
        Ok(data) => data,
        Err(e) => {
            error!("{}", e);
            return Ok(());
        }
    };

    match archive.save_raw_csv(&csv_data) {
        Ok(_) => info!("Saved raw file successfully"),
        Err(e) => error!("{}", e),
    }

    match archive.update_duckdb(&csv_data) {
        Ok(n) => info!("{} rows were written", n),
        Err(e) => error!("{}", e),
    }

    Ok(())
}
