use std::path::Path;

use duckdb::{
    types::{Type, ValueRef},
    AccessMode, Config, Connection, Row,
};
use rust_decimal::Decimal;

/// Open a DuckDB connection with the given access mode.  A read-only open of
/// a file that does not exist fails instead of creating an empty database.
pub fn open(duckdb_path: &Path, access_mode: AccessMode) -> Result<Connection, duckdb::Error> {
    let config = Config::default().access_mode(access_mode)?;
    Connection::open_with_flags(duckdb_path, config)
}

/// Get a DECIMAL column as a [`Decimal`].
pub fn decimal_at(row: &Row, idx: usize) -> Result<Decimal, duckdb::Error> {
    match row.get_ref(idx)? {
        ValueRef::Decimal(v) => Ok(v),
        _ => Err(duckdb::Error::InvalidColumnType(
            idx,
            "DECIMAL".to_string(),
            Type::Decimal,
        )),
    }
}

/// Column names and types of a table, in ordinal order.  Empty if the table
/// doesn't exist.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<(String, String)>, duckdb::Error> {
    let mut stmt = conn.prepare(
        r#"
SELECT column_name, data_type
FROM information_schema.columns
WHERE table_name = ?
ORDER BY ordinal_position;
    "#,
    )?;
    let columns = stmt
        .query_map([table], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<(String, String)>, _>>()?;
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn read_decimal() -> Result<(), Box<dyn Error>> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(
            r#"
CREATE TABLE test (
    name VARCHAR NOT NULL,
    price DECIMAL(9,4),
);
INSERT INTO test VALUES ('meat', 3.99);
    "#,
        )?;
        let mut stmt = conn.prepare("SELECT name, price FROM test")?;
        let prices = stmt
            .query_map([], |row| decimal_at(row, 1))?
            .collect::<Result<Vec<Decimal>, _>>()?;
        assert_eq!(prices, vec![dec!(3.99)]);

        let mut stmt = conn.prepare("SELECT price, name FROM test")?;
        let res: Result<Vec<Decimal>, _> = stmt.query_map([], |row| decimal_at(row, 1))?.collect();
        assert!(res.is_err());
        Ok(())
    }

    #[test]
    fn columns_of_table() -> Result<(), Box<dyn Error>> {
        let conn = Connection::open_in_memory()?;
        assert!(table_columns(&conn, "test")?.is_empty());
        conn.execute_batch("CREATE TABLE test (name VARCHAR, price DECIMAL(9,4));")?;
        let columns = table_columns(&conn, "test")?;
        assert_eq!(
            columns,
            vec![
                ("name".to_string(), "VARCHAR".to_string()),
                ("price".to_string(), "DECIMAL(9,4)".to_string()),
            ]
        );
        Ok(())
    }
}
