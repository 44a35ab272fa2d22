pub mod lib_duckdb;
