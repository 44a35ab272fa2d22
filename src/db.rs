pub mod diabetes;
pub mod lib_download;
pub mod prod_db;
