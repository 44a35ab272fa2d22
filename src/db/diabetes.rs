pub mod diabetes_archive;
