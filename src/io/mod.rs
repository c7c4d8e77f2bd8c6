//! Filesystem output helpers and tabular index files

pub mod index_csv;
pub mod output;
