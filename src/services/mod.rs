//! Core services for extraction, catalog lookup, and dataset bookkeeping

pub mod catalog;
pub mod dictionary;
pub mod extract;
pub mod fetch;
pub mod index;
pub mod manifest;
pub mod sample;
