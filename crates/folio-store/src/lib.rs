//! Persistence adapters for Folio.

pub mod json_file_store;
