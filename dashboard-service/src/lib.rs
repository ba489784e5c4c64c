pub mod ingest;
pub mod config;
pub mod sources;
pub mod store;
pub mod observability;
pub mod web;

pub use ingest::{IngestError, MeasurementSource};
