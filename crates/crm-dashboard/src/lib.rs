pub mod config;
pub mod error;
pub mod leads;
pub mod presentation;
pub mod reports;
pub mod store;
pub mod telemetry;
pub mod views;
