//! Shadow-hour efficiency audit and report health scoring for pipeline
//! construction inspection reports.

pub mod audit;
pub mod config;
pub mod error;
pub mod health;
pub mod ingest;
pub mod lint;
pub mod portfolio;
pub mod report;
pub mod types;
pub mod verification;
