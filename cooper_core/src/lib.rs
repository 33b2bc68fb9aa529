#![forbid(unsafe_code)]

//! Core domain model and evaluation logic for Cooper Pro.
//!
//! This crate provides:
//! - Domain types (students, classifications, training zones, test records)
//! - Form input validation
//! - The VO2 max metrics calculator
//! - Evaluation form state and the submit contract
//! - Persistence (roster, JSONL test log, CSV export)

pub mod types;
pub mod error;
pub mod measurement;
pub mod classification;
pub mod calculator;
pub mod form;
pub mod config;
pub mod logging;
pub mod sink;
pub mod roster;
pub mod history;
pub mod csv_export;
pub mod format;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use calculator::{compute_metrics, metrics_for};
pub use config::Config;
pub use form::EvaluationForm;
pub use measurement::{Field, FieldError, Measurement, RawMeasurement, ValidationErrors};
pub use roster::Roster;
pub use sink::{read_records, read_records_for, JsonlSink, TestSink};
