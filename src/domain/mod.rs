//! Core domain types and logic.

pub mod price_series;
pub mod signal;
pub mod simulation;
pub mod derived;
pub mod report;
pub mod metrics;
pub mod config_validation;
pub mod error;
