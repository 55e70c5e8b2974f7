//! This crate contains the code that makes the auction core observable:
//! initialization logic for logging and the metrics registry shared by all
//! components.
pub mod metrics;
pub mod tracing;
