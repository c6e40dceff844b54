//! The profiling engine.
//!
//! [`logic`] holds the pure analysis code: ingestion, column classification,
//! the four analysers, quality scoring and report assembly.

pub mod logic;
