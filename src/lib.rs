//! # tabscope - dataset profiling and data-quality scoring
//!
//! tabscope takes an in-memory tabular dataset and produces one immutable
//! [`DatasetProfile`](analyser::logic::DatasetProfile): inferred column types,
//! missing-value and duplicate analysis, numeric and categorical summaries, a
//! pairwise Pearson correlation matrix, per-column distributions with a
//! Shapiro-Wilk normality test, and a composite quality score.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tabscope::analyser::logic::{Profiler, load_csv};
//! use tabscope::config::ProfilerConfig;
//!
//! # fn example() -> tabscope::error::Result<()> {
//! let dataset = load_csv("data.csv".as_ref())?;
//! let profile = Profiler::new(ProfilerConfig::default()).profile(&dataset, "upload-42")?;
//!
//! println!(
//!     "{} rows, quality {:.1} ({})",
//!     profile.dataset_info.rows,
//!     profile.quality_assessment.overall_quality,
//!     profile.quality_assessment.quality_grade.as_str(),
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`analyser::logic`]: classification, analysers, scoring, report types
//! - [`session`]: explicit session store handing datasets to the profiler
//! - [`config`]: profiler tunables, loadable from JSON
//! - [`error`]: error taxonomy
//! - [`logging`]: `tracing` subscriber setup for binaries
//!
//! ## Data flow
//!
//! ```text
//! Dataset ─> classify ─┬─> missing / duplicates ─┐
//!                      ├─> categorical           │
//!                      ├─> numeric + correlation ├─> quality ─> DatasetProfile
//!                      └─> distribution          ┘
//! ```
//!
//! The four analysers read the classified dataset only and run in parallel on
//! the rayon pool.

#![warn(clippy::all, rust_2018_idioms)]

pub mod analyser;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod utils;
