//! Centralized error handling for tabscope.
//!
//! Profiling distinguishes two kinds of failure:
//!
//! - **Input errors** ([`InputError`]) mean there is nothing sensible to profile:
//!   no rows, no columns, an unknown session, or a malformed grid. They are
//!   returned to the caller immediately and no report is produced.
//! - **Column-level problems** (too few values for a test, zero variance,
//!   non-finite arithmetic) are *not* errors. The affected statistic is
//!   reported as `None` or a documented sentinel and the run carries on.
//!
//! Everything else ([`ProfileError::Io`], [`ProfileError::Csv`], ...) comes from the
//! edges of the crate (reading files, parsing configuration) or from polars
//! rejecting a column computation.
//!
//! ```
//! use tabscope::error::{InputError, ProfileError};
//!
//! fn describe(err: &ProfileError) -> &'static str {
//!     match err {
//!         ProfileError::Input(InputError::EmptyDataset) => "nothing to profile",
//!         ProfileError::Input(_) => "bad input",
//!         _ => "infrastructure failure",
//!     }
//! }
//! # assert_eq!(describe(&InputError::EmptyDataset.into()), "nothing to profile");
//! ```

use thiserror::Error;

/// The caller handed us something that cannot be profiled.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("dataset has no rows")]
    EmptyDataset,

    #[error("dataset has no columns")]
    NoColumns,

    #[error("no dataset registered for session '{0}'")]
    SessionNotFound(String),

    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),

    #[error("row {row} has {found} values but the header has {expected} columns")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("target column '{0}' does not exist")]
    UnknownTarget(String),
}

/// Main error type for tabscope operations.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dataframe error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ProfileError {
    /// True for failures the caller caused by handing over unusable input.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Input(_))
    }
}

/// Result type alias for tabscope operations.
pub type Result<T> = std::result::Result<T, ProfileError>;
