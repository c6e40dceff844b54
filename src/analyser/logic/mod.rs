pub mod analysis;
pub mod categorical;
pub mod classify;
pub mod dataset;
pub mod distribution;
pub mod frame;
pub mod health;
pub mod interpretation;
pub mod io;
pub mod missing;
pub mod normality;
pub mod numeric;
pub mod types;

pub use analysis::{Profiler, profile_dataset};
pub use classify::{ClassifiedColumn, ClassifiedDataset, ParsedValue, classify_dataset};
pub use dataset::{Dataset, RawValue};
pub use health::assess_quality;
pub use interpretation::CardinalityHint;
pub use io::{load_csv, read_csv};
pub use types::{
    CategoricalSummary, ColumnKind, ColumnProfile, CorrelationMatrix, DatasetProfile,
    DistributionProfile, NormalityStatus, NormalityTest, QualityAssessment, QualityGrade,
};
