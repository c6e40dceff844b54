use crate::error::{ProfileError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "profiler.json";

/// Tunables for a profiling run.
///
/// The quality-score weights and grade cutoffs are fixed and deliberately not
/// part of this struct, so scores stay comparable between deployments.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProfilerConfig {
    /// Size of the per-column frequency table for categorical columns
    pub top_n_values: usize,
    /// Tukey fence multiplier applied to the IQR
    pub iqr_multiplier: f64,
    /// Columns with fewer non-null values report zero outliers
    pub min_outlier_samples: usize,
    /// Smallest sample the Shapiro-Wilk test is run on
    pub normality_min_samples: usize,
    /// Largest sample the Shapiro-Wilk test is run on
    pub normality_max_samples: usize,
    /// A column is reported normal when the p-value exceeds this
    pub normality_alpha: f64,
    /// |r| above which a column pair is listed as a significant correlation
    pub significant_correlation: f64,
    /// |r| against the target above which a feature is flagged as potential leakage
    pub leakage_correlation: f64,
    /// Number of sample values kept per column
    pub sample_values: usize,
    /// unique / rows above which a column is flagged high-cardinality
    pub high_cardinality_ratio: f64,
    /// Share of non-null values held by the most common value at or above which
    /// a column is flagged constant. 1.0 flags only single-valued columns.
    pub constant_ratio: f64,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            top_n_values: 10,
            iqr_multiplier: 1.5,
            min_outlier_samples: 4,
            normality_min_samples: 3,
            normality_max_samples: 5000,
            normality_alpha: 0.05,
            significant_correlation: 0.3,
            leakage_correlation: 0.95,
            sample_values: 5,
            high_cardinality_ratio: 0.9,
            constant_ratio: 1.0,
        }
    }
}

impl ProfilerConfig {
    /// # Errors
    ///
    /// Returns [`ProfileError::Config`] describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        if self.top_n_values == 0 {
            return Err(ProfileError::Config(
                "top_n_values must be at least 1".to_owned(),
            ));
        }
        if !(self.iqr_multiplier.is_finite() && self.iqr_multiplier > 0.0) {
            return Err(ProfileError::Config(
                "iqr_multiplier must be a positive number".to_owned(),
            ));
        }
        if self.normality_min_samples < 3 || self.normality_max_samples < self.normality_min_samples {
            return Err(ProfileError::Config(format!(
                "normality sample range {}..={} is invalid (minimum is 3)",
                self.normality_min_samples, self.normality_max_samples
            )));
        }
        if !(self.normality_alpha > 0.0 && self.normality_alpha < 1.0) {
            return Err(ProfileError::Config(
                "normality_alpha must lie strictly between 0 and 1".to_owned(),
            ));
        }
        for (name, value) in [
            ("significant_correlation", self.significant_correlation),
            ("leakage_correlation", self.leakage_correlation),
            ("high_cardinality_ratio", self.high_cardinality_ratio),
            ("constant_ratio", self.constant_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ProfileError::Config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Reads and validates a config file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, is not valid JSON, or holds invalid settings.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Fails if the parent directory cannot be created or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// `<config dir>/tabscope/profiler.json`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tabscope").join(CONFIG_FILE_NAME))
}

/// Loads the profiler config, falling back to defaults.
///
/// An explicit path must exist and parse. The default location is optional:
/// a missing or unreadable file there yields [`ProfilerConfig::default`].
///
/// # Errors
///
/// Only fails for an explicitly requested file.
pub fn load_config(explicit: Option<&Path>) -> Result<ProfilerConfig> {
    if let Some(path) = explicit {
        return ProfilerConfig::from_file(path);
    }

    if let Some(path) = default_config_path()
        && path.exists()
    {
        match ProfilerConfig::from_file(&path) {
            Ok(config) => return Ok(config),
            Err(e) => {
                tracing::warn!("Ignoring config at {}: {e}", path.display());
            }
        }
    }

    Ok(ProfilerConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ProfilerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{ "top_n_values": 3 }"#)?;

        let config = load_config(Some(&path))?;
        assert_eq!(config.top_n_values, 3);
        assert_eq!(config.normality_max_samples, 5000);
        Ok(())
    }

    #[test]
    fn test_invalid_values_rejected() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{ "normality_alpha": 1.5 }"#)?;

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ProfileError::Config(_)), "got {err:?}");
        Ok(())
    }

    #[test]
    fn test_save_and_reload() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("nested").join(CONFIG_FILE_NAME);
        let config = ProfilerConfig {
            sample_values: 2,
            ..ProfilerConfig::default()
        };
        config.save(&path)?;
        assert_eq!(ProfilerConfig::from_file(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = load_config(Some(Path::new("/definitely/not/here.json")));
        assert!(matches!(result, Err(ProfileError::Io(_))));
    }
}
