use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write as _;
use std::path::PathBuf;
use tabscope::analyser::logic::io::{to_json, write_json};
use tabscope::analyser::logic::{DatasetProfile, Profiler, load_csv};
use tabscope::config::load_config;
use tabscope::logging::default_log_dir;
use tabscope::session::SessionStore;

#[derive(Parser)]
#[command(name = "tabscope", version, about = "Profile tabular data and score its quality")]
pub struct Cli {
    /// Profiler config file (JSON). Defaults to the platform config directory.
    #[arg(long, global = true, env = "TABSCOPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory for rotating log files. Defaults to the platform data directory.
    #[arg(long, global = true, env = "TABSCOPE_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// `--log-dir` if given, else `<data_dir>/tabscope/logs`.
    pub fn resolved_log_dir(&self) -> Option<PathBuf> {
        self.log_dir.clone().or_else(default_log_dir)
    }
}

#[derive(Args)]
pub struct InputArgs {
    /// CSV (or .tsv) file with a header row
    pub file: PathBuf,

    /// Session id to file the dataset under. A UUID is generated when omitted.
    #[arg(long)]
    pub session: Option<String>,

    /// Target column, enables leakage checks
    #[arg(long)]
    pub target: Option<String>,
}

#[derive(Args)]
pub struct OutputArgs {
    /// Single-line JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Full profile report as JSON
    Profile {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Quality scores, recommendations and key insights
    Quality {
        #[command(flatten)]
        input: InputArgs,
        /// Print the assessment as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Correlation matrix and significant pairs as JSON
    Correlations {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}

pub fn run_command(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref()).context("Failed to load profiler config")?;
    let profiler = Profiler::new(config);

    match cli.command {
        Commands::Profile { input, output } => {
            let profile = profile_file(&profiler, &input)?;
            emit(&*profile, &output)
        }
        Commands::Quality { input, json } => {
            let profile = profile_file(&profiler, &input)?;
            if json {
                let report = serde_json::json!({
                    "session_id": profile.session_id,
                    "data_quality": profile.quality_assessment,
                    "recommendations": profile.quality_assessment.recommendations,
                    "key_insights": profile.key_insights(),
                    "timestamp": profile.created_at,
                });
                write_stdout(&to_json(&report, true)?)
            } else {
                write_stdout(&quality_text(&profile))
            }
        }
        Commands::Correlations { input, output } => {
            let profile = profile_file(&profiler, &input)?;
            let numeric = &profile.numeric_summary;
            let report = serde_json::json!({
                "session_id": profile.session_id,
                "numerical_columns": numeric.correlation_matrix.columns,
                "correlation_matrix": numeric.correlation_matrix,
                "significant_correlations": numeric.significant_correlations,
            });
            emit(&report, &output)
        }
    }
}

fn profile_file(
    profiler: &Profiler,
    input: &InputArgs,
) -> Result<std::sync::Arc<DatasetProfile>> {
    let dataset = load_csv(&input.file)
        .with_context(|| format!("Failed to read {}", input.file.display()))?;

    let store = SessionStore::new();
    let session_id = match &input.session {
        Some(id) => {
            store.register_as(id, dataset);
            id.clone()
        }
        None => store.register(dataset),
    };

    store
        .profile(profiler, &session_id, input.target.as_deref())
        .with_context(|| format!("Failed to profile {}", input.file.display()))
}

fn emit<T: serde::Serialize>(value: &T, output: &OutputArgs) -> Result<()> {
    match &output.output {
        Some(path) => {
            write_json(value, path, !output.compact)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "Report written");
            Ok(())
        }
        None => write_stdout(&to_json(value, !output.compact)?),
    }
}

fn write_stdout(text: &str) -> Result<()> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "{text}").context("Failed to write to stdout")?;
    Ok(())
}

fn quality_text(profile: &DatasetProfile) -> String {
    let q = &profile.quality_assessment;
    let mut lines = vec![
        format!("Session:       {}", profile.session_id),
        format!(
            "Shape:         {} rows x {} columns",
            profile.dataset_info.rows, profile.dataset_info.columns
        ),
        format!("Completeness:  {:.1}", q.completeness),
        format!("Uniqueness:    {:.1}", q.uniqueness),
        format!("Consistency:   {:.1}", q.consistency),
        format!("Validity:      {:.1}", q.validity),
        format!("Overall:       {:.1} ({})", q.overall_quality, q.quality_grade.as_str()),
        String::new(),
        "Recommendations:".to_owned(),
    ];
    lines.extend(q.recommendations.iter().map(|r| format!("  - {r}")));

    if !profile.categorical_summary.is_empty() {
        lines.push(String::new());
        lines.push("Categorical columns:".to_owned());
        lines.extend(profile.categorical_summary.iter().map(|(name, summary)| {
            format!(
                "  - {name}: {} unique ({:.1}%), {}",
                summary.unique_count,
                summary.unique_percentage,
                summary.cardinality_hint().label()
            )
        }));
    }

    lines.push(String::new());
    lines.push("Key insights:".to_owned());
    lines.extend(profile.key_insights().into_iter().map(|i| format!("  - {i}")));
    lines.join("\n")
}
