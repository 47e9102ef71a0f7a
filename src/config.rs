use crate::constants::*;
use crate::errors::{AppError, AppResult};
use crate::merge::timestamp::ZoneChoice;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolved configuration with all values filled in.
///
/// This struct represents the pipeline defaults and can be deserialized by the TOML
/// loader. Every field has a concrete value except `dedupe_snapshot_path`, which is
/// only used when deduplication runs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolvedConfig {
    /// Number of files parsed in parallel
    pub workers: usize,
    /// Intermediate snapshot written after parsing
    pub snapshot_path: PathBuf,
    /// Final JSON dataset
    pub output_json: PathBuf,
    /// Whether to collapse content-identical records before sorting
    pub dedupe: bool,
    /// Where to persist the deduplicated record set, if anywhere
    pub dedupe_snapshot_path: Option<PathBuf>,
    /// Attribute holding the human-readable date of each record
    pub date_field: String,
    /// Zone used for dates without an offset: `local`, `utc` or e.g. `+02:00`
    pub timezone: String,
    /// Naive date-time layouts (chrono strftime syntax), tried in order
    pub date_formats: Vec<String>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            output_json: PathBuf::from(DEFAULT_OUTPUT_JSON),
            dedupe: true,
            dedupe_snapshot_path: None,
            date_field: DEFAULT_DATE_FIELD.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            date_formats: DEFAULT_DATETIME_FORMATS
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }
}

impl ResolvedConfig {
    /// Checks the values a run cannot proceed without.
    pub fn validate(&self) -> AppResult<()> {
        if self.workers == 0 {
            return Err(AppError::InvalidInput(
                "Workers must be greater than 0".into(),
            ));
        }
        if self.date_field.trim().is_empty() {
            return Err(AppError::InvalidInput("Date field must not be empty".into()));
        }
        if self.dedupe_snapshot_path.is_some() && !self.dedupe {
            return Err(AppError::InvalidInput(
                "A dedupe snapshot path (--output-snapshot) only applies together with dedupe (--dedupe)"
                    .into(),
            ));
        }
        self.zone()?;
        Ok(())
    }

    pub fn zone(&self) -> AppResult<ZoneChoice> {
        self.timezone.parse()
    }
}

/// Configuration that can be loaded from a TOML file.
///
/// `input_dir` is required; pipeline settings go in an optional `[pipeline]` table.
/// Unknown keys are rejected at both levels to catch typos.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolvedConfigFile {
    /// Directory searched recursively for backup exports
    pub input_dir: PathBuf,
    #[serde(default)]
    pub pipeline: ResolvedConfig,
}

impl ResolvedConfigFile {
    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the file cannot be read and `InvalidInput` if the TOML is
    /// malformed, `input_dir` is missing, unknown keys are present, or a pipeline
    /// value fails validation.
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::IoError(format!("Failed to read config {}: {e}", path.display()))
        })?;
        let config: ResolvedConfigFile = toml::from_str(&contents)?;
        config.pipeline.validate()?;
        Ok(config)
    }
}
