use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CqError, Result};
use crate::query::TierThresholds;

/// Directory under the project root holding the project config.
pub const PROJECT_DIR: &str = ".clinquery";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Defaults, then the global and project files (or only `explicit_path` /
    /// `CQ_CONFIG` when given), then `CQ_*` environment overrides.
    pub fn load(explicit_path: Option<&Path>, project_root: &Path) -> Result<Self> {
        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("CQ_CONFIG").ok().map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => Self::load_explicit(&path)?,
            None => Self::load_layers(Self::global_path().as_deref(), project_root)?,
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Path of the per-user config file, when a config directory exists.
    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("clinquery/config.toml"))
    }

    /// Path of the project config file under `project_root`.
    pub fn project_path(project_root: &Path) -> PathBuf {
        project_root.join(PROJECT_DIR).join("config.toml")
    }

    fn load_explicit(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CqError::MissingConfig(format!(
                "config file {} does not exist",
                path.display()
            )));
        }
        let mut config = Self::default();
        if let Some(patch) = Self::load_patch(path)? {
            config.merge_patch(patch);
        }
        Ok(config)
    }

    fn load_layers(global: Option<&Path>, project_root: &Path) -> Result<Self> {
        let mut config = Self::default();
        if let Some(patch) = global.map(Self::load_patch).transpose()?.flatten() {
            config.merge_patch(patch);
        }
        if let Some(patch) = Self::load_patch(&Self::project_path(project_root))? {
            config.merge_patch(patch);
        }
        Ok(config)
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| CqError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| CqError::Config(format!("parse config {}: {err}", path.display())))?;
        tracing::debug!(path = %path.display(), "config layer loaded");
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.data {
            self.data.merge(patch);
        }
        if let Some(patch) = patch.display {
            self.display.merge(patch);
        }
        if let Some(patch) = patch.ranking {
            self.ranking.merge(patch);
        }
        if let Some(patch) = patch.output {
            self.output.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_string("CQ_RECORDS_PATH") {
            self.data.records_path = Some(PathBuf::from(value));
        }

        if let Some(value) = env_usize("CQ_DISPLAY_MAX_TAGS")? {
            self.display.max_tags = value;
        }
        if let Some(value) = env_bool("CQ_DISPLAY_SHOW_TIERS")? {
            self.display.show_tiers = value;
        }

        if let Some(value) = env_f64("CQ_RANKING_HIGH_THRESHOLD")? {
            self.ranking.high_threshold = value;
        }
        if let Some(value) = env_f64("CQ_RANKING_MEDIUM_THRESHOLD")? {
            self.ranking.medium_threshold = value;
        }

        if let Some(value) = env_string("CQ_OUTPUT_FORMAT") {
            self.output.format = value;
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let ranking = &self.ranking;
        if !ranking.high_threshold.is_finite() || !ranking.medium_threshold.is_finite() {
            return Err(CqError::Config(
                "ranking thresholds must be finite numbers".to_string(),
            ));
        }
        if ranking.medium_threshold > ranking.high_threshold {
            return Err(CqError::Config(format!(
                "ranking.medium_threshold ({}) exceeds ranking.high_threshold ({})",
                ranking.medium_threshold, ranking.high_threshold
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// Record file searched when `--data` is not given; built-in samples otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records_path: Option<PathBuf>,
}

impl DataConfig {
    fn merge(&mut self, patch: DataPatch) {
        if let Some(value) = patch.records_path {
            self.records_path = Some(value);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Tags shown per result row before collapsing the rest into "+N"
    #[serde(default)]
    pub max_tags: usize,
    #[serde(default)]
    pub show_tiers: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_tags: 2,
            show_tiers: true,
        }
    }
}

impl DisplayConfig {
    fn merge(&mut self, patch: DisplayPatch) {
        if let Some(value) = patch.max_tags {
            self.max_tags = value;
        }
        if let Some(value) = patch.show_tiers {
            self.show_tiers = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    #[serde(default)]
    pub high_threshold: f64,
    #[serde(default)]
    pub medium_threshold: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        let tiers = TierThresholds::default();
        Self {
            high_threshold: tiers.high,
            medium_threshold: tiers.medium,
        }
    }
}

impl RankingConfig {
    fn merge(&mut self, patch: RankingPatch) {
        if let Some(value) = patch.high_threshold {
            self.high_threshold = value;
        }
        if let Some(value) = patch.medium_threshold {
            self.medium_threshold = value;
        }
    }

    pub const fn thresholds(&self) -> TierThresholds {
        TierThresholds {
            high: self.high_threshold,
            medium: self.medium_threshold,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format when no format flag is given
    #[serde(default)]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
        }
    }
}

impl OutputConfig {
    fn merge(&mut self, patch: OutputPatch) {
        if let Some(value) = patch.format {
            self.format = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub data: Option<DataPatch>,
    pub display: Option<DisplayPatch>,
    pub ranking: Option<RankingPatch>,
    pub output: Option<OutputPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DataPatch {
    pub records_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DisplayPatch {
    pub max_tags: Option<usize>,
    pub show_tiers: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RankingPatch {
    pub high_threshold: Option<f64>,
    pub medium_threshold: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct OutputPatch {
    pub format: Option<String>,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_bool(key: &str) -> Result<Option<bool>> {
    match std::env::var(key) {
        Ok(value) => parse_bool(key, &value).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(CqError::Config(format!(
            "invalid {key} value {value}: expected true/false, yes/no, on/off or 1/0"
        ))),
    }
}

fn env_usize(key: &str) -> Result<Option<usize>> {
    match std::env::var(key) {
        Ok(value) => value.parse::<usize>().map(Some).map_err(|err| {
            CqError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        Err(_) => Ok(None),
    }
}

fn env_f64(key: &str) -> Result<Option<f64>> {
    match std::env::var(key) {
        Ok(value) => value.parse::<f64>().map(Some).map_err(|err| {
            CqError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        Err(_) => Ok(None),
    }
}
