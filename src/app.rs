//! Per-invocation application context

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::records::RecordSet;

/// Effective settings for one command run.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Config,
    pub output_format: OutputFormat,
    /// Directory searched for `.clinquery/config.toml`
    pub project_root: PathBuf,
    /// Config file given with `--config` / `CQ_CONFIG`
    pub explicit_config: Option<PathBuf>,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let project_root = std::env::current_dir()?;
        let config = Config::load(cli.config.as_deref(), &project_root)?;
        Self::new(config, cli.output_format(), project_root, cli.config.clone())
    }

    /// Resolve the output format: flags first, then `[output] format`.
    pub fn new(
        config: Config,
        requested: Option<OutputFormat>,
        project_root: PathBuf,
        explicit_config: Option<PathBuf>,
    ) -> Result<Self> {
        let output_format = match requested {
            Some(format) => format,
            None => config.output.format.parse()?,
        };
        debug!(?output_format, root = %project_root.display(), "context ready");
        Ok(Self {
            config,
            output_format,
            project_root,
            explicit_config,
        })
    }

    #[must_use]
    pub const fn machine(&self) -> bool {
        self.output_format.is_machine_readable()
    }

    /// Record file to search: the flag, then `[data] records_path`.
    #[must_use]
    pub fn records_path<'a>(&'a self, flag: Option<&'a Path>) -> Option<&'a Path> {
        flag.or(self.config.data.records_path.as_deref())
    }

    /// Load the records to search, falling back to the built-in samples.
    pub fn load_records(&self, flag: Option<&Path>) -> Result<RecordSet> {
        RecordSet::load_or_sample(self.records_path(flag))
    }
}
