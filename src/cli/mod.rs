//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use output::OutputFormat;

pub mod commands;
pub mod formatters;
pub mod output;

/// ClinQuery - filter and rank patient records by demographics and lab values
#[derive(Parser, Debug)]
#[command(name = "clinquery")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (human, json, jsonl, plain, tsv)
    #[arg(long, short = 'O', global = true, value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Enable machine-readable JSON output (shorthand for --output-format=json)
    #[arg(long, short = 'm', global = true)]
    pub machine: bool,

    /// Force plain output (no colors)
    #[arg(long, global = true)]
    pub plain: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: ~/.config/clinquery/config.toml)
    #[arg(long, global = true, env = "CQ_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Output format requested by flags, if any.
    ///
    /// Priority order:
    /// 1. `--plain` → Plain format
    /// 2. `--output-format` → Explicit format
    /// 3. `--machine` → JSON format (shorthand)
    ///
    /// `None` leaves the choice to `[output] format` in the config.
    #[must_use]
    pub const fn output_format(&self) -> Option<OutputFormat> {
        if self.plain {
            return Some(OutputFormat::Plain);
        }
        if let Some(fmt) = self.output_format {
            return Some(fmt);
        }
        if self.machine {
            return Some(OutputFormat::Json);
        }
        None
    }

    /// Whether flags alone already ask for machine-readable output.
    #[must_use]
    pub fn wants_machine_output(&self) -> bool {
        self.output_format()
            .is_some_and(|fmt| fmt.is_machine_readable())
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter and rank records
    Search(commands::search::SearchArgs),

    /// List the queryable lab fields
    Fields(commands::fields::FieldsArgs),

    /// Show one record in full
    Show(commands::show::ShowArgs),

    /// Edit a saved criteria file
    Criteria(commands::criteria::CriteriaArgs),

    /// Show effective configuration
    Config(commands::config::ConfigArgs),

    /// Generate shell completions
    Completions(commands::completions::CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn plain_beats_explicit_format_and_machine() {
        let cli = Cli::parse_from(["clinquery", "--plain", "-O", "tsv", "-m", "fields"]);
        assert_eq!(cli.output_format(), Some(OutputFormat::Plain));
    }

    #[test]
    fn machine_is_json() {
        let cli = Cli::parse_from(["clinquery", "-m", "fields"]);
        assert_eq!(cli.output_format(), Some(OutputFormat::Json));
        assert!(cli.wants_machine_output());
    }

    #[test]
    fn no_flags_defers_to_config() {
        let cli = Cli::parse_from(["clinquery", "fields"]);
        assert_eq!(cli.output_format(), None);
        assert!(!cli.wants_machine_output());
    }

    #[test]
    fn quiet_short_flag_coexists_with_search_query() {
        let cli = Cli::try_parse_from(["clinquery", "search", "-q", "--query", "chen"]).unwrap();
        assert!(cli.quiet);
        let Commands::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.query.as_deref(), Some("chen"));
    }

    #[test]
    fn search_collects_repeated_criteria() {
        let cli = Cli::parse_from([
            "clinquery",
            "search",
            "--criterion",
            "hbA1c>=7",
            "-c",
            "egfr:60..90",
            "--gender",
            "Female",
        ]);
        let Commands::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.criterion, vec!["hbA1c>=7", "egfr:60..90"]);
        assert_eq!(args.gender.as_deref(), Some("Female"));
    }
}
