//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use crate::app::AppContext;
use crate::cli::Commands;
use crate::error::Result;

pub mod completions;
pub mod config;
pub mod criteria;
pub mod fields;
pub mod search;
pub mod show;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Search(args) => search::run(ctx, args),
        Commands::Fields(args) => fields::run(ctx, args),
        Commands::Show(args) => show::run(ctx, args),
        Commands::Criteria(args) => criteria::run(ctx, args),
        Commands::Config(args) => config::run(ctx, args),
        Commands::Completions(args) => completions::run(args),
    }
}
