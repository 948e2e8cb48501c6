//! clinquery - filter and rank patient records
//!
//! Demographic filters and lab-value criteria over a record file, ranked by
//! precomputed score.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use clinquery::CqError;
use clinquery::app::AppContext;
use clinquery::cli::output::MachineError;
use clinquery::cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    let mut machine = cli.wants_machine_output();
    match run(&cli, &mut machine) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e, machine);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, machine: &mut bool) -> clinquery::Result<()> {
    if let Commands::Completions(args) = &cli.command {
        return clinquery::cli::commands::completions::run(args);
    }
    let ctx = AppContext::from_cli(cli)?;
    *machine = ctx.machine();
    clinquery::cli::commands::run(&ctx, &cli.command)
}

fn report(err: &CqError, machine: bool) {
    if machine {
        // Machine mode: structured JSON error on stdout
        let payload = serde_json::to_string(&MachineError::from(err)).unwrap_or_default();
        println!("{payload}");
    } else {
        eprintln!("Error: {err}");
        let hint = err.to_structured().suggestion;
        if !hint.is_empty() {
            eprintln!("Hint: {hint}");
        }
    }
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,clinquery=info",
        1 => "info,clinquery=debug",
        2 => "debug,clinquery=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if cli.wants_machine_output() {
        // JSON logging for machine mode
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        // Human-readable logging
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
