//! Underwrite CLI - data dictionary inspector.
//!
//! Commands:
//! - `underwrite check`: Load the dictionary and summarize it
//! - `underwrite resolve <key>`: Show the definition serving a data key
//! - `underwrite options <key> --data <file>`: Effective options for a record
//! - `underwrite groups --data <file>`: Group tree for a record
//! - `underwrite describe --data <file>`: Every record value with its presentation

use clap::Parser;
use tracing_subscriber::EnvFilter;

use underwrite::commands::{check, describe, groups, options, resolve};
use underwrite::load::{self, Overrides};
use underwrite::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing with appropriate level
    let filter = if cli.debug {
        EnvFilter::new("underwrite=debug,underwrite_fields=debug,underwrite_config=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = result_to_exit(dispatch_command(cli).await);
    std::process::exit(exit_code);
}

/// Open the dictionary and run the requested command.
async fn dispatch_command(cli: Cli) -> anyhow::Result<()> {
    let settings = load::settings(&Overrides::from(&cli))?;
    let ctx = load::dictionary(&settings).await?;

    match cli.command {
        Commands::Check => check::run_check(&ctx, &settings),
        Commands::Resolve { key, json } => resolve::run_resolve(&ctx, &key, json),
        Commands::Options { key, data } => {
            let record = load::record(data.as_deref())?;
            options::run_options(&ctx, &key, &record)
        }
        Commands::Groups { data } => {
            let record = load::record(data.as_deref())?;
            groups::run_groups(&ctx, &record)
        }
        Commands::Describe { data, all } => {
            let record = load::record(Some(&data))?;
            describe::run_describe(&ctx, &record, all)
        }
    }
}

/// Convert a `Result<(), anyhow::Error>` to an exit code.
fn result_to_exit(result: anyhow::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    }
}
