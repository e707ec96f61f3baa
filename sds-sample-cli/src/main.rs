//! SDS Sample CLI Application
//!
//! Command-line walk-through of reading PI data from the Sequential Data
//! Store. It uses the sds-client library and adds:
//! - Settings loading (appsettings.json)
//! - The step-by-step read sample (window, table, range, interpolated,
//!   filtered and last-value reads)
//! - Seeding and cleanup of sample data
//! - A `test` mode that seeds, runs the sample and cleans up

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use sds_client::SdsClient;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

mod config;
mod sample;
mod seed;

use config::AppSettings;

/// SDS Sample - read PI data from the Sequential Data Store
#[derive(Parser, Debug)]
#[command(name = "sds-sample-cli")]
#[command(about = "Read PI time-series data from the Sequential Data Store", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the settings file (JSON, or TOML with a .toml extension)
    #[arg(short, long, value_name = "FILE", default_value = "appsettings.json")]
    config: PathBuf,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Run the read sample against the configured stream (default)
    Run,
    /// Create the type and stream and insert test values
    Seed,
    /// Delete the seeded stream and type
    Cleanup,
    /// Seed, run the sample, then clean up
    Test,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("SDS Sample CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using sds-client library v{}", sds_client::VERSION);

    match args.command.unwrap_or(Command::Run) {
        Command::Run => {
            println!("Step 1. Authenticate against OCS");
            let settings = settings_or_exit(&args.config);
            let client = connect(&settings)?;
            run_sample(&client, &settings)
        }
        Command::Seed => {
            let settings = settings_or_exit(&args.config);
            let client = connect(&settings)?;
            seed::seed(&client, &settings, Utc::now())?;
            Ok(())
        }
        Command::Cleanup => {
            let settings = settings_or_exit(&args.config);
            let client = connect(&settings)?;
            seed::cleanup(&client, &settings);
            Ok(())
        }
        Command::Test => test_mode(&args.config),
    }
}

/// Seed, run the sample on the seeded data, and always clean up
fn test_mode(config_path: &Path) -> Result<()> {
    let settings = settings_or_exit(config_path);
    let client = connect(&settings)?;

    seed::seed(&client, &settings, Utc::now())?;

    println!("Step 1. Authenticate against OCS");
    let result = run_sample(&client, &settings);
    seed::cleanup(&client, &settings);
    result
}

fn run_sample(client: &SdsClient, settings: &AppSettings) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    sample::print_header(&mut out, &client.uri())?;
    sample::run(client, settings, Utc::now(), &mut out)
}

/// Load the settings, or report the failure and terminate
fn settings_or_exit(path: &Path) -> AppSettings {
    match config::load_settings(path) {
        Ok(settings) => {
            log::debug!("Settings loaded from {:?}", path);
            settings
        }
        Err(e) => {
            println!("Error: {:#}", e);
            println!("Could not open/read {}", path.display());
            process::exit(1);
        }
    }
}

fn connect(settings: &AppSettings) -> Result<SdsClient> {
    let client = SdsClient::new(settings.client_config())?;
    client.authenticate()?;
    log::info!("Authenticated against {}", client.uri());
    Ok(client)
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_and_config() {
        let args = Args::parse_from(["sds-sample-cli"]);
        assert_eq!(args.config, PathBuf::from("appsettings.json"));
        assert_eq!(args.command, None);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_subcommand_parsing() {
        let args = Args::parse_from(["sds-sample-cli", "-vv", "--config", "settings.toml", "test"]);
        assert_eq!(args.command, Some(Command::Test));
        assert_eq!(args.verbose, 2);
        assert_eq!(args.config, PathBuf::from("settings.toml"));
    }
}
