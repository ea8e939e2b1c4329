use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    fes::{self, FesArgs},
    sf::{self, SfArgs},
    tes::{self, TesArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "tauid", version, about = "Tau ID scale factor and energy scale tables")]
struct Cli {
    /// Directory holding the calibration artifacts.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// TOML store configuration, used when --data-dir is not given.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log verbosity (trace, debug, info, warn, error). Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<tracing::Level>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tabulate an identification scale factor.
    Sf(SfArgs),
    /// Tabulate a tau energy scale.
    Tes(TesArgs),
    /// Tabulate an electron fake energy scale.
    Fes(FesArgs),
}

fn init_tracing(level: Option<tracing::Level>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level.as_str().to_ascii_lowercase()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_level);
    let store = commands::open_store(cli.data_dir.as_deref(), cli.config.as_deref())?;
    match cli.command {
        Command::Sf(args) => sf::run(&store, &args),
        Command::Tes(args) => tes::run(&store, &args),
        Command::Fes(args) => fes::run(&store, &args),
    }
}
