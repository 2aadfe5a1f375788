//! CLI for headless soft-heart simulations.

mod commands;
mod config;
pub mod utils;

use std::path::PathBuf;

use clap::Parser;
use rand::prelude::*;

use commands::Commands;
use config::ShellConfig;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The path to the output directory.
    #[arg(short('o'), long)]
    out_path: PathBuf,

    /// An optional JSON file overriding the body, heart and control settings.
    #[arg(short('c'), long)]
    config: Option<PathBuf>,

    /// The random seed to use.
    #[arg(short('s'), long)]
    seed: Option<u64>,

    /// The name of the log-file to use.
    #[arg(short('l'), long, default_value = "shell.log")]
    log_name: String,

    /// Also log debug statistics, such as spring network and zone sizes.
    #[arg(short('v'), long)]
    verbose: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<(), String> {
    let args = Args::parse();

    let out_path = &args.out_path;
    if !out_path.exists() {
        std::fs::create_dir_all(out_path).map_err(|e| format!("Failed to create output directory {out_path:?}: {e}"))?;
    }

    let (_guard, log_path) = utils::configure_logger(out_path, &args.log_name, args.verbose)?;
    ftlog::info!("Log file: {log_path:?}");

    let config = args.config.as_ref().map_or_else(|| Ok(ShellConfig::default()), ShellConfig::read)?;
    let mut rng = args.seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

    match args.command {
        Commands::Simulate {
            model,
            steps,
            dt,
            kick_every,
        } => commands::simulate(&config, &model, steps, dt, kick_every, &mut rng, out_path),
        Commands::Inspect { model } => commands::inspect(&config, &model, out_path),
        Commands::Presets => commands::presets(&config, out_path),
    }
}
