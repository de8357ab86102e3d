//! Options inspection CLI
//!
//! Validates mappings against the stock options classes, extracts sections
//! and options from them, and documents the classes.

mod cli;
mod commands;
mod error;
mod input;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} options inspection CLI", "opts".green().bold());
            println!();
            println!("Run {} for available commands.", "opts --help".cyan());
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let installed = if verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber).is_ok()
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok()
    };
    if installed && verbose {
        tracing::debug!("Verbose mode enabled");
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Check { input, class } => commands::run_check(&input, &class),
        Commands::Section { input, path, class } => commands::run_section(&input, &class, &path),
        Commands::Get {
            input,
            path,
            key,
            phase,
            class,
        } => commands::run_get(&input, &class, &path, &key, phase),
        Commands::Doc { class } => commands::run_doc(&class),
        Commands::Classes => commands::run_classes(),
    }
}
