//! `demtint` command-line entry point.

use clap::Parser;
use demtint_color::GradientRegistry;
use demtint_runner::cli::{Cli, Commands};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let registry = GradientRegistry::with_builtins();

    match cli.command {
        Commands::Gradients => {
            for name in registry.names() {
                println!("{}", name);
            }
            ExitCode::SUCCESS
        }
        Commands::Render(args) => {
            let result = args
                .into_config()
                .and_then(|config| demtint_runner::render(&config, &registry));
            match result {
                Ok(summary) => {
                    println!("{}", summary.png_path.display());
                    println!("{}", summary.descriptor_path.display());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!("{}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}
