//! Sable compiler CLI
//!
//! Reads parsed compilation units as JSON, runs the compiler and writes a
//! report of every output name and lowered body.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod compile;
mod report;

#[derive(Parser)]
#[command(name = "sable")]
#[command(about = "Sable script compiler", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a parse tree and report the result
    Compile {
        /// JSON file holding the compilation units
        input: PathBuf,

        /// Compiler options file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Emit minimized names regardless of the options file
        #[arg(long)]
        minimize: bool,

        /// Where to write the report; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Logging is off unless SABLE_LOG is set
    if let Ok(filter) = EnvFilter::try_from_env("SABLE_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
        tracing::debug!("tracing initialized");
    }

    let cli = Cli::parse();
    match cli.command {
        Commands::Compile {
            input,
            config,
            minimize,
            out,
        } => compile::compile(&input, config.as_deref(), minimize, out.as_deref()),
    }
}
