//! xtask - Development tasks for mdtasks

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

/// Where the generated CLI reference lands, relative to the repo root.
const CLI_REFERENCE_PATH: &str = "docs/cli/reference.md";

#[derive(Parser)]
#[command(name = "xtask", about = "Development tasks for mdtasks")]
struct Xtask {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate CLI documentation from the clap definitions
    GenDocs,
}

fn main() -> std::io::Result<()> {
    match Xtask::parse().command {
        Commands::GenDocs => generate_cli_docs(),
    }
}

fn generate_cli_docs() -> std::io::Result<()> {
    let output = PathBuf::from(CLI_REFERENCE_PATH);
    if let Some(dir) = output.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(&output, clap_markdown::help_markdown::<mdtasks::cli::Cli>())?;
    println!("Generated CLI documentation at {}", output.display());
    Ok(())
}
