//! Clap definitions for the mdtasks CLI

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "mdtasks",
    version,
    about = "Sync Google Tasks with local Markdown outline files"
)]
pub struct Cli {
    /// Path to the OAuth 2.0 credentials.json file
    #[arg(
        short,
        long,
        global = true,
        env = "GOOGLE_APPLICATION_CREDENTIALS",
        value_name = "PATH"
    )]
    pub credentials: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export task lists from Google Tasks to local Markdown files
    Export(ExportArgs),

    /// Import task lists from local Markdown files to Google Tasks
    Import(ImportArgs),

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output directory, or a single .md file when --list-name is given
    #[arg(default_value = ".")]
    pub output_path: PathBuf,

    /// Export only the named list (required when the target is a single file)
    #[arg(short, long)]
    pub list_name: Option<String>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Markdown file, or directory of .md files, to import
    pub input_path: PathBuf,

    /// Target list name override (single-file import only)
    #[arg(short, long)]
    pub list_name: Option<String>,
}
