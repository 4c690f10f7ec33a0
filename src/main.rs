//! mdtasks - sync Google Tasks with local Markdown outline files

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use mdtasks::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::var("MDTASKS_DEBUG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter("mdtasks=debug")
            .init();
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Completion { shell } => {
            generate(shell, &mut Cli::command(), "mdtasks", &mut std::io::stdout());
            Ok(())
        }
        Commands::Export(args) => cli::export::run(cli.credentials, args).await,
        Commands::Import(args) => cli::import::run(cli.credentials, args).await,
    }
}
