//! CLI command implementations

pub mod definition;
pub mod export;
pub mod import;

pub use definition::{Cli, Commands};

use anyhow::Result;
use std::path::PathBuf;

use crate::remote::{auth, GoogleTasksClient};

/// Authenticate and build the Tasks API client shared by all commands.
pub async fn connect(credentials: Option<PathBuf>) -> Result<GoogleTasksClient> {
    let token = auth::authenticate(credentials).await?;
    Ok(GoogleTasksClient::new(token)?)
}
