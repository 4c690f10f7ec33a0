//! Import command - local outline files to remote task lists

use anyhow::Result;
use std::path::PathBuf;

use super::definition::ImportArgs;
use crate::sync;

pub async fn run(credentials: Option<PathBuf>, args: ImportArgs) -> Result<()> {
    let client = super::connect(credentials).await?;
    sync::import_files(&client, &args.input_path, args.list_name.as_deref()).await
}
