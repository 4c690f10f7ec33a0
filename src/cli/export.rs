//! Export command - remote task lists to local outline files

use anyhow::Result;
use std::path::PathBuf;

use super::definition::ExportArgs;
use crate::sync;

pub async fn run(credentials: Option<PathBuf>, args: ExportArgs) -> Result<()> {
    let client = super::connect(credentials).await?;
    sync::export_lists(&client, &args.output_path, args.list_name.as_deref()).await
}
