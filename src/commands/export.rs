//! Export command - Writes the hero dataset to a JSON file.
//!
//! Acts under the service-role key; the output matches the payload
//! served at `/api/heroes/json`.

use crate::api::AppState;
use crate::cli::args::ExportArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};

/// Execute the export command
pub async fn execute(args: ExportArgs, config: Config) -> AppResult<()> {
    let state = AppState::from_config(config);

    tracing::info!("Fetching hero dataset...");
    let document = state.service_repos().heroes.export_all().await?;

    let pretty = serde_json::to_string_pretty(&document)
        .map_err(|e| AppError::internal(format!("Failed to serialize export: {}", e)))?;

    tokio::fs::write(&args.out, pretty)
        .await
        .map_err(|e| AppError::internal(format!("Failed to write {}: {}", args.out, e)))?;

    tracing::info!("Hero dataset written to {}", args.out);
    Ok(())
}
