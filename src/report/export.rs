//! JSON export of the dashboard views

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use super::DashboardReport;

/// Metadata about the export run
#[derive(Serialize)]
pub struct ExportMetadata {
    /// Timestamp of the export (ISO 8601 format)
    pub timestamp: String,
    /// Credlens version
    pub credlens_version: String,
    /// Input file path
    pub input_file: String,
}

impl ExportMetadata {
    pub fn new(input_file: &str) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            credlens_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: input_file.to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct DashboardExport<'a> {
    pub metadata: ExportMetadata,
    #[serde(flatten)]
    pub report: &'a DashboardReport,
}

/// Write the dashboard views to `path` as pretty-printed JSON
pub fn export_dashboard(path: &Path, report: &DashboardReport, metadata: ExportMetadata) -> Result<()> {
    let export = DashboardExport { metadata, report };

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize dashboard report")?;

    std::fs::write(path, json)
        .with_context(|| format!("Failed to write dashboard export: {}", path.display()))?;

    log::info!("dashboard exported to {}", path.display());

    Ok(())
}
