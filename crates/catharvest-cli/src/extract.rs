//! `extract` and `normalize` command handlers.

use std::path::Path;

use anyhow::Context;
use catharvest_core::AppConfig;
use catharvest_scraper::{extract_documents, normalize_rendered, HttpRenderer};
use serde_json::Value;

/// Renders every identifier over HTTP and returns the normalized documents.
///
/// Per-identifier failures are logged by the orchestrator and left out of
/// the result.
///
/// # Errors
///
/// Returns an error if the HTTP renderer cannot be built.
pub(crate) async fn run_extract(
    config: &AppConfig,
    identifiers: &[String],
) -> anyhow::Result<Vec<Value>> {
    let mut renderer = HttpRenderer::new(&config.transport, &config.extract)
        .map_err(|e| anyhow::anyhow!("failed to build page renderer: {e}"))?;

    let report = extract_documents(
        &mut renderer,
        identifiers,
        &config.extract,
        &config.harvest.base_url,
    )
    .await;

    if !report.failed.is_empty() {
        tracing::warn!(failed = ?report.failed, "some identifiers produced no document");
    }
    Ok(report.documents)
}

/// Normalizes one page saved on disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or holds no usable payload.
pub(crate) fn run_normalize(path: &Path, element_id: &str, base_url: &str) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    normalize_rendered(&content, element_id, base_url)
        .with_context(|| format!("failed to normalize {}", path.display()))
}
