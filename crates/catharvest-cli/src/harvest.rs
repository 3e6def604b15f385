//! `harvest` command handler.

use catharvest_core::AppConfig;
use catharvest_scraper::{harvest_identifiers, ListingClient, StopReason};

/// Runs the pagination harvester against the configured listing endpoint.
///
/// Falling short of the target is not an error: the identifiers found are
/// returned and a warning is logged.
///
/// # Errors
///
/// Returns an error if the listing client cannot be built or the harvest
/// configuration is invalid.
pub(crate) async fn run_harvest(config: &AppConfig) -> anyhow::Result<Vec<String>> {
    let client = ListingClient::new(&config.transport, &config.harvest)
        .map_err(|e| anyhow::anyhow!("failed to build listing client: {e}"))?;

    let outcome = harvest_identifiers(&config.harvest, move |page| {
        let client = client.clone();
        async move { client.fetch_page(page).await }
    })
    .await?;

    if outcome.stop_reason != StopReason::TargetReached {
        tracing::warn!(
            collected = outcome.identifiers.len(),
            target = config.harvest.target_count,
            stop_reason = ?outcome.stop_reason,
            "harvest ended below target"
        );
    }

    Ok(outcome.identifiers)
}
