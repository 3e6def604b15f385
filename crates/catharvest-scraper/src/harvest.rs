//! Concurrent pagination harvester.
//!
//! Keeps `max_workers` page fetches in flight over an unbounded page-number
//! sequence. Each completion is handled by the single control loop in
//! [`harvest_identifiers`], which is the only writer of the identifier set and
//! the empty-page streak; fetch tasks just return the identifiers they saw.
//! After every completion one new page is submitted unless a stop condition
//! holds, so the window slides instead of running in batches.
//!
//! Identifiers are merged in completion order, not page order.

use std::collections::HashSet;
use std::future::Future;

use catharvest_core::{ConfigError, HarvestConfig};
use tokio::task::JoinSet;

/// Ordered set of unique identifiers; iteration order is insertion order.
#[derive(Debug, Clone, Default)]
pub struct IdentifierSet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl IdentifierSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `id` if it has not been seen. Returns `true` when it was new.
    pub fn insert(&mut self, id: String) -> bool {
        if self.seen.contains(&id) {
            return false;
        }
        self.seen.insert(id.clone());
        self.order.push(id);
        true
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.order
    }
}

/// Why the harvester stopped submitting work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TargetReached,
    EmptyStreak,
    /// No work left in flight and nothing more could be submitted.
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct HarvestOutcome {
    /// Unique identifiers in discovery order, at most `target_count` long.
    pub identifiers: Vec<String>,
    /// Page fetches whose results were processed.
    pub pages_completed: u32,
    pub stop_reason: StopReason,
}

/// State owned by the control loop.
struct HarvestState {
    identifiers: IdentifierSet,
    empty_streak: u32,
    pages_completed: u32,
    target_count: usize,
    max_empty_pages: u32,
}

impl HarvestState {
    fn new(config: &HarvestConfig) -> Self {
        Self {
            identifiers: IdentifierSet::new(),
            empty_streak: 0,
            pages_completed: 0,
            target_count: config.target_count,
            max_empty_pages: config.max_empty_pages,
        }
    }

    /// Applies one page result. Returns how many identifiers were new.
    fn record_page(&mut self, ids: Vec<String>) -> usize {
        self.pages_completed = self.pages_completed.saturating_add(1);

        if ids.is_empty() {
            self.empty_streak += 1;
            return 0;
        }

        self.empty_streak = 0;
        let mut added = 0;
        for id in ids {
            if self.identifiers.insert(id) {
                added += 1;
            }
            if self.identifiers.len() >= self.target_count {
                break;
            }
        }
        added
    }

    fn stop_reason(&self) -> Option<StopReason> {
        if self.identifiers.len() >= self.target_count {
            Some(StopReason::TargetReached)
        } else if self.empty_streak >= self.max_empty_pages {
            Some(StopReason::EmptyStreak)
        } else {
            None
        }
    }
}

/// Collects up to `config.target_count` unique identifiers by fetching pages
/// `start_page, start_page + 1, …` with `fetch_page`.
///
/// `fetch_page` must never fail: a page it cannot read is reported as an
/// empty list. A fetch task that panics is also counted as an empty page.
/// Once a stop condition is reached the remaining in-flight fetches are
/// aborted and not waited on.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] if `config` is invalid (zero target,
/// zero pool size, …). Nothing is fetched in that case.
pub async fn harvest_identifiers<F, Fut>(
    config: &HarvestConfig,
    fetch_page: F,
) -> Result<HarvestOutcome, ConfigError>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Vec<String>> + Send + 'static,
{
    config.validate()?;

    let mut state = HarvestState::new(config);
    let mut in_flight: JoinSet<(u32, Vec<String>)> = JoinSet::new();
    let mut next_page = Some(config.start_page);

    for _ in 0..config.max_workers {
        submit_next(&mut in_flight, &mut next_page, &fetch_page);
    }

    tracing::info!(
        target_count = config.target_count,
        start_page = config.start_page,
        max_workers = config.max_workers,
        max_empty_pages = config.max_empty_pages,
        "harvest started"
    );

    let mut stop_reason = StopReason::Exhausted;
    while let Some(joined) = in_flight.join_next().await {
        let ids = match joined {
            Ok((page, ids)) => {
                tracing::debug!(page, found = ids.len(), "page completed");
                ids
            }
            Err(e) => {
                tracing::warn!(error = %e, "page fetch task failed, counting as empty");
                Vec::new()
            }
        };

        let added = state.record_page(ids);
        tracing::debug!(
            added,
            collected = state.identifiers.len(),
            empty_streak = state.empty_streak,
            "page merged"
        );

        if let Some(reason) = state.stop_reason() {
            stop_reason = reason;
            break;
        }

        submit_next(&mut in_flight, &mut next_page, &fetch_page);
    }

    // Drop work that no longer matters; started fetches are cancelled at
    // their next await point.
    in_flight.abort_all();

    let mut identifiers = state.identifiers.into_vec();
    identifiers.truncate(config.target_count);

    tracing::info!(
        collected = identifiers.len(),
        pages_completed = state.pages_completed,
        ?stop_reason,
        "harvest finished"
    );

    Ok(HarvestOutcome {
        identifiers,
        pages_completed: state.pages_completed,
        stop_reason,
    })
}

/// Spawns the fetch for the next unclaimed page and advances the cursor.
///
/// The cursor becomes `None` once the page numbers are exhausted.
fn submit_next<F, Fut>(
    in_flight: &mut JoinSet<(u32, Vec<String>)>,
    next_page: &mut Option<u32>,
    fetch_page: &F,
) where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Vec<String>> + Send + 'static,
{
    if let Some(page) = *next_page {
        let fut = fetch_page(page);
        in_flight.spawn(async move { (page, fut.await) });
        *next_page = page.checked_add(1);
    }
}

#[cfg(test)]
#[path = "harvest_test.rs"]
mod tests;
