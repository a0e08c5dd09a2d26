//! One-vs-all discovery ranking
//!
//! Runs the pairwise detector between one target record and every other
//! completed record. Comparisons are independent and pure, so they are
//! issued concurrently and collected; completion order is irrelevant because
//! results are sorted by total strength afterward. A pair that produces
//! nothing contributes nothing and never aborts the batch.

use futures::future::join_all;
use tracing::debug;

use super::links::{detect_links, DiscoveryResult};
use super::CorrelationError;
use crate::record::AnalysisRecord;
use crate::store::RecordStore;

/// Rank every other completed record by correlation strength with the target.
///
/// A missing target, or a target without output, yields an empty list.
pub async fn find_discoveries(
    store: &dyn RecordStore,
    target_id: &str,
) -> Result<Vec<DiscoveryResult>, CorrelationError> {
    let records = store.get_all_results().await?;

    let target = match records.iter().find(|r| r.id == target_id) {
        Some(target) if target.output.is_some() => target,
        _ => return Ok(vec![]),
    };

    let comparisons = records
        .iter()
        .filter(|r| r.id != target_id && r.is_completed())
        .map(|candidate| compare(target, candidate));

    let mut results: Vec<DiscoveryResult> = join_all(comparisons)
        .await
        .into_iter()
        .flatten()
        .collect();

    results.sort_by(|a, b| b.total_strength.cmp(&a.total_strength));
    Ok(results)
}

async fn compare(target: &AnalysisRecord, candidate: &AnalysisRecord) -> Option<DiscoveryResult> {
    let result = detect_links(target, candidate);
    if result.links.is_empty() {
        debug!(target = %target.id, candidate = %candidate.id, "no links for pair");
        return None;
    }
    Some(result)
}
