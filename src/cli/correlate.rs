//! Correlate command implementation

use anyhow::Result;

use super::truncate;
use crate::correlate::compute_entity_correlations;
use crate::store::RecordStore;

pub async fn run(store: &dyn RecordStore, limit: usize) -> Result<()> {
    let correlations = compute_entity_correlations(store).await?;

    if correlations.is_empty() {
        println!("No significant entity correlations found.");
        return Ok(());
    }

    println!(
        "{:<30} {:>4} {:>5} {:>14} {:>14} {:>4}  {}",
        "Entity", "Risk", "Docs", "Sent", "Received", "PII", "Hub"
    );
    println!("{}", "-".repeat(90));

    for correlation in correlations.iter().take(limit) {
        println!(
            "{:<30} {:>4} {:>5} {:>14.2} {:>14.2} {:>4}  {}",
            truncate(&correlation.entity, 30),
            correlation.risk_score,
            correlation.occurrences,
            correlation.total_amount_sent,
            correlation.total_amount_received,
            correlation.pii_count,
            if correlation.financial_hub { "*" } else { "" },
        );
        if !correlation.shared_thematics.is_empty() {
            println!("    themes: {}", correlation.shared_thematics.join("; "));
        }
    }

    Ok(())
}
