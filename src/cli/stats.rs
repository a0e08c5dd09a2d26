//! Stats command implementation

use std::collections::HashSet;

use anyhow::Result;

use crate::correlate::normalize_name_like;
use crate::record::RecordStatus;
use crate::store::RecordStore;

pub async fn run(store: &dyn RecordStore) -> Result<()> {
    let records = store.get_all_results().await?;

    let count = |status: RecordStatus| records.iter().filter(|r| r.status == status).count();

    let mut distinct_entities: HashSet<String> = HashSet::new();
    let mut entity_mentions = 0usize;
    let mut pii_count = 0usize;
    let mut transaction_count = 0usize;
    let mut flight_count = 0usize;
    let mut total_volume = 0.0f64;

    for output in records.iter().filter_map(|r| r.output.as_ref()) {
        entity_mentions += output.key_entities.len();
        for entity in &output.key_entities {
            let key = normalize_name_like(entity);
            if !key.is_empty() {
                distinct_entities.insert(key);
            }
        }
        pii_count += output.personal_data.len();
        transaction_count += output.financial_transactions.len();
        flight_count += output.flight_logs.len();
        total_volume += output.financial_transactions.iter().map(|t| t.amount).sum::<f64>();
    }

    println!("Records:      {}", records.len());
    println!("  completed:  {}", count(RecordStatus::Completed));
    println!("  pending:    {}", count(RecordStatus::Pending));
    println!("  processing: {}", count(RecordStatus::Processing));
    println!("  error:      {}", count(RecordStatus::Error));
    println!();
    println!(
        "Entities:     {} distinct ({} mentions)",
        distinct_entities.len(),
        entity_mentions
    );
    println!("PII items:    {pii_count}");
    println!("Transactions: {transaction_count} (volume {total_volume:.2})");
    println!("Flights:      {flight_count}");

    Ok(())
}
