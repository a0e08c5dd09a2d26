//! List command implementation

use anyhow::{bail, Result};

use super::{format_timestamp, short_id, truncate};
use crate::record::RecordStatus;
use crate::store::RecordStore;

pub async fn run(store: &dyn RecordStore, status: Option<String>, limit: usize) -> Result<()> {
    let status = match status.as_deref() {
        Some(s) => match RecordStatus::parse(s) {
            Some(status) => Some(status),
            None => bail!("unknown status '{s}' (expected pending, processing, completed, error)"),
        },
        None => None,
    };

    let records = store.get_all_results().await?;
    let filtered: Vec<_> = records
        .iter()
        .filter(|r| status.map_or(true, |s| r.status == s))
        .take(limit)
        .collect();

    if filtered.is_empty() {
        println!("No records found. Run 'casefile import' first.");
        return Ok(());
    }

    println!(
        "{:<17} {:<10} {:<12} {:>8} {}",
        "Date", "ID", "Status", "Entities", "Query"
    );
    println!("{}", "-".repeat(90));

    for record in filtered {
        let entities = record
            .output
            .as_ref()
            .map(|o| o.key_entities.len())
            .unwrap_or(0);

        println!(
            "{:<17} {:<10} {:<12} {:>8} {}",
            format_timestamp(record.input.timestamp),
            short_id(&record.id),
            record.status.as_str(),
            entities,
            truncate(&record.input.query, 40),
        );
    }

    Ok(())
}
