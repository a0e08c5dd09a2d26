//! Discover command implementation

use anyhow::Result;

use super::{short_id, truncate};
use crate::correlate::find_discoveries;
use crate::store::RecordStore;

/// Links printed under each correlated record.
const LINKS_SHOWN: usize = 5;

pub async fn run(store: &dyn RecordStore, target_id: &str, limit: usize) -> Result<()> {
    let results = find_discoveries(store, target_id).await?;

    if results.is_empty() {
        println!("No correlated records found for '{target_id}'.");
        return Ok(());
    }

    println!(
        "Found {} correlated records for {}:\n",
        results.len(),
        short_id(target_id)
    );

    for result in results.iter().take(limit) {
        let query = match store.get_result(&result.target_id).await? {
            Some(record) => truncate(&record.input.query, 50),
            None => "-".to_string(),
        };
        println!(
            "{:<10} strength {:>3}  {}",
            short_id(&result.target_id),
            result.total_strength,
            query
        );
        for link in result.links.iter().take(LINKS_SHOWN) {
            println!("    [{:>2}] {}", link.strength, link.label);
        }
        if result.links.len() > LINKS_SHOWN {
            println!("    ... and {} more links", result.links.len() - LINKS_SHOWN);
        }
        println!();
    }

    Ok(())
}
