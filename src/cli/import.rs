//! Import command implementation

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::record::AnalysisRecord;
use crate::store::RecordStore;

/// Load analysis records from a JSON file (a single record or an array) into
/// the store. Entries that don't match the analysis contract are skipped with
/// a warning; blank ids get a generated UUID.
pub async fn run(store: &dyn RecordStore, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let values = match serde_json::from_str::<Value>(&content)
        .context("input is not valid JSON")?
    {
        Value::Array(values) => values,
        value => vec![value],
    };

    let mut imported = 0usize;
    let mut skipped = 0usize;

    for value in values {
        match serde_json::from_value::<AnalysisRecord>(value) {
            Ok(mut record) => {
                if record.id.is_empty() {
                    record.id = Uuid::new_v4().to_string();
                }
                store.put_result(&record).await?;
                imported += 1;
            }
            Err(e) => {
                warn!(error = %e, "skipping entry that does not match the record contract");
                skipped += 1;
            }
        }
    }

    println!(
        "Imported {imported} records from {} ({skipped} skipped).",
        path.display()
    );
    Ok(())
}
