//! Delete command implementation

use anyhow::Result;

use crate::store::RecordStore;

pub async fn run(store: &dyn RecordStore, id: &str) -> Result<()> {
    if store.delete_result(id).await? {
        println!("Deleted record '{id}'.");
    } else {
        println!("Record '{id}' not found.");
    }
    Ok(())
}
