//! Show command implementation

use anyhow::Result;

use super::format_timestamp;
use crate::store::RecordStore;

pub async fn run(store: &dyn RecordStore, id: &str) -> Result<()> {
    let record = match store.get_result(id).await? {
        Some(record) => record,
        None => {
            println!("Record '{id}' not found.");
            return Ok(());
        }
    };

    println!("Record:  {}", record.id);
    println!("Status:  {}", record.status.as_str());
    println!("Date:    {}", format_timestamp(record.input.timestamp));
    println!("Query:   {}", record.input.query);
    if !record.input.target_url.is_empty() {
        println!("Source:  {}", record.input.target_url);
    }

    let output = match record.output {
        Some(output) => output,
        None => {
            println!("\nNo analysis output attached.");
            return Ok(());
        }
    };

    if !output.context_summary.is_empty() {
        println!("\nSummary:\n{}", output.context_summary);
    }

    if !output.documents.is_empty() {
        println!("\nDocuments ({}):", output.documents.len());
        for doc in &output.documents {
            println!("  - {} [{}] {}", doc.title, doc.doc_type, doc.date);
        }
    }

    if !output.key_entities.is_empty() {
        println!("\nEntities ({}):", output.key_entities.len());
        for entity in &output.key_entities {
            println!("  - {}", entity.as_str());
        }
    }

    if !output.entity_details.is_empty() {
        println!("\nEntity details:");
        for detail in &output.entity_details {
            println!(
                "  - {} ({}) risk {}/10, influence {}/10",
                detail.name, detail.role, detail.risk_level, detail.influence
            );
        }
    }

    if !output.personal_data.is_empty() {
        println!("\nPersonal data ({}):", output.personal_data.len());
        for pii in &output.personal_data {
            println!("  - {} {} (owner: {})", pii.pii_type, pii.value, pii.owner);
        }
    }

    if !output.financial_transactions.is_empty() {
        println!("\nTransactions ({}):", output.financial_transactions.len());
        for txn in &output.financial_transactions {
            println!(
                "  - {} -> {}: {} {} ({})",
                txn.source, txn.destination, txn.amount, txn.currency, txn.date
            );
        }
    }

    if !output.flight_logs.is_empty() {
        println!("\nFlights ({}):", output.flight_logs.len());
        for flight in &output.flight_logs {
            println!(
                "  - {} {} -> {} ({}, {} passengers)",
                flight.aircraft_id,
                flight.departure,
                flight.arrival,
                flight.date,
                flight.passengers.len()
            );
        }
    }

    Ok(())
}
