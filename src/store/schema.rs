//! SQLite schema definition
//!
//! The store is deliberately key-value shaped: the analysis output lives in a
//! single JSON column and is never queried relationally. The few promoted
//! columns exist only for listing, ordering, and status filtering.

pub const SCHEMA: &str = r#"
-- Analysis records produced by the upstream LLM pipeline
CREATE TABLE IF NOT EXISTS records (
    id TEXT PRIMARY KEY,
    status TEXT NOT NULL DEFAULT 'pending',    -- 'pending' | 'processing' | 'completed' | 'error'
    query TEXT NOT NULL,
    target_url TEXT,
    created_at INTEGER NOT NULL,               -- epoch milliseconds
    output TEXT,                               -- JSON analysis output, NULL until completed
    indexed_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_records_status ON records(status);
CREATE INDEX IF NOT EXISTS idx_records_created ON records(created_at);
"#;
