//! Analysis record data model
//!
//! Records are produced upstream by an LLM-driven analysis pipeline and are
//! schema-loose by nature: every output collection is optional, spellings are
//! inconsistent, and some name fields arrive as plain strings or as objects
//! depending on the prompt that generated them. Everything here defaults to
//! "empty" on missing data so the correlation layer never has to care.

use serde::{Deserialize, Serialize};

/// Lifecycle state of an analysis record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

impl RecordStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(RecordStatus::Pending),
            "processing" => Some(RecordStatus::Processing),
            "completed" => Some(RecordStatus::Completed),
            "error" => Some(RecordStatus::Error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "pending",
            RecordStatus::Processing => "processing",
            RecordStatus::Completed => "completed",
            RecordStatus::Error => "error",
        }
    }
}

/// One completed (or in-flight) investigation unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: String,
    pub status: RecordStatus,
    pub input: AnalysisInput,
    #[serde(default)]
    pub output: Option<AnalysisOutput>,
}

impl AnalysisRecord {
    /// Correlation only ever looks at completed records with output attached.
    /// Anything else is zero signal, never an error.
    pub fn is_completed(&self) -> bool {
        self.status == RecordStatus::Completed && self.output.is_some()
    }
}

/// The query that produced a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInput {
    pub query: String,
    #[serde(default)]
    pub target_url: String,
    /// Epoch milliseconds.
    #[serde(default)]
    pub timestamp: i64,
}

/// Semi-structured extraction result. All collections treat missing as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisOutput {
    pub context_summary: String,
    pub documents: Vec<DocumentSummary>,
    pub key_entities: Vec<NameLike>,
    pub entity_details: Vec<EntityDetail>,
    pub personal_data: Vec<PersonalData>,
    pub financial_transactions: Vec<Transaction>,
    pub flight_logs: Vec<FlightLog>,
}

/// One source document referenced by an analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentSummary {
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub description: String,
    pub date: String,
    pub key_facts: Vec<String>,
    pub legal_implications: String,
}

/// Risk/influence detail for one named entity. Not guaranteed to cover every
/// name in `key_entities`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityDetail {
    pub name: String,
    pub role: String,
    /// 0-10.
    pub risk_level: u8,
    /// 0-10.
    pub influence: u8,
}

/// One personally-identifying data point tied to an owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalData {
    /// email, phone, address, passport, ssn, ...
    #[serde(rename = "type")]
    pub pii_type: String,
    pub value: String,
    pub owner: String,
    pub context: String,
}

/// One extracted financial transfer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transaction {
    pub source: String,
    pub destination: String,
    pub amount: f64,
    pub currency: String,
    pub date: String,
    pub description: String,
}

/// One extracted flight log entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlightLog {
    pub aircraft_id: String,
    pub departure: String,
    pub arrival: String,
    pub date: String,
    pub passengers: Vec<NameLike>,
    pub description: String,
}

/// A name that arrives either as a plain string or as an object carrying a
/// name field. The source data is bilingual, so the object form sometimes
/// spells the field `nom`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NameLike {
    Plain(String),
    Named {
        #[serde(alias = "nom")]
        name: String,
    },
}

impl NameLike {
    /// Resolve to the underlying string form.
    pub fn as_str(&self) -> &str {
        match self {
            NameLike::Plain(s) => s,
            NameLike::Named { name } => name,
        }
    }
}

impl From<&str> for NameLike {
    fn from(s: &str) -> Self {
        NameLike::Plain(s.to_string())
    }
}
