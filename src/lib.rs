pub mod cli;
pub mod config;
pub mod correlate;
pub mod record;
pub mod store;

pub use config::Config;
pub use correlate::{CorrelationError, DiscoveryResult, EntityCorrelation};
pub use record::AnalysisRecord;
pub use store::{RecordStore, SqliteStore};
