//! Cross-record correlation engine
//!
//! Discovers which analysis records share entities, PII, financial
//! counterparties, aircraft, or thematic vocabulary, and scores the strength
//! of those connections. Two independent views over the same records:
//! - pairwise discoveries (one target vs. every other record)
//! - global per-entity rollups (risk, money flow, PII across the whole set)
//!
//! The engine only reads from the record store and holds no state of its own;
//! every result is recomputed per query.

mod discovery;
mod entity;
mod links;
mod normalize;

pub use discovery::find_discoveries;
pub use entity::{compute_entity_correlations, correlate_entities, EntityCorrelation};
pub use links::{detect_links, CorrelationLink, DiscoveryResult, LinkKind, RelatedData};
pub use normalize::{normalize_name, normalize_name_like};

use thiserror::Error;

/// Failure at the correlation boundary.
///
/// An `Ok` with an empty vector means "no correlations found"; an error means
/// the record store could not be read. The two are deliberately distinct.
#[derive(Debug, Error)]
pub enum CorrelationError {
    #[error("record store access failed: {0}")]
    Store(#[from] anyhow::Error),
}
