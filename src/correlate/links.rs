//! Pairwise link detection between two analysis records
//!
//! Five independent passes, each additive: shared entities, shared PII,
//! shared financial counterparties, shared aircraft, and thematic vocabulary
//! overlap. Matching is exact equality after normalization — no edit-distance
//! fuzziness. Per-record collections are bounded by prompt size, so the
//! O(n*m) pairwise scans are fine.

use std::collections::HashSet;

use serde::Serialize;

use super::normalize::{normalize_name, normalize_name_like};
use crate::record::AnalysisRecord;

/// Identical entity name (post-normalization) in both records.
pub const ENTITY_LINK_STRENGTH: u32 = 8;
/// Identical PII value across records — the strongest real-world signal,
/// since identical contact/identity data rarely recurs by coincidence.
pub const PII_LINK_STRENGTH: u32 = 10;
/// Shared financial counterparty on either side of a transaction.
pub const TRANSACTION_LINK_STRENGTH: u32 = 7;
/// Same aircraft appearing in both records' flight logs.
pub const FLIGHT_LINK_STRENGTH: u32 = 6;
/// Semantic links score `SEMANTIC_LINK_BASE + shared word count`, capped here.
pub const SEMANTIC_LINK_MAX_STRENGTH: u32 = 12;
pub const SEMANTIC_LINK_BASE: u32 = 4;

/// Minimum shared non-stopword vocabulary before a semantic link is emitted.
const MIN_SHARED_THEME_WORDS: usize = 3;
/// Thematic words shorter than this carry no signal.
const MIN_THEME_WORD_LEN: usize = 5;
/// Shared words listed on a semantic link, for display.
const MAX_THEME_WORDS_SHOWN: usize = 4;

/// Links kept per pair after sorting by strength.
const MAX_LINKS_PER_PAIR: usize = 15;
/// Ceiling for a pair's total strength.
const MAX_TOTAL_STRENGTH: u32 = 100;

/// Aircraft id the upstream pipeline emits when the tail number is unknown.
const UNKNOWN_AIRCRAFT: &str = "Unknown";

/// Fixed bilingual (French/English) stop-word list for thematic matching.
/// Words of fewer than five characters are dropped before this list applies.
const STOP_WORDS: &[&str] = &[
    // English
    "about", "above", "after", "again", "against", "although", "because",
    "before", "being", "between", "could", "during", "every", "however",
    "other", "should", "since", "their", "there", "these", "those", "through",
    "under", "where", "which", "while", "would",
    // French
    "ainsi", "alors", "aussi", "autre", "autres", "avant", "celle", "celui",
    "cependant", "cette", "comme", "contre", "depuis", "encore", "entre",
    "leurs", "notre", "pendant", "plusieurs", "selon", "toujours", "toutes",
    "votre",
];

/// The kind of bridge a link represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Entity,
    Pii,
    Transaction,
    Flight,
    Semantic,
}

/// Type-specific payload carried by a link.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RelatedData {
    #[serde(rename_all = "camelCase")]
    Entity { entity: String },
    #[serde(rename_all = "camelCase")]
    Pii { pii_type: String, value: String },
    #[serde(rename_all = "camelCase")]
    Transaction { shared_entity: String },
    #[serde(rename_all = "camelCase")]
    Flight { aircraft_id: String },
    #[serde(rename_all = "camelCase")]
    Semantic { shared_themes: Vec<String> },
}

/// One detected bridge between two records.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationLink {
    #[serde(rename = "type")]
    pub kind: LinkKind,
    pub label: String,
    pub description: String,
    pub strength: u32,
    #[serde(rename = "relatedData")]
    pub related: RelatedData,
}

/// Result of comparing exactly two records.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryResult {
    pub source_id: String,
    pub target_id: String,
    /// Sorted by strength descending, capped at [`MAX_LINKS_PER_PAIR`].
    pub links: Vec<CorrelationLink>,
    /// Sum of every detected link's strength, clamped to [0, 100].
    pub total_strength: u32,
}

impl DiscoveryResult {
    fn empty(source_id: &str, target_id: &str) -> Self {
        Self {
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            links: vec![],
            total_strength: 0,
        }
    }
}

/// Detect every correlation between two records.
///
/// Pure function of its inputs. A record without output contributes zero
/// signal: the result is empty, never an error.
pub fn detect_links(a: &AnalysisRecord, b: &AnalysisRecord) -> DiscoveryResult {
    let (out_a, out_b) = match (&a.output, &b.output) {
        (Some(out_a), Some(out_b)) => (out_a, out_b),
        _ => return DiscoveryResult::empty(&a.id, &b.id),
    };

    let mut links: Vec<CorrelationLink> = vec![];

    // Pass 1: entity overlap
    let keys_b: HashSet<String> = out_b
        .key_entities
        .iter()
        .map(normalize_name_like)
        .filter(|k| !k.is_empty())
        .collect();

    let mut emitted: HashSet<String> = HashSet::new();
    for entity in &out_a.key_entities {
        let key = normalize_name_like(entity);
        if key.is_empty() || !keys_b.contains(&key) || !emitted.insert(key) {
            continue;
        }
        let display = entity.as_str().to_string();
        links.push(CorrelationLink {
            kind: LinkKind::Entity,
            label: format!("Shared entity: {display}"),
            description: format!("{display} appears in both investigations"),
            strength: ENTITY_LINK_STRENGTH,
            related: RelatedData::Entity { entity: display },
        });
    }

    // Pass 2: PII overlap
    for pii_a in &out_a.personal_data {
        if pii_a.value.is_empty() {
            continue;
        }
        for pii_b in &out_b.personal_data {
            if pii_a.pii_type == pii_b.pii_type
                && pii_a.value.to_lowercase() == pii_b.value.to_lowercase()
            {
                links.push(CorrelationLink {
                    kind: LinkKind::Pii,
                    label: format!("Shared {}: {}", pii_a.pii_type, pii_a.value),
                    description: format!(
                        "Identical {} found in both investigations",
                        pii_a.pii_type
                    ),
                    strength: PII_LINK_STRENGTH,
                    related: RelatedData::Pii {
                        pii_type: pii_a.pii_type.clone(),
                        value: pii_a.value.clone(),
                    },
                });
            }
        }
    }

    // Pass 3: financial counterparty overlap
    for txn_a in &out_a.financial_transactions {
        let src_a = normalize_name(&txn_a.source);
        let dst_a = normalize_name(&txn_a.destination);
        for txn_b in &out_b.financial_transactions {
            let src_b = normalize_name(&txn_b.source);
            let dst_b = normalize_name(&txn_b.destination);

            // First matching combination wins; one link per transaction pair.
            let shared = [
                (&src_a, &src_b, &txn_a.source),
                (&dst_a, &dst_b, &txn_a.destination),
                (&src_a, &dst_b, &txn_a.source),
                (&dst_a, &src_b, &txn_a.destination),
            ]
            .into_iter()
            .find(|(lhs, rhs, _)| !lhs.is_empty() && lhs == rhs)
            .map(|(_, _, display)| display.clone());

            if let Some(shared_entity) = shared {
                links.push(CorrelationLink {
                    kind: LinkKind::Transaction,
                    label: format!("Shared counterparty: {shared_entity}"),
                    description: format!(
                        "{shared_entity} appears in transactions in both investigations"
                    ),
                    strength: TRANSACTION_LINK_STRENGTH,
                    related: RelatedData::Transaction { shared_entity },
                });
            }
        }
    }

    // Pass 4: flight overlap
    for flight_a in &out_a.flight_logs {
        if flight_a.aircraft_id.is_empty() || flight_a.aircraft_id == UNKNOWN_AIRCRAFT {
            continue;
        }
        for flight_b in &out_b.flight_logs {
            if flight_a.aircraft_id == flight_b.aircraft_id {
                links.push(CorrelationLink {
                    kind: LinkKind::Flight,
                    label: format!("Shared aircraft: {}", flight_a.aircraft_id),
                    description: format!(
                        "Aircraft {} logged in both investigations",
                        flight_a.aircraft_id
                    ),
                    strength: FLIGHT_LINK_STRENGTH,
                    related: RelatedData::Flight {
                        aircraft_id: flight_a.aircraft_id.clone(),
                    },
                });
            }
        }
    }

    // Pass 5: thematic overlap
    let (order_a, _) = theme_words(&out_a.context_summary);
    let (_, words_b) = theme_words(&out_b.context_summary);
    let shared: Vec<&String> = order_a.iter().filter(|w| words_b.contains(*w)).collect();
    if shared.len() >= MIN_SHARED_THEME_WORDS {
        let strength =
            SEMANTIC_LINK_MAX_STRENGTH.min(SEMANTIC_LINK_BASE + shared.len() as u32);
        let themes: Vec<String> = shared
            .iter()
            .take(MAX_THEME_WORDS_SHOWN)
            .map(|w| w.to_string())
            .collect();
        links.push(CorrelationLink {
            kind: LinkKind::Semantic,
            label: format!("Thematic overlap: {}", themes.join(", ")),
            description: format!("{} significant words shared between summaries", shared.len()),
            strength,
            related: RelatedData::Semantic {
                shared_themes: themes,
            },
        });
    }

    let total: u32 = links.iter().map(|l| l.strength).sum();

    // Stable sort keeps detection order among equal strengths.
    links.sort_by(|x, y| y.strength.cmp(&x.strength));
    links.truncate(MAX_LINKS_PER_PAIR);

    DiscoveryResult {
        source_id: a.id.clone(),
        target_id: b.id.clone(),
        links,
        total_strength: total.min(MAX_TOTAL_STRENGTH),
    }
}

/// Tokenize a summary into significant lowercase words: order of first
/// appearance plus a set for membership tests.
fn theme_words(summary: &str) -> (Vec<String>, HashSet<String>) {
    let mut order = vec![];
    let mut seen = HashSet::new();

    let lowered = summary.to_lowercase();
    for word in lowered.split(|c: char| !c.is_alphanumeric()) {
        if word.chars().count() < MIN_THEME_WORD_LEN || STOP_WORDS.contains(&word) {
            continue;
        }
        if seen.insert(word.to_string()) {
            order.push(word.to_string());
        }
    }

    (order, seen)
}
