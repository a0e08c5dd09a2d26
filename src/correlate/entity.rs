//! Cross-record entity correlation
//!
//! One linear pass over the full record set, accumulating per-entity signal
//! keyed by normalized name: which investigations mention the entity, how
//! much money flows through it, what PII is attached, and what themes its
//! transactions carry. Produces the global rollup view, never persisted —
//! recomputed fresh on every query.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::normalize::{normalize_name, normalize_name_like};
use super::CorrelationError;
use crate::record::AnalysisRecord;
use crate::store::RecordStore;

/// Baseline risk sample for an entity with no `entityDetails` coverage.
/// Deliberately low but nonzero so unknown entities don't drown out PII and
/// financial signal.
const DEFAULT_RISK_LEVEL: f64 = 3.0;
/// Risk bonus per distinct PII item attached to the entity.
const PII_RISK_BONUS: f64 = 1.5;
/// Risk bonus per investigation the entity appears in.
const OCCURRENCE_RISK_BONUS: f64 = 0.8;
/// Nominal currency threshold above which an entity counts as a financial hub.
const FINANCIAL_HUB_THRESHOLD: f64 = 100_000.0;
/// Theme snippets kept per entity.
const MAX_SHARED_THEMES: usize = 5;
/// Words taken from a transaction description as its theme.
const THEME_SNIPPET_WORDS: usize = 3;

const MAX_RISK_SCORE: f64 = 10.0;

/// Cross-record rollup for one entity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityCorrelation {
    /// First-seen spelling, kept for display.
    pub entity: String,
    /// Distinct investigations mentioning the entity.
    pub occurrences: usize,
    pub related_investigations: Vec<String>,
    pub shared_thematics: Vec<String>,
    /// 0-10.
    pub risk_score: u8,
    pub total_amount_sent: f64,
    pub total_amount_received: f64,
    /// Distinct (type, value) PII pairs attached to the entity.
    pub pii_count: usize,
    pub financial_hub: bool,
}

struct Accumulator {
    display: String,
    investigations: Vec<String>,
    themes: Vec<String>,
    total_risk: f64,
    risk_samples: u32,
    sent: f64,
    received: f64,
    pii: HashSet<String>,
}

impl Accumulator {
    fn seed(display: &str, record_id: &str) -> Self {
        Self {
            display: display.to_string(),
            investigations: vec![record_id.to_string()],
            themes: vec![],
            total_risk: 0.0,
            risk_samples: 0,
            sent: 0.0,
            received: 0.0,
            pii: HashSet::new(),
        }
    }

    fn add_investigation(&mut self, record_id: &str) {
        if !self.investigations.iter().any(|id| id == record_id) {
            self.investigations.push(record_id.to_string());
        }
    }

    fn add_risk_sample(&mut self, risk: f64) {
        self.total_risk += risk;
        self.risk_samples += 1;
    }

    fn add_theme(&mut self, description: &str) {
        let snippet: Vec<&str> = description
            .split_whitespace()
            .take(THEME_SNIPPET_WORDS)
            .collect();
        if snippet.is_empty() {
            return;
        }
        let snippet = snippet.join(" ");
        if !self.themes.contains(&snippet) {
            self.themes.push(snippet);
        }
    }
}

/// Fetch the full record set and compute entity rollups over it.
pub async fn compute_entity_correlations(
    store: &dyn RecordStore,
) -> Result<Vec<EntityCorrelation>, CorrelationError> {
    let records = store.get_all_results().await?;
    Ok(correlate_entities(&records))
}

/// Aggregate every entity's signal across the whole record set.
///
/// Only completed records contribute. Returns correlations sorted by risk
/// score descending; a single uncorroborated, non-financial, non-PII mention
/// is filtered out as noise.
pub fn correlate_entities(records: &[AnalysisRecord]) -> Vec<EntityCorrelation> {
    let mut accumulators: HashMap<String, Accumulator> = HashMap::new();

    for record in records.iter().filter(|r| r.is_completed()) {
        let output = match &record.output {
            Some(output) => output,
            None => continue,
        };

        // Risk levels indexed by normalized name; coverage is partial.
        let risk_by_key: HashMap<String, f64> = output
            .entity_details
            .iter()
            .map(|d| (normalize_name(&d.name), f64::from(d.risk_level)))
            .collect();

        for entity in &output.key_entities {
            let key = normalize_name_like(entity);
            if key.is_empty() {
                continue;
            }
            let risk = risk_by_key.get(&key).copied().unwrap_or(DEFAULT_RISK_LEVEL);
            let acc = accumulators
                .entry(key)
                .or_insert_with(|| Accumulator::seed(entity.as_str(), &record.id));
            acc.add_investigation(&record.id);
            acc.add_risk_sample(risk);
        }

        // PII-only subjects (an owner never listed in keyEntities) still
        // surface: seed them directly from the PII entry.
        for pii in &output.personal_data {
            let key = normalize_name(&pii.owner);
            if key.is_empty() {
                continue;
            }
            let acc = accumulators.entry(key).or_insert_with(|| {
                let mut acc = Accumulator::seed(&pii.owner, &record.id);
                acc.add_risk_sample(DEFAULT_RISK_LEVEL);
                acc
            });
            acc.add_investigation(&record.id);
            acc.pii.insert(format!("{}:{}", pii.pii_type, pii.value));
        }

        // Counterparties accumulate money flow on whichever side they sit,
        // and are seeded if the transaction is their only appearance.
        for txn in &output.financial_transactions {
            for (name, is_source) in [(&txn.source, true), (&txn.destination, false)] {
                let key = normalize_name(name);
                if key.is_empty() {
                    continue;
                }
                let acc = accumulators.entry(key).or_insert_with(|| {
                    let mut acc = Accumulator::seed(name, &record.id);
                    acc.add_risk_sample(DEFAULT_RISK_LEVEL);
                    acc
                });
                acc.add_investigation(&record.id);
                if is_source {
                    acc.sent += txn.amount;
                } else {
                    acc.received += txn.amount;
                }
                acc.add_theme(&txn.description);
            }
        }
    }

    let mut correlations: Vec<EntityCorrelation> = accumulators
        .into_values()
        .filter(|acc| acc.investigations.len() > 1 || acc.sent > 0.0 || !acc.pii.is_empty())
        .map(|acc| {
            let occurrences = acc.investigations.len();
            let base_risk = if acc.risk_samples > 0 {
                acc.total_risk / f64::from(acc.risk_samples)
            } else {
                DEFAULT_RISK_LEVEL
            };
            let score = base_risk
                + acc.pii.len() as f64 * PII_RISK_BONUS
                + occurrences as f64 * OCCURRENCE_RISK_BONUS;
            let risk_score = score.round().clamp(0.0, MAX_RISK_SCORE) as u8;

            EntityCorrelation {
                entity: acc.display,
                occurrences,
                related_investigations: acc.investigations,
                shared_thematics: acc.themes.into_iter().take(MAX_SHARED_THEMES).collect(),
                risk_score,
                total_amount_sent: acc.sent,
                total_amount_received: acc.received,
                pii_count: acc.pii.len(),
                financial_hub: acc.sent > FINANCIAL_HUB_THRESHOLD
                    || acc.received > FINANCIAL_HUB_THRESHOLD,
            }
        })
        .collect();

    correlations.sort_by(|a, b| {
        b.risk_score
            .cmp(&a.risk_score)
            .then(b.occurrences.cmp(&a.occurrences))
            .then_with(|| a.entity.cmp(&b.entity))
    });
    correlations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{
        AnalysisInput, AnalysisOutput, AnalysisRecord, EntityDetail, NameLike, PersonalData,
        RecordStatus, Transaction,
    };

    fn completed(id: &str, output: AnalysisOutput) -> AnalysisRecord {
        AnalysisRecord {
            id: id.to_string(),
            status: RecordStatus::Completed,
            input: AnalysisInput {
                query: format!("query for {id}"),
                target_url: String::new(),
                timestamp: 0,
            },
            output: Some(output),
        }
    }

    fn mentions(id: &str, names: &[&str]) -> AnalysisRecord {
        completed(
            id,
            AnalysisOutput {
                key_entities: names.iter().map(|n| NameLike::from(*n)).collect(),
                ..Default::default()
            },
        )
    }

    fn payment(id: &str, source: &str, destination: &str, amount: f64) -> AnalysisRecord {
        completed(
            id,
            AnalysisOutput {
                financial_transactions: vec![Transaction {
                    source: source.to_string(),
                    destination: destination.to_string(),
                    amount,
                    description: "wire transfer via intermediary".to_string(),
                    ..Default::default()
                }],
                ..Default::default()
            },
        )
    }

    #[test]
    fn single_plain_mention_is_filtered_out() {
        let records = vec![mentions("r1", &["Jeffrey Epstein"])];
        assert!(correlate_entities(&records).is_empty());
    }

    #[test]
    fn repeated_mentions_survive_the_filter() {
        let records = vec![
            mentions("r1", &["Jeffrey Epstein"]),
            mentions("r2", &["EPSTEIN, Jeffrey"]),
        ];

        let correlations = correlate_entities(&records);
        assert_eq!(correlations.len(), 1);
        let epstein = &correlations[0];
        // First-seen spelling wins for display
        assert_eq!(epstein.entity, "Jeffrey Epstein");
        assert_eq!(epstein.occurrences, 2);
        assert_eq!(epstein.related_investigations, vec!["r1", "r2"]);
    }

    #[test]
    fn destination_only_counterparty_becomes_financial_hub() {
        let records = vec![
            payment("r1", "Alpha Trust", "Offshore Corp", 600_000.0),
            payment("r2", "Beta Holdings", "Offshore Corp", 600_000.0),
            payment("r3", "Gamma Partners", "Offshore Corp", 600_000.0),
        ];

        let correlations = correlate_entities(&records);
        let hub = correlations
            .iter()
            .find(|c| c.entity == "Offshore Corp")
            .expect("destination-only counterparty must surface");
        assert_eq!(hub.occurrences, 3);
        assert!(hub.financial_hub);
        assert_eq!(hub.total_amount_received, 1_800_000.0);
        assert_eq!(hub.total_amount_sent, 0.0);
    }

    #[test]
    fn pii_only_owner_surfaces() {
        let records = vec![completed(
            "r1",
            AnalysisOutput {
                personal_data: vec![PersonalData {
                    pii_type: "address".to_string(),
                    value: "9 East 71st Street".to_string(),
                    owner: "Holding Trustee".to_string(),
                    context: String::new(),
                }],
                ..Default::default()
            },
        )];

        let correlations = correlate_entities(&records);
        assert_eq!(correlations.len(), 1);
        assert_eq!(correlations[0].entity, "Holding Trustee");
        assert_eq!(correlations[0].pii_count, 1);
    }

    #[test]
    fn duplicate_pii_pairs_count_once() {
        let pii = PersonalData {
            pii_type: "email".to_string(),
            value: "x@y.com".to_string(),
            owner: "John Doe".to_string(),
            context: String::new(),
        };
        let records = vec![
            completed(
                "r1",
                AnalysisOutput {
                    personal_data: vec![pii.clone()],
                    ..Default::default()
                },
            ),
            completed(
                "r2",
                AnalysisOutput {
                    personal_data: vec![pii],
                    ..Default::default()
                },
            ),
        ];

        let correlations = correlate_entities(&records);
        assert_eq!(correlations[0].pii_count, 1);
        assert_eq!(correlations[0].occurrences, 2);
    }

    #[test]
    fn risk_averages_detail_levels_and_clamps_at_ten() {
        let dangerous = |id: &str| {
            completed(
                id,
                AnalysisOutput {
                    key_entities: vec![NameLike::from("Jeffrey Epstein")],
                    entity_details: vec![EntityDetail {
                        name: "Epstein, Jeffrey".to_string(),
                        role: "principal".to_string(),
                        risk_level: 9,
                        influence: 9,
                    }],
                    personal_data: vec![PersonalData {
                        pii_type: "passport".to_string(),
                        value: "Z1234567".to_string(),
                        owner: "Jeffrey Epstein".to_string(),
                        context: String::new(),
                    }],
                    ..Default::default()
                },
            )
        };
        let records = vec![dangerous("r1"), dangerous("r2")];

        let correlations = correlate_entities(&records);
        // avg 9 + 1 pii * 1.5 + 2 occurrences * 0.8 = 12.1, clamped
        assert_eq!(correlations[0].risk_score, 10);
    }

    #[test]
    fn unknown_entities_get_the_baseline_risk() {
        let records = vec![
            mentions("r1", &["Quiet Figure"]),
            mentions("r2", &["Quiet Figure"]),
        ];

        let correlations = correlate_entities(&records);
        // avg 3.0 + 0 + 2 * 0.8 = 4.6 -> 5
        assert_eq!(correlations[0].risk_score, 5);
    }

    #[test]
    fn themes_come_from_transaction_descriptions() {
        let records = vec![
            payment("r1", "Shell LLC", "Offshore Corp", 10.0),
            payment("r2", "Shell LLC", "Other Corp", 10.0),
        ];

        let correlations = correlate_entities(&records);
        let shell = correlations
            .iter()
            .find(|c| c.entity == "Shell LLC")
            .unwrap();
        assert_eq!(shell.shared_thematics, vec!["wire transfer via"]);
    }

    #[test]
    fn incomplete_records_contribute_nothing() {
        let mut record = mentions("r1", &["Jeffrey Epstein"]);
        record.status = RecordStatus::Processing;
        let records = vec![record, mentions("r2", &["Jeffrey Epstein"])];

        assert!(correlate_entities(&records).is_empty());
    }

    #[test]
    fn output_sorts_by_risk_descending() {
        let records = vec![
            mentions("r1", &["Minor Player", "Central Figure"]),
            mentions("r2", &["Minor Player", "Central Figure"]),
            mentions("r3", &["Central Figure"]),
            mentions("r4", &["Central Figure"]),
        ];

        let correlations = correlate_entities(&records);
        assert_eq!(correlations[0].entity, "Central Figure");
        assert!(correlations[0].risk_score >= correlations[1].risk_score);
    }
}
