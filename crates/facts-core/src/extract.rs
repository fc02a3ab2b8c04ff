//! Concept resolution and metric extraction.
//!
//! [`extract_metrics`] turns a raw [`CompanyFacts`] document into a
//! [`Metrics`] mapping by resolving each canonical metric against an ordered
//! list of acceptable concept names, restricted to annual (10-K) USD facts.
//!
//! Resolution is first-match-wins on concept *presence*: once a candidate
//! concept exists in the document, an empty qualifying set yields `None`
//! without trying later candidates. This mirrors how the figures have
//! historically been reported; changing it would alter the published metrics
//! for real entities, so the wider-coverage behavior is only available behind
//! [`ExtractOptions::fall_through_on_empty`].

use std::collections::HashMap;
use tracing::debug;

use crate::types::{Metric, Metrics};
use crate::xbrl::{CompanyFacts, ConceptFacts};

/// Taxonomy the canonical metrics are resolved from.
pub const US_GAAP_TAXONOMY: &str = "us-gaap";

/// Form code for audited annual reports.
pub const ANNUAL_REPORT_FORM: &str = "10-K";

/// Unit filter for monetary facts.
pub const UNIT_USD: &str = "USD";

/// Options controlling concept resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Continue to the next candidate concept when a present concept yields
    /// no qualifying facts. Off by default; see the module docs.
    pub fall_through_on_empty: bool,
}

/// Acceptable source concepts for a canonical metric, in preference order.
///
/// Earlier entries are more universally reported: `Revenues` is tried before
/// the verbose contract-revenue concept.
#[must_use]
pub const fn candidate_concepts(metric: Metric) -> &'static [&'static str] {
    match metric {
        Metric::Revenue => &[
            "Revenues",
            "RevenueFromContractWithCustomerExcludingAssessedTax",
        ],
        Metric::NetIncome => &["NetIncomeLoss"],
        Metric::TotalAssets => &["Assets"],
        Metric::TotalLiabilities => &["Liabilities"],
    }
}

/// Resolves the best single value for an ordered list of candidate concepts.
///
/// The first candidate present as a key in `concepts` is selected; its facts
/// are filtered to the requested unit and accepted forms, and the fact with
/// the latest `end` date wins, ties broken by latest `filed` date. Facts
/// missing a period end or a numeric value are ignored. Concept matching is
/// case-sensitive and exact.
#[must_use]
pub fn resolve_concept(
    concepts: &HashMap<String, ConceptFacts>,
    candidates: &[&str],
    accepted_forms: &[&str],
    unit: &str,
    options: ExtractOptions,
) -> Option<f64> {
    for candidate in candidates {
        let Some(concept) = concepts.get(*candidate) else {
            continue;
        };
        let value = latest_qualifying(concept, accepted_forms, unit);
        if value.is_some() || !options.fall_through_on_empty {
            return value;
        }
        debug!(concept = candidate, "present but no qualifying facts, falling through");
    }
    None
}

/// Picks the most recently ended qualifying fact for one concept.
fn latest_qualifying(concept: &ConceptFacts, accepted_forms: &[&str], unit: &str) -> Option<f64> {
    let facts = concept.units.as_ref()?.get(unit)?;
    facts
        .iter()
        .filter(|f| f.form.as_deref().is_some_and(|form| accepted_forms.contains(&form)))
        .filter(|f| f.end.is_some() && f.val.is_some())
        .max_by_key(|f| (f.end, f.filed))
        .and_then(|f| f.val)
}

/// Extracts the four canonical metrics from a company facts document.
///
/// Only the `us-gaap` taxonomy partition is consulted; if it is absent every
/// metric resolves to `None`, which is an empty result rather than an error.
/// Each metric resolves independently, so partial results are the norm.
#[must_use]
pub fn extract_metrics(facts: &CompanyFacts) -> Metrics {
    extract_metrics_with(facts, ExtractOptions::default())
}

/// [`extract_metrics`] with explicit resolution options.
#[must_use]
pub fn extract_metrics_with(facts: &CompanyFacts, options: ExtractOptions) -> Metrics {
    let mut metrics = Metrics::default();

    let Some(gaap) = facts.taxonomy(US_GAAP_TAXONOMY) else {
        debug!("facts document has no us-gaap taxonomy");
        return metrics;
    };

    for metric in Metric::ALL {
        let value = resolve_concept(
            gaap,
            candidate_concepts(metric),
            &[ANNUAL_REPORT_FORM],
            UNIT_USD,
            options,
        );
        if value.is_none() {
            debug!(metric = %metric, "no qualifying annual fact");
        }
        metrics.set(metric, value);
    }

    metrics
}
