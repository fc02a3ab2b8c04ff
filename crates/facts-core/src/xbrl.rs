//! Model of the EDGAR company facts document.
//!
//! The wire shape is `{ "facts": { taxonomy: { concept: { "units": { unit:
//! [fact, ...] } } } } }`. Individual fact fields decode leniently: a
//! malformed date or non-numeric value becomes `None` for that field rather
//! than failing the whole document, so one bad fact degrades to "no data"
//! instead of aborting an extraction.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// A full company facts document for one entity.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CompanyFacts {
    /// CIK number of the entity.
    #[serde(default)]
    pub cik: Option<u64>,
    /// Registrant name.
    #[serde(default, rename = "entityName")]
    pub entity_name: Option<String>,
    /// Facts organized by taxonomy and concept name.
    #[serde(default)]
    pub facts: HashMap<String, HashMap<String, ConceptFacts>>,
}

impl CompanyFacts {
    /// Returns one taxonomy partition by exact name, if present.
    #[must_use]
    pub fn taxonomy(&self, name: &str) -> Option<&HashMap<String, ConceptFacts>> {
        self.facts.get(name)
    }
}

/// All disclosed facts for one concept, partitioned by unit of measure.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConceptFacts {
    /// Human-readable label.
    #[serde(default)]
    pub label: Option<String>,
    /// Concept description.
    #[serde(default)]
    pub description: Option<String>,
    /// Fact lists keyed by unit (USD, shares, pure, ...).
    #[serde(default)]
    pub units: Option<HashMap<String, Vec<Fact>>>,
}

/// One disclosed value with its reporting metadata.
///
/// A fact is immutable once parsed. Duration concepts carry both period
/// bounds; instantaneous (balance-sheet) concepts carry only `end`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    /// Start of the reporting period.
    #[serde(default, deserialize_with = "lenient_date")]
    pub start: Option<NaiveDate>,
    /// End of the reporting period.
    #[serde(default, deserialize_with = "lenient_date")]
    pub end: Option<NaiveDate>,
    /// Reported magnitude; integers and decimals both decode to `f64`.
    #[serde(default, deserialize_with = "lenient_number")]
    pub val: Option<f64>,
    /// Accession number of the source filing.
    #[serde(default)]
    pub accn: Option<String>,
    /// Entity-reported fiscal year.
    #[serde(default, deserialize_with = "lenient_year")]
    pub fy: Option<i32>,
    /// Entity-reported fiscal period (FY, Q1, ...).
    #[serde(default)]
    pub fp: Option<String>,
    /// Filing form code (10-K, 10-Q, 8-K, ...).
    #[serde(default)]
    pub form: Option<String>,
    /// Date the disclosure was filed.
    #[serde(default, deserialize_with = "lenient_date")]
    pub filed: Option<NaiveDate>,
    /// Standardized comparison-period frame tag.
    #[serde(default)]
    pub frame: Option<String>,
}

/// Decodes a `YYYY-MM-DD` string, mapping anything else to `None`.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()))
}

/// Decodes a JSON number (or numeric string), mapping anything else to `None`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok())))
}

/// Decodes an integer year, mapping anything else to `None`.
fn lenient_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_i64().and_then(|y| i32::try_from(y).ok()))
}
