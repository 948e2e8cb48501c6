//! Searchable records
//!
//! A [`Record`] is one subject under search: fixed demographic attributes,
//! a sparse map of lab metrics, and an externally assigned ranking score.
//! [`RecordSet`] owns a validated collection (unique ids) and knows how to
//! load one from JSON or YAML.

mod sample;

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog;
use crate::error::{CqError, Result};

pub use sample::sample_records;

/// A metric as it appears in source data.
///
/// Sources mix numbers, numeric strings and nulls for the same key, so the
/// raw shape is kept here and normalised once through [`MetricValue::as_number`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
    Missing,
}

impl MetricValue {
    /// Numeric reading of this value, `None` when absent or not a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if !n.is_nan() => Some(*n),
            Self::Number(_) | Self::Missing => None,
            Self::Text(raw) => parse_number(raw),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Parse user- or file-supplied numeric text.
///
/// Reads the longest numeric prefix after leading whitespace, so `"7.8 %"`
/// is 7.8 and trailing units are ignored. Accepted: optional sign, digits
/// with an optional fraction (`"5."` and `".5"` included), an optional
/// exponent, or the word `Infinity`. Anything else, including `inf` and
/// `NaN`, is `None`.
#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if text[end..].starts_with("Infinity") {
        return Some(if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse::<f64>().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// One searchable subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Stable identifier, unique within a [`RecordSet`]
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    /// Category tags (diagnoses), in source order
    #[serde(default, alias = "tags")]
    pub diagnoses: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    pub last_visit: NaiveDate,
    /// Lab metrics keyed by catalog field key
    #[serde(default, alias = "labValues")]
    pub metrics: BTreeMap<String, MetricValue>,
    /// Precomputed relevance; only used for ordering
    #[serde(alias = "eligibilityScore")]
    pub score: f64,
}

impl Record {
    /// Numeric value of a metric, `None` when the record has no usable value.
    #[must_use]
    pub fn metric(&self, key: &str) -> Option<f64> {
        self.metrics.get(key).and_then(MetricValue::as_number)
    }
}

/// Either a bare list of records or `{ "records": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordFile {
    List(Vec<Record>),
    Wrapped { records: Vec<Record> },
}

impl RecordFile {
    fn into_records(self) -> Vec<Record> {
        match self {
            Self::List(records) | Self::Wrapped { records } => records,
        }
    }
}

/// A validated record collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    /// Build a set, rejecting duplicate ids.
    pub fn new(records: Vec<Record>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                return Err(CqError::DuplicateRecordId(record.id.clone()));
            }
        }
        Ok(Self { records })
    }

    /// The built-in reference records.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            records: sample_records(),
        }
    }

    /// Load records from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let raw = std::fs::read_to_string(path)?;
        let file: RecordFile = match extension.as_deref() {
            Some("json") => serde_json::from_str(&raw).map_err(|err| {
                CqError::InvalidRecordSet(format!("{}: {err}", path.display()))
            })?,
            Some("yaml" | "yml") => serde_yaml::from_str(&raw).map_err(|err| {
                CqError::InvalidRecordSet(format!("{}: {err}", path.display()))
            })?,
            _ => return Err(CqError::UnsupportedFormat(path.display().to_string())),
        };

        let set = Self::new(file.into_records())?;
        set.log_uncatalogued_metrics();
        info!(path = %path.display(), records = set.len(), "loaded record set");
        Ok(set)
    }

    /// Load from `path` when given, otherwise fall back to the sample set.
    pub fn load_or_sample(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                debug!("no record file configured, using sample records");
                Ok(Self::sample())
            }
        }
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn log_uncatalogued_metrics(&self) {
        let unknown: HashSet<&str> = self
            .records
            .iter()
            .flat_map(|r| r.metrics.keys())
            .map(String::as_str)
            .filter(|key| !catalog::is_known(key))
            .collect();
        if !unknown.is_empty() {
            let mut keys: Vec<_> = unknown.into_iter().collect();
            keys.sort_unstable();
            debug!(keys = ?keys, "records carry metrics outside the field catalog");
        }
    }
}
