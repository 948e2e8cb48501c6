//! Result ranking
//!
//! Orders matched records by their precomputed score, highest first. The
//! sort is stable, so equal scores keep the order the evaluator produced.

use serde::{Deserialize, Serialize};

use crate::records::Record;

/// Sort records by descending score without re-filtering or mutating them.
pub fn rank(mut records: Vec<&Record>) -> Vec<&Record> {
    records.sort_by(|a, b| b.score.total_cmp(&a.score));
    records
}

/// Presentation band for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    High,
    Medium,
    Low,
}

impl ScoreTier {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Lower bounds of the high and medium tiers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            high: 85.0,
            medium: 70.0,
        }
    }
}

impl TierThresholds {
    pub fn classify(&self, score: f64) -> ScoreTier {
        if score >= self.high {
            ScoreTier::High
        } else if score >= self.medium {
            ScoreTier::Medium
        } else {
            ScoreTier::Low
        }
    }
}

/// Ranked matches plus the size of the collection they were drawn from.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome<'r> {
    pub records: Vec<&'r Record>,
    pub total: usize,
}

impl<'r> SearchOutcome<'r> {
    pub fn new(records: Vec<&'r Record>, total: usize) -> Self {
        Self { records, total }
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
