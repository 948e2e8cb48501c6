//! Query evaluator
//!
//! Reduces a record collection to the records passing every active filter.
//! Stages run in a fixed order (text, age, gender, category, criteria) and
//! compose as AND; the result is always a subsequence of the input.
//!
//! Nothing here fails. A missing metric, an unparseable metric, or an
//! unparseable criterion value just means the record does not satisfy that
//! criterion.

use tracing::{debug, trace};

use super::criteria::{Criterion, Operator};
use super::filters::{DemographicFilters, DemographicPredicate};
use crate::records::{Record, parse_number};

/// Tolerance for [`Operator::Equal`].
pub const EQUAL_TOLERANCE: f64 = 0.01;

/// A criterion with its numeric literals parsed once.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledCriterion<'a> {
    pub field: &'a str,
    pub operator: Operator,
    /// `None` when the value text is not a number
    pub value: Option<f64>,
    /// Upper bound for `between`; 0 when absent or not a number
    pub value_max: f64,
}

impl<'a> CompiledCriterion<'a> {
    pub fn compile(criterion: &'a Criterion) -> Self {
        let value = parse_number(&criterion.value);
        if value.is_none() {
            trace!(
                id = %criterion.id,
                field = %criterion.field,
                value = %criterion.value,
                "criterion value is not numeric; it will match nothing"
            );
        }
        let value_max = criterion
            .value_max
            .as_deref()
            .and_then(parse_number)
            .unwrap_or(0.0);

        Self {
            field: &criterion.field,
            operator: criterion.operator,
            value,
            value_max,
        }
    }

    /// Whether `record` satisfies this criterion.
    pub fn matches(&self, record: &Record) -> bool {
        let (Some(metric), Some(value)) = (record.metric(self.field), self.value) else {
            return false;
        };
        match self.operator {
            Operator::GreaterOrEqual => metric >= value,
            Operator::LessOrEqual => metric <= value,
            Operator::Equal => (metric - value).abs() < EQUAL_TOLERANCE,
            Operator::Between => value <= metric && metric <= self.value_max,
        }
    }
}

/// Evaluation stages, in the order they are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Text,
    Age,
    Gender,
    Category,
    Criteria,
}

impl Stage {
    pub const ALL: [Self; 5] = [
        Self::Text,
        Self::Age,
        Self::Gender,
        Self::Category,
        Self::Criteria,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Age => "age",
            Self::Gender => "gender",
            Self::Category => "category",
            Self::Criteria => "criteria",
        }
    }
}

/// Filters and criteria prepared for matching.
///
/// Independent of where records come from, so the same query can be applied
/// to any batch of records with identical results.
#[derive(Debug, Clone)]
pub struct Query<'a> {
    demographics: DemographicPredicate<'a>,
    criteria: Vec<CompiledCriterion<'a>>,
}

impl<'a> Query<'a> {
    pub fn new(filters: &'a DemographicFilters, criteria: &'a [Criterion]) -> Self {
        Self {
            demographics: filters.predicate(),
            criteria: criteria.iter().map(CompiledCriterion::compile).collect(),
        }
    }

    /// Whether a stage filters anything. An empty criteria list is inactive.
    pub fn is_active(&self, stage: Stage) -> bool {
        match stage {
            Stage::Text => self.demographics.text_active(),
            Stage::Age => self.demographics.age_active(),
            Stage::Gender => self.demographics.gender_active(),
            Stage::Category => self.demographics.category_active(),
            Stage::Criteria => !self.criteria.is_empty(),
        }
    }

    pub fn passes(&self, stage: Stage, record: &Record) -> bool {
        match stage {
            Stage::Text => self.demographics.text(record),
            Stage::Age => self.demographics.age(record),
            Stage::Gender => self.demographics.gender(record),
            Stage::Category => self.demographics.category(record),
            Stage::Criteria => self.criteria.iter().all(|c| c.matches(record)),
        }
    }

    /// Whether `record` passes every stage.
    pub fn matches(&self, record: &Record) -> bool {
        Stage::ALL.iter().all(|stage| self.passes(*stage, record))
    }

    /// Keep the records of `batch` that match, preserving order.
    pub fn apply<'r>(&self, batch: &'r [Record]) -> Vec<&'r Record> {
        batch.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Records passing all demographic filters and all criteria, in input order.
pub fn evaluate<'r>(
    records: &'r [Record],
    filters: &DemographicFilters,
    criteria: &[Criterion],
) -> Vec<&'r Record> {
    let query = Query::new(filters, criteria);
    let mut survivors: Vec<&Record> = records.iter().collect();

    for stage in Stage::ALL {
        if !query.is_active(stage) {
            continue;
        }
        survivors.retain(|record| query.passes(stage, record));
        debug!(stage = stage.name(), remaining = survivors.len(), "filter stage applied");
    }

    survivors
}
