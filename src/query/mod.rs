//! Query evaluation and ranking
//!
//! A search is a pure function of the record collection, the demographic
//! filters and the criteria list: [`evaluate`] keeps the matching records in
//! input order and [`rank`] orders them by score. [`search`] runs both.

pub mod criteria;
pub mod evaluator;
pub mod filters;
pub mod parse;
pub mod ranking;

pub use criteria::{
    CriteriaList, Criterion, CriterionPatch, IdSource, Operator, RandomIds, SequentialIds,
};
pub use evaluator::{CompiledCriterion, EQUAL_TOLERANCE, Query, Stage, evaluate};
pub use filters::{DemographicFilters, DemographicPredicate};
pub use parse::{CriterionSpec, extend_from_specs};
pub use ranking::{ScoreTier, SearchOutcome, TierThresholds, rank};

use crate::records::Record;

/// Evaluate then rank. The result is recomputed from scratch on every call.
pub fn search<'r>(
    records: &'r [Record],
    filters: &DemographicFilters,
    criteria: &[Criterion],
) -> SearchOutcome<'r> {
    let matched = evaluate(records, filters, criteria);
    SearchOutcome::new(rank(matched), records.len())
}
