//! clinquery search - Filter and rank records
//!
//! Builds the demographic filters and the criteria list from flags, runs
//! the evaluator and ranker over the chosen record set, and prints the
//! ranked results.

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::{debug, info};

use crate::app::AppContext;
use crate::cli::formatters::SearchResults;
use crate::cli::output::emit;
use crate::error::Result;
use crate::query::{
    CriteriaList, DemographicFilters, SequentialIds, extend_from_specs, search,
};

use super::criteria::load_criteria;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Record file (.json, .yaml, .yml); defaults to [data] records_path or the built-in samples
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Case-insensitive text matched against name and id
    #[arg(long)]
    pub query: Option<String>,

    /// Minimum age (inclusive)
    #[arg(long)]
    pub age_min: Option<u32>,

    /// Maximum age (inclusive)
    #[arg(long)]
    pub age_max: Option<u32>,

    /// Exact gender, or "any"
    #[arg(long, short = 'g')]
    pub gender: Option<String>,

    /// Diagnosis tag substring, or "any"
    #[arg(long, short = 'd')]
    pub diagnosis: Option<String>,

    /// Lab criterion: field>=v, field<=v, field=v or field:min..max (repeatable)
    #[arg(long, short = 'c', value_name = "SPEC")]
    pub criterion: Vec<String>,

    /// JSON criteria file written by `clinquery criteria`
    #[arg(long)]
    pub criteria_file: Option<PathBuf>,

    /// Add the example criteria (HbA1c >= 7.0, eGFR 60..90)
    #[arg(long)]
    pub example: bool,
}

impl SearchArgs {
    /// Demographic filters described by the flags.
    pub fn filters(&self) -> DemographicFilters {
        let mut filters = DemographicFilters::new();
        if let Some(query) = &self.query {
            filters = filters.with_text(query.as_str());
        }
        if let Some(age) = self.age_min {
            filters = filters.with_age_min(age);
        }
        if let Some(age) = self.age_max {
            filters = filters.with_age_max(age);
        }
        if let Some(gender) = &self.gender {
            filters = filters.with_gender(gender.as_str());
        }
        if let Some(tag) = &self.diagnosis {
            filters = filters.with_category_tag(tag.as_str());
        }
        filters
    }

    /// Criteria from the file, then the example set, then `--criterion` flags.
    pub fn criteria(&self) -> Result<CriteriaList> {
        let mut criteria = match &self.criteria_file {
            Some(path) => load_criteria(path)?,
            None => CriteriaList::new(),
        };
        if self.example {
            criteria.extend(CriteriaList::example().into_vec());
        }
        extend_from_specs(&mut criteria, &self.criterion, &mut SequentialIds::new("cli"))?;
        Ok(criteria)
    }

    fn data_path(&self) -> Option<&Path> {
        self.data.as_deref()
    }
}

pub fn run(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let filters = args.filters();
    let criteria = args.criteria()?;
    let records = ctx.load_records(args.data_path())?;

    debug!(?filters, criteria = criteria.len(), "running search");
    let outcome = search(records.records(), &filters, criteria.as_slice());
    info!(
        matched = outcome.count(),
        total = outcome.total,
        "search complete"
    );

    let results = SearchResults::new(outcome)
        .with_criteria(criteria.iter().map(|c| c.describe()).collect())
        .with_tiers(ctx.config.ranking.thresholds())
        .with_display(ctx.config.display.max_tags, ctx.config.display.show_tiers);
    emit(&results, ctx.output_format);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Operator;
    use crate::test_utils::fixtures::UnitTestFixture;

    fn args() -> SearchArgs {
        SearchArgs {
            data: None,
            query: None,
            age_min: None,
            age_max: None,
            gender: None,
            diagnosis: None,
            criterion: Vec::new(),
            criteria_file: None,
            example: false,
        }
    }

    #[test]
    fn flags_build_filters() {
        let mut a = args();
        a.query = Some("chen".into());
        a.age_min = Some(40);
        a.gender = Some("any".into());
        a.diagnosis = Some("diabetes".into());

        let filters = a.filters();
        assert_eq!(filters.text_query, "chen");
        assert_eq!(filters.age_min, Some(40));
        assert!(filters.gender.is_none());
        assert_eq!(filters.category_tag.as_deref(), Some("diabetes"));
    }

    #[test]
    fn criteria_sources_are_concatenated_in_order() {
        let fixture = UnitTestFixture::new();
        let path = fixture.create_file(
            "saved.json",
            r#"[{"id": "saved-1", "field": "bmi", "operator": "greaterOrEqual", "value": "30"}]"#,
        );

        let mut a = args();
        a.criteria_file = Some(path);
        a.example = true;
        a.criterion = vec!["tsh<=4".into()];

        let criteria = a.criteria().unwrap();
        let ids: Vec<_> = criteria.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["saved-1", "example-1", "example-2", "cli-1"]);
        assert_eq!(criteria.get("cli-1").unwrap().operator, Operator::LessOrEqual);
    }

    #[test]
    fn malformed_criterion_flag_is_error() {
        let mut a = args();
        a.criterion = vec!["hbA1c".into()];
        assert!(a.criteria().is_err());
    }
}
