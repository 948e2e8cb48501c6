//! Property-based tests for query evaluation and ranking.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use proptest::prelude::*;

use clinquery::query::{
    Criterion, DemographicFilters, Operator, evaluate, rank, search,
};
use clinquery::records::{MetricValue, Record};

const FIELDS: &[&str] = &["hbA1c", "egfr", "bmi", "ldlCholesterol", "tsh"];

fn arb_record(id: String) -> impl Strategy<Value = Record> {
    (
        0u32..100,
        prop::sample::select(&["Female", "Male"][..]),
        prop::collection::btree_map(
            prop::sample::select(FIELDS),
            prop_oneof![
                6 => (0.0f64..200.0).prop_map(MetricValue::Number),
                1 => (0.0f64..200.0).prop_map(|n| MetricValue::Text(n.to_string())),
                1 => Just(MetricValue::Missing),
            ],
            0..FIELDS.len(),
        ),
        prop_oneof![4 => 0.0f64..100.0, 1 => Just(50.0)],
    )
        .prop_map(move |(age, gender, metrics, score)| Record {
            id: id.clone(),
            name: format!("Subject {id}"),
            age,
            gender: gender.to_string(),
            diagnoses: Vec::new(),
            medications: Vec::new(),
            last_visit: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            metrics: metrics
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect::<BTreeMap<_, _>>(),
            score,
        })
}

fn arb_records() -> impl Strategy<Value = Vec<Record>> {
    (0usize..24).prop_flat_map(|len| {
        (0..len)
            .map(|i| arb_record(format!("r{i}")))
            .collect::<Vec<_>>()
    })
}

fn arb_criterion() -> impl Strategy<Value = Criterion> {
    (
        prop::sample::select(FIELDS),
        prop::sample::select(Operator::ALL.to_vec()),
        0.0f64..200.0,
        prop::option::of(0.0f64..200.0),
    )
        .prop_map(|(field, operator, value, max)| {
            let mut criterion = Criterion::new(format!("c-{field}"), field);
            criterion.operator = operator;
            criterion.value = format!("{value:.1}");
            criterion.value_max = max.map(|m| format!("{m:.1}"));
            criterion
        })
}

fn arb_filters() -> impl Strategy<Value = DemographicFilters> {
    (
        prop::option::of(0u32..100),
        prop::option::of(0u32..100),
        prop::option::of(prop::sample::select(&["Female", "Male"][..])),
    )
        .prop_map(|(age_min, age_max, gender)| {
            let mut filters = DemographicFilters::new();
            if let Some(age) = age_min {
                filters = filters.with_age_min(age);
            }
            if let Some(age) = age_max {
                filters = filters.with_age_max(age);
            }
            if let Some(gender) = gender {
                filters = filters.with_gender(gender);
            }
            filters
        })
}

fn ids(records: &[&Record]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn evaluate_returns_input_subsequence(
        records in arb_records(),
        filters in arb_filters(),
        criteria in prop::collection::vec(arb_criterion(), 0..4),
    ) {
        let matched = evaluate(&records, &filters, &criteria);
        let mut source = records.iter().map(|r| r.id.as_str());
        for record in &matched {
            prop_assert!(source.any(|id| id == record.id));
        }
    }

    #[test]
    fn records_missing_a_criterion_field_never_match(
        records in arb_records(),
        criterion in arb_criterion(),
    ) {
        let matched = evaluate(&records, &DemographicFilters::new(), std::slice::from_ref(&criterion));
        for record in matched {
            prop_assert!(record.metric(&criterion.field).is_some());
        }
    }

    #[test]
    fn demographic_bounds_hold(records in arb_records(), filters in arb_filters()) {
        for record in evaluate(&records, &filters, &[]) {
            prop_assert!(filters.age_min.is_none_or(|min| record.age >= min));
            prop_assert!(filters.age_max.is_none_or(|max| record.age <= max));
            if let Some(gender) = &filters.gender {
                prop_assert_eq!(&record.gender, gender);
            }
        }
    }

    #[test]
    fn evaluation_is_idempotent(
        records in arb_records(),
        filters in arb_filters(),
        criteria in prop::collection::vec(arb_criterion(), 0..4),
    ) {
        let first = evaluate(&records, &filters, &criteria);
        let owned: Vec<Record> = first.iter().map(|r| (*r).clone()).collect();
        let second = evaluate(&owned, &filters, &criteria);
        prop_assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn criteria_order_does_not_matter(
        records in arb_records(),
        mut criteria in prop::collection::vec(arb_criterion(), 0..4),
    ) {
        let filters = DemographicFilters::new();
        let forward = ids(&evaluate(&records, &filters, &criteria));
        criteria.reverse();
        let reversed = ids(&evaluate(&records, &filters, &criteria));
        prop_assert_eq!(forward, reversed);
    }

    #[test]
    fn ranking_is_descending_and_stable(records in arb_records()) {
        let input: Vec<&Record> = records.iter().collect();
        let ranked = rank(input);
        prop_assert_eq!(ranked.len(), records.len());

        for pair in ranked.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                let position = |id: &str| records.iter().position(|r| r.id == id);
                prop_assert!(position(&pair[0].id) < position(&pair[1].id));
            }
        }
    }

    #[test]
    fn search_total_counts_the_whole_set(
        records in arb_records(),
        filters in arb_filters(),
        criteria in prop::collection::vec(arb_criterion(), 0..3),
    ) {
        let outcome = search(&records, &filters, &criteria);
        prop_assert_eq!(outcome.total, records.len());
        prop_assert!(outcome.count() <= outcome.total);
    }
}
