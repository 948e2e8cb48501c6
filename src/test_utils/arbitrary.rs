use std::collections::BTreeMap;

use chrono::NaiveDate;
use proptest::prelude::*;

use crate::catalog::FIELD_CATALOG;
use crate::query::{Criterion, DemographicFilters, Operator};
use crate::records::{MetricValue, Record};

const GENDERS: &[&str] = &["Female", "Male", "Other"];
const TAGS: &[&str] = &[
    "Type 2 Diabetes",
    "Hypertension",
    "Hyperlipidemia",
    "CAD",
    "Prediabetes",
    "CKD Stage 3",
];

fn arb_field() -> impl Strategy<Value = String> {
    prop_oneof![
        9 => prop::sample::select(FIELD_CATALOG).prop_map(|f| f.key.to_string()),
        1 => Just("ferritin".to_string()),
    ]
}

fn arb_metric() -> impl Strategy<Value = MetricValue> {
    prop_oneof![
        8 => (0.0f64..400.0).prop_map(MetricValue::Number),
        1 => (0.0f64..400.0).prop_map(|n| MetricValue::Text(format!("{n:.1}"))),
        1 => Just(MetricValue::Missing),
    ]
}

fn arb_operator() -> impl Strategy<Value = Operator> {
    prop::sample::select(Operator::ALL.to_vec())
}

fn arb_value_text() -> impl Strategy<Value = String> {
    prop_oneof![
        8 => (0.0f64..400.0).prop_map(|n| format!("{n:.1}")),
        1 => Just(String::new()),
        1 => Just("abc".to_string()),
    ]
}

/// Generate an arbitrary record with id `id`.
pub fn arb_record(id: String) -> impl Strategy<Value = Record> {
    (
        "[A-Z][a-z]{2,8} [A-Z][a-z]{2,10}",
        0u32..100,
        prop::sample::select(GENDERS),
        prop::sample::subsequence(TAGS, 0..=3),
        prop::collection::btree_map(arb_field(), arb_metric(), 0..8),
        0.0f64..100.0,
    )
        .prop_map(move |(name, age, gender, tags, metrics, score)| Record {
            id: id.clone(),
            name,
            age,
            gender: gender.to_string(),
            diagnoses: tags.into_iter().map(str::to_string).collect(),
            medications: Vec::new(),
            last_visit: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            metrics: metrics.into_iter().collect::<BTreeMap<_, _>>(),
            score,
        })
}

/// Generate a collection of records with distinct ids.
pub fn arb_records(max: usize) -> impl Strategy<Value = Vec<Record>> {
    (0..=max).prop_flat_map(|len| {
        (0..len)
            .map(|i| arb_record(format!("{i:06}")))
            .collect::<Vec<_>>()
    })
}

/// Generate an arbitrary criterion.
pub fn arb_criterion() -> impl Strategy<Value = Criterion> {
    (
        "[a-z0-9]{8}",
        arb_field(),
        arb_operator(),
        arb_value_text(),
        prop::option::of(arb_value_text()),
    )
        .prop_map(|(id, field, operator, value, value_max)| Criterion {
            id,
            field,
            operator,
            value,
            value_max,
        })
}

/// Generate arbitrary demographic filters, most of them sparse.
pub fn arb_filters() -> impl Strategy<Value = DemographicFilters> {
    (
        prop_oneof![3 => Just(String::new()), 1 => "[a-z0-9]{1,3}"],
        prop::option::of(0u32..100),
        prop::option::of(0u32..100),
        prop::option::of(prop::sample::select(GENDERS)),
        prop::option::of(prop::sample::select(TAGS)),
    )
        .prop_map(|(text, age_min, age_max, gender, tag)| DemographicFilters {
            text_query: text,
            age_min,
            age_max,
            gender: gender.map(str::to_string),
            category_tag: tag.map(|t| t.split_whitespace().next().unwrap_or(t).to_lowercase()),
        })
}
