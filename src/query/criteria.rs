//! Criterion model
//!
//! A criterion is one numeric condition on a lab metric. [`CriteriaList`]
//! holds the ordered sequence the user is editing; it is a plain value the
//! caller owns and threads through each search. Edits that name an unknown
//! id are no-ops.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::catalog;
use crate::error::CqError;

/// Comparison applied between a record's metric and the criterion value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    /// metric >= value
    #[default]
    GreaterOrEqual,
    /// metric <= value
    LessOrEqual,
    /// |metric - value| < tolerance
    Equal,
    /// value <= metric <= value_max
    Between,
}

impl Operator {
    pub const ALL: [Self; 4] = [
        Self::GreaterOrEqual,
        Self::LessOrEqual,
        Self::Equal,
        Self::Between,
    ];

    /// Canonical name, as serialized.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GreaterOrEqual => "greaterOrEqual",
            Self::LessOrEqual => "lessOrEqual",
            Self::Equal => "equal",
            Self::Between => "between",
        }
    }

    /// Short symbol for compact display.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::GreaterOrEqual => "≥",
            Self::LessOrEqual => "≤",
            Self::Equal => "=",
            Self::Between => "between",
        }
    }

    /// Picker label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::GreaterOrEqual => "≥ Greater than or equal",
            Self::LessOrEqual => "≤ Less than or equal",
            Self::Equal => "= Equal to",
            Self::Between => "Between",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = CqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greaterorequal" | "greater" | "gte" | ">=" | "≥" => Ok(Self::GreaterOrEqual),
            "lessorequal" | "less" | "lte" | "<=" | "≤" => Ok(Self::LessOrEqual),
            "equal" | "eq" | "=" | "==" => Ok(Self::Equal),
            "between" | "range" => Ok(Self::Between),
            _ => Err(CqError::invalid_criterion(
                s,
                "unknown operator (expected greaterOrEqual|lessOrEqual|equal|between)",
            )),
        }
    }
}

/// One user-authored filter condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    pub id: String,
    /// Metric key, normally a catalog field
    pub field: String,
    #[serde(default)]
    pub operator: Operator,
    /// Numeric literal as entered; may be empty or malformed
    #[serde(default)]
    pub value: String,
    /// Upper bound for [`Operator::Between`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_max: Option<String>,
}

impl Criterion {
    /// Fresh criterion on `field` with the default operator and an empty value.
    pub fn new(id: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field: field.into(),
            operator: Operator::default(),
            value: String::new(),
            value_max: None,
        }
    }

    /// Apply the fields present in `patch`.
    pub fn apply(&mut self, patch: CriterionPatch) {
        if let Some(operator) = patch.operator {
            self.operator = operator;
        }
        if let Some(value) = patch.value {
            self.value = value;
        }
        if let Some(value_max) = patch.value_max {
            self.value_max = value_max;
        }
    }

    /// Readable form, e.g. `HbA1c (%) ≥ 7.0`.
    #[must_use]
    pub fn describe(&self) -> String {
        let label = catalog::resolve_label(&self.field);
        match self.operator {
            Operator::Between => format!(
                "{label} between {} and {}",
                display_value(&self.value),
                self.value_max.as_deref().map_or("?", display_value)
            ),
            op => format!("{label} {} {}", op.symbol(), display_value(&self.value)),
        }
    }
}

fn display_value(raw: &str) -> &str {
    if raw.is_empty() { "?" } else { raw }
}

/// Partial update for a [`Criterion`]. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriterionPatch {
    pub operator: Option<Operator>,
    pub value: Option<String>,
    /// `Some(None)` clears the upper bound
    pub value_max: Option<Option<String>>,
}

impl CriterionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn value_max(mut self, value_max: impl Into<String>) -> Self {
        self.value_max = Some(Some(value_max.into()));
        self
    }

    #[must_use]
    pub fn clear_value_max(mut self) -> Self {
        self.value_max = Some(None);
        self
    }

    pub const fn is_empty(&self) -> bool {
        self.operator.is_none() && self.value.is_none() && self.value_max.is_none()
    }
}

/// Source of fresh criterion ids.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Short random tokens taken from a v4 UUID.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self) -> String {
        let mut id = uuid::Uuid::new_v4().simple().to_string();
        id.truncate(12);
        id
    }
}

/// Deterministic `<prefix>-<n>` ids.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Ordered sequence of criteria under edit.
///
/// Order never affects evaluation but is kept stable for re-rendering.
/// Several criteria may target the same field; all of them apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CriteriaList {
    items: Vec<Criterion>,
}

impl CriteriaList {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn from_vec(items: Vec<Criterion>) -> Self {
        Self { items }
    }

    /// The walkthrough criteria: HbA1c ≥ 7.0 and eGFR between 60 and 90.
    pub fn example() -> Self {
        Self::from_vec(vec![
            Criterion {
                id: "example-1".to_string(),
                field: "hbA1c".to_string(),
                operator: Operator::GreaterOrEqual,
                value: "7.0".to_string(),
                value_max: None,
            },
            Criterion {
                id: "example-2".to_string(),
                field: "egfr".to_string(),
                operator: Operator::Between,
                value: "60".to_string(),
                value_max: Some("90".to_string()),
            },
        ])
    }

    /// Append a new criterion on `field` with a random id.
    pub fn add(&mut self, field: impl Into<String>) -> &Criterion {
        self.add_with(field, &mut RandomIds)
    }

    /// Append a new criterion on `field`, drawing its id from `ids`.
    ///
    /// Ids already present in the list are skipped.
    pub fn add_with<S: IdSource + ?Sized>(
        &mut self,
        field: impl Into<String>,
        ids: &mut S,
    ) -> &Criterion {
        let mut id = ids.next_id();
        while self.get(&id).is_some() {
            id = ids.next_id();
        }
        let criterion = Criterion::new(id, field);
        trace!(id = %criterion.id, field = %criterion.field, "criterion added");
        self.items.push(criterion);
        let last = self.items.len() - 1;
        &self.items[last]
    }

    /// Merge `patch` into the criterion with `id`. Returns whether one matched.
    pub fn update(&mut self, id: &str, patch: CriterionPatch) -> bool {
        match self.items.iter_mut().find(|c| c.id == id) {
            Some(criterion) => {
                criterion.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Drop the criterion with `id`. Returns whether one was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|c| c.id != id);
        self.items.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&Criterion> {
        self.items.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Criterion> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Criterion] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Criterion> {
        self.items
    }
}

impl<'a> IntoIterator for &'a CriteriaList {
    type Item = &'a Criterion;
    type IntoIter = std::slice::Iter<'a, Criterion>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Extend<Criterion> for CriteriaList {
    fn extend<T: IntoIterator<Item = Criterion>>(&mut self, iter: T) {
        self.items.extend(iter);
    }
}
