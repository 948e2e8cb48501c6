//! Criterion text syntax
//!
//! Command-line criteria are written as `field>=value`, `field<=value`,
//! `field=value` (or `==`) and `field:min..max`. Parsing checks the shape
//! only; a non-numeric value is accepted with a warning because the
//! evaluator already treats it as "never matches".

use tracing::warn;

use super::criteria::{CriteriaList, CriterionPatch, IdSource, Operator};
use crate::catalog;
use crate::error::{CqError, Result};
use crate::records::parse_number;

/// Operator tokens, longest first so `>=` wins over `=`.
const OPERATOR_TOKENS: &[(&str, Operator)] = &[
    (">=", Operator::GreaterOrEqual),
    ("<=", Operator::LessOrEqual),
    ("==", Operator::Equal),
    ("≥", Operator::GreaterOrEqual),
    ("≤", Operator::LessOrEqual),
    ("=", Operator::Equal),
];

/// A criterion as written, before it is given an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriterionSpec {
    pub field: String,
    pub operator: Operator,
    pub value: String,
    pub value_max: Option<String>,
}

impl CriterionSpec {
    pub fn parse(spec: &str) -> Result<Self> {
        let text = spec.trim();
        if text.is_empty() {
            return Err(CqError::invalid_criterion(spec, "empty criterion"));
        }

        let (field, operator, rest) = split_operator(text)
            .ok_or_else(|| CqError::invalid_criterion(spec, "no operator found"))?;

        let field = field.trim();
        if field.is_empty() {
            return Err(CqError::invalid_criterion(spec, "missing field"));
        }
        if !field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(CqError::invalid_criterion(
                spec,
                "field may only contain letters, digits, '_' or '-'",
            ));
        }

        let (value, value_max) = match operator {
            Operator::Between => {
                let (min, max) = rest
                    .split_once("..")
                    .ok_or_else(|| CqError::invalid_criterion(spec, "range must be min..max"))?;
                let max = max.trim();
                (min.trim(), (!max.is_empty()).then(|| max.to_string()))
            }
            _ => (rest.trim(), None),
        };

        if value.is_empty() {
            return Err(CqError::invalid_criterion(spec, "missing value"));
        }

        let parsed = Self {
            field: field.to_string(),
            operator,
            value: value.to_string(),
            value_max,
        };
        parsed.warn_if_inert(spec);
        Ok(parsed)
    }

    fn warn_if_inert(&self, spec: &str) {
        if !catalog::is_known(&self.field) {
            warn!(spec, field = %self.field, "field is not in the catalog; only records carrying it can match");
        }
        if parse_number(&self.value).is_none() {
            warn!(spec, value = %self.value, "value is not numeric; criterion will match nothing");
        }
        if self.operator == Operator::Between
            && self.value_max.as_deref().and_then(parse_number).is_none()
        {
            warn!(spec, "range has no numeric upper bound; 0 will be used");
        }
    }

    fn into_patch(self) -> (String, CriterionPatch) {
        let mut patch = CriterionPatch::new()
            .operator(self.operator)
            .value(self.value);
        if let Some(max) = self.value_max {
            patch = patch.value_max(max);
        }
        (self.field, patch)
    }
}

fn split_operator(text: &str) -> Option<(&str, Operator, &str)> {
    if let Some((field, range)) = text.split_once(':') {
        return Some((field, Operator::Between, range));
    }
    for (index, _) in text.char_indices() {
        let tail = &text[index..];
        if let Some((token, operator)) = OPERATOR_TOKENS
            .iter()
            .find(|(token, _)| tail.starts_with(token))
        {
            return Some((&text[..index], *operator, &tail[token.len()..]));
        }
    }
    None
}

/// Append parsed criteria to `list`, in order, drawing ids from `ids`.
pub fn extend_from_specs<S: IdSource + ?Sized>(
    list: &mut CriteriaList,
    specs: &[String],
    ids: &mut S,
) -> Result<()> {
    let parsed = specs
        .iter()
        .map(|spec| CriterionSpec::parse(spec))
        .collect::<Result<Vec<_>>>()?;

    for spec in parsed {
        let (field, patch) = spec.into_patch();
        let id = list.add_with(field, ids).id.clone();
        list.update(&id, patch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::criteria::SequentialIds;
    use crate::test_utils::{TestCase, run_table_tests};

    #[test]
    fn parses_comparison_operators() {
        let gte = CriterionSpec::parse("hbA1c>=7.0").unwrap();
        assert_eq!(gte.field, "hbA1c");
        assert_eq!(gte.operator, Operator::GreaterOrEqual);
        assert_eq!(gte.value, "7.0");

        let lte = CriterionSpec::parse(" ldlCholesterol <= 160 ").unwrap();
        assert_eq!(lte.field, "ldlCholesterol");
        assert_eq!(lte.operator, Operator::LessOrEqual);
        assert_eq!(lte.value, "160");

        assert_eq!(CriterionSpec::parse("tsh=2.1").unwrap().operator, Operator::Equal);
        assert_eq!(CriterionSpec::parse("tsh==2.1").unwrap().value, "2.1");
        assert_eq!(
            CriterionSpec::parse("bmi≥30").unwrap().operator,
            Operator::GreaterOrEqual
        );
    }

    #[test]
    fn parses_ranges() {
        let range = CriterionSpec::parse("egfr:60..90").unwrap();
        assert_eq!(range.operator, Operator::Between);
        assert_eq!(range.value, "60");
        assert_eq!(range.value_max.as_deref(), Some("90"));

        let open = CriterionSpec::parse("egfr:60..").unwrap();
        assert!(open.value_max.is_none());
    }

    #[test]
    fn negative_values_keep_their_sign() {
        let spec = CriterionSpec::parse("delta>=-1.5").unwrap();
        assert_eq!(spec.value, "-1.5");
    }

    #[test]
    fn rejects_malformed_specs() {
        for bad in ["", "hbA1c", ">=7", "hbA1c>=", "egfr:60", "hb a1c>=7", "egfr:..90"] {
            let err = CriterionSpec::parse(bad).unwrap_err();
            assert!(
                matches!(err, CqError::InvalidCriterion { .. }),
                "{bad:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn operator_tokens_table() {
        let cases = vec![
            TestCase {
                name: "ascii gte",
                input: "bmi>=30",
                expected: Operator::GreaterOrEqual,
            },
            TestCase {
                name: "unicode lte",
                input: "bmi≤30",
                expected: Operator::LessOrEqual,
            },
            TestCase {
                name: "double equals",
                input: "bmi==30",
                expected: Operator::Equal,
            },
            TestCase {
                name: "range with spaces",
                input: "bmi : 25 .. 30",
                expected: Operator::Between,
            },
        ];
        run_table_tests(cases, |spec| CriterionSpec::parse(spec).unwrap().operator);
    }

    #[test]
    fn non_numeric_value_is_accepted() {
        let spec = CriterionSpec::parse("bmi>=high").unwrap();
        assert_eq!(spec.value, "high");
    }

    #[test]
    fn extend_appends_with_ids_and_values() {
        let mut list = CriteriaList::new();
        let mut ids = SequentialIds::new("cli");
        extend_from_specs(
            &mut list,
            &["hbA1c>=7.0".to_string(), "egfr:60..90".to_string()],
            &mut ids,
        )
        .unwrap();

        assert_eq!(list.len(), 2);
        let second = list.get("cli-2").unwrap();
        assert_eq!(second.field, "egfr");
        assert_eq!(second.operator, Operator::Between);
        assert_eq!(second.value_max.as_deref(), Some("90"));
    }

    #[test]
    fn extend_is_all_or_nothing() {
        let mut list = CriteriaList::new();
        let mut ids = SequentialIds::new("cli");
        let result = extend_from_specs(
            &mut list,
            &["hbA1c>=7.0".to_string(), "broken".to_string()],
            &mut ids,
        );
        assert!(result.is_err());
        assert!(list.is_empty());
    }
}
