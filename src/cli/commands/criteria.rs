//! clinquery criteria - Edit a saved criteria file
//!
//! The file holds a JSON array of criteria. Each subcommand loads it, applies
//! one edit through [`CriteriaList`], and writes it back when something
//! changed. Edits that name an unknown id leave the file untouched, or fail
//! with `--strict`.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde::Serialize;
use tracing::{debug, info};

use crate::app::AppContext;
use crate::catalog;
use crate::cli::output::{OutputFormat, emit_machine};
use crate::error::{CqError, Result};
use crate::query::{CriteriaList, Criterion, CriterionPatch, Operator};

#[derive(Args, Debug)]
pub struct CriteriaArgs {
    /// Criteria file (JSON); created on first add
    pub file: PathBuf,

    /// Fail when set or remove names an unknown id
    #[arg(long)]
    pub strict: bool,

    #[command(subcommand)]
    pub action: CriteriaAction,
}

#[derive(Subcommand, Debug)]
pub enum CriteriaAction {
    /// List the criteria in the file
    List,

    /// Append a criterion on FIELD with the default operator and no value
    Add {
        /// Metric key, e.g. hbA1c
        field: String,
    },

    /// Change the operator or values of a criterion
    Set {
        /// Criterion id
        id: String,

        /// greaterOrEqual | lessOrEqual | equal | between (or >=, <=, =, range)
        #[arg(long)]
        operator: Option<String>,

        /// Comparison value
        #[arg(long)]
        value: Option<String>,

        /// Upper bound for between
        #[arg(long, conflicts_with = "clear_max")]
        max: Option<String>,

        /// Remove the upper bound
        #[arg(long)]
        clear_max: bool,
    },

    /// Remove a criterion
    Remove {
        /// Criterion id
        id: String,
    },
}

#[derive(Debug, Serialize)]
struct CriteriaReport<'a> {
    file: &'a Path,
    action: &'static str,
    changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    criteria: &'a CriteriaList,
}

/// Read a criteria file. A missing file is an empty list.
pub fn load_criteria(path: &Path) -> Result<CriteriaList> {
    if !path.exists() {
        debug!(path = %path.display(), "criteria file absent, starting empty");
        return Ok(CriteriaList::new());
    }
    let raw = std::fs::read_to_string(path)?;
    let list = serde_json::from_str(&raw)?;
    Ok(list)
}

/// Write a criteria file as pretty JSON, creating parent directories.
pub fn save_criteria(path: &Path, criteria: &CriteriaList) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let rendered = serde_json::to_string_pretty(criteria)?;
    std::fs::write(path, rendered + "\n")?;
    info!(path = %path.display(), count = criteria.len(), "criteria saved");
    Ok(())
}

pub fn run(ctx: &AppContext, args: &CriteriaArgs) -> Result<()> {
    let mut criteria = load_criteria(&args.file)?;
    let (action, changed, id) = apply(&mut criteria, &args.action)?;
    if args.strict && !changed && action != "list" {
        return Err(CqError::CriterionNotFound(id.unwrap_or_default()));
    }
    if changed {
        save_criteria(&args.file, &criteria)?;
    }

    if ctx.machine() {
        return emit_machine(
            CriteriaReport {
                file: &args.file,
                action,
                changed,
                id: id.as_deref(),
                criteria: &criteria,
            },
            ctx.output_format,
        );
    }

    let plain = ctx.output_format == OutputFormat::Plain;
    match (action, changed) {
        ("list", _) => {}
        ("add", _) => println!("Added {}", id.as_deref().unwrap_or_default()),
        (_, true) => println!("{action}: {}", id.as_deref().unwrap_or_default()),
        (_, false) => println!(
            "{} no criterion with id {}; unchanged",
            if plain { "!".to_string() } else { style("!").yellow().to_string() },
            id.as_deref().unwrap_or_default()
        ),
    }
    print_list(&criteria, plain);
    Ok(())
}

/// Apply one edit. Returns the action name, whether the list changed, and
/// the id the action touched.
fn apply(
    criteria: &mut CriteriaList,
    action: &CriteriaAction,
) -> Result<(&'static str, bool, Option<String>)> {
    match action {
        CriteriaAction::List => Ok(("list", false, None)),
        CriteriaAction::Add { field } => {
            let field = field.trim();
            if field.is_empty() {
                return Err(CqError::invalid_criterion(field, "missing field"));
            }
            if !catalog::is_known(field) {
                tracing::warn!(field, "field is not in the catalog");
            }
            let id = criteria.add(field).id.clone();
            Ok(("add", true, Some(id)))
        }
        CriteriaAction::Set {
            id,
            operator,
            value,
            max,
            clear_max,
        } => {
            let patch = build_patch(operator.as_deref(), value.as_deref(), max.as_deref(), *clear_max)?;
            if patch.is_empty() {
                return Err(CqError::invalid_criterion(
                    id,
                    "nothing to set (use --operator, --value, --max or --clear-max)",
                ));
            }
            let changed = criteria.update(id, patch);
            Ok(("updated", changed, Some(id.clone())))
        }
        CriteriaAction::Remove { id } => {
            let changed = criteria.remove(id);
            Ok(("removed", changed, Some(id.clone())))
        }
    }
}

fn build_patch(
    operator: Option<&str>,
    value: Option<&str>,
    max: Option<&str>,
    clear_max: bool,
) -> Result<CriterionPatch> {
    let mut patch = CriterionPatch::new();
    if let Some(operator) = operator {
        patch = patch.operator(operator.parse::<Operator>()?);
    }
    if let Some(value) = value {
        patch = patch.value(value.trim());
    }
    if let Some(max) = max {
        patch = patch.value_max(max.trim());
    }
    if clear_max {
        patch = patch.clear_value_max();
    }
    Ok(patch)
}

fn print_list(criteria: &CriteriaList, plain: bool) {
    if criteria.is_empty() {
        println!("No criteria");
        return;
    }
    for criterion in criteria {
        println!("{}", list_line(criterion, plain));
    }
}

fn list_line(criterion: &Criterion, plain: bool) -> String {
    if plain {
        format!("{}\t{}", criterion.id, criterion.describe())
    } else {
        format!(
            "{} {}",
            style(format!("[{}]", criterion.id)).dim(),
            criterion.describe()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::UnitTestFixture;

    #[test]
    fn missing_file_loads_empty() {
        let fixture = UnitTestFixture::new();
        let list = load_criteria(&fixture.data_path.join("none.json")).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn save_then_load_preserves_order() {
        let fixture = UnitTestFixture::new();
        let path = fixture.data_path.join("nested/criteria.json");
        save_criteria(&path, &CriteriaList::example()).unwrap();

        let loaded = load_criteria(&path).unwrap();
        assert_eq!(loaded, CriteriaList::example());
    }

    #[test]
    fn malformed_file_is_json_error() {
        let fixture = UnitTestFixture::new();
        let path = fixture.create_file("bad.json", "{ not json");
        assert!(matches!(load_criteria(&path), Err(CqError::Json(_))));
    }

    #[test]
    fn add_then_set_then_remove() {
        let mut list = CriteriaList::new();
        let (_, changed, id) = apply(&mut list, &CriteriaAction::Add { field: "egfr".into() }).unwrap();
        assert!(changed);
        let id = id.unwrap();

        let (_, changed, _) = apply(
            &mut list,
            &CriteriaAction::Set {
                id: id.clone(),
                operator: Some("between".into()),
                value: Some("60".into()),
                max: Some("90".into()),
                clear_max: false,
            },
        )
        .unwrap();
        assert!(changed);
        assert_eq!(list.get(&id).unwrap().describe(), "eGFR (mL/min) between 60 and 90");

        let (_, changed, _) = apply(&mut list, &CriteriaAction::Remove { id }).unwrap();
        assert!(changed);
        assert!(list.is_empty());
    }

    #[test]
    fn unknown_id_is_unchanged() {
        let mut list = CriteriaList::example();
        let (action, changed, _) = apply(
            &mut list,
            &CriteriaAction::Set {
                id: "missing".into(),
                operator: None,
                value: Some("1".into()),
                max: None,
                clear_max: false,
            },
        )
        .unwrap();
        assert_eq!(action, "updated");
        assert!(!changed);
        assert_eq!(list, CriteriaList::example());
    }

    #[test]
    fn set_requires_some_change() {
        let mut list = CriteriaList::example();
        let err = apply(
            &mut list,
            &CriteriaAction::Set {
                id: "example-1".into(),
                operator: None,
                value: None,
                max: None,
                clear_max: false,
            },
        )
        .unwrap_err();
        assert!(matches!(err, CqError::InvalidCriterion { .. }));
    }

    #[test]
    fn bad_operator_is_rejected() {
        assert!(build_patch(Some("~"), None, None, false).is_err());
    }
}
