//! Context-aware error suggestions.
//!
//! Complements the static suggestions in the `codes` module with hints
//! that mention the offending record id, criterion text, or path.

use serde_json::Value;

use super::codes::ErrorCode;

/// Generate a context-aware suggestion for an error.
pub fn suggest_for_error(code: ErrorCode, context: Option<&Value>) -> String {
    match code {
        ErrorCode::RecordNotFound => suggest_record_not_found(context),
        ErrorCode::RecordDuplicateId => suggest_duplicate_id(context),
        ErrorCode::CriterionInvalid => suggest_criterion_invalid(context),
        ErrorCode::CriterionNotFound => suggest_criterion_not_found(context),
        ErrorCode::UnsupportedFormat => suggest_unsupported_format(context),
        _ => code.suggestion().to_string(),
    }
}

fn context_str<'a>(context: Option<&'a Value>, key: &str) -> Option<&'a str> {
    context.and_then(|c| c.get(key)).and_then(Value::as_str)
}

fn suggest_record_not_found(context: Option<&Value>) -> String {
    match context_str(context, "record_id") {
        Some(id) => format!(
            "No record with id '{id}'. Try:\n  - `clinquery search --query {id}` to match partial ids\n  - `clinquery search` to list every record"
        ),
        None => ErrorCode::RecordNotFound.suggestion().to_string(),
    }
}

fn suggest_duplicate_id(context: Option<&Value>) -> String {
    match context_str(context, "record_id") {
        Some(id) => format!("Record id '{id}' appears more than once. Rename or remove the duplicate"),
        None => ErrorCode::RecordDuplicateId.suggestion().to_string(),
    }
}

fn suggest_criterion_invalid(context: Option<&Value>) -> String {
    match context_str(context, "spec") {
        Some(spec) if !spec.is_empty() => format!(
            "Could not read criterion '{spec}'.\n{}\nRun `clinquery fields` for field keys",
            ErrorCode::CriterionInvalid.suggestion()
        ),
        _ => ErrorCode::CriterionInvalid.suggestion().to_string(),
    }
}

fn suggest_criterion_not_found(context: Option<&Value>) -> String {
    match context_str(context, "criterion_id") {
        Some(id) => format!(
            "No criterion with id '{id}'. {}",
            ErrorCode::CriterionNotFound.suggestion()
        ),
        None => ErrorCode::CriterionNotFound.suggestion().to_string(),
    }
}

fn suggest_unsupported_format(context: Option<&Value>) -> String {
    match context_str(context, "path") {
        Some(path) => format!("'{path}' is not a supported record file. Use .json, .yaml or .yml"),
        None => ErrorCode::UnsupportedFormat.suggestion().to_string(),
    }
}
