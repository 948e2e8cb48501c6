//! Demographic filters
//!
//! The non-metric half of a search: free text, age bounds, gender and a
//! category tag. Rebuilt from caller state on every search.
//!
//! - Text (case-insensitive substring of name or id)
//! - Age (inclusive bounds)
//! - Gender (exact match)
//! - Category tag (case-insensitive substring of any tag)

use serde::{Deserialize, Serialize};

use crate::records::Record;

/// Search constraints on demographic attributes. `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemographicFilters {
    /// Matched against name and id; empty disables the filter
    #[serde(default)]
    pub text_query: String,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
    pub gender: Option<String>,
    pub category_tag: Option<String>,
}

impl DemographicFilters {
    /// Create new empty filters
    pub fn new() -> Self {
        Self::default()
    }

    /// Set text query
    #[must_use]
    pub fn with_text(mut self, query: impl Into<String>) -> Self {
        self.text_query = query.into();
        self
    }

    /// Set minimum age (inclusive)
    #[must_use]
    pub const fn with_age_min(mut self, age: u32) -> Self {
        self.age_min = Some(age);
        self
    }

    /// Set maximum age (inclusive)
    #[must_use]
    pub const fn with_age_max(mut self, age: u32) -> Self {
        self.age_max = Some(age);
        self
    }

    /// Set gender; "any"/"all" or blank clears the filter
    #[must_use]
    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = normalize_choice(gender.into());
        self
    }

    /// Set category tag; "any"/"all" or blank clears the filter
    #[must_use]
    pub fn with_category_tag(mut self, tag: impl Into<String>) -> Self {
        self.category_tag = normalize_choice(tag.into());
        self
    }

    /// Check if any filters are set
    pub fn is_empty(&self) -> bool {
        self.text_query.is_empty()
            && self.age_min.is_none()
            && self.age_max.is_none()
            && self.gender.is_none()
            && self.category_tag.is_none()
    }

    /// Precompute lowercase needles for repeated matching.
    pub fn predicate(&self) -> DemographicPredicate<'_> {
        DemographicPredicate {
            filters: self,
            text_needle: (!self.text_query.is_empty()).then(|| self.text_query.to_lowercase()),
            tag_needle: self.category_tag.as_ref().map(|t| t.to_lowercase()),
        }
    }

    /// Check if a record passes all demographic filters
    pub fn matches(&self, record: &Record) -> bool {
        self.predicate().matches(record)
    }
}

fn normalize_choice(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("any")
        || trimmed.eq_ignore_ascii_case("all")
    {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// [`DemographicFilters`] with case-folded needles, one check per stage.
#[derive(Debug, Clone)]
pub struct DemographicPredicate<'a> {
    filters: &'a DemographicFilters,
    text_needle: Option<String>,
    tag_needle: Option<String>,
}

impl DemographicPredicate<'_> {
    pub const fn text_active(&self) -> bool {
        self.text_needle.is_some()
    }

    pub const fn age_active(&self) -> bool {
        self.filters.age_min.is_some() || self.filters.age_max.is_some()
    }

    pub const fn gender_active(&self) -> bool {
        self.filters.gender.is_some()
    }

    pub const fn category_active(&self) -> bool {
        self.tag_needle.is_some()
    }

    pub fn text(&self, record: &Record) -> bool {
        self.text_needle.as_deref().is_none_or(|needle| {
            record.name.to_lowercase().contains(needle)
                || record.id.to_lowercase().contains(needle)
        })
    }

    pub fn age(&self, record: &Record) -> bool {
        self.filters.age_min.is_none_or(|min| record.age >= min)
            && self.filters.age_max.is_none_or(|max| record.age <= max)
    }

    pub fn gender(&self, record: &Record) -> bool {
        self.filters
            .gender
            .as_deref()
            .is_none_or(|gender| record.gender == gender)
    }

    pub fn category(&self, record: &Record) -> bool {
        self.tag_needle.as_deref().is_none_or(|needle| {
            record
                .diagnoses
                .iter()
                .any(|tag| tag.to_lowercase().contains(needle))
        })
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.text(record) && self.age(record) && self.gender(record) && self.category(record)
    }
}
