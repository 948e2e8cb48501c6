//! Field catalog
//!
//! Static registry of the lab fields a criterion can reference. The catalog
//! drives the criterion picker (labels, grouping, search box) and nothing
//! else: a criterion may name a key that is not listed here, in which case
//! evaluation simply finds no value for it.

use serde::Serialize;

/// One queryable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Metric key as stored on records (e.g. `hbA1c`)
    pub key: &'static str,
    /// Human label including units
    pub label: &'static str,
    /// Grouping heading in the picker
    pub category: &'static str,
}

const fn field(
    key: &'static str,
    label: &'static str,
    category: &'static str,
) -> FieldDescriptor {
    FieldDescriptor {
        key,
        label,
        category,
    }
}

/// Known fields in declaration order.
pub const FIELD_CATALOG: &[FieldDescriptor] = &[
    field("hbA1c", "HbA1c (%)", "Metabolic"),
    field("glucoseFasting", "Fasting Glucose (mg/dL)", "Metabolic"),
    field("ldlCholesterol", "LDL Cholesterol (mg/dL)", "Lipid Panel"),
    field("hdlCholesterol", "HDL Cholesterol (mg/dL)", "Lipid Panel"),
    field("triglycerides", "Triglycerides (mg/dL)", "Lipid Panel"),
    field("totalCholesterol", "Total Cholesterol (mg/dL)", "Lipid Panel"),
    field("bmi", "BMI", "Vitals"),
    field("systolicBP", "Systolic BP (mmHg)", "Vitals"),
    field("diastolicBP", "Diastolic BP (mmHg)", "Vitals"),
    field("creatinine", "Creatinine (mg/dL)", "Renal Function"),
    field("egfr", "eGFR (mL/min)", "Renal Function"),
    field("alt", "ALT (U/L)", "Liver Function"),
    field("ast", "AST (U/L)", "Liver Function"),
    field("hemoglobin", "Hemoglobin (g/dL)", "Hematology"),
    field("wbc", "WBC Count (K/μL)", "Hematology"),
    field("platelets", "Platelet Count (K/μL)", "Hematology"),
    field("tsh", "TSH (mIU/L)", "Thyroid"),
    field("vitaminD", "Vitamin D (ng/mL)", "Other"),
];

/// Fields sharing one category, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    pub category: &'static str,
    pub fields: Vec<&'static FieldDescriptor>,
}

/// Find the descriptor for a key.
#[must_use]
pub fn lookup(key: &str) -> Option<&'static FieldDescriptor> {
    FIELD_CATALOG.iter().find(|f| f.key == key)
}

/// Whether the key is listed in the catalog.
#[must_use]
pub fn is_known(key: &str) -> bool {
    lookup(key).is_some()
}

/// Display label for a key, or the key itself when it is not catalogued.
#[must_use]
pub fn resolve_label(key: &str) -> &str {
    lookup(key).map_or(key, |f| f.label)
}

/// Group the catalog by category.
///
/// Groups appear in the order their category is first seen; fields keep
/// declaration order within a group.
#[must_use]
pub fn group_by_category() -> Vec<CategoryGroup> {
    group_fields(FIELD_CATALOG.iter())
}

/// Fields whose key, label, or category contains `query` (case-insensitive).
///
/// An empty or blank query matches every field.
#[must_use]
pub fn search_fields(query: &str) -> Vec<&'static FieldDescriptor> {
    let needle = query.trim().to_lowercase();
    FIELD_CATALOG
        .iter()
        .filter(|f| {
            needle.is_empty()
                || f.key.to_lowercase().contains(&needle)
                || f.label.to_lowercase().contains(&needle)
                || f.category.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Group an arbitrary slice of descriptors the same way as the full catalog.
pub fn group_fields<I>(fields: I) -> Vec<CategoryGroup>
where
    I: IntoIterator<Item = &'static FieldDescriptor>,
{
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for descriptor in fields {
        match groups
            .iter_mut()
            .find(|g| g.category == descriptor.category)
        {
            Some(group) => group.fields.push(descriptor),
            None => groups.push(CategoryGroup {
                category: descriptor.category,
                fields: vec![descriptor],
            }),
        }
    }
    groups
}
