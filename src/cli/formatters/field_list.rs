//! Field catalog formatter for the `fields` command

use console::style;
use serde::Serialize;

use crate::catalog::{CategoryGroup, FieldDescriptor};
use crate::cli::output::{Formattable, OutputFormat};

/// Catalog fields grouped by category.
#[derive(Debug, Clone)]
pub struct FieldList {
    pub groups: Vec<CategoryGroup>,
    /// Search text that produced the list, if any
    pub query: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct FieldListJson<'a> {
    status: &'static str,
    count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<&'a str>,
    categories: &'a [CategoryGroup],
}

impl FieldList {
    pub fn new(groups: Vec<CategoryGroup>) -> Self {
        Self {
            groups,
            query: None,
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn count(&self) -> usize {
        self.groups.iter().map(|g| g.fields.len()).sum()
    }

    fn fields(&self) -> impl Iterator<Item = &'static FieldDescriptor> + '_ {
        self.groups.iter().flat_map(|g| g.fields.iter().copied())
    }

    fn format_human(&self) -> String {
        if self.groups.is_empty() {
            return match &self.query {
                Some(query) => format!("{} No fields match '{}'", style("!").yellow(), query),
                None => format!("{} No fields", style("!").yellow()),
            };
        }

        let mut out = String::new();
        for group in &self.groups {
            out.push_str(&format!("{}\n", style(group.category).bold()));
            for field in &group.fields {
                out.push_str(&format!(
                    "  {:<18} {}\n",
                    style(field.key).cyan(),
                    field.label
                ));
            }
            out.push('\n');
        }
        out
    }

    fn format_plain(&self) -> String {
        self.fields()
            .map(|f| format!("{}: {} ({})", f.key, f.label, f.category))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_tsv(&self) -> String {
        let mut out = String::from("key\tlabel\tcategory\n");
        for f in self.fields() {
            out.push_str(&format!("{}\t{}\t{}\n", f.key, f.label, f.category));
        }
        out
    }

    fn format_jsonl(&self) -> String {
        self.fields()
            .filter_map(|f| serde_json::to_string(f).ok())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Formattable for FieldList {
    fn format(&self, fmt: OutputFormat) -> String {
        match fmt {
            OutputFormat::Human => self.format_human(),
            OutputFormat::Json => serde_json::to_string_pretty(&FieldListJson {
                status: "ok",
                count: self.count(),
                query: self.query.as_deref(),
                categories: &self.groups,
            })
            .unwrap_or_default(),
            OutputFormat::Jsonl => self.format_jsonl(),
            OutputFormat::Plain => self.format_plain(),
            OutputFormat::Tsv => self.format_tsv(),
        }
    }
}
