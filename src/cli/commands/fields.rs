//! clinquery fields - List the queryable lab fields

use clap::Args;

use crate::app::AppContext;
use crate::catalog::{self, CategoryGroup};
use crate::cli::formatters::FieldList;
use crate::cli::output::emit;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct FieldsArgs {
    /// Only show this category (case-insensitive)
    #[arg(long)]
    pub category: Option<String>,

    /// Case-insensitive search over key, label and category
    #[arg(long, short = 's')]
    pub search: Option<String>,
}

pub fn run(ctx: &AppContext, args: &FieldsArgs) -> Result<()> {
    let list = field_list(args);
    emit(&list, ctx.output_format);
    Ok(())
}

fn field_list(args: &FieldsArgs) -> FieldList {
    let query = args.search.as_deref().unwrap_or_default();
    let mut groups = catalog::group_fields(catalog::search_fields(query));
    if let Some(category) = &args.category {
        groups.retain(|group: &CategoryGroup| group.category.eq_ignore_ascii_case(category.trim()));
    }

    let list = FieldList::new(groups);
    match &args.search {
        Some(query) => list.with_query(query.as_str()),
        None => list,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_filter_keeps_one_group() {
        let list = field_list(&FieldsArgs {
            category: Some("lipid panel".into()),
            search: None,
        });
        assert_eq!(list.groups.len(), 1);
        assert_eq!(list.groups[0].category, "Lipid Panel");
        assert_eq!(list.count(), 4);
    }

    #[test]
    fn search_and_category_combine() {
        let list = field_list(&FieldsArgs {
            category: Some("Vitals".into()),
            search: Some("bp".into()),
        });
        let keys: Vec<_> = list.groups[0].fields.iter().map(|f| f.key).collect();
        assert_eq!(keys, vec!["systolicBP", "diastolicBP"]);
    }

    #[test]
    fn unknown_category_is_empty() {
        let list = field_list(&FieldsArgs {
            category: Some("Genetics".into()),
            search: None,
        });
        assert_eq!(list.count(), 0);
    }
}
