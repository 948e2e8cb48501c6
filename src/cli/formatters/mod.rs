//! Output formatters for CLI commands
//!
//! Provides structured formatters for common output types that can render
//! to multiple formats (Human, JSON, JSONL, Plain, TSV).

mod field_list;
mod record_card;
mod search_results;

pub use field_list::FieldList;
pub use record_card::RecordCard;
pub use search_results::{SearchResults, truncate_tags};
