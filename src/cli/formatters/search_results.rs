//! Search results formatter

use console::style;
use serde::Serialize;

use crate::cli::output::{Formattable, OutputFormat};
use crate::query::{ScoreTier, SearchOutcome, TierThresholds};
use crate::records::Record;

/// Ranked search results plus the settings that shape their display.
#[derive(Debug, Clone)]
pub struct SearchResults<'r> {
    pub outcome: SearchOutcome<'r>,
    /// Readable form of each active criterion
    pub criteria: Vec<String>,
    pub tiers: TierThresholds,
    pub max_tags: usize,
    pub show_tiers: bool,
}

/// Serializable search result for JSON output
#[derive(Debug, Clone, Serialize)]
struct SearchResultJson<'a> {
    rank: usize,
    id: &'a str,
    name: &'a str,
    age: u32,
    gender: &'a str,
    diagnoses: &'a [String],
    last_visit: String,
    score: f64,
    tier: ScoreTier,
}

/// Serializable search response for JSON output
#[derive(Debug, Clone, Serialize)]
struct SearchResponseJson<'a> {
    status: &'static str,
    count: usize,
    total: usize,
    criteria: &'a [String],
    results: Vec<SearchResultJson<'a>>,
}

impl<'r> SearchResults<'r> {
    pub fn new(outcome: SearchOutcome<'r>) -> Self {
        Self {
            outcome,
            criteria: Vec::new(),
            tiers: TierThresholds::default(),
            max_tags: 2,
            show_tiers: true,
        }
    }

    #[must_use]
    pub fn with_criteria(mut self, criteria: Vec<String>) -> Self {
        self.criteria = criteria;
        self
    }

    #[must_use]
    pub const fn with_tiers(mut self, tiers: TierThresholds) -> Self {
        self.tiers = tiers;
        self
    }

    #[must_use]
    pub const fn with_display(mut self, max_tags: usize, show_tiers: bool) -> Self {
        self.max_tags = max_tags;
        self.show_tiers = show_tiers;
        self
    }

    fn result_json(&self, rank: usize, record: &'r Record) -> SearchResultJson<'r> {
        SearchResultJson {
            rank,
            id: &record.id,
            name: &record.name,
            age: record.age,
            gender: &record.gender,
            diagnoses: &record.diagnoses,
            last_visit: record.last_visit.to_string(),
            score: record.score,
            tier: self.tiers.classify(record.score),
        }
    }

    fn to_json_response(&self) -> SearchResponseJson<'_> {
        SearchResponseJson {
            status: "ok",
            count: self.outcome.count(),
            total: self.outcome.total,
            criteria: &self.criteria,
            results: self
                .outcome
                .records
                .iter()
                .enumerate()
                .map(|(i, record)| self.result_json(i + 1, *record))
                .collect(),
        }
    }

    fn format_human(&self) -> String {
        if self.outcome.is_empty() {
            let mut out = format!(
                "{} No matching records (searched {})\n\n",
                style("!").yellow(),
                self.outcome.total
            );
            out.push_str("Try:\n");
            out.push_str("  - Widening the age range or clearing --gender / --diagnosis\n");
            out.push_str("  - Relaxing or removing a --criterion\n");
            return out;
        }

        let mut out = format!(
            "{} of {} records match",
            style(self.outcome.count().to_string()).bold(),
            self.outcome.total
        );
        if !self.criteria.is_empty() {
            out.push_str(&format!(" ({})", self.criteria.join("; ")));
        }
        out.push_str(":\n\n");

        for (i, record) in self.outcome.records.iter().enumerate() {
            out.push_str(&format!(
                "{}. {} {}\n",
                style(i + 1).dim(),
                style(&record.name).cyan().bold(),
                style(format!("#{}", record.id)).dim()
            ));

            let score = format!("{:.0}%", record.score);
            let score = if self.show_tiers {
                match self.tiers.classify(record.score) {
                    ScoreTier::High => style(score).green().bold().to_string(),
                    ScoreTier::Medium => style(score).yellow().to_string(),
                    ScoreTier::Low => style(score).red().to_string(),
                }
            } else {
                score
            };
            out.push_str(&format!(
                "   {} yrs, {}  score {}  last visit {}\n",
                record.age, record.gender, score, record.last_visit
            ));

            let tags = truncate_tags(&record.diagnoses, self.max_tags);
            if !tags.is_empty() {
                out.push_str(&format!("   {}\n", style(tags.join(", ")).dim()));
            }
            out.push('\n');
        }

        out
    }

    fn format_plain(&self) -> String {
        self.outcome
            .records
            .iter()
            .map(|r| {
                let mut line = format!("{}: {} ({:.0})", r.id, r.name, r.score);
                if self.show_tiers {
                    line.push_str(&format!(" [{}]", self.tiers.classify(r.score).as_str()));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_tsv(&self) -> String {
        let mut out = String::from("rank\tid\tname\tage\tgender\tscore\ttier\tdiagnoses\n");
        for (i, r) in self.outcome.records.iter().enumerate() {
            let name = r.name.replace(['\t', '\n'], " ");
            out.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{:.1}\t{}\t{}\n",
                i + 1,
                r.id,
                name,
                r.age,
                r.gender,
                r.score,
                self.tiers.classify(r.score).as_str(),
                r.diagnoses.join(";")
            ));
        }
        out
    }

    fn format_jsonl(&self) -> String {
        self.outcome
            .records
            .iter()
            .enumerate()
            .filter_map(|(i, record)| serde_json::to_string(&self.result_json(i + 1, *record)).ok())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// At most `max` tags, followed by "+N" for the rest.
pub fn truncate_tags(tags: &[String], max: usize) -> Vec<String> {
    let mut shown: Vec<String> = tags.iter().take(max).cloned().collect();
    if tags.len() > max {
        shown.push(format!("+{}", tags.len() - max));
    }
    shown
}

impl Formattable for SearchResults<'_> {
    fn format(&self, fmt: OutputFormat) -> String {
        match fmt {
            OutputFormat::Human => self.format_human(),
            OutputFormat::Json => {
                serde_json::to_string_pretty(&self.to_json_response()).unwrap_or_default()
            }
            OutputFormat::Jsonl => self.format_jsonl(),
            OutputFormat::Plain => self.format_plain(),
            OutputFormat::Tsv => self.format_tsv(),
        }
    }
}
