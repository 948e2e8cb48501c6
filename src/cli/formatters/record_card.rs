//! Record card formatter for the `show` command

use console::style;
use serde::Serialize;

use crate::catalog::{self, FIELD_CATALOG};
use crate::cli::output::{Formattable, HumanLayout, OutputFormat};
use crate::query::{ScoreTier, TierThresholds};
use crate::records::{MetricValue, Record};

/// A formatted view of one record
#[derive(Debug, Clone)]
pub struct RecordCard<'a> {
    pub record: &'a Record,
    pub tiers: TierThresholds,
}

/// One metric with its catalog label and category.
#[derive(Debug, Clone, Serialize)]
struct MetricRow<'a> {
    key: &'a str,
    label: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'static str>,
    value: &'a MetricValue,
}

#[derive(Debug, Clone, Serialize)]
struct RecordJson<'a> {
    #[serde(flatten)]
    record: &'a Record,
    tier: ScoreTier,
    labelled_metrics: Vec<MetricRow<'a>>,
}

impl<'a> RecordCard<'a> {
    pub fn new(record: &'a Record) -> Self {
        Self {
            record,
            tiers: TierThresholds::default(),
        }
    }

    #[must_use]
    pub const fn with_tiers(mut self, tiers: TierThresholds) -> Self {
        self.tiers = tiers;
        self
    }

    /// Catalogued metrics in catalog order, then the rest by key.
    fn metric_rows(&self) -> Vec<MetricRow<'a>> {
        let metrics = &self.record.metrics;
        let known = FIELD_CATALOG.iter().filter_map(|field| {
            metrics.get(field.key).map(|value| MetricRow {
                key: field.key,
                label: field.label,
                category: Some(field.category),
                value,
            })
        });
        let unknown = metrics
            .iter()
            .filter(|(key, _)| !catalog::is_known(key))
            .map(|(key, value)| MetricRow {
                key,
                label: key,
                category: None,
                value,
            });
        known.chain(unknown).collect()
    }

    fn to_json(&self) -> RecordJson<'a> {
        RecordJson {
            record: self.record,
            tier: self.tiers.classify(self.record.score),
            labelled_metrics: self.metric_rows(),
        }
    }

    fn layout(&self, mut layout: HumanLayout, styled: bool) -> String {
        let record = self.record;
        layout.title(&record.name);
        layout.kv("ID", &record.id);
        layout.kv("Age", &record.age.to_string());
        layout.kv("Gender", &record.gender);
        layout.kv("Last visit", &record.last_visit.to_string());

        let score = format!(
            "{:.0} ({})",
            record.score,
            self.tiers.classify(record.score).as_str()
        );
        let score = if styled {
            match self.tiers.classify(record.score) {
                ScoreTier::High => style(score).green().to_string(),
                ScoreTier::Medium => style(score).yellow().to_string(),
                ScoreTier::Low => style(score).red().to_string(),
            }
        } else {
            score
        };
        layout.kv("Score", &score);

        if !record.diagnoses.is_empty() {
            layout.blank();
            layout.section("Diagnoses");
            for diagnosis in &record.diagnoses {
                layout.bullet(diagnosis);
            }
        }

        if !record.medications.is_empty() {
            layout.blank();
            layout.section("Medications");
            for medication in &record.medications {
                layout.bullet(medication);
            }
        }

        let rows = self.metric_rows();
        if !rows.is_empty() {
            layout.blank();
            layout.section("Lab values");
            let mut category = None;
            for row in rows {
                if row.category != category {
                    category = row.category;
                    layout.push_line(row.category.unwrap_or("Uncatalogued"));
                }
                layout.kv(&format!("  {}", row.label), &display_metric(row.value));
            }
        }

        layout.build()
    }

    fn format_tsv(&self) -> String {
        let mut out = String::from("key\tlabel\tvalue\n");
        for row in self.metric_rows() {
            out.push_str(&format!(
                "{}\t{}\t{}\n",
                row.key,
                row.label,
                display_metric(row.value)
            ));
        }
        out
    }
}

fn display_metric(value: &MetricValue) -> String {
    match value {
        MetricValue::Number(n) => n.to_string(),
        MetricValue::Text(raw) => raw.clone(),
        MetricValue::Missing => "n/a".to_string(),
    }
}

impl Formattable for RecordCard<'_> {
    fn format(&self, fmt: OutputFormat) -> String {
        match fmt {
            OutputFormat::Human => self.layout(HumanLayout::new(), true),
            OutputFormat::Json => serde_json::to_string_pretty(&self.to_json()).unwrap_or_default(),
            OutputFormat::Jsonl => serde_json::to_string(&self.to_json()).unwrap_or_default(),
            OutputFormat::Plain => self.layout(HumanLayout::plain(), false),
            OutputFormat::Tsv => self.format_tsv(),
        }
    }
}
