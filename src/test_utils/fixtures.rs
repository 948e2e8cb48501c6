use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use tempfile::TempDir;

use crate::records::{MetricValue, Record};

/// Test fixture providing isolated filesystem environment.
pub struct UnitTestFixture {
    pub temp_dir: TempDir,
    pub data_path: PathBuf,
}

impl UnitTestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_path = temp_dir.path().to_path_buf();

        println!("[FIXTURE] Created temp directory: {:?}", data_path);

        Self { temp_dir, data_path }
    }

    /// Create a test file with content.
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.data_path.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        println!(
            "[FIXTURE] Created file: {:?} ({} bytes)",
            full_path,
            content.len()
        );
        full_path
    }

    /// Write `records` as a JSON record file and return its path.
    pub fn create_records(&self, name: &str, records: &[Record]) -> PathBuf {
        let json = serde_json::to_string_pretty(records).expect("Failed to serialize records");
        self.create_file(name, &json)
    }
}

/// Builder for records with neutral defaults.
///
/// Defaults: name "Test Patient", age 50, gender "Female", no diagnoses,
/// no metrics, last visit 2024-01-01, score 50.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            record: Record {
                id: id.to_string(),
                name: "Test Patient".to_string(),
                age: 50,
                gender: "Female".to_string(),
                diagnoses: Vec::new(),
                medications: Vec::new(),
                last_visit: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
                metrics: BTreeMap::new(),
                score: 50.0,
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.record.name = name.to_string();
        self
    }

    pub fn age(mut self, age: u32) -> Self {
        self.record.age = age;
        self
    }

    pub fn gender(mut self, gender: &str) -> Self {
        self.record.gender = gender.to_string();
        self
    }

    pub fn diagnoses(mut self, diagnoses: &[&str]) -> Self {
        self.record.diagnoses = diagnoses.iter().map(|d| (*d).to_string()).collect();
        self
    }

    pub fn metric(mut self, key: &str, value: f64) -> Self {
        self.record
            .metrics
            .insert(key.to_string(), MetricValue::Number(value));
        self
    }

    pub fn score(mut self, score: f64) -> Self {
        self.record.score = score;
        self
    }

    pub fn build(self) -> Record {
        self.record
    }
}
