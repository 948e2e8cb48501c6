//! Built-in reference records used when no record file is configured.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::{MetricValue, Record};

struct SampleRecord {
    id: &'static str,
    name: &'static str,
    age: u32,
    gender: &'static str,
    diagnoses: &'static [&'static str],
    medications: &'static [&'static str],
    last_visit: (i32, u32, u32),
    metrics: &'static [(&'static str, f64)],
    score: f64,
}

const SAMPLES: &[SampleRecord] = &[
    SampleRecord {
        id: "001234",
        name: "Sarah Johnson",
        age: 42,
        gender: "Female",
        diagnoses: &["Type 2 Diabetes", "Hypertension"],
        medications: &["Metformin", "Lisinopril"],
        last_visit: (2024, 11, 15),
        metrics: &[
            ("hbA1c", 7.8),
            ("glucoseFasting", 145.0),
            ("ldlCholesterol", 145.0),
            ("hdlCholesterol", 48.0),
            ("triglycerides", 185.0),
            ("totalCholesterol", 225.0),
            ("bmi", 28.5),
            ("systolicBP", 138.0),
            ("diastolicBP", 88.0),
            ("creatinine", 1.0),
            ("egfr", 85.0),
            ("alt", 28.0),
            ("ast", 32.0),
            ("hemoglobin", 13.5),
            ("wbc", 7.2),
            ("platelets", 245.0),
            ("tsh", 2.1),
        ],
        score: 95.0,
    },
    SampleRecord {
        id: "001235",
        name: "Michael Chen",
        age: 58,
        gender: "Male",
        diagnoses: &["Type 2 Diabetes", "Hyperlipidemia"],
        medications: &["Metformin", "Atorvastatin"],
        last_visit: (2024, 11, 20),
        metrics: &[
            ("hbA1c", 8.2),
            ("glucoseFasting", 165.0),
            ("ldlCholesterol", 165.0),
            ("hdlCholesterol", 42.0),
            ("triglycerides", 210.0),
            ("totalCholesterol", 245.0),
            ("bmi", 31.2),
            ("systolicBP", 142.0),
            ("diastolicBP", 90.0),
            ("creatinine", 1.1),
            ("egfr", 78.0),
            ("alt", 35.0),
            ("ast", 38.0),
            ("hemoglobin", 14.8),
            ("wbc", 6.8),
            ("platelets", 228.0),
        ],
        score: 92.0,
    },
    SampleRecord {
        id: "001236",
        name: "Emily Rodriguez",
        age: 35,
        gender: "Female",
        diagnoses: &["Prediabetes"],
        medications: &["None"],
        last_visit: (2024, 11, 28),
        metrics: &[
            ("hbA1c", 6.2),
            ("glucoseFasting", 110.0),
            ("ldlCholesterol", 125.0),
            ("hdlCholesterol", 58.0),
            ("triglycerides", 120.0),
            ("totalCholesterol", 195.0),
            ("bmi", 26.8),
            ("systolicBP", 128.0),
            ("diastolicBP", 82.0),
            ("creatinine", 0.9),
            ("egfr", 95.0),
            ("alt", 22.0),
            ("ast", 25.0),
            ("hemoglobin", 13.2),
            ("wbc", 6.5),
            ("platelets", 265.0),
            ("tsh", 1.8),
            ("vitaminD", 32.0),
        ],
        score: 78.0,
    },
    SampleRecord {
        id: "001237",
        name: "James Wilson",
        age: 67,
        gender: "Male",
        diagnoses: &["Type 2 Diabetes", "CAD", "Hypertension"],
        medications: &["Insulin", "Metformin", "Aspirin", "Lisinopril"],
        last_visit: (2024, 11, 10),
        metrics: &[
            ("hbA1c", 9.1),
            ("glucoseFasting", 195.0),
            ("ldlCholesterol", 185.0),
            ("hdlCholesterol", 38.0),
            ("triglycerides", 245.0),
            ("totalCholesterol", 275.0),
            ("bmi", 33.5),
            ("systolicBP", 152.0),
            ("diastolicBP", 95.0),
            ("creatinine", 1.4),
            ("egfr", 58.0),
            ("alt", 42.0),
            ("ast", 45.0),
            ("hemoglobin", 12.8),
            ("wbc", 8.1),
            ("platelets", 198.0),
        ],
        score: 65.0,
    },
    SampleRecord {
        id: "001238",
        name: "Maria Garcia",
        age: 51,
        gender: "Female",
        diagnoses: &["Type 2 Diabetes"],
        medications: &["Metformin", "Glipizide"],
        last_visit: (2024, 11, 22),
        metrics: &[
            ("hbA1c", 7.5),
            ("glucoseFasting", 152.0),
            ("ldlCholesterol", 138.0),
            ("hdlCholesterol", 52.0),
            ("triglycerides", 168.0),
            ("totalCholesterol", 215.0),
            ("bmi", 29.3),
            ("systolicBP", 135.0),
            ("diastolicBP", 85.0),
            ("creatinine", 0.95),
            ("egfr", 88.0),
            ("alt", 30.0),
            ("hemoglobin", 13.8),
            ("wbc", 7.0),
            ("platelets", 252.0),
            ("tsh", 2.5),
        ],
        score: 88.0,
    },
    SampleRecord {
        id: "001239",
        name: "David Thompson",
        age: 44,
        gender: "Male",
        diagnoses: &["Prediabetes", "Obesity"],
        medications: &["None"],
        last_visit: (2024, 11, 18),
        metrics: &[
            ("hbA1c", 6.0),
            ("glucoseFasting", 105.0),
            ("ldlCholesterol", 155.0),
            ("hdlCholesterol", 45.0),
            ("triglycerides", 195.0),
            ("totalCholesterol", 235.0),
            ("bmi", 34.1),
            ("systolicBP", 130.0),
            ("diastolicBP", 84.0),
            ("creatinine", 1.0),
            ("egfr", 90.0),
            ("alt", 38.0),
            ("ast", 40.0),
            ("hemoglobin", 15.2),
            ("wbc", 7.5),
            ("platelets", 235.0),
        ],
        score: 82.0,
    },
];

/// The six reference records, in source order.
#[must_use]
pub fn sample_records() -> Vec<Record> {
    SAMPLES.iter().map(SampleRecord::to_record).collect()
}

impl SampleRecord {
    fn to_record(&self) -> Record {
        let (year, month, day) = self.last_visit;
        Record {
            id: self.id.to_string(),
            name: self.name.to_string(),
            age: self.age,
            gender: self.gender.to_string(),
            diagnoses: self.diagnoses.iter().map(ToString::to_string).collect(),
            medications: self.medications.iter().map(ToString::to_string).collect(),
            last_visit: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
            metrics: self
                .metrics
                .iter()
                .map(|(key, value)| ((*key).to_string(), MetricValue::Number(*value)))
                .collect::<BTreeMap<_, _>>(),
            score: self.score,
        }
    }
}
