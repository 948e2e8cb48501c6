use std::str::FromStr;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use console::style;
use serde::Serialize;

use crate::error::{CqError, Result, StructuredError};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable formatted output with colors (default)
    #[default]
    Human,
    /// Pretty-printed JSON
    Json,
    /// Newline-delimited JSON (one object per line)
    Jsonl,
    /// Plain text without colors or formatting
    Plain,
    /// Tab-separated values (for shell scripting)
    Tsv,
}

impl OutputFormat {
    /// Check if this format should use colors
    #[must_use]
    pub const fn use_colors(&self) -> bool {
        matches!(self, Self::Human)
    }

    /// Check if this format is machine-readable
    #[must_use]
    pub const fn is_machine_readable(&self) -> bool {
        matches!(self, Self::Json | Self::Jsonl | Self::Tsv)
    }
}

impl FromStr for OutputFormat {
    type Err = CqError;

    fn from_str(s: &str) -> Result<Self> {
        <Self as ValueEnum>::from_str(s.trim(), true).map_err(|_| {
            CqError::Config(format!(
                "unknown output format {s} (expected human|json|jsonl|plain|tsv)"
            ))
        })
    }
}

/// Envelope for successful JSON output of non-search commands.
#[derive(Debug, Serialize)]
pub struct MachineResponse<T> {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
    pub data: T,
}

pub fn machine_ok<T: Serialize>(data: T) -> MachineResponse<T> {
    MachineResponse {
        status: "ok",
        timestamp: Utc::now(),
        version: crate::VERSION,
        data,
    }
}

/// Machine-readable error printed on stdout when a command fails.
#[derive(Debug, Serialize)]
pub struct MachineError {
    pub error: bool,
    #[serde(flatten)]
    pub details: StructuredError,
}

impl From<&CqError> for MachineError {
    fn from(err: &CqError) -> Self {
        Self {
            error: true,
            details: err.to_structured(),
        }
    }
}

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)?;
    println!("{payload}");
    Ok(())
}

/// Emit `data` in the machine envelope: pretty JSON, or one line for JSONL.
pub fn emit_machine<T: Serialize>(data: T, format: OutputFormat) -> Result<()> {
    let response = machine_ok(data);
    if format == OutputFormat::Jsonl {
        println!("{}", serde_json::to_string(&response)?);
        Ok(())
    } else {
        emit_json(&response)
    }
}

pub struct HumanLayout {
    lines: Vec<String>,
    key_width: usize,
    styled: bool,
}

impl Default for HumanLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanLayout {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            key_width: 18,
            styled: true,
        }
    }

    /// Layout without terminal styling, for plain output.
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            lines: Vec::new(),
            key_width: 18,
            styled: false,
        }
    }

    pub fn title(&mut self, text: &str) -> &mut Self {
        let line = if self.styled {
            style(text).bold().to_string()
        } else {
            text.to_string()
        };
        self.lines.push(line);
        self.lines.push(String::new());
        self
    }

    pub fn section(&mut self, text: &str) -> &mut Self {
        let line = if self.styled {
            style(text).bold().to_string()
        } else {
            text.to_string()
        };
        self.lines.push(line);
        self.lines.push("-".repeat(text.chars().count().max(3)));
        self
    }

    pub fn kv(&mut self, key: &str, value: &str) -> &mut Self {
        let padded = format!("{key:width$}", width = self.key_width);
        let key_text = if self.styled {
            style(padded).dim().to_string()
        } else {
            padded
        };
        self.lines.push(format!("{key_text} {value}"));
        self
    }

    pub fn bullet(&mut self, text: &str) -> &mut Self {
        self.lines.push(format!("- {text}"));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    pub fn push_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    #[must_use]
    pub fn build(self) -> String {
        self.lines.join("\n")
    }
}

/// Trait for types that can format themselves for different output modes
pub trait Formattable {
    /// Format this value for the given output format
    fn format(&self, fmt: OutputFormat) -> String;
}

/// Emit a formattable value to stdout
pub fn emit<T: Formattable>(value: &T, format: OutputFormat) {
    println!("{}", value.format(format));
}
