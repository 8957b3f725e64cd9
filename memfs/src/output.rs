//! Output formatting for CLI commands.
//!
//! Provides abstraction layer for outputting results in text or JSON format.

use anyhow::Result;
use chrono::{DateTime, Utc};
use memfs_core::{Entry, NodeType, Stats};
use serde::Serialize;
use std::io::{self, Write};

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Writer for command output with format abstraction.
pub struct OutputWriter {
    format: OutputFormat,
    stdout: io::Stdout,
}

impl OutputWriter {
    /// Create a new OutputWriter.
    pub fn new(json: bool) -> Self {
        Self {
            format: if json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            stdout: io::stdout(),
        }
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Write output using the configured format.
    ///
    /// The `text_fn` closure is called only in text mode to generate the
    /// human-readable output.
    pub fn write<T: Serialize>(&self, data: &T, text_fn: impl FnOnce() -> String) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(data)?;
                writeln!(&self.stdout, "{}", json)?;
            }
            OutputFormat::Text => {
                let text = text_fn();
                if !text.is_empty() {
                    write!(&self.stdout, "{}", text)?;
                }
            }
        }
        Ok(())
    }

    /// Report a failed script step on stderr. Text mode only; in JSON mode
    /// failures are part of the run output.
    pub fn write_step_error(&self, step: &StepOutput) {
        if let (OutputFormat::Text, Some(error)) = (self.format, &step.error) {
            let _ = write!(io::stderr(), "{}", error.to_text());
        }
    }

    /// Write an error message to stderr.
    ///
    /// In JSON mode, writes a JSON error object with success=false.
    /// In text mode, writes the error message directly.
    pub fn write_error(&self, error: &anyhow::Error, result_code: u8) {
        match self.format {
            OutputFormat::Json => {
                let error_output = ErrorOutput {
                    success: false,
                    result_code,
                    error: format!("{:#}", error),
                };
                if let Ok(json) = serde_json::to_string_pretty(&error_output) {
                    let _ = writeln!(io::stderr(), "{}", json);
                }
            }
            OutputFormat::Text => {
                let _ = writeln!(io::stderr(), "Error: {:#}", error);
            }
        }
    }
}

// ============================================================================
// Data Transfer Objects (DTOs) for JSON output
// ============================================================================

/// Error output structure.
#[derive(Debug, Serialize)]
pub struct ErrorOutput {
    pub success: bool,
    pub result_code: u8,
    pub error: String,
}

/// A failed step, with a stable kind label.
#[derive(Debug, Clone, Serialize)]
pub struct StepError {
    pub kind: String,
    #[serde(rename = "error")]
    pub message: String,
}

impl StepError {
    /// Human-readable rendering, newline terminated.
    pub fn to_text(&self) -> String {
        format!("Error: {}\n", self.message)
    }
}

impl From<&memfs_core::Error> for StepError {
    fn from(err: &memfs_core::Error) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Metadata for `stat`.
#[derive(Debug, Clone, Serialize)]
pub struct StatInfo {
    pub name: String,
    pub node_type: NodeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    pub created: DateTime<Utc>,
    pub path: Vec<String>,
    pub children: Vec<String>,
}

/// Result of one successful script step.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepResult {
    DirectoryAdded { parent: String, name: String },
    FileAdded { parent: String, name: String, size: u64 },
    Deleted { name: String },
    FileSize { name: String, size: u64 },
    BiggestFile { name: String },
    Tree {
        #[serde(skip)]
        lines: Vec<String>,
        entries: Vec<Entry>,
    },
    Stat(StatInfo),
}

impl StepResult {
    /// Human-readable rendering, newline terminated.
    pub fn to_text(&self) -> String {
        match self {
            StepResult::DirectoryAdded { parent, name } => {
                format!("Added directory {} under {}\n", name, parent)
            }
            StepResult::FileAdded { parent, name, size } => {
                format!("Added file {} ({} bytes) under {}\n", name, size, parent)
            }
            StepResult::Deleted { name } => format!("Deleted {}\n", name),
            StepResult::FileSize { name, size } => format!("{}: {} bytes\n", name, size),
            StepResult::BiggestFile { name } => format!("Biggest file: {}\n", name),
            StepResult::Tree { lines, .. } => {
                let mut text = String::from("File system structure:\n");
                for line in lines {
                    text.push_str(line);
                    text.push('\n');
                }
                text
            }
            StepResult::Stat(info) => {
                let mut text = format!("Name: {}\n", info.name);
                text.push_str(&format!("Type: {}\n", info.node_type.as_str()));
                if let Some(size) = info.size {
                    text.push_str(&format!("Size: {} bytes\n", size));
                }
                text.push_str(&format!("Created: {}\n", info.created.to_rfc3339()));
                text.push_str(&format!("Path: {}\n", info.path.join("/")));
                if info.node_type == NodeType::Directory {
                    text.push_str(&format!("Children: {}\n", info.children.join(", ")));
                }
                text
            }
        }
    }
}

/// One executed script line.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutput {
    pub line: usize,
    pub command: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<StepResult>,
    /// Flattened into the step as `kind` and `error`.
    #[serde(flatten)]
    pub error: Option<StepError>,
}

/// Output for `run` and `demo` commands.
#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub success: bool,
    pub result_code: u8,
    pub steps: Vec<StepOutput>,
    pub failed: usize,
    pub stats: Stats,
}
