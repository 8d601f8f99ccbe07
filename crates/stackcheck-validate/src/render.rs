//! # Report Rendering
//!
//! Stateless formatting of a finished diagnostic list. Rendering never
//! reorders: output follows the validator's traversal order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::report::{Diagnostic, Severity, Summary};

/// Output format of a rendered report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// One line per diagnostic plus a summary line.
    #[default]
    Text,
    /// A pretty-printed JSON array of diagnostic records.
    Json,
}

impl Format {
    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(RenderError::UnknownFormat(s.to_string())),
        }
    }
}

/// Error rendering a report.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The format name is not `text` or `json`.
    #[error("unknown report format '{0}' (expected 'text' or 'json')")]
    UnknownFormat(String),

    /// JSON serialization failed.
    #[error("cannot serialize diagnostics: {0}")]
    Json(#[from] serde_json::Error),
}

/// Render `diagnostics` in `format`.
pub fn render(diagnostics: &[Diagnostic], format: Format) -> Result<String, RenderError> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(diagnostics)?),
        Format::Text => {
            if diagnostics.is_empty() {
                return Ok("no diagnostics".to_string());
            }
            let mut out = String::new();
            for d in diagnostics {
                out.push_str(&d.to_string());
                out.push('\n');
            }
            out.push_str(&Summary::of(diagnostics).to_string());
            Ok(out)
        }
    }
}

/// Process exit code for a report: 2 if any Fatal, else 1 if any Error,
/// else 0. Warnings never count.
pub fn exit_code(diagnostics: &[Diagnostic]) -> u8 {
    match diagnostics.iter().map(|d| d.severity).max() {
        Some(Severity::Fatal) => 2,
        Some(Severity::Error) => 1,
        Some(Severity::Warning) | None => 0,
    }
}
