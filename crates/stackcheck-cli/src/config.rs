//! # CLI Configuration
//!
//! Optional YAML file holding defaults for the command-line flags:
//!
//! ```yaml
//! schema_dir: ./schemas
//! max_depth: 64
//! format: text
//! report_unknown_fields: true
//! ```
//!
//! Precedence is flag, then config file, then built-in default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use stackcheck_validate::{Format, ValidateOptions, DEFAULT_MAX_DEPTH};

/// Config file read from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "stackcheck.yaml";

/// Schema directory used when neither flag nor config names one.
pub const DEFAULT_SCHEMA_DIR: &str = "schemas";

/// Values read from a config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Directory of schema sources.
    pub schema_dir: Option<PathBuf>,
    /// Maximum validation depth.
    pub max_depth: Option<usize>,
    /// Report format.
    pub format: Option<Format>,
    /// Whether undeclared fields are reported.
    pub report_unknown_fields: Option<bool>,
}

impl CliConfig {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load `explicit` if given (it must exist), else [`DEFAULT_CONFIG_FILE`]
    /// in `dir` if present, else an empty config.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let fallback = dir.join(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            Self::load(&fallback)
        } else {
            Ok(Self::default())
        }
    }

    /// The schema directory to load.
    pub fn schema_dir(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.schema_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_DIR))
    }

    /// The report format.
    pub fn format(&self, flag: Option<Format>) -> Format {
        flag.or(self.format).unwrap_or_default()
    }

    /// Validation options. `no_unknown_fields` is a pure switch, so it can
    /// only turn reporting off.
    pub fn options(&self, max_depth: Option<usize>, no_unknown_fields: bool) -> ValidateOptions {
        ValidateOptions {
            max_depth: max_depth.or(self.max_depth).unwrap_or(DEFAULT_MAX_DEPTH),
            report_unknown_fields: !no_unknown_fields && self.report_unknown_fields.unwrap_or(true),
        }
    }
}
