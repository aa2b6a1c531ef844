use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::types::ComparisonError;

/// Report format requested alongside a comparison
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    Html,
}

impl OutputFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Html => "html",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ComparisonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "html" => Ok(Self::Html),
            other => Err(ComparisonError::InvalidConfiguration(format!(
                "unknown output format '{other}' (expected json, csv or html)"
            ))),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Settings for a comparison run.
///
/// `ignore_array_order` and `ignore_extra_fields` are accepted and echoed
/// back, but the matcher and differ do not consult them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Dotted field paths to compare. Empty means every field, recursively.
    #[serde(alias = "comparisonFields")]
    pub comparison_fields: Vec<String>,

    #[serde(alias = "caseSensitive")]
    pub case_sensitive: bool,

    #[serde(alias = "ignoreArrayOrder")]
    pub ignore_array_order: bool,

    #[serde(alias = "ignoreExtraFields")]
    pub ignore_extra_fields: bool,

    #[serde(alias = "outputFormat")]
    pub output_format: OutputFormat,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            comparison_fields: Vec::new(),
            case_sensitive: true,
            ignore_array_order: false,
            ignore_extra_fields: false,
            output_format: OutputFormat::default(),
        }
    }
}

impl ComparisonConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the comparison to the given field paths, kept as written
    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.comparison_fields = dedup_fields(fields.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    #[must_use]
    pub fn with_output_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = output_format;
        self
    }

    /// Parse a configuration document.
    ///
    /// Both snake_case and camelCase keys are accepted. Missing keys take
    /// their default values.
    ///
    /// # Errors
    ///
    /// Returns `ComparisonError::InvalidConfiguration` if the text is empty,
    /// is the JSON `null`, or does not describe a configuration object.
    pub fn from_json_str(text: &str) -> Result<Self, ComparisonError> {
        if text.trim().is_empty() {
            return Err(ComparisonError::InvalidConfiguration(
                "configuration document is empty".to_string(),
            ));
        }

        let config: Option<Self> = serde_json::from_str(text)
            .map_err(|e| ComparisonError::InvalidConfiguration(e.to_string()))?;

        let config = config.ok_or_else(|| {
            ComparisonError::InvalidConfiguration("configuration is null".to_string())
        })?;

        Ok(config.normalized())
    }

    /// Load a configuration document from disk
    ///
    /// # Errors
    ///
    /// Returns `ComparisonError::InvalidConfiguration` if the file cannot be
    /// read or does not contain a valid configuration.
    pub fn load_from_file(path: &Path) -> Result<Self, ComparisonError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ComparisonError::InvalidConfiguration(format!(
                "cannot read configuration file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&content)
    }

    /// Drop repeated field paths, first occurrence wins.
    ///
    /// Paths are otherwise kept as written: a document key may legitimately
    /// carry surrounding whitespace.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.comparison_fields = dedup_fields(std::mem::take(&mut self.comparison_fields));
        self
    }
}

/// Split a comma-separated field list, as typed on a command line or in a form.
///
/// Entries are trimmed and empty entries dropped before deduplication.
#[must_use]
pub fn parse_field_list(text: &str) -> Vec<String> {
    dedup_fields(
        text.split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(str::to_string),
    )
}

fn dedup_fields(fields: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for field in fields {
        if !unique.contains(&field) {
            unique.push(field);
        }
    }
    unique
}
