//! Structural validation of a locale catalog.
//!
//! The appender never parses a catalog, it only looks for the marker string
//! and a trailing `}`. This module parses the result afterwards so a broken
//! file is reported instead of shipped.

use crate::batch::InsertionBatch;
use serde_json::{Map, Value};

/// Validation report containing errors and warnings about a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    /// Problems that make the catalog unusable or the patch incomplete
    pub errors: Vec<String>,

    /// Suspicious but non-fatal findings
    pub warnings: Vec<String>,

    /// Number of top-level keys (0 when the catalog does not parse)
    pub keys: usize,
}

impl ValidationReport {
    /// Create an empty report with no errors, warnings or keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the report has any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report has neither errors nor warnings.
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

/// Validator for locale catalogs.
pub struct CatalogValidator;

impl CatalogValidator {
    /// Check that `content` is a single JSON object.
    ///
    /// # Arguments
    /// * `content` - Decoded catalog text, with or without a leading BOM
    ///
    /// # Returns
    /// A report whose `keys` holds the number of top-level members when
    /// the catalog parses, and a single error otherwise
    pub fn validate_structure(content: &str) -> ValidationReport {
        let mut report = ValidationReport::new();
        if let Some(object) = Self::parse_object(content, &mut report) {
            report.keys = object.len();
        }
        report
    }

    /// Check a catalog against a batch that should be applied to it.
    ///
    /// Besides the structure check, this reports:
    /// - batch keys missing from the parsed object (error)
    /// - a marker that occurs in the text but not as a key (warning), which
    ///   the substring guard would still treat as "already applied"
    ///
    /// # Arguments
    /// * `content` - Decoded catalog text after the patch was applied
    /// * `batch` - The batch whose keys must now be present
    ///
    /// # Returns
    /// A report; parse failures short-circuit the key checks
    pub fn validate(content: &str, batch: &InsertionBatch) -> ValidationReport {
        let mut report = ValidationReport::new();
        let Some(object) = Self::parse_object(content, &mut report) else {
            return report;
        };
        report.keys = object.len();

        let marker = batch.marker();
        if marker.is_present_in(content) && !object.contains_key(marker.as_str()) {
            report.warnings.push(format!(
                "Marker {} appears in the catalog but not as a key",
                marker.quoted()
            ));
        }

        let missing: Vec<&str> = batch
            .keys()
            .iter()
            .filter(|key| !object.contains_key(key.as_str()))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            report.errors.push(format!(
                "Missing {} of {} batch keys: {:?}",
                missing.len(),
                batch.len(),
                missing
            ));
        }

        report
    }

    fn parse_object(content: &str, report: &mut ValidationReport) -> Option<Map<String, Value>> {
        // Catalogs saved by some editors start with a BOM.
        let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
        match serde_json::from_str::<Value>(content) {
            Ok(Value::Object(object)) => Some(object),
            Ok(other) => {
                report.errors.push(format!(
                    "Catalog is not a JSON object (found {})",
                    json_kind(&other)
                ));
                None
            }
            Err(e) => {
                report.errors.push(format!("Catalog is not valid JSON: {}", e));
                None
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
