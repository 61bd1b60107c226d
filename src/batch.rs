//! Insertion batches: the ordered member lines appended to a catalog in one
//! rewrite, plus the marker key that records whether they were applied.

use crate::error::AppendError;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

/// Indent used for rendered member lines, matching the site's catalogs.
const INDENT: &str = "  ";

static MEMBER_REGEX: OnceLock<Regex> = OnceLock::new();

fn member_regex() -> &'static Regex {
    MEMBER_REGEX.get_or_init(|| {
        Regex::new(r#"^\s*"((?:[^"\\]|\\.)*)"\s*:\s*\S"#).expect("member regex is valid")
    })
}

/// Key whose presence in a catalog means the batch was already applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkerKey(String);

impl MarkerKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The key as it appears in a JSON document, quotes included.
    pub fn quoted(&self) -> String {
        Value::from(self.0.as_str()).to_string()
    }

    /// Whether the quoted key occurs anywhere in `content`.
    ///
    /// This is a plain substring search: a value or comment containing the
    /// quoted key counts as present too.
    pub fn is_present_in(&self, content: &str) -> bool {
        content.contains(&self.quoted())
    }
}

impl fmt::Display for MarkerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single key/value pair to render as a member line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchEntry {
    pub key: String,
    pub value: Value,
}

impl BatchEntry {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered, comma-terminated member lines plus their marker key.
///
/// Every line except the last ends with `,`; the last one does not, so the
/// batch can be placed directly before a closing `}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionBatch {
    lines: Vec<String>,
    keys: Vec<String>,
    marker: MarkerKey,
}

impl InsertionBatch {
    /// Build a batch from pre-formatted member lines.
    pub fn from_lines<I, S>(lines: I, marker: MarkerKey) -> Result<Self, AppendError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        if lines.is_empty() {
            return Err(AppendError::InvalidBatch("batch has no lines".to_string()));
        }

        let last = lines.len() - 1;
        let mut keys = Vec::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            let raw = member_regex()
                .captures(line)
                .and_then(|cap| cap.get(1))
                .ok_or_else(|| {
                    AppendError::InvalidBatch(format!("line {} is not a JSON member: {}", i + 1, line))
                })?;
            let key: String = serde_json::from_str(&format!("\"{}\"", raw.as_str())).map_err(|e| {
                AppendError::InvalidBatch(format!("line {} has an invalid key: {}", i + 1, e))
            })?;

            let has_comma = line.trim_end().ends_with(',');
            if i < last && !has_comma {
                return Err(AppendError::InvalidBatch(format!(
                    "line {} must end with a comma: {}",
                    i + 1,
                    line
                )));
            }
            if i == last && has_comma {
                return Err(AppendError::InvalidBatch(format!(
                    "last line must not end with a comma: {}",
                    line
                )));
            }
            keys.push(key);
        }

        let quoted = marker.quoted();
        if !lines.iter().any(|line| line.contains(&quoted)) {
            return Err(AppendError::InvalidBatch(format!(
                "marker {} does not occur in the batch",
                quoted
            )));
        }

        Ok(Self {
            lines,
            keys,
            marker,
        })
    }

    /// Build a batch by rendering ordered entries as `  "key": value` lines.
    pub fn from_entries(entries: &[BatchEntry], marker: MarkerKey) -> Result<Self, AppendError> {
        if entries.is_empty() {
            return Err(AppendError::InvalidBatch("batch has no entries".to_string()));
        }

        let mut seen = HashSet::new();
        for entry in entries {
            if !seen.insert(entry.key.as_str()) {
                return Err(AppendError::InvalidBatch(format!(
                    "duplicate key '{}'",
                    entry.key
                )));
            }
        }
        if !seen.contains(marker.as_str()) {
            return Err(AppendError::InvalidBatch(format!(
                "marker '{}' is not one of the batch keys",
                marker
            )));
        }

        let last = entries.len() - 1;
        let lines = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let comma = if i < last { "," } else { "" };
                format!(
                    "{}{}: {}{}",
                    INDENT,
                    Value::from(entry.key.as_str()),
                    entry.value,
                    comma
                )
            })
            .collect();

        Ok(Self {
            lines,
            keys: entries.iter().map(|e| e.key.clone()).collect(),
            marker,
        })
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Keys in insertion order, with JSON escapes resolved.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn marker(&self) -> &MarkerKey {
        &self.marker
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ==================== MarkerKey Tests ====================

    #[test]
    fn test_marker_quoted() {
        let marker = MarkerKey::new("notFound.eyebrow");
        assert_eq!(marker.quoted(), "\"notFound.eyebrow\"");
    }

    #[test]
    fn test_marker_presence_is_substring_search() {
        let marker = MarkerKey::new("b");
        assert!(marker.is_present_in("{\n  \"b\": \"2\"\n}"));
        assert!(marker.is_present_in("{\n  \"a\": \"b\"\n}"));
        assert!(!marker.is_present_in("{\n  \"ab\": \"1\"\n}"));
    }

    // ==================== from_lines Tests ====================

    #[test]
    fn test_from_lines_valid() {
        let batch = InsertionBatch::from_lines(
            [
                r#"  "notFound.eyebrow": "Oops","#,
                r#"  "notFound.title": "We could not find that page""#,
            ],
            MarkerKey::new("notFound.eyebrow"),
        )
        .unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.keys(), ["notFound.eyebrow", "notFound.title"]);
    }

    #[test]
    fn test_from_lines_rejects_empty() {
        let err = InsertionBatch::from_lines(Vec::<String>::new(), MarkerKey::new("a")).unwrap_err();
        assert!(err.to_string().contains("no lines"));
    }

    #[test]
    fn test_from_lines_rejects_missing_comma() {
        let err = InsertionBatch::from_lines(
            [r#"  "a": "1""#, r#"  "b": "2""#],
            MarkerKey::new("a"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("must end with a comma"));
    }

    #[test]
    fn test_from_lines_rejects_trailing_comma_on_last() {
        let err = InsertionBatch::from_lines([r#"  "a": "1","#], MarkerKey::new("a")).unwrap_err();
        assert!(err.to_string().contains("last line"));
    }

    #[test]
    fn test_from_lines_rejects_non_member() {
        let err = InsertionBatch::from_lines(["  not json"], MarkerKey::new("a")).unwrap_err();
        assert!(err.to_string().contains("not a JSON member"));
    }

    #[test]
    fn test_from_lines_rejects_absent_marker() {
        let err = InsertionBatch::from_lines([r#"  "a": "1""#], MarkerKey::new("z")).unwrap_err();
        assert!(err.to_string().contains("marker"));
    }

    #[test]
    fn test_from_lines_accepts_escaped_quotes_in_key() {
        let batch =
            InsertionBatch::from_lines([r#"  "say \"hi\"": "1""#], MarkerKey::new("say \"hi\""))
                .unwrap();
        assert_eq!(batch.keys(), ["say \"hi\""]);
    }

    // ==================== from_entries Tests ====================

    #[test]
    fn test_from_entries_renders_lines() {
        let batch = InsertionBatch::from_entries(
            &[
                BatchEntry::new("transferQuote.priceFrom", "Precio desde ${price}"),
                BatchEntry::new("transferQuote.perTrip", "por trayecto"),
            ],
            MarkerKey::new("transferQuote.priceFrom"),
        )
        .unwrap();

        assert_eq!(
            batch.lines(),
            [
                r#"  "transferQuote.priceFrom": "Precio desde ${price}","#,
                r#"  "transferQuote.perTrip": "por trayecto""#,
            ]
        );
    }

    #[test]
    fn test_from_entries_escapes_values() {
        let batch = InsertionBatch::from_entries(
            &[BatchEntry::new("q", "say \"hi\"\n")],
            MarkerKey::new("q"),
        )
        .unwrap();
        assert_eq!(batch.lines(), [r#"  "q": "say \"hi\"\n""#]);
    }

    #[test]
    fn test_from_entries_non_string_values() {
        let batch = InsertionBatch::from_entries(
            &[
                BatchEntry::new("count", json!(3)),
                BatchEntry::new("tags", json!(["a", "b"])),
            ],
            MarkerKey::new("count"),
        )
        .unwrap();
        assert_eq!(batch.lines()[0], r#"  "count": 3,"#);
        assert_eq!(batch.lines()[1], r#"  "tags": ["a","b"]"#);
    }

    #[test]
    fn test_from_entries_rejects_duplicates() {
        let err = InsertionBatch::from_entries(
            &[BatchEntry::new("a", "1"), BatchEntry::new("a", "2")],
            MarkerKey::new("a"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_from_entries_requires_marker_key() {
        let err = InsertionBatch::from_entries(&[BatchEntry::new("a", "1")], MarkerKey::new("b"))
            .unwrap_err();
        assert!(err.to_string().contains("not one of the batch keys"));
    }

    #[test]
    fn test_entry_deserialize() {
        let entry: BatchEntry =
            serde_json::from_str(r#"{"key": "notFound.title", "value": "Page introuvable"}"#)
                .unwrap();
        assert_eq!(entry, BatchEntry::new("notFound.title", "Page introuvable"));
    }
}
