/// Edit manifest deserialization.
///
/// Field names are case-insensitive on input, and entries are parsed
/// leniently: a manifest that is valid JSON always loads, while entries
/// missing required fields surface as per-operation failures during the
/// run, not as parse errors.
use crate::error::{DocxError, Result};
use serde::Deserialize;
use serde_json::Value;

/// A declarative edit manifest.
#[derive(Debug, Default, Deserialize)]
pub struct Manifest {
    /// Author for all emitted revisions and comments (overridable by CLI)
    pub author: Option<String>,
    /// Tracked-change entries, processed second
    #[serde(default)]
    pub changes: Vec<RawChange>,
    /// Comment entries, processed first
    #[serde(default)]
    pub comments: Vec<RawComment>,
}

/// A change entry as written, before validation.
#[derive(Debug, Default, Deserialize)]
pub struct RawChange {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub find: Option<String>,
    pub replace: Option<String>,
    pub anchor: Option<String>,
    pub text: Option<String>,
}

/// A comment entry as written, before validation.
#[derive(Debug, Default, Deserialize)]
pub struct RawComment {
    pub anchor: Option<String>,
    pub text: Option<String>,
}

/// A validated change operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeOp {
    Replace { find: String, replace: String },
    Delete { find: String },
    InsertAfter { anchor: String, text: String },
    InsertBefore { anchor: String, text: String },
}

impl ChangeOp {
    /// The manifest kind string for result records.
    pub fn kind(&self) -> &'static str {
        match self {
            ChangeOp::Replace { .. } => "replace",
            ChangeOp::Delete { .. } => "delete",
            ChangeOp::InsertAfter { .. } => "insert_after",
            ChangeOp::InsertBefore { .. } => "insert_before",
        }
    }

    /// The phrase this operation targets.
    pub fn target(&self) -> &str {
        match self {
            ChangeOp::Replace { find, .. } | ChangeOp::Delete { find } => find,
            ChangeOp::InsertAfter { anchor, .. } | ChangeOp::InsertBefore { anchor, .. } => anchor,
        }
    }
}

/// A validated comment operation.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentOp {
    pub anchor: String,
    pub text: String,
}

impl Manifest {
    /// Parse a manifest from JSON, folding all object keys to lowercase.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| DocxError::Manifest(format!("invalid JSON: {e}")))?;
        let value = lowercase_keys(value);
        serde_json::from_value(value).map_err(|e| DocxError::Manifest(e.to_string()))
    }
}

fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k.to_lowercase(), lowercase_keys(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}

impl RawChange {
    /// The kind string to report for this entry, valid or not.
    pub fn kind_label(&self) -> &str {
        self.kind.as_deref().unwrap_or("change")
    }

    /// Validate into a typed operation, or a failure message.
    pub fn validate(&self) -> std::result::Result<ChangeOp, String> {
        let need = |field: &Option<String>, name: &str, kind: &str| {
            field
                .clone()
                .ok_or_else(|| format!("{kind} entry requires '{name}'"))
        };
        match self.kind.as_deref() {
            Some("replace") => Ok(ChangeOp::Replace {
                find: need(&self.find, "find", "replace")?,
                replace: need(&self.replace, "replace", "replace")?,
            }),
            Some("delete") => Ok(ChangeOp::Delete {
                find: need(&self.find, "find", "delete")?,
            }),
            Some("insert_after") => Ok(ChangeOp::InsertAfter {
                anchor: need(&self.anchor, "anchor", "insert_after")?,
                text: need(&self.text, "text", "insert_after")?,
            }),
            Some("insert_before") => Ok(ChangeOp::InsertBefore {
                anchor: need(&self.anchor, "anchor", "insert_before")?,
                text: need(&self.text, "text", "insert_before")?,
            }),
            Some(other) => Err(format!("unknown change type '{other}'")),
            None => Err("change entry missing 'type'".to_string()),
        }
    }
}

impl RawComment {
    /// Validate into a typed operation, or a failure message.
    pub fn validate(&self) -> std::result::Result<CommentOp, String> {
        let anchor = self
            .anchor
            .clone()
            .ok_or_else(|| "comment entry requires 'anchor'".to_string())?;
        let text = self
            .text
            .clone()
            .ok_or_else(|| "comment entry requires 'text'".to_string())?;
        Ok(CommentOp { anchor, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_manifest() {
        let manifest = Manifest::from_json_str(
            r#"{
                "author": "Dr. Smith",
                "changes": [
                    { "type": "replace", "find": "methodology", "replace": "methods" },
                    { "type": "delete", "find": "obsolete" },
                    { "type": "insert_after", "anchor": "Results", "text": " (revised)" }
                ],
                "comments": [
                    { "anchor": "p < 0.001", "text": "Check this value." }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(manifest.author.as_deref(), Some("Dr. Smith"));
        assert_eq!(manifest.changes.len(), 3);
        assert_eq!(manifest.comments.len(), 1);
        assert_eq!(
            manifest.changes[0].validate().unwrap(),
            ChangeOp::Replace {
                find: "methodology".to_string(),
                replace: "methods".to_string()
            }
        );
    }

    #[test]
    fn test_field_names_case_insensitive() {
        let manifest = Manifest::from_json_str(
            r#"{ "Author": "A", "Changes": [ { "Type": "delete", "Find": "x" } ] }"#,
        )
        .unwrap();
        assert_eq!(manifest.author.as_deref(), Some("A"));
        assert_eq!(
            manifest.changes[0].validate().unwrap(),
            ChangeOp::Delete { find: "x".to_string() }
        );
    }

    #[test]
    fn test_missing_required_field_is_entry_level() {
        let manifest =
            Manifest::from_json_str(r#"{ "changes": [ { "type": "replace", "find": "x" } ] }"#)
                .unwrap();
        let err = manifest.changes[0].validate().unwrap_err();
        assert!(err.contains("requires 'replace'"));
    }

    #[test]
    fn test_unknown_type_is_entry_level() {
        let manifest =
            Manifest::from_json_str(r#"{ "changes": [ { "type": "swap", "find": "x" } ] }"#)
                .unwrap();
        assert!(manifest.changes[0].validate().unwrap_err().contains("swap"));
    }

    #[test]
    fn test_invalid_json_is_hard_error() {
        assert!(matches!(
            Manifest::from_json_str("{ not json"),
            Err(DocxError::Manifest(_))
        ));
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = Manifest::from_json_str("{}").unwrap();
        assert!(manifest.changes.is_empty());
        assert!(manifest.comments.is_empty());
        assert!(manifest.author.is_none());
    }
}
