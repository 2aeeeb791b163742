/// Manifest orchestration.
///
/// The driver applies a manifest in two phases: comments first, then
/// changes. Comment range markers are zero-width, so anchors resolved in
/// the first phase see the original visible text; revision markup emitted
/// in the second phase shifts the projection (deleted content disappears),
/// which is why the order is fixed. The run index is rebuilt before every
/// match, so each operation sees the document as it stands after the
/// previous ones.
use crate::docx::comment;
use crate::docx::document::ReviewDocument;
use crate::docx::index::RunIndex;
use crate::docx::manifest::{ChangeOp, Manifest, RawChange, RawComment};
use crate::docx::matching::find_first;
use crate::docx::metadata::format_timestamp;
use crate::docx::splice::{self, ReviewContext, RevisionCounter};
use crate::error::Result;
use chrono::Utc;
use log::{debug, info, warn};
use serde::Serialize;

/// Author used when neither the CLI nor the manifest names one.
pub const DEFAULT_AUTHOR: &str = "Reviewer";

/// Resolve the revision author: CLI flag > manifest field > default.
pub fn resolve_author(cli_author: Option<&str>, manifest: &Manifest) -> String {
    cli_author
        .map(str::to_string)
        .or_else(|| manifest.author.clone())
        .unwrap_or_else(|| DEFAULT_AUTHOR.to_string())
}

/// The outcome of one manifest entry.
#[derive(Debug, Clone, Serialize)]
pub struct OperationResult {
    /// Index within its kind (comments and changes count separately)
    pub index: usize,
    /// Entry kind: `comment`, `replace`, `delete`, `insert_after`, `insert_before`
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether the entry applied (or, in a dry run, would apply)
    pub success: bool,
    /// Human-readable message, stable enough for substring matching
    pub message: String,
}

/// The outcome of a whole manifest run.
#[derive(Debug, Serialize)]
pub struct EditOutcome {
    pub author: String,
    pub changes_attempted: usize,
    pub changes_succeeded: usize,
    pub comments_attempted: usize,
    pub comments_succeeded: usize,
    pub results: Vec<OperationResult>,
    /// Conjunction of all per-entry successes
    pub success: bool,
}

/// The processing result reported to callers, JSON shape included.
#[derive(Debug, Serialize)]
pub struct ProcessingReport {
    pub input: String,
    pub output: String,
    pub author: String,
    pub changes_attempted: usize,
    pub changes_succeeded: usize,
    pub comments_attempted: usize,
    pub comments_succeeded: usize,
    pub results: Vec<OperationResult>,
    pub success: bool,
}

impl ProcessingReport {
    /// Attach the input/output paths to a driver outcome.
    pub fn new(input: impl Into<String>, output: impl Into<String>, outcome: EditOutcome) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            author: outcome.author,
            changes_attempted: outcome.changes_attempted,
            changes_succeeded: outcome.changes_succeeded,
            comments_attempted: outcome.comments_attempted,
            comments_succeeded: outcome.comments_succeeded,
            results: outcome.results,
            success: outcome.success,
        }
    }
}

/// Applies a manifest against an open document.
pub struct EditDriver {
    ctx: ReviewContext,
    dry_run: bool,
}

impl EditDriver {
    /// Create a driver stamping revisions with the given author and the
    /// current time.
    pub fn new(author: impl Into<String>, dry_run: bool) -> Self {
        Self {
            ctx: ReviewContext {
                author: author.into(),
                date: format_timestamp(&Utc::now()),
            },
            dry_run,
        }
    }

    /// Apply every manifest entry, comments first.
    ///
    /// Per-entry failures are recorded and do not stop the run; only
    /// structural errors (a body that cannot be read) abort.
    pub fn apply(&self, doc: &mut ReviewDocument, manifest: &Manifest) -> Result<EditOutcome> {
        info!(
            "applying manifest: {} comment(s), {} change(s), author '{}'{}",
            manifest.comments.len(),
            manifest.changes.len(),
            self.ctx.author,
            if self.dry_run { " (dry run)" } else { "" }
        );

        let mut counter = RevisionCounter::seed_from(doc.body()?);
        let mut results = Vec::with_capacity(manifest.comments.len() + manifest.changes.len());

        let mut comments_succeeded = 0;
        for (i, raw) in manifest.comments.iter().enumerate() {
            let result = self.apply_comment(doc, i, raw);
            if result.success {
                comments_succeeded += 1;
            }
            results.push(result);
        }

        let mut changes_succeeded = 0;
        for (i, raw) in manifest.changes.iter().enumerate() {
            let result = self.apply_change(doc, i, raw, &mut counter);
            if result.success {
                changes_succeeded += 1;
            }
            results.push(result);
        }

        let success = results.iter().all(|r| r.success);
        Ok(EditOutcome {
            author: self.ctx.author.clone(),
            changes_attempted: manifest.changes.len(),
            changes_succeeded,
            comments_attempted: manifest.comments.len(),
            comments_succeeded,
            results,
            success,
        })
    }

    fn apply_comment(&self, doc: &mut ReviewDocument, index: usize, raw: &RawComment) -> OperationResult {
        match self.try_comment(doc, raw) {
            Ok(message) => {
                debug!("comment {index}: {message}");
                OperationResult {
                    index,
                    kind: "comment".to_string(),
                    success: true,
                    message,
                }
            },
            Err(message) => {
                warn!("comment {index} failed: {message}");
                OperationResult {
                    index,
                    kind: "comment".to_string(),
                    success: false,
                    message,
                }
            },
        }
    }

    fn try_comment(
        &self,
        doc: &mut ReviewDocument,
        raw: &RawComment,
    ) -> std::result::Result<String, String> {
        let op = raw.validate()?;

        let run_index = RunIndex::build(doc.body().map_err(|e| e.to_string())?);
        let range = find_first(&run_index, &op.anchor)
            .ok_or_else(|| format!("'{}' not found in document", op.anchor))?;
        run_index
            .paragraph_of_range(&range)
            .ok_or_else(|| format!("'{}' spans multiple paragraphs", op.anchor))?;

        if self.dry_run {
            return Ok(format!("would add comment on '{}'", op.anchor));
        }

        let used = comment::used_comment_ids(
            doc.body().map_err(|e| e.to_string())?,
            doc.comments_root(),
        );
        let id = comment::allocate_comment_id(&used);
        comment::annotate_range(doc.body_mut().map_err(|e| e.to_string())?, run_index, range, id)
            .map_err(|e| e.to_string())?;
        let entry = comment::comment_entry(id, &self.ctx, &op.text);
        doc.comments_root_mut().push_element(entry);
        doc.mark_body_modified();
        doc.mark_comments_modified();
        Ok(format!("added comment {} on '{}'", id, op.anchor))
    }

    fn apply_change(
        &self,
        doc: &mut ReviewDocument,
        index: usize,
        raw: &RawChange,
        counter: &mut RevisionCounter,
    ) -> OperationResult {
        match self.try_change(doc, raw, counter) {
            Ok((kind, message)) => {
                debug!("change {index}: {message}");
                OperationResult {
                    index,
                    kind,
                    success: true,
                    message,
                }
            },
            Err(message) => {
                warn!("change {index} failed: {message}");
                OperationResult {
                    index,
                    kind: raw.kind_label().to_string(),
                    success: false,
                    message,
                }
            },
        }
    }

    fn try_change(
        &self,
        doc: &mut ReviewDocument,
        raw: &RawChange,
        counter: &mut RevisionCounter,
    ) -> std::result::Result<(String, String), String> {
        let op = raw.validate()?;
        let kind = op.kind().to_string();

        let run_index = RunIndex::build(doc.body().map_err(|e| e.to_string())?);
        let range = find_first(&run_index, op.target())
            .ok_or_else(|| format!("'{}' not found in document", op.target()))?;
        run_index
            .paragraph_of_range(&range)
            .ok_or_else(|| format!("'{}' spans multiple paragraphs", op.target()))?;

        if self.dry_run {
            let message = match &op {
                ChangeOp::Replace { find, replace } => {
                    format!("would replace '{find}' with '{replace}'")
                },
                ChangeOp::Delete { find } => format!("would delete '{find}'"),
                ChangeOp::InsertAfter { anchor, .. } => {
                    format!("would insert text after '{anchor}'")
                },
                ChangeOp::InsertBefore { anchor, .. } => {
                    format!("would insert text before '{anchor}'")
                },
            };
            return Ok((kind, message));
        }

        let body = doc.body_mut().map_err(|e| e.to_string())?;
        let message = match &op {
            ChangeOp::Replace { find, replace } => {
                splice::replace(body, run_index, range, replace, &self.ctx, counter)
                    .map_err(|e| e.to_string())?;
                format!("replaced '{find}' with '{replace}'")
            },
            ChangeOp::Delete { find } => {
                splice::delete(body, run_index, range, &self.ctx, counter)
                    .map_err(|e| e.to_string())?;
                format!("deleted '{find}'")
            },
            ChangeOp::InsertAfter { anchor, text } => {
                splice::insert_after(body, run_index, range, text, &self.ctx, counter)
                    .map_err(|e| e.to_string())?;
                format!("inserted text after '{anchor}'")
            },
            ChangeOp::InsertBefore { anchor, text } => {
                splice::insert_before(body, run_index, range, text, &self.ctx, counter)
                    .map_err(|e| e.to_string())?;
                format!("inserted text before '{anchor}'")
            },
        };
        doc.mark_body_modified();
        Ok((kind, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_precedence() {
        let manifest = Manifest::from_json_str(r#"{ "author": "Manifest Author" }"#).unwrap();
        assert_eq!(resolve_author(Some("CLI Author"), &manifest), "CLI Author");
        assert_eq!(resolve_author(None, &manifest), "Manifest Author");

        let empty = Manifest::default();
        assert_eq!(resolve_author(None, &empty), DEFAULT_AUTHOR);
    }
}
