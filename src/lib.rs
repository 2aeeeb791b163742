//! docx-review - tracked-change editing, diffing, and textconv for Word documents
//!
//! This library reads, edits, compares, and emits Microsoft Word documents
//! (the Office Open XML .docx container) with full fidelity for the review
//! layer: tracked insertions, tracked deletions, and anchored comments.
//!
//! # Features
//!
//! - **Tracked-change editor**: apply a declarative manifest of
//!   replace/delete/insert operations and comments; each edit becomes proper
//!   `w:ins`/`w:del` revision markup Word can accept or reject, even when the
//!   target phrase is split across formatting runs
//! - **Semantic differ**: paragraph alignment by similarity-tolerant LCS,
//!   word-level diffs, comment and tracked-change set comparison, metadata
//!   field comparison
//! - **Textconv normalizer**: a deterministic line-oriented projection of
//!   every review-visible layer, suitable as a git diff driver
//! - **Byte-level preservation**: parts an operation does not touch survive
//!   the round trip bit-for-bit
//!
//! # Example - applying a manifest
//!
//! ```no_run
//! use docx_review::docx::driver::{EditDriver, resolve_author};
//! use docx_review::docx::{Manifest, ReviewDocument};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manifest = Manifest::from_json_str(
//!     r#"{ "changes": [ { "type": "replace", "find": "methodology", "replace": "methods" } ] }"#,
//! )?;
//!
//! let mut doc = ReviewDocument::open("input.docx")?;
//! let driver = EditDriver::new(resolve_author(None, &manifest), false);
//! let outcome = driver.apply(&mut doc, &manifest)?;
//! doc.commit()?;
//! doc.save("output.docx")?;
//!
//! assert!(outcome.success);
//! # Ok(())
//! # }
//! ```
//!
//! # Example - diffing two documents
//!
//! ```no_run
//! use docx_review::diff::diff_documents;
//! use docx_review::docx::ReviewDocument;
//! use docx_review::extract::extract;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let old = extract(&ReviewDocument::open("old.docx")?)?;
//! let new = extract(&ReviewDocument::open("new.docx")?)?;
//! let diff = diff_documents(&old, &new, "old.docx", "new.docx");
//! println!("identical: {}", diff.summary.identical);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod diff;
pub mod docx;
pub mod error;
pub mod extract;
pub mod opc;
pub mod template;
pub mod textconv;
pub mod xml;

pub use error::{DocxError, Result};

// Re-export commonly used types for convenience
pub use diff::{DocumentDiff, diff_documents};
pub use docx::{Manifest, PackageMetadata, ReviewDocument, RunIndex, RunProperties};
pub use extract::{DocumentModel, ReadReport, extract};
