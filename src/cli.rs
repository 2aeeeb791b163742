/// Command-line surface.
///
/// Modes are mutually exclusive and selected by flag; the default mode with
/// no flag is edit. Every mode is a thin shell over the library: hard
/// errors propagate out of [`run`] and become exit code 1 at the entry
/// point, while per-operation failures are carried in the processing
/// report and mapped to the exit code here.
use crate::diff::{DocumentDiff, diff_documents};
use crate::docx::driver::{EditDriver, ProcessingReport, resolve_author};
use crate::docx::{Manifest, ReviewDocument};
use crate::error::{DocxError, Result};
use crate::extract::{ReadReport, extract};
use crate::{template, textconv};
use clap::{ArgGroup, Parser};
use log::info;
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

/// Tracked-change editing, diffing, and textconv for Word documents.
#[derive(Debug, Parser)]
#[command(name = "docx-review", version)]
#[command(about = "Read, edit, compare, and normalize .docx review markup")]
#[command(group = ArgGroup::new("mode").multiple(false))]
pub struct CliArguments {
    /// Report the document's paragraphs, tracked changes, and comments
    #[arg(long, group = "mode")]
    pub read: bool,

    /// Compare two documents: OLD.docx NEW.docx
    #[arg(long, group = "mode")]
    pub diff: bool,

    /// Emit the stable text projection of a document (git diff driver)
    #[arg(long, group = "mode")]
    pub textconv: bool,

    /// Create a blank document, then apply a manifest if one is given
    #[arg(long, group = "mode")]
    pub create: bool,

    /// Configure git to diff .docx files through this tool
    #[arg(long = "git-setup", group = "mode")]
    pub git_setup: bool,

    /// Output path (edit and create modes)
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Revision author; overrides the manifest's author field
    #[arg(long, value_name = "NAME")]
    pub author: Option<String>,

    /// Emit JSON instead of human-readable output
    #[arg(long)]
    pub json: bool,

    /// Resolve every operation but write nothing
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Mode-specific positional arguments
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

/// Run one invocation; the return value is the process exit code.
pub fn run(args: &CliArguments) -> Result<i32> {
    if args.git_setup {
        return run_git_setup();
    }
    if args.textconv {
        return run_textconv(args);
    }
    if args.read {
        return run_read(args);
    }
    if args.diff {
        return run_diff(args);
    }
    if args.create {
        return run_create(args);
    }
    run_edit(args)
}

fn positional<'a>(args: &'a CliArguments, index: usize, what: &str) -> Result<&'a Path> {
    args.files
        .get(index)
        .map(PathBuf::as_path)
        .ok_or_else(|| DocxError::Other(format!("missing argument: {what}")))
}

// ---------------------------------------------------------------------------
// Edit (default mode)

fn run_edit(args: &CliArguments) -> Result<i32> {
    let input = positional(args, 0, "input.docx")?;
    let manifest = load_manifest(args.files.get(1).map(PathBuf::as_path))?;

    let output = match &args.output {
        Some(path) => path.clone(),
        None => default_output_path(input),
    };

    let mut doc = ReviewDocument::open(input)?;
    let author = resolve_author(args.author.as_deref(), &manifest);
    let driver = EditDriver::new(author, args.dry_run);
    let outcome = driver.apply(&mut doc, &manifest)?;

    if !args.dry_run {
        doc.commit()?;
        doc.save(&output)?;
        info!("wrote {}", output.display());
    }

    let report = ProcessingReport::new(
        input.display().to_string(),
        output.display().to_string(),
        outcome,
    );
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_processing_report(&report, args.dry_run);
    }
    Ok(if report.success { 0 } else { 1 })
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    input.with_file_name(format!("{stem}-reviewed.docx"))
}

fn load_manifest(path: Option<&Path>) -> Result<Manifest> {
    let json = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut stdin = std::io::stdin();
            if stdin.is_terminal() {
                return Err(DocxError::Manifest(
                    "no manifest given: pass a path or pipe JSON on stdin".to_string(),
                ));
            }
            let mut buf = String::new();
            stdin.read_to_string(&mut buf)?;
            buf
        },
    };
    Manifest::from_json_str(&json)
}

fn print_processing_report(report: &ProcessingReport, dry_run: bool) {
    if dry_run {
        println!("Dry run: {} (no output written)", report.input);
    } else {
        println!("Edited {} -> {}", report.input, report.output);
    }
    println!("Author: {}", report.author);
    for result in &report.results {
        let status = if result.success { "ok" } else { "FAILED" };
        println!("  [{}] {}: {}", result.kind, status, result.message);
    }
    println!(
        "Comments: {}/{}  Changes: {}/{}",
        report.comments_succeeded,
        report.comments_attempted,
        report.changes_succeeded,
        report.changes_attempted
    );
}

// ---------------------------------------------------------------------------
// Read

fn run_read(args: &CliArguments) -> Result<i32> {
    let input = positional(args, 0, "file.docx")?;
    let doc = ReviewDocument::open(input)?;
    let model = extract(&doc)?;
    let report = ReadReport::new(input.display().to_string(), model);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_read_report(&report);
    }
    Ok(0)
}

fn print_read_report(report: &ReadReport) {
    println!("File: {}", report.file);
    if let Some(title) = &report.metadata.title {
        println!("Title: {title}");
    }
    if let Some(author) = &report.metadata.author {
        println!("Author: {author}");
    }
    println!(
        "Paragraphs: {}  Tracked changes: {} ({} insertions, {} deletions)  Comments: {}",
        report.paragraphs.len(),
        report.summary.total_tracked_changes,
        report.summary.insertions,
        report.summary.deletions,
        report.summary.total_comments
    );
    for para in report.paragraphs.iter().filter(|p| !p.tracked_changes.is_empty()) {
        for change in &para.tracked_changes {
            println!(
                "  \u{b6}{} {:?} by {}: {:?}",
                para.index, change.kind, change.author, change.text
            );
        }
    }
    for comment in &report.comments {
        println!(
            "  comment #{} by {} on {:?}: {}",
            comment.id, comment.author, comment.anchor_text, comment.text
        );
    }
}

// ---------------------------------------------------------------------------
// Diff

fn run_diff(args: &CliArguments) -> Result<i32> {
    let old_path = positional(args, 0, "old.docx")?;
    let new_path = positional(args, 1, "new.docx")?;

    let old_doc = ReviewDocument::open(old_path)?;
    let new_doc = ReviewDocument::open(new_path)?;
    let old_model = extract(&old_doc)?;
    let new_model = extract(&new_doc)?;
    let diff = diff_documents(
        &old_model,
        &new_model,
        old_path.display().to_string(),
        new_path.display().to_string(),
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&diff)?);
    } else {
        print_diff(&diff);
    }
    Ok(0)
}

fn print_diff(diff: &DocumentDiff) {
    println!("{} -> {}", diff.old_file, diff.new_file);
    if diff.summary.identical {
        println!("Documents are identical.");
        return;
    }
    for change in &diff.metadata.changes {
        println!(
            "  metadata {}: {:?} -> {:?}",
            change.field,
            change.old.as_deref().unwrap_or("-"),
            change.new.as_deref().unwrap_or("-")
        );
    }
    for para in &diff.paragraphs.deleted {
        println!("  - \u{b6}{} {:?}", para.index, para.text);
    }
    for para in &diff.paragraphs.added {
        println!("  + \u{b6}{} {:?}", para.index, para.text);
    }
    for modification in &diff.paragraphs.modified {
        println!(
            "  ~ \u{b6}{} -> \u{b6}{}",
            modification.old_index, modification.new_index
        );
        for word in &modification.word_changes {
            println!(
                "      {:?} at {}: {:?} -> {:?}",
                word.kind,
                word.position,
                word.old.as_deref().unwrap_or("-"),
                word.new.as_deref().unwrap_or("-")
            );
        }
        for fmt in &modification.formatting_changes {
            println!(
                "      format {:?} {}: {} -> {}",
                fmt.word, fmt.attribute, fmt.old, fmt.new
            );
        }
    }
    for comment in &diff.comments.added {
        println!("  + comment [{}] {:?}", comment.author, comment.text);
    }
    for comment in &diff.comments.deleted {
        println!("  - comment [{}] {:?}", comment.author, comment.text);
    }
    for change in &diff.tracked_changes.added {
        println!("  + change {:?} {:?} by {}", change.kind, change.text, change.author);
    }
    for change in &diff.tracked_changes.deleted {
        println!("  - change {:?} {:?} by {}", change.kind, change.text, change.author);
    }
}

// ---------------------------------------------------------------------------
// Textconv

fn run_textconv(args: &CliArguments) -> Result<i32> {
    let input = positional(args, 0, "file.docx")?;
    let doc = ReviewDocument::open(input)?;
    let model = extract(&doc)?;
    print!("{}", textconv::render(&model));
    Ok(0)
}

// ---------------------------------------------------------------------------
// Create

fn run_create(args: &CliArguments) -> Result<i32> {
    let output = match &args.output {
        Some(path) => path.as_path(),
        None => positional(args, 0, "output.docx")?,
    };
    let bytes = template::blank_document_bytes()?;

    // Manifest path comes after the output when both are positional.
    let manifest_index = if args.output.is_some() { 0 } else { 1 };
    let manifest_path = args.files.get(manifest_index).map(PathBuf::as_path);
    let manifest = match manifest_path {
        Some(path) => Some(load_manifest(Some(path))?),
        None if !std::io::stdin().is_terminal() => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            if buf.trim().is_empty() {
                None
            } else {
                Some(Manifest::from_json_str(&buf)?)
            }
        },
        None => None,
    };

    let Some(manifest) = manifest else {
        std::fs::write(output, bytes)?;
        info!("created {}", output.display());
        println!("Created {}", output.display());
        return Ok(0);
    };

    let mut doc = ReviewDocument::from_bytes(bytes)?;
    let author = resolve_author(args.author.as_deref(), &manifest);
    let driver = EditDriver::new(author, args.dry_run);
    let outcome = driver.apply(&mut doc, &manifest)?;
    if !args.dry_run {
        doc.commit()?;
        doc.save(output)?;
    }

    let report = ProcessingReport::new(
        "(template)".to_string(),
        output.display().to_string(),
        outcome,
    );
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_processing_report(&report, args.dry_run);
    }
    Ok(if report.success { 0 } else { 1 })
}

// ---------------------------------------------------------------------------
// Git setup

fn run_git_setup() -> Result<i32> {
    let status = std::process::Command::new("git")
        .args(["config", "diff.docx.textconv", "docx-review --textconv"])
        .status()
        .map_err(|e| DocxError::Other(format!("failed to run git: {e}")))?;
    if !status.success() {
        return Err(DocxError::Other(
            "git config failed; run this inside a git repository".to_string(),
        ));
    }
    println!("Configured git diff driver 'docx'.");
    println!("Add this line to .gitattributes to enable it:");
    println!("    *.docx diff=docx");
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_flags_are_exclusive() {
        use clap::CommandFactory;
        CliArguments::command().debug_assert();

        let err = CliArguments::try_parse_from(["docx-review", "--read", "--diff", "a.docx"]);
        assert!(err.is_err());
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("dir/report.docx")),
            PathBuf::from("dir/report-reviewed.docx")
        );
    }

    #[test]
    fn test_parse_edit_invocation() {
        let args = CliArguments::try_parse_from([
            "docx-review",
            "input.docx",
            "manifest.json",
            "-o",
            "out.docx",
            "--author",
            "Jane",
            "--json",
        ])
        .unwrap();
        assert_eq!(args.files.len(), 2);
        assert_eq!(args.output.as_deref(), Some(Path::new("out.docx")));
        assert_eq!(args.author.as_deref(), Some("Jane"));
        assert!(args.json);
        assert!(!args.dry_run);
    }
}
