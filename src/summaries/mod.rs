//! Program Summary Pipeline
//!
//! Offline batch job that turns party program PDFs into structured summaries.
//!
//! ## Pipeline Overview
//!
//! ```text
//! programs/*.pdf
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Locator    │  → ordered list of documents (missing names skipped)
//! └─────────────┘
//!      │  per document, sequentially
//!      ▼
//! ┌─────────────┐
//! │  Extractor  │  → transcript (text layer only)
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Generator  │  → SummaryResult (or labelled fallback)
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │   Writer    │  → <party>_summary.json, then the aggregate file
//! └─────────────┘
//! ```
//!
//! A failure in any stage drops only that document from the batch.

pub mod extractor;
pub mod generator;
pub mod locator;
pub mod writer;

pub use extractor::extract_text;
pub use generator::{SummaryGenerator, SummaryOutcome};
pub use locator::{derive_party_name, locate_documents, LocatedDocuments, SourceDocument};
pub use writer::ResultWriter;

use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::models::SummaryBatch;
use crate::types::{AppError, AppResult};

const PREVIEW_CHARS: usize = 100;

/// Whether results are written to disk or only printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Persist,
    DryRun,
}

/// Stage at which a document failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extraction,
    Summarization,
    Persistence,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Extraction => write!(f, "extraction"),
            Stage::Summarization => write!(f, "summarization"),
            Stage::Persistence => write!(f, "persistence"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DocumentFailure {
    pub party_name: String,
    pub stage: Stage,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct PipelineReport {
    pub batch: SummaryBatch,
    pub failures: Vec<DocumentFailure>,
    /// Explicitly requested files that did not exist
    pub skipped: Vec<PathBuf>,
    /// Parties whose summary is the parse-failure placeholder
    pub fallbacks: Vec<String>,
    /// Set when the aggregate file was written
    pub aggregate_path: Option<PathBuf>,
}

/// Outcome of one document; the outer `AppResult` of `process_document`
/// carries console errors, which abort the run
type DocumentResult = Result<SummaryOutcome, (Stage, AppError)>;

pub struct SummaryPipeline {
    generator: SummaryGenerator,
    writer: ResultWriter,
    mode: RunMode,
}

impl SummaryPipeline {
    pub fn new(generator: SummaryGenerator, writer: ResultWriter, mode: RunMode) -> Self {
        Self {
            generator,
            writer,
            mode,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.mode == RunMode::DryRun
    }

    /// Process every located document in order, then write (or print) the batch.
    ///
    /// Per-document errors are reported on `console` and recorded in the
    /// report; only console and aggregate write errors abort the run.
    pub async fn run<W>(&self, located: LocatedDocuments, console: &mut W) -> AppResult<PipelineReport>
    where
        W: Write + Send,
    {
        let mut report = PipelineReport {
            skipped: located.missing,
            ..Default::default()
        };

        for path in &report.skipped {
            writeln!(console, "Warning: File {} does not exist, skipping...", path.display())?;
        }

        let mut seen = HashSet::new();
        for document in &located.documents {
            if !seen.insert(document.party_name.as_str()) {
                warn!(
                    party = %document.party_name,
                    file = %document.file_name(),
                    "Party already processed in this run; this file replaces its summary"
                );
                writeln!(
                    console,
                    "Warning: {} maps to party {} which was already processed, replacing its summary",
                    document.file_name(),
                    document.party_name
                )?;
            }

            writeln!(console, "Processing {} ({})...", document.party_name, document.file_name())?;

            match self.process_document(document, console).await? {
                Ok(outcome) => {
                    if outcome.is_fallback() {
                        report.fallbacks.push(document.party_name.clone());
                    }
                    let summary = outcome.into_result();
                    writeln!(console, "✓ Generated summary for {}", document.party_name)?;
                    writeln!(console, "  Current vision: {}...", preview(&summary.current_vision))?;
                    writeln!(console, "  Future vision: {}...", preview(&summary.future_vision))?;
                    report.batch.insert(document.party_name.clone(), summary);
                }
                Err((stage, e)) => {
                    error!(
                        party = %document.party_name,
                        path = %document.path.display(),
                        stage = %stage,
                        error = %e,
                        "Document failed"
                    );
                    writeln!(console, "✗ Error processing {}: {}", document.party_name, e)?;
                    report.failures.push(DocumentFailure {
                        party_name: document.party_name.clone(),
                        stage,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            succeeded = report.batch.len(),
            failed = report.failures.len(),
            skipped = report.skipped.len(),
            fallbacks = report.fallbacks.len(),
            "Summary run complete"
        );
        writeln!(console, "\nProcessed {} parties successfully", report.batch.len())?;

        match self.mode {
            RunMode::Persist => {
                let path = self.writer.write_aggregate(&report.batch).await?;
                writeln!(console, "Summaries saved to {}", path.display())?;
                report.aggregate_path = Some(path);
            }
            RunMode::DryRun => {
                let banner = "=".repeat(50);
                writeln!(console, "Dry run - not saving to database")?;
                writeln!(console, "\n{}\nGENERATED SUMMARIES:\n{}", banner, banner)?;
                writeln!(console, "{}", serde_json::to_string_pretty(&report.batch)?)?;
            }
        }

        Ok(report)
    }

    /// Located → Extracted → Summarized → Persisted
    async fn process_document<W>(
        &self,
        document: &SourceDocument,
        console: &mut W,
    ) -> AppResult<DocumentResult>
    where
        W: Write + Send,
    {
        let transcript = match extract_text(&document.path).await {
            Ok(transcript) => transcript,
            Err(e) => return Ok(Err((Stage::Extraction, e))),
        };
        writeln!(console, "  Extracted {} characters from PDF", transcript.chars().count())?;

        let outcome = match self.generator.summarize(&transcript, &document.party_name).await {
            Ok(outcome) => outcome,
            Err(e) => return Ok(Err((Stage::Summarization, e))),
        };
        if outcome.is_fallback() {
            warn!(party = %document.party_name, "Using fallback summary");
        }

        if self.mode == RunMode::Persist {
            let path = match self
                .writer
                .write_individual(&document.party_name, outcome.result())
                .await
            {
                Ok(path) => path,
                Err(e) => return Ok(Err((Stage::Persistence, e))),
            };
            writeln!(console, "  Saved individual JSON: {}", path.display())?;
        }

        Ok(Ok(outcome))
    }
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}
