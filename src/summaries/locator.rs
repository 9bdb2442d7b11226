//! Document Locator
//!
//! Resolves which program PDFs a run should process.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};

use crate::types::{AppError, AppResult};

const PDF_EXTENSION: &str = "pdf";

/// A party program on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub party_name: String,
}

impl SourceDocument {
    pub fn new(path: PathBuf) -> Self {
        let party_name = derive_party_name(&path);
        Self { path, party_name }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Documents to process plus the explicitly requested names that were not found
#[derive(Debug, Default)]
pub struct LocatedDocuments {
    pub documents: Vec<SourceDocument>,
    pub missing: Vec<PathBuf>,
}

/// `vvd-2025.pdf` -> `VVD`: the file stem up to the first hyphen, upper-cased
pub fn derive_party_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    stem.split('-').next().unwrap_or_default().to_uppercase()
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PDF_EXTENSION))
}

/// Resolve the documents for a run.
///
/// With `files`, each name is joined onto `programs_dir` and kept in the
/// given order; names that do not exist are reported in `missing`. Without
/// it, every PDF in the directory is returned sorted by file name. A missing
/// directory is the only error.
pub async fn locate_documents(
    programs_dir: &Path,
    files: Option<&[String]>,
) -> AppResult<LocatedDocuments> {
    if !fs::try_exists(programs_dir).await? {
        return Err(AppError::NotFound(format!(
            "Programs directory {} does not exist!",
            programs_dir.display()
        )));
    }

    let mut located = LocatedDocuments::default();

    if let Some(files) = files {
        for name in files {
            let path = programs_dir.join(name);
            if fs::try_exists(&path).await? {
                located.documents.push(SourceDocument::new(path));
            } else {
                warn!(path = %path.display(), "File does not exist, skipping");
                located.missing.push(path);
            }
        }
        return Ok(located);
    }

    let mut entries = fs::read_dir(programs_dir).await?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_file() && is_pdf(&path) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    debug!(count = paths.len(), dir = %programs_dir.display(), "Enumerated program PDFs");
    located.documents = paths.into_iter().map(SourceDocument::new).collect();
    Ok(located)
}
