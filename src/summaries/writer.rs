//! Result Writer
//!
//! Pretty-printed UTF-8 JSON; non-ASCII characters are written as-is.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use crate::models::{SummaryBatch, SummaryResult};
use crate::types::AppResult;

const SUMMARY_SUFFIX: &str = "_summary.json";

#[derive(Debug, Clone)]
pub struct ResultWriter {
    output_dir: PathBuf,
    aggregate_path: PathBuf,
}

impl ResultWriter {
    pub fn new(output_dir: impl Into<PathBuf>, aggregate_path: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            aggregate_path: aggregate_path.into(),
        }
    }

    /// `<output_dir>/<party-lowercase>_summary.json`
    pub fn individual_path(&self, party_name: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}{}", party_name.to_lowercase(), SUMMARY_SUFFIX))
    }

    /// Write `{ "<PARTY>": summary }` for one party
    pub async fn write_individual(
        &self,
        party_name: &str,
        summary: &SummaryResult,
    ) -> AppResult<PathBuf> {
        let path = self.individual_path(party_name);
        let mut document = BTreeMap::new();
        document.insert(party_name, summary);

        write_json(&path, &document).await?;
        info!(party = %party_name, path = %path.display(), "Saved individual summary");
        Ok(path)
    }

    /// Write the full batch to the aggregate file
    pub async fn write_aggregate(&self, batch: &SummaryBatch) -> AppResult<PathBuf> {
        write_json(&self.aggregate_path, batch).await?;
        info!(
            parties = batch.len(),
            path = %self.aggregate_path.display(),
            "Saved aggregate summaries"
        );
        Ok(self.aggregate_path.clone())
    }
}

async fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).await?;
    Ok(())
}

/// Read an aggregate file back into a batch
pub async fn read_batch(path: &Path) -> AppResult<SummaryBatch> {
    let content = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}
