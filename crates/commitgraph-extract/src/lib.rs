//! Commit graph extraction.
//!
//! Reads a repository's history with git2, keeps the commits newer than a
//! threshold, and writes them out as a PlantUML diagram description that
//! `commitgraph-render` can turn into an image.

pub mod document;
pub mod mining;

#[cfg(test)]
mod test_support;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use commitgraph_core::{EdgeStyle, GraphError};
use tracing::{error, info};

/// Summary of a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractReport {
    /// Path the document was written to.
    pub document: PathBuf,
    /// Commits reachable from `HEAD`.
    pub commits_seen: usize,
    /// Commits newer than the threshold, one edge group each.
    pub commits_included: usize,
}

/// Write the self-loop diagram of commits newer than `threshold` to `output_path`.
///
/// See [`extract_with`] for the error contract.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use commitgraph_extract::{extract, mining::threshold_days_ago};
///
/// let report = extract(Path::new("."), Path::new("graph.puml"), threshold_days_ago(30)).unwrap();
/// println!("{} of {} commits", report.commits_included, report.commits_seen);
/// ```
pub fn extract(
    repo_path: &Path,
    output_path: &Path,
    threshold: DateTime<Utc>,
) -> Result<ExtractReport, GraphError> {
    extract_with(repo_path, output_path, threshold, EdgeStyle::default())
}

/// Write the diagram of commits newer than `threshold` to `output_path`,
/// drawing each commit with `style`.
///
/// The whole document is built before `output_path` is touched, so a
/// repository failure never creates or truncates the output file. The file
/// is overwritten if it exists.
///
/// # Errors
///
/// - [`GraphError::RepositoryAccess`] if `repo_path` is not a repository
/// - [`GraphError::CommitEnumeration`] if the history cannot be walked
/// - [`GraphError::Io`] if the document cannot be written
///
/// Every error is logged before it is returned.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(repo = %repo_path.display(), output = %output_path.display(), %threshold, %style)
)]
pub fn extract_with(
    repo_path: &Path,
    output_path: &Path,
    threshold: DateTime<Utc>,
    style: EdgeStyle,
) -> Result<ExtractReport, GraphError> {
    let result = write_document(repo_path, output_path, threshold, style);
    match &result {
        Ok(report) => info!(
            document = %report.document.display(),
            included = report.commits_included,
            seen = report.commits_seen,
            "wrote commit graph"
        ),
        Err(e) => error!(kind = ?e.kind(), "extraction failed: {e}"),
    }
    result
}

fn write_document(
    repo_path: &Path,
    output_path: &Path,
    threshold: DateTime<Utc>,
    style: EdgeStyle,
) -> Result<ExtractReport, GraphError> {
    let commits = mining::collect_history(repo_path)?;
    let recent = document::select_recent(&commits, threshold);
    let commits_included = recent.len();
    let text = document::render_document(recent, style);

    std::fs::write(output_path, text)?;

    Ok(ExtractReport {
        document: output_path.to_path_buf(),
        commits_seen: commits.len(),
        commits_included,
    })
}
