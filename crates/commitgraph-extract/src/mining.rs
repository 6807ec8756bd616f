//! Commit history extraction via git2.
//!
//! Walks every commit reachable from `HEAD`, newest first, and turns each
//! one into a [`CommitRecord`].

use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};
use commitgraph_core::{CommitRecord, GraphError};
use git2::{ErrorCode, Repository, Sort};
use tracing::{debug, trace};

/// Read the full history reachable from `HEAD` of the repository at `repo_path`.
///
/// Commits are returned in reverse chronological order (newest first). A
/// repository whose `HEAD` is unborn has an empty history.
///
/// # Errors
///
/// Returns [`GraphError::RepositoryAccess`] if `repo_path` is not an
/// initialized repository, or [`GraphError::CommitEnumeration`] if the
/// history cannot be walked.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use commitgraph_extract::mining::collect_history;
///
/// let commits = collect_history(Path::new(".")).unwrap();
/// for c in &commits {
///     println!("{} {}", &c.id[..7], c.committed_at);
/// }
/// ```
pub fn collect_history(repo_path: &Path) -> Result<Vec<CommitRecord>, GraphError> {
    let repo = Repository::open(repo_path).map_err(|e| GraphError::RepositoryAccess {
        path: repo_path.to_path_buf(),
        message: e.message().to_string(),
    })?;

    match repo.head() {
        Ok(_) => {}
        Err(e) if e.code() == ErrorCode::UnbornBranch => {
            debug!("HEAD is unborn, history is empty");
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(GraphError::CommitEnumeration(format!(
                "failed to resolve HEAD: {e}"
            )))
        }
    }

    let mut revwalk = repo
        .revwalk()
        .map_err(|e| GraphError::CommitEnumeration(format!("failed to create revwalk: {e}")))?;
    revwalk
        .set_sorting(Sort::TIME)
        .map_err(|e| GraphError::CommitEnumeration(format!("failed to set sorting: {e}")))?;
    revwalk
        .push_head()
        .map_err(|e| GraphError::CommitEnumeration(format!("failed to push HEAD: {e}")))?;

    let mut commits = Vec::new();
    for oid_result in revwalk {
        let oid =
            oid_result.map_err(|e| GraphError::CommitEnumeration(format!("revwalk error: {e}")))?;
        let commit = repo.find_commit(oid).map_err(|e| {
            GraphError::CommitEnumeration(format!("failed to find commit {oid}: {e}"))
        })?;

        let seconds = commit.time().seconds();
        let committed_at = DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
            GraphError::CommitEnumeration(format!(
                "commit {oid} has out-of-range time {seconds}"
            ))
        })?;
        trace!(%oid, %committed_at, "read commit");

        commits.push(CommitRecord {
            id: oid.to_string(),
            committed_at,
            parents: commit.parent_ids().map(|p| p.to_string()).collect(),
        });
    }

    debug!(count = commits.len(), "walked history");
    Ok(commits)
}

/// The point in time `days` days before now.
///
/// Windows reaching past the earliest representable date saturate to
/// `DateTime::<Utc>::MIN_UTC`, which admits the whole history.
///
/// # Examples
///
/// ```
/// use commitgraph_extract::mining::threshold_days_ago;
///
/// assert!(threshold_days_ago(30) < threshold_days_ago(7));
/// ```
pub fn threshold_days_ago(days: u32) -> DateTime<Utc> {
    TimeDelta::try_days(i64::from(days))
        .and_then(|window| Utc::now().checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{commit_at, init_repo};
    use commitgraph_core::ErrorKind;

    #[test]
    fn history_is_newest_first_with_parents() {
        let (dir, repo) = init_repo();
        let first = commit_at(&repo, 1_700_000_000, "first");
        let second = commit_at(&repo, 1_700_000_100, "second");

        let commits = collect_history(dir.path()).unwrap();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].id, second.to_string());
        assert_eq!(commits[0].parents, vec![first.to_string()]);
        assert_eq!(commits[1].id, first.to_string());
        assert!(commits[1].is_root());
        assert_eq!(commits[1].committed_at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn unborn_head_yields_empty_history() {
        let (dir, _repo) = init_repo();
        let commits = collect_history(dir.path()).unwrap();
        assert!(commits.is_empty());
    }

    #[test]
    fn plain_directory_is_repository_access_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_history(dir.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RepositoryAccess);
    }

    #[test]
    fn missing_commit_object_is_enumeration_error() {
        let (dir, repo) = init_repo();
        let oid = commit_at(&repo, 1_700_000_000, "doomed");
        let hex = oid.to_string();
        let object = dir
            .path()
            .join(".git")
            .join("objects")
            .join(&hex[..2])
            .join(&hex[2..]);
        std::fs::remove_file(object).unwrap();

        let err = collect_history(dir.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CommitEnumeration);
    }

    #[test]
    fn threshold_is_in_the_past() {
        let now = Utc::now();
        let threshold = threshold_days_ago(30);
        let delta = now - threshold;
        assert!(delta >= TimeDelta::days(30));
        assert!(delta < TimeDelta::days(30) + TimeDelta::minutes(1));
    }

    #[test]
    fn huge_window_saturates_instead_of_overflowing() {
        assert_eq!(threshold_days_ago(u32::MAX), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn huge_window_includes_every_commit() {
        let (dir, repo) = init_repo();
        commit_at(&repo, 0, "epoch");
        let threshold = threshold_days_ago(u32::MAX);

        let commits = collect_history(dir.path()).unwrap();
        assert_eq!(commits.len(), 1);
        assert!(commits.iter().all(|c| c.is_newer_than(threshold)));
    }
}
