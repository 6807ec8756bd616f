use std::path::{Path, PathBuf};
use std::process::Command;

use miette::{Context, IntoDiagnostic, Result};
use tracing::info;

/// `true` for `scheme://…` URLs and scp-style `user@host:path` remotes.
pub fn is_remote(source: &str) -> bool {
    if source.contains("://") {
        return true;
    }
    match source.split_once(':') {
        Some((head, _)) => head.contains('@') && !head.contains('/'),
        None => false,
    }
}

/// Directory name a clone of `url` gets: the last path segment without `.git`.
pub fn repo_name(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let last = trimmed
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(trimmed);
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() {
        "repo".to_string()
    } else {
        name.to_string()
    }
}

/// Turn `source` into a local repository path.
///
/// Local paths are returned unchanged. Remote URLs are cloned with the `git`
/// client into `clone_root/<repo-name>`; an existing clone there is reused.
pub fn resolve(source: &str, clone_root: &Path) -> Result<PathBuf> {
    if !is_remote(source) {
        return Ok(PathBuf::from(source));
    }

    let dest = clone_root.join(repo_name(source));
    if dest.join(".git").exists() {
        info!(path = %dest.display(), "reusing existing clone");
        return Ok(dest);
    }

    info!(url = source, path = %dest.display(), "cloning repository");
    let output = Command::new("git")
        .arg("clone")
        .arg("--quiet")
        .arg("--")
        .arg(source)
        .arg(&dest)
        .output()
        .into_diagnostic()
        .wrap_err("Failed to run git clone")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        miette::bail!("git clone of {source} failed: {}", stderr.trim());
    }
    Ok(dest)
}
