use std::path::PathBuf;

/// Errors that can occur while extracting or rendering a commit graph.
///
/// The first four variants are the pipeline's failure taxonomy; the rest
/// cover the plumbing around it (writing files, loading configuration).
/// Use [`GraphError::kind`] to branch on the failure without matching
/// payloads.
///
/// # Examples
///
/// ```
/// use commitgraph_core::{ErrorKind, GraphError};
///
/// let err = GraphError::RendererUnavailable("plantuml.jar not found".into());
/// assert_eq!(err.kind(), ErrorKind::RendererUnavailable);
/// assert!(err.to_string().contains("plantuml.jar not found"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum GraphError {
    /// The path does not reference a readable, initialized repository.
    #[error("cannot open repository at {}: {message}", .path.display())]
    #[diagnostic(
        code(commitgraph::repository_access),
        help("point --repo at a cloned repository or a remote URL")
    )]
    RepositoryAccess {
        /// Path that was given as the repository location.
        path: PathBuf,
        /// Underlying failure reported by git.
        message: String,
    },

    /// The repository opened but its history could not be walked.
    #[error("failed to walk commit history: {0}")]
    #[diagnostic(code(commitgraph::commit_enumeration))]
    CommitEnumeration(String),

    /// The renderer archive or its launcher cannot be invoked.
    #[error("renderer unavailable: {0}")]
    #[diagnostic(
        code(commitgraph::renderer_unavailable),
        help("pass --renderer /path/to/plantuml.jar and make sure java is installed")
    )]
    RendererUnavailable(String),

    /// The renderer ran and reported failure.
    #[error("renderer failed ({}): {diagnostics}", describe_status(.status))]
    #[diagnostic(code(commitgraph::render_failure))]
    RenderFailure {
        /// Exit code, `None` when the process was killed by a signal.
        status: Option<i32>,
        /// Captured diagnostic output of the renderer.
        diagnostics: String,
    },

    /// The diagram description document to render does not exist.
    #[error("document not found: {}", .0.display())]
    #[diagnostic(
        code(commitgraph::document_not_found),
        help("run `commitgraph extract` first")
    )]
    DocumentNotFound(PathBuf),

    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Fieldless discriminant of [`GraphError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`GraphError::RepositoryAccess`].
    RepositoryAccess,
    /// See [`GraphError::CommitEnumeration`].
    CommitEnumeration,
    /// See [`GraphError::RendererUnavailable`].
    RendererUnavailable,
    /// See [`GraphError::RenderFailure`].
    RenderFailure,
    /// See [`GraphError::DocumentNotFound`].
    DocumentNotFound,
    /// See [`GraphError::Io`].
    Io,
    /// A bad value or an unparseable file; [`GraphError::Config`] or [`GraphError::Toml`].
    Config,
}

impl GraphError {
    /// The kind of failure, for callers that decide what to do next.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GraphError::RepositoryAccess { .. } => ErrorKind::RepositoryAccess,
            GraphError::CommitEnumeration(_) => ErrorKind::CommitEnumeration,
            GraphError::RendererUnavailable(_) => ErrorKind::RendererUnavailable,
            GraphError::RenderFailure { .. } => ErrorKind::RenderFailure,
            GraphError::DocumentNotFound(_) => ErrorKind::DocumentNotFound,
            GraphError::Io(_) => ErrorKind::Io,
            GraphError::Config(_) | GraphError::Toml(_) => ErrorKind::Config,
        }
    }
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".into(),
    }
}
