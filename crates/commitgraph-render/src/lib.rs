//! PlantUML renderer invocation.
//!
//! Runs `java -jar plantuml.jar` on a diagram description document and
//! reports the outcome. The call blocks until the renderer exits; there is
//! no timeout and no retry.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use commitgraph_core::{GraphError, ImageFormat};
use tracing::{debug, error, info, warn};

/// What a successful renderer run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    /// Where the renderer was asked to put the image.
    pub image: PathBuf,
    /// Exit code of the renderer.
    pub status: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

/// A PlantUML archive plus the program that launches it.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use commitgraph_core::ImageFormat;
/// use commitgraph_render::Renderer;
///
/// let renderer = Renderer::new("plantuml.jar").with_format(ImageFormat::Svg);
/// assert_eq!(
///     renderer.image_path(Path::new("out/graph.puml")),
///     Path::new("out/graph.svg")
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Renderer {
    java: PathBuf,
    jar: PathBuf,
    format: ImageFormat,
}

impl Renderer {
    /// Renderer for `jar`, launched with `java` and producing PNG.
    pub fn new(jar: impl Into<PathBuf>) -> Self {
        Self {
            java: PathBuf::from("java"),
            jar: jar.into(),
            format: ImageFormat::default(),
        }
    }

    /// Use `java` to launch the archive instead of the `java` found on `PATH`.
    pub fn with_java(mut self, java: impl Into<PathBuf>) -> Self {
        self.java = java.into();
        self
    }

    /// Produce `format` instead of PNG.
    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    /// Image path for `document`: same directory and stem, format extension.
    pub fn image_path(&self, document: &Path) -> PathBuf {
        document.with_extension(self.format.extension())
    }

    /// Arguments passed to the launcher, in order.
    ///
    /// PlantUML resolves a relative `-o` against the document's own
    /// directory, so the output directory is always passed absolute.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Io`] if the current directory cannot be read.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use commitgraph_render::Renderer;
    ///
    /// let args = Renderer::new("plantuml.jar").args(Path::new("out/graph.puml")).unwrap();
    /// let out = std::env::current_dir().unwrap().join("out");
    /// assert_eq!(args[..5], ["-jar", "plantuml.jar", "-tpng", "out/graph.puml", "-o"]);
    /// assert_eq!(args[5], out.into_os_string());
    /// ```
    pub fn args(&self, document: &Path) -> Result<Vec<OsString>, GraphError> {
        Ok(vec![
            "-jar".into(),
            self.jar.clone().into_os_string(),
            self.format.renderer_flag().into(),
            document.as_os_str().to_owned(),
            "-o".into(),
            output_dir(document)?.into_os_string(),
        ])
    }

    /// Render `document` into an image next to it.
    ///
    /// # Errors
    ///
    /// - [`GraphError::RendererUnavailable`] if the archive is missing or the
    ///   launcher cannot be started
    /// - [`GraphError::DocumentNotFound`] if `document` does not exist
    /// - [`GraphError::RenderFailure`] if the renderer exits unsuccessfully
    ///
    /// Every error is logged before it is returned.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(jar = %self.jar.display(), document = %document.display(), format = %self.format)
    )]
    pub fn render(&self, document: &Path) -> Result<RenderOutcome, GraphError> {
        let result = self.run(document);
        match &result {
            Ok(outcome) => info!(image = %outcome.image.display(), "rendered commit graph"),
            Err(e) => error!(kind = ?e.kind(), "rendering failed: {e}"),
        }
        result
    }

    fn run(&self, document: &Path) -> Result<RenderOutcome, GraphError> {
        if !self.jar.is_file() {
            return Err(GraphError::RendererUnavailable(format!(
                "no renderer archive at {}",
                self.jar.display()
            )));
        }
        if !document.is_file() {
            return Err(GraphError::DocumentNotFound(document.to_path_buf()));
        }

        let args = self.args(document)?;
        debug!(java = %self.java.display(), ?args, "starting renderer");
        let output = Command::new(&self.java).args(&args).output().map_err(|e| {
            GraphError::RendererUnavailable(format!(
                "failed to start {}: {e}",
                self.java.display()
            ))
        })?;

        let outcome = RenderOutcome {
            image: self.image_path(document),
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !output.status.success() {
            return Err(GraphError::RenderFailure {
                status: outcome.status,
                diagnostics: diagnostics(&output),
            });
        }
        if !outcome.stderr.trim().is_empty() {
            warn!(stderr = outcome.stderr.trim(), "renderer succeeded with diagnostics");
        }
        Ok(outcome)
    }
}

/// Render `document_path` to PNG with the archive at `renderer_path`,
/// launched by the `java` on `PATH`.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use commitgraph_render::render;
///
/// match render(Path::new("plantuml.jar"), Path::new("output/graph.puml")) {
///     Ok(outcome) => println!("wrote {}", outcome.image.display()),
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
pub fn render(renderer_path: &Path, document_path: &Path) -> Result<RenderOutcome, GraphError> {
    Renderer::new(renderer_path).render(document_path)
}

/// Absolute directory containing `document`.
fn output_dir(document: &Path) -> std::io::Result<PathBuf> {
    match document.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::path::absolute(parent),
        _ => std::env::current_dir(),
    }
}

/// Stderr if the renderer wrote any, stdout otherwise.
fn diagnostics(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if stderr.trim().is_empty() {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    } else {
        stderr.trim().to_string()
    }
}
