use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::types::{EdgeStyle, ImageFormat};

/// File name looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = ".commitgraph.toml";

/// Top-level configuration loaded from `.commitgraph.toml`.
///
/// Supports layered resolution: CLI flags > local config > defaults.
///
/// # Examples
///
/// ```
/// use commitgraph_core::GraphConfig;
///
/// let config = GraphConfig::default();
/// assert_eq!(config.history.since_days, 30);
/// assert_eq!(config.output.file_name, "graph.puml");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphConfig {
    /// External renderer settings.
    #[serde(default)]
    pub renderer: RendererConfig,
    /// Which commits end up in the graph.
    #[serde(default)]
    pub history: HistoryConfig,
    /// Where the document and image are written.
    #[serde(default)]
    pub output: OutputConfig,
}

impl GraphConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Io`] if the file cannot be read,
    /// [`GraphError::Toml`] if the content is not valid TOML, or
    /// [`GraphError::Config`] if a value is out of range.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use commitgraph_core::GraphConfig;
    /// use std::path::Path;
    ///
    /// let config = GraphConfig::from_file(Path::new(".commitgraph.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, GraphError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Toml`] if parsing fails, or
    /// [`GraphError::Config`] if a value is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use commitgraph_core::{EdgeStyle, GraphConfig};
    ///
    /// let toml = r#"
    /// [history]
    /// since_days = 7
    /// edges = "parents"
    /// "#;
    /// let config = GraphConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.history.since_days, 7);
    /// assert_eq!(config.history.edges, EdgeStyle::Parents);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, GraphError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), GraphError> {
        if self.output.file_name.trim().is_empty() {
            return Err(GraphError::Config("output.file_name must not be empty".into()));
        }
        if self.renderer.java.trim().is_empty() {
            return Err(GraphError::Config("renderer.java must not be empty".into()));
        }
        Ok(())
    }

    /// Path of the diagram description document.
    pub fn document_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.file_name)
    }
}

/// Renderer invocation settings.
///
/// # Examples
///
/// ```
/// use commitgraph_core::{ImageFormat, RendererConfig};
///
/// let config = RendererConfig::default();
/// assert_eq!(config.java, "java");
/// assert_eq!(config.format, ImageFormat::Png);
/// assert!(config.jar.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Path to the PlantUML archive.
    pub jar: Option<PathBuf>,
    /// Program used to launch the archive (default: `"java"`).
    #[serde(default = "default_java")]
    pub java: String,
    /// Image format to produce (default: png).
    #[serde(default)]
    pub format: ImageFormat,
}

fn default_java() -> String {
    "java".into()
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            jar: None,
            java: default_java(),
            format: ImageFormat::default(),
        }
    }
}

/// History filtering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Only include commits from the last N days (default: 30).
    #[serde(default = "default_since_days")]
    pub since_days: u32,
    /// Edge shape for included commits (default: self-loop).
    #[serde(default)]
    pub edges: EdgeStyle,
}

fn default_since_days() -> u32 {
    30
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            since_days: default_since_days(),
            edges: EdgeStyle::default(),
        }
    }
}

/// Output location settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the document, the image and any clone (default: `"output"`).
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// Document file name (default: `"graph.puml"`).
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_file_name() -> String {
    "graph.puml".into()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            file_name: default_file_name(),
        }
    }
}
