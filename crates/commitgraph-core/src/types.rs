use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A commit read from repository history.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use commitgraph_core::CommitRecord;
///
/// let commit = CommitRecord {
///     id: "abc123".into(),
///     committed_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
///     parents: vec![],
/// };
/// assert!(commit.is_root());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    /// Full hex commit hash.
    pub id: String,
    /// Committer timestamp.
    pub committed_at: DateTime<Utc>,
    /// Hashes of the direct parents, first parent first.
    pub parents: Vec<String>,
}

impl CommitRecord {
    /// `true` for a commit with no parents.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// `true` when the commit is strictly newer than `threshold`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use commitgraph_core::CommitRecord;
    ///
    /// let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    /// let commit = CommitRecord { id: "abc".into(), committed_at: at, parents: vec![] };
    /// assert!(!commit.is_newer_than(at));
    /// assert!(commit.is_newer_than(at - chrono::Duration::seconds(1)));
    /// ```
    pub fn is_newer_than(&self, threshold: DateTime<Utc>) -> bool {
        self.committed_at > threshold
    }
}

/// How each included commit is drawn in the diagram.
///
/// # Examples
///
/// ```
/// use commitgraph_core::EdgeStyle;
///
/// let style: EdgeStyle = "parents".parse().unwrap();
/// assert_eq!(style, EdgeStyle::Parents);
/// assert_eq!(EdgeStyle::default(), EdgeStyle::SelfLoop);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeStyle {
    /// One `[id] -> [id]` line per commit.
    #[default]
    SelfLoop,
    /// One `[parent] -> [id]` line per parent; root commits keep their self-loop.
    Parents,
}

impl fmt::Display for EdgeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeStyle::SelfLoop => write!(f, "self-loop"),
            EdgeStyle::Parents => write!(f, "parents"),
        }
    }
}

impl FromStr for EdgeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "self-loop" | "self" => Ok(EdgeStyle::SelfLoop),
            "parents" | "parent" => Ok(EdgeStyle::Parents),
            other => Err(format!("unknown edge style: {other}")),
        }
    }
}

/// Image type produced by the renderer.
///
/// # Examples
///
/// ```
/// use commitgraph_core::ImageFormat;
///
/// assert_eq!(ImageFormat::Png.extension(), "png");
/// assert_eq!(ImageFormat::Svg.renderer_flag(), "-tsvg");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
}

impl ImageFormat {
    /// File extension of the rendered image.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }

    /// Command-line flag selecting this format.
    pub fn renderer_flag(self) -> &'static str {
        match self {
            ImageFormat::Png => "-tpng",
            ImageFormat::Svg => "-tsvg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "svg" => Ok(ImageFormat::Svg),
            other => Err(format!("unknown image format: {other}")),
        }
    }
}
