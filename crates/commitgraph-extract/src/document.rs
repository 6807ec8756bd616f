//! PlantUML document generation.
//!
//! The document is a fixed envelope around one line per edge:
//!
//! ```text
//! @startuml
//! [<id>] -> [<id>]
//! @enduml
//! ```

use chrono::{DateTime, Utc};
use commitgraph_core::{CommitRecord, EdgeStyle};

/// First line of every document.
pub const START_MARKER: &str = "@startuml";
/// Last line of every document.
pub const END_MARKER: &str = "@enduml";

/// Keep the commits strictly newer than `threshold`, preserving their order.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use commitgraph_core::CommitRecord;
/// use commitgraph_extract::document::select_recent;
///
/// let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
/// let commits = vec![CommitRecord { id: "a".into(), committed_at: at, parents: vec![] }];
/// assert!(select_recent(&commits, at).is_empty());
/// ```
pub fn select_recent(commits: &[CommitRecord], threshold: DateTime<Utc>) -> Vec<&CommitRecord> {
    commits
        .iter()
        .filter(|c| c.is_newer_than(threshold))
        .collect()
}

/// Render `commits` as a PlantUML component diagram.
///
/// Edges appear in the order the commits are given. An empty input still
/// produces a well-formed two-line document.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use commitgraph_core::{CommitRecord, EdgeStyle};
/// use commitgraph_extract::document::render_document;
///
/// let commit = CommitRecord { id: "abc123".into(), committed_at: Utc::now(), parents: vec![] };
/// let doc = render_document([&commit], EdgeStyle::SelfLoop);
/// assert_eq!(doc, "@startuml\n[abc123] -> [abc123]\n@enduml\n");
/// ```
pub fn render_document<'a, I>(commits: I, style: EdgeStyle) -> String
where
    I: IntoIterator<Item = &'a CommitRecord>,
{
    let mut out = String::new();
    out.push_str(START_MARKER);
    out.push('\n');

    for commit in commits {
        match style {
            EdgeStyle::Parents if !commit.is_root() => {
                for parent in &commit.parents {
                    push_edge(&mut out, parent, &commit.id);
                }
            }
            // Root commits have nothing to point from; keep them visible.
            EdgeStyle::Parents | EdgeStyle::SelfLoop => push_edge(&mut out, &commit.id, &commit.id),
        }
    }

    out.push_str(END_MARKER);
    out.push('\n');
    out
}

fn push_edge(out: &mut String, from: &str, to: &str) {
    out.push_str(&format!("[{from}] -> [{to}]\n"));
}
