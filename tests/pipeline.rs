//! End-to-end runs of the `commitgraph` binary against throwaway repositories.

use std::path::Path;
use std::process::{Command, Output};

use git2::{Oid, Repository, Signature, Time};

/// Fake `java` that writes `<stem>.png` into `-o`, resolving a relative
/// `-o` against the document's directory the way PlantUML does.
const PLANTUML_LIKE: &str = r#"#!/bin/sh
out="$6"
case "$out" in /*) ;; *) out="$(dirname "$4")/$out" ;; esac
touch "$out/$(basename "$4" .puml).png"
"#;

fn commitgraph(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_commitgraph"))
        .args(["--color", "never"])
        .args(args)
        .current_dir(cwd)
        .env_remove("COMMITGRAPH_LOG")
        .output()
        .unwrap()
}

fn repo_with_commit_now(path: &Path) -> Oid {
    let repo = Repository::init(path).unwrap();
    std::fs::write(path.join("README.md"), "hello\n").unwrap();
    let mut index = repo.index().unwrap();
    index.add_path(Path::new("README.md")).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;
    let sig = Signature::new("Test", "test@example.com", &Time::new(now, 0)).unwrap();
    repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
        .unwrap()
}

#[test]
fn extract_writes_document_into_output_dir() {
    let work = tempfile::tempdir().unwrap();
    let repo_dir = work.path().join("repo");
    std::fs::create_dir(&repo_dir).unwrap();
    let oid = repo_with_commit_now(&repo_dir);

    let output = commitgraph(
        work.path(),
        &["extract", "--repo", "repo", "--output", "out", "--days", "30"],
    );
    assert!(
        output.status.success(),
        "extract failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let document = std::fs::read_to_string(work.path().join("out").join("graph.puml")).unwrap();
    assert_eq!(document, format!("@startuml\n[{oid}] -> [{oid}]\n@enduml\n"));
}

#[test]
fn extract_accepts_the_largest_day_window() {
    let work = tempfile::tempdir().unwrap();
    let repo_dir = work.path().join("repo");
    std::fs::create_dir(&repo_dir).unwrap();
    let oid = repo_with_commit_now(&repo_dir);
    let days = u32::MAX.to_string();

    let output = commitgraph(
        work.path(),
        &["extract", "--repo", "repo", "--output", "out", "--days", &days],
    );
    assert!(
        output.status.success(),
        "extract failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let document = std::fs::read_to_string(work.path().join("out").join("graph.puml")).unwrap();
    assert_eq!(document, format!("@startuml\n[{oid}] -> [{oid}]\n@enduml\n"));
}

#[test]
fn extract_fails_outside_a_repository() {
    let work = tempfile::tempdir().unwrap();

    let output = commitgraph(work.path(), &["extract", "--repo", ".", "--output", "out"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot open repository"), "stderr: {stderr}");
    assert!(!work.path().join("out").join("graph.puml").exists());
}

#[test]
fn render_reports_missing_renderer() {
    let work = tempfile::tempdir().unwrap();
    std::fs::write(work.path().join("graph.puml"), "@startuml\n@enduml\n").unwrap();

    let output = commitgraph(
        work.path(),
        &["render", "--renderer", "missing.jar", "--document", "graph.puml"],
    );
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("renderer unavailable"), "stderr: {stderr}");
    assert!(!work.path().join("graph.png").exists());
}

#[test]
fn graph_requires_a_renderer() {
    let work = tempfile::tempdir().unwrap();
    let repo_dir = work.path().join("repo");
    std::fs::create_dir(&repo_dir).unwrap();
    repo_with_commit_now(&repo_dir);

    let output = commitgraph(work.path(), &["graph", "--repo", "repo"]);
    assert!(!output.status.success());
    assert!(!work.path().join("output").join("graph.puml").exists());
}

#[cfg(unix)]
#[test]
fn graph_runs_extraction_then_renderer() {
    use std::os::unix::fs::PermissionsExt;

    let work = tempfile::tempdir().unwrap();
    let repo_dir = work.path().join("repo");
    std::fs::create_dir(&repo_dir).unwrap();
    repo_with_commit_now(&repo_dir);

    std::fs::write(work.path().join("plantuml.jar"), b"").unwrap();
    let java = work.path().join("fake-java");
    std::fs::write(&java, PLANTUML_LIKE).unwrap();
    std::fs::set_permissions(&java, std::fs::Permissions::from_mode(0o755)).unwrap();

    let output = commitgraph(
        work.path(),
        &[
            "graph",
            "--repo",
            "repo",
            "--renderer",
            "plantuml.jar",
            "--java",
            java.to_str().unwrap(),
        ],
    );
    assert!(
        output.status.success(),
        "graph failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(work.path().join("output").join("graph.puml").exists());
    assert!(work.path().join("output").join("graph.png").exists());
    assert!(!work.path().join("output").join("output").exists());
}

#[cfg(unix)]
#[test]
fn graph_surfaces_renderer_failure() {
    use std::os::unix::fs::PermissionsExt;

    let work = tempfile::tempdir().unwrap();
    let repo_dir = work.path().join("repo");
    std::fs::create_dir(&repo_dir).unwrap();
    repo_with_commit_now(&repo_dir);

    std::fs::write(work.path().join("plantuml.jar"), b"").unwrap();
    let java = work.path().join("fake-java");
    std::fs::write(&java, "#!/bin/sh\necho 'Syntax Error?' >&2\nexit 1\n").unwrap();
    std::fs::set_permissions(&java, std::fs::Permissions::from_mode(0o755)).unwrap();

    let output = commitgraph(
        work.path(),
        &[
            "graph",
            "--repo",
            "repo",
            "--renderer",
            "plantuml.jar",
            "--java",
            java.to_str().unwrap(),
        ],
    );
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Syntax Error?"), "stderr: {stderr}");
    // Extraction still succeeded before the renderer ran.
    assert!(work.path().join("output").join("graph.puml").exists());
}
