//! Integration tests for the in-memory remote

use safeprune_errors::RemoteError;
use safeprune_remote::{InMemoryRemote, RemoteSourceControl, ScriptedFailure};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(30);

fn remote() -> InMemoryRemote {
    InMemoryRemote::new()
        .with_repository("core", ["README.md", "main.py"])
        .with_repository("tools", ["README.md"])
}

#[tokio::test]
async fn search_returns_owning_repositories_in_order() {
    let remote = remote();
    let repos = remote.search_code("README.md", "org", TIMEOUT).await.unwrap();
    assert_eq!(repos, vec!["core", "tools"]);

    let none = remote.search_code("ghost.py", "org", TIMEOUT).await.unwrap();
    assert!(none.is_empty());
    assert_eq!(remote.searches().await, vec!["README.md", "ghost.py"]);
}

#[tokio::test]
async fn scripted_search_failures() {
    let remote = remote();
    remote.fail_search("a", ScriptedFailure::Timeout).await;
    remote
        .fail_search("b", ScriptedFailure::Malformed("bad json".into()))
        .await;

    let err = remote.search_code("a", "org", TIMEOUT).await.unwrap_err();
    assert!(matches!(err, RemoteError::Timeout { timeout_secs: 30, .. }));

    let err = remote.search_code("b", "org", TIMEOUT).await.unwrap_err();
    assert!(matches!(err, RemoteError::MalformedResponse { .. }));
}

#[tokio::test]
async fn listing_and_auth() {
    let remote = remote();
    assert_eq!(
        remote.list_repositories("org", 1, TIMEOUT).await.unwrap(),
        vec!["core"]
    );
    assert_eq!(
        remote.list_contents("org", "core", TIMEOUT).await.unwrap(),
        vec!["README.md", "main.py"]
    );
    assert!(remote.list_contents("org", "missing", TIMEOUT).await.is_err());

    remote.auth_status(TIMEOUT).await.unwrap();
    remote.set_authenticated(false).await;
    assert!(matches!(
        remote.auth_status(TIMEOUT).await.unwrap_err(),
        RemoteError::NotAuthenticated { .. }
    ));
}

#[tokio::test]
async fn clone_then_push_makes_file_searchable() {
    let temp = tempfile::tempdir().unwrap();
    let remote = remote();
    let dest = temp.path().join("tools");

    remote.clone_repository("org", "tools", &dest).await.unwrap();
    assert!(dest.join("README.md").exists());
    assert_eq!(remote.clone_count().await, 1);

    tokio::fs::write(dest.join("notes.txt"), b"x").await.unwrap();
    remote
        .commit_and_push(&dest, "notes.txt", "Add notes.txt")
        .await
        .unwrap();

    assert_eq!(
        remote.search_code("notes.txt", "org", TIMEOUT).await.unwrap(),
        vec!["tools"]
    );
    assert_eq!(remote.pushes().await.len(), 1);
}

#[tokio::test]
async fn injected_push_failure_reports_step() {
    let temp = tempfile::tempdir().unwrap();
    let remote = remote();
    let dest = temp.path().join("core");
    remote.clone_repository("org", "core", &dest).await.unwrap();
    tokio::fs::write(dest.join("x.txt"), b"x").await.unwrap();

    remote.fail_commit_step("push", "rejected").await;
    let err = remote
        .commit_and_push(&dest, "x.txt", "Add x.txt")
        .await
        .unwrap_err();
    match err {
        RemoteError::CommitFailed { step, repository, .. } => {
            assert_eq!(step, "push");
            assert_eq!(repository, "core");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(remote.pushes().await.is_empty());
}
