//! Restore and publish against temp directories and the in-memory remote

use safeprune_events::{AppEvent, RecoveryEvent};
use safeprune_platform::{Platform, PlatformContext};
use safeprune_recovery::{BackupRestorer, DirectorySource, RemotePublisher, VcsObjectSource};
use safeprune_remote::{InMemoryRemote, RemoteSourceControl};
use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

const SOURCES: [&str; 5] = ["backups", "backup", "vcs", "__pycache__", "temp"];

fn restorer(work_dir: &Path) -> BackupRestorer {
    SOURCES.iter().fold(BackupRestorer::new(work_dir), |r, name| {
        r.with_source(DirectorySource::under(work_dir, name))
    })
}

#[tokio::test]
async fn restores_from_third_of_five_sources() {
    let temp = tempfile::tempdir().unwrap();
    let work = temp.path();
    tokio::fs::create_dir_all(work.join("vcs")).await.unwrap();
    tokio::fs::write(work.join("vcs/notes.md"), b"recovered").await.unwrap();
    // Earlier sources exist but do not hold the file
    tokio::fs::create_dir_all(work.join("backups")).await.unwrap();

    let outcome = restorer(work).restore("notes.md").await;

    assert!(outcome.restored);
    assert_eq!(outcome.source.as_deref(), Some("vcs/"));
    assert_eq!(
        tokio::fs::read(work.join("notes.md")).await.unwrap(),
        b"recovered"
    );
}

#[tokio::test]
async fn nothing_found_creates_nothing() {
    let temp = tempfile::tempdir().unwrap();
    let (tx, mut rx) = safeprune_events::channel();

    let outcome = restorer(temp.path())
        .with_event_sender(tx)
        .restore("missing.txt")
        .await;

    assert!(!outcome.restored);
    assert!(outcome.source.is_none());
    assert!(!temp.path().join("missing.txt").exists());

    let mut failed = false;
    while let Ok(message) = rx.try_recv() {
        if let AppEvent::Recovery(RecoveryEvent::RestoreFailed { file }) = message.event {
            assert_eq!(file, "missing.txt");
            failed = true;
        }
    }
    assert!(failed);
}

#[tokio::test]
async fn restore_start_reports_source_count() {
    let temp = tempfile::tempdir().unwrap();
    let (tx, mut rx) = safeprune_events::channel();

    restorer(temp.path()).with_event_sender(tx).restore("x.txt").await;

    let started = std::iter::from_fn(|| rx.try_recv().ok()).find_map(|m| match m.event {
        AppEvent::Recovery(RecoveryEvent::RestoreStarted { sources, .. }) => Some(sources),
        _ => None,
    });
    assert_eq!(started, Some(SOURCES.len()));
}

fn git(dir: &Path, args: &[&str]) -> bool {
    Command::new("git")
        .current_dir(dir)
        .args([
            "-c",
            "user.name=safeprune",
            "-c",
            "user.email=safeprune@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .output()
        .is_ok_and(|o| o.status.success())
}

// Working tree with `d/f.txt` committed and then deleted
fn repo_with_deleted_file(work: &Path) -> bool {
    if !git(work, &["--version"]) {
        return false;
    }
    std::fs::create_dir_all(work.join("d")).unwrap();
    std::fs::write(work.join("d/f.txt"), "hi\n").unwrap();
    assert!(git(work, &["init", "-q"]));
    assert!(git(work, &["add", "d/f.txt"]));
    assert!(git(work, &["commit", "-q", "-m", "add f"]));
    std::fs::remove_file(work.join("d/f.txt")).unwrap();
    true
}

fn restorer_with_git(work: &Path) -> BackupRestorer {
    let vcs = VcsObjectSource::new(Platform::current(), PlatformContext::default(), work);
    BackupRestorer::new(work)
        .with_source(DirectorySource::under(work, "backups"))
        .with_source(DirectorySource::under(work, "backup"))
        .with_source(vcs)
        .with_source(DirectorySource::under(work, "__pycache__"))
        .with_source(DirectorySource::under(work, "temp"))
}

#[tokio::test]
async fn restores_committed_file_from_git_objects() {
    let temp = tempfile::tempdir().unwrap();
    let work = temp.path();
    if !repo_with_deleted_file(work) {
        return;
    }

    let outcome = restorer_with_git(work).restore("d/f.txt").await;

    assert!(outcome.restored, "{outcome:?}");
    assert_eq!(outcome.source.as_deref(), Some("git HEAD"));
    assert_eq!(std::fs::read_to_string(work.join("d/f.txt")).unwrap(), "hi\n");
}

#[tokio::test]
async fn uncommitted_file_falls_through_git_to_later_source() {
    let temp = tempfile::tempdir().unwrap();
    let work = temp.path();
    if !repo_with_deleted_file(work) {
        return;
    }
    std::fs::create_dir_all(work.join("temp")).unwrap();
    std::fs::write(work.join("temp/other.txt"), "from temp").unwrap();

    let outcome = restorer_with_git(work).restore("other.txt").await;

    assert!(outcome.restored);
    assert_eq!(outcome.source.as_deref(), Some("temp/"));
    assert_eq!(
        std::fs::read_to_string(work.join("other.txt")).unwrap(),
        "from temp"
    );
}

#[tokio::test]
async fn missing_git_object_falls_through_to_later_source() {
    let temp = tempfile::tempdir().unwrap();
    let work = temp.path();
    if !repo_with_deleted_file(work) {
        return;
    }
    // Drop the blob so HEAD:d/f.txt names an object that is gone
    let rev = Command::new("git")
        .current_dir(work)
        .args(["rev-parse", "HEAD:d/f.txt"])
        .output()
        .unwrap();
    let hash = String::from_utf8(rev.stdout).unwrap().trim().to_string();
    let object = work.join(".git/objects").join(&hash[..2]).join(&hash[2..]);
    std::fs::remove_file(&object).unwrap();

    std::fs::create_dir_all(work.join("temp/d")).unwrap();
    std::fs::write(work.join("temp/d/f.txt"), "older copy").unwrap();

    let outcome = restorer_with_git(work).restore("d/f.txt").await;

    assert!(outcome.restored);
    assert_eq!(outcome.source.as_deref(), Some("temp/"));
    assert_eq!(
        std::fs::read_to_string(work.join("d/f.txt")).unwrap(),
        "older copy"
    );
}

fn publisher(remote: Arc<InMemoryRemote>, work: &Path) -> RemotePublisher {
    RemotePublisher::new(remote, "org", work, work.join("temp_repos"))
}

#[tokio::test]
async fn publish_then_file_is_found() {
    let temp = tempfile::tempdir().unwrap();
    let work = temp.path();
    tokio::fs::write(work.join("plan.md"), b"plan").await.unwrap();
    let remote = Arc::new(InMemoryRemote::new().with_repository("docs", ["README.md"]));

    let outcome = publisher(remote.clone(), work).publish("plan.md", "docs").await;

    assert!(outcome.published, "{outcome:?}");
    assert!(work.join("temp_repos/docs/plan.md").exists());
    let pushes = remote.pushes().await;
    assert_eq!(pushes.len(), 1);
    assert_eq!(
        pushes[0].2,
        "Add plan.md - restored by safeprune cleanup recovery"
    );
    let found = remote
        .search_code("plan.md", "org", Duration::from_secs(30))
        .await
        .unwrap();
    assert_eq!(found, vec!["docs"]);
}

#[tokio::test]
async fn clone_is_reused_across_publishes() {
    let temp = tempfile::tempdir().unwrap();
    let work = temp.path();
    tokio::fs::write(work.join("a.md"), b"a").await.unwrap();
    tokio::fs::write(work.join("b.md"), b"b").await.unwrap();
    let remote = Arc::new(InMemoryRemote::new().with_repository("docs", ["README.md"]));
    let publisher = publisher(remote.clone(), work);

    assert!(publisher.publish("a.md", "docs").await.published);
    assert!(publisher.publish("b.md", "docs").await.published);
    assert_eq!(remote.clone_count().await, 1);

    // A fresh publisher finds the clone on disk
    let again = RemotePublisher::new(remote.clone(), "org", work, work.join("temp_repos"));
    assert!(again.publish("a.md", "docs").await.published);
    assert_eq!(remote.clone_count().await, 1);
}

#[tokio::test]
async fn push_failure_reports_step_and_keeps_cwd() {
    let temp = tempfile::tempdir().unwrap();
    let work = temp.path();
    tokio::fs::write(work.join("a.md"), b"a").await.unwrap();
    let remote = Arc::new(InMemoryRemote::new().with_repository("docs", ["README.md"]));
    remote.fail_commit_step("push", "remote rejected").await;
    let before = std::env::current_dir().unwrap();

    let outcome = publisher(remote.clone(), work).publish("a.md", "docs").await;

    assert!(!outcome.published);
    assert_eq!(outcome.failed_step.as_deref(), Some("push"));
    assert!(outcome.reason.unwrap().contains("remote rejected"));
    assert_eq!(std::env::current_dir().unwrap(), before);
    assert!(remote.pushes().await.is_empty());
}

#[tokio::test]
async fn missing_local_file_fails_at_copy() {
    let temp = tempfile::tempdir().unwrap();
    let remote = Arc::new(InMemoryRemote::new().with_repository("docs", ["README.md"]));

    let outcome = publisher(remote, temp.path()).publish("nope.md", "docs").await;

    assert!(!outcome.published);
    assert_eq!(outcome.failed_step.as_deref(), Some("copy"));
}

#[tokio::test]
async fn clone_failure_fails_at_clone() {
    let temp = tempfile::tempdir().unwrap();
    tokio::fs::write(temp.path().join("a.md"), b"a").await.unwrap();
    let remote = Arc::new(InMemoryRemote::new());

    let outcome = publisher(remote, temp.path()).publish("a.md", "unknown").await;

    assert!(!outcome.published);
    assert_eq!(outcome.failed_step.as_deref(), Some("clone"));
}

#[tokio::test]
async fn stray_directory_is_not_used_as_a_checkout() {
    let temp = tempfile::tempdir().unwrap();
    let work = temp.path();
    tokio::fs::write(work.join("a.md"), b"a").await.unwrap();
    tokio::fs::create_dir_all(work.join("temp_repos/docs")).await.unwrap();
    tokio::fs::write(work.join("temp_repos/docs/stray.txt"), b"left over")
        .await
        .unwrap();
    let remote = Arc::new(InMemoryRemote::new().with_repository("docs", ["README.md"]));

    let outcome = publisher(remote.clone(), work).publish("a.md", "docs").await;

    assert!(!outcome.published);
    assert_eq!(outcome.failed_step.as_deref(), Some("clone"));
    assert!(outcome.reason.unwrap().contains("not a git checkout"));
    assert_eq!(remote.clone_count().await, 0);
    assert!(remote.pushes().await.is_empty());
    assert!(!work.join("temp_repos/docs/a.md").exists());
}

#[tokio::test]
async fn empty_leftover_directory_is_cloned_into() {
    let temp = tempfile::tempdir().unwrap();
    let work = temp.path();
    tokio::fs::write(work.join("a.md"), b"a").await.unwrap();
    tokio::fs::create_dir_all(work.join("temp_repos/docs")).await.unwrap();
    let remote = Arc::new(InMemoryRemote::new().with_repository("docs", ["README.md"]));

    let outcome = publisher(remote.clone(), work).publish("a.md", "docs").await;

    assert!(outcome.published, "{outcome:?}");
    assert_eq!(remote.clone_count().await, 1);
    assert!(work.join("temp_repos/docs/.git").is_dir());
}
