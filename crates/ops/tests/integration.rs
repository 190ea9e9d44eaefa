//! Operations wired against the in-memory remote

use safeprune_config::Config;
use safeprune_errors::{Error, OpsError};
use safeprune_events::EventReceiver;
use safeprune_ops::{
    check_health, publish_file, recover_file, repository_contents, restore_file, verify_files,
    OperationResult, OpsContextBuilder, OpsCtx,
};
use safeprune_remote::InMemoryRemote;
use std::path::Path;
use std::sync::Arc;

fn ctx(work: &Path, remote: Arc<InMemoryRemote>) -> (OpsCtx, EventReceiver) {
    let mut config = Config::default();
    config.paths.work_dir = Some(work.to_path_buf());
    let (tx, rx) = safeprune_events::channel();
    let ctx = OpsContextBuilder::new()
        .with_config(config)
        .with_remote(remote)
        .with_event_sender(tx)
        .build()
        .unwrap();
    (ctx, rx)
}

#[tokio::test]
async fn builder_requires_config_and_sender() {
    let err = OpsContextBuilder::new().build().err().unwrap();
    assert!(matches!(err, Error::Ops(OpsError::MissingComponent { .. })));
}

#[tokio::test]
async fn verify_writes_cleanup_report() {
    let temp = tempfile::tempdir().unwrap();
    let remote = Arc::new(InMemoryRemote::new().with_repository("core", ["README.md"]));
    let (ctx, _rx) = ctx(temp.path(), remote);

    let files = vec!["README.md".to_string(), "ghost_file_12345.py".to_string()];
    let result = verify_files(&ctx, &files, None).await.unwrap();

    assert_eq!(result.report.total_files, 2);
    assert_eq!(result.report.safe_to_delete, 1);
    assert_eq!(
        result.report_path,
        temp.path().join("cleanup_verification_log.json")
    );

    let value: serde_json::Value =
        serde_json::from_slice(&tokio::fs::read(&result.report_path).await.unwrap()).unwrap();
    assert_eq!(value["unsafe_files"][0][0], "ghost_file_12345.py");
    assert_eq!(
        value["unsafe_files"][0][1],
        "File not found in any GitHub repository"
    );

    let json = OperationResult::Verification(result).to_json().unwrap();
    assert!(json.contains("\"type\": \"Verification\""));
}

#[tokio::test]
async fn verify_without_candidates_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let (ctx, _rx) = ctx(temp.path(), Arc::new(InMemoryRemote::new()));

    let err = verify_files(&ctx, &[], None).await.unwrap_err();
    assert!(matches!(err, Error::Ops(OpsError::NoFilesSpecified)));
}

#[tokio::test]
async fn verify_report_write_failure_propagates() {
    let temp = tempfile::tempdir().unwrap();
    tokio::fs::write(temp.path().join("blocker"), b"").await.unwrap();
    let (ctx, _rx) = ctx(temp.path(), Arc::new(InMemoryRemote::new()));

    let files = vec!["a.txt".to_string()];
    let err = verify_files(&ctx, &files, Some(Path::new("blocker/report.json")))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Report(_)));
}

#[tokio::test]
async fn restore_rejects_escaping_names() {
    let temp = tempfile::tempdir().unwrap();
    let (ctx, _rx) = ctx(temp.path(), Arc::new(InMemoryRemote::new()));

    let err = restore_file(&ctx, "../etc/passwd").await.unwrap_err();
    assert!(matches!(err, Error::Ops(OpsError::InvalidFileName { .. })));

    let outcome = restore_file(&ctx, "absent.txt").await.unwrap();
    assert!(!outcome.restored);
    assert!(OperationResult::Restore(outcome).is_success());
}

#[tokio::test]
async fn recover_restores_publishes_and_reverifies() {
    let temp = tempfile::tempdir().unwrap();
    let work = temp.path();
    tokio::fs::create_dir_all(work.join("backup")).await.unwrap();
    tokio::fs::write(work.join("backup/lost.md"), b"lost").await.unwrap();
    let remote = Arc::new(InMemoryRemote::new().with_repository("docs", ["README.md"]));
    let (ctx, _rx) = ctx(work, remote.clone());

    let report = recover_file(&ctx, "lost.md", "docs").await.unwrap();

    let restore = report.restore.as_ref().unwrap();
    assert!(restore.restored);
    assert_eq!(restore.source.as_deref(), Some("backup/"));
    assert!(report.publish.as_ref().unwrap().published);
    let verdict = report.verdict.as_ref().unwrap();
    assert!(verdict.safe);
    assert_eq!(verdict.reason, "Found in repositories: docs");
    assert!(OperationResult::Recovery(report).is_success());
}

#[tokio::test]
async fn recover_stops_when_nothing_to_restore() {
    let temp = tempfile::tempdir().unwrap();
    let remote = Arc::new(InMemoryRemote::new().with_repository("docs", ["README.md"]));
    let (ctx, _rx) = ctx(temp.path(), remote.clone());

    let report = recover_file(&ctx, "gone.md", "docs").await.unwrap();
    assert!(!report.restore.unwrap().restored);
    assert!(report.publish.is_none());
    assert_eq!(remote.clone_count().await, 0);
}

#[tokio::test]
async fn publish_failure_is_an_outcome() {
    let temp = tempfile::tempdir().unwrap();
    tokio::fs::write(temp.path().join("a.md"), b"a").await.unwrap();
    let remote = Arc::new(InMemoryRemote::new().with_repository("docs", ["README.md"]));
    remote.fail_commit_step("push", "denied").await;
    let (ctx, _rx) = ctx(temp.path(), remote);

    let outcome = publish_file(&ctx, "a.md", "docs").await.unwrap();
    assert!(!outcome.published);
    assert_eq!(outcome.failed_step.as_deref(), Some("push"));
    assert!(!OperationResult::Publish(outcome).is_success());
}

#[tokio::test]
async fn contents_lists_entries() {
    let temp = tempfile::tempdir().unwrap();
    let remote = Arc::new(InMemoryRemote::new().with_repository("core", ["README.md", "src"]));
    let (ctx, _rx) = ctx(temp.path(), remote);

    let contents = repository_contents(&ctx, "core").await.unwrap();
    assert_eq!(contents.entries, vec!["README.md", "src"]);
    assert!(repository_contents(&ctx, "missing").await.is_err());
}

#[tokio::test]
async fn check_health_writes_report() {
    let temp = tempfile::tempdir().unwrap();
    let remote = Arc::new(InMemoryRemote::new().with_repository("core", ["README.md"]));
    let (ctx, _rx) = ctx(temp.path(), remote);

    let report = check_health(&ctx, None).await.unwrap();
    assert_eq!(report.total_tests, 9);
    // No rules directory in a fresh workspace
    assert!(!report.is_healthy());
    assert!(temp.path().join("orchestration_test_report.json").exists());
    assert!(!OperationResult::HealthCheck(report).is_success());
}
