use std::time::Duration;
use tokio::process::Command;

#[tokio::test]
async fn test_corrupt_snapshot_exits_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, "{ not json").unwrap();

    let mut child = Command::new(env!("CARGO_BIN_EXE_couples-admin"))
        .current_dir(dir.path())
        .env("CATALOG_SNAPSHOT_PATH", &path)
        .env("ADMIN_BIND_ADDR", "127.0.0.1:0")
        .env("RUST_LOG", "off")
        .kill_on_drop(true)
        .spawn()
        .expect("spawn admin binary");

    let status = tokio::time::timeout(Duration::from_secs(10), child.wait())
        .await
        .expect("binary should exit instead of serving")
        .unwrap();
    assert!(!status.success());
    assert_eq!(status.code(), Some(1));
}
