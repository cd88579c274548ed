//! Manager-level behavior that is safe to exercise on any host.

use std::path::PathBuf;

use phup_apt::{AptManager, Inventory};
use phup_backend::{OperationEvent, OperationRequest, PhpVersion, RuntimeManager};

async fn drain(mut handle: phup_backend::OperationHandle) -> Vec<OperationEvent> {
    let mut events = Vec::new();
    while let Some(event) = handle.recv().await {
        events.push(event);
    }
    handle.join().await;
    events
}

#[tokio::test]
async fn blank_extension_input_completes_without_running_commands() {
    let manager = AptManager::new();

    for input in ["", " , "] {
        let handle = manager.start(OperationRequest::InstallExtensions {
            version: PhpVersion::apt("php8.3"),
            extensions: input.to_string(),
        });
        let events = drain(handle).await;

        assert_eq!(events.len(), 2, "reset plus completion only, got {events:?}");
        assert_eq!(events[0], OperationEvent::Progress(0));
        assert!(matches!(
            &events[1],
            OperationEvent::Completed(outcome) if outcome.is_clean()
        ));
    }
}

#[tokio::test]
async fn list_installed_reflects_the_configured_inventory() {
    let bin = tempfile::tempdir().expect("temporary directory should be created");
    std::fs::write(bin.path().join("php8.2"), b"").expect("fixture should be writable");
    std::fs::write(bin.path().join("phpize"), b"").expect("fixture should be writable");

    let manager = AptManager::new().with_inventory(Inventory::new(
        bin.path().to_path_buf(),
        PathBuf::from("/nonexistent"),
    ));

    let versions = manager
        .list_installed()
        .await
        .expect("inventory scan is infallible");
    assert_eq!(versions, [PhpVersion::apt("php8.2")]);
}
