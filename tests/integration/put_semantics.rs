//! Integration tests for merging filesystem content into archives

use super::test_utils::{CollectingReporter, Sandbox};
use packrat::archive::{entry_name, symlink_entry_name, ArchiveFormat, EntryBody};
use packrat::backup::ArchiveService;
use packrat::error::BackupError;
use std::fs;

fn content_of(format: ArchiveFormat, location: &std::path::Path, name: &str) -> Option<Vec<u8>> {
    let state = format.open(location).unwrap();
    match state.get(name).map(|e| &e.body) {
        Some(EntryBody::Content(bytes)) => Some(bytes.clone()),
        _ => None,
    }
}

#[tokio::test]
async fn test_put_directory_tree_into_bundle() {
    let sandbox = Sandbox::new();
    let a = sandbox.write("data/a.txt", "alpha");
    let b = sandbox.write("data/nested/b.txt", "beta");
    let location = sandbox.path("out/backup.pack");

    let service = ArchiveService::new(ArchiveFormat::Bundle, location.to_string_lossy());
    let reporter = CollectingReporter::default();
    let summary = service
        .put_at(&[sandbox.path("data")], &location, &reporter)
        .await
        .unwrap();

    assert_eq!(summary.entries, 2);
    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.updated, 0);
    assert_eq!(
        content_of(ArchiveFormat::Bundle, &location, &entry_name(&a)),
        Some(b"alpha".to_vec())
    );
    assert_eq!(
        content_of(ArchiveFormat::Bundle, &location, &entry_name(&b)),
        Some(b"beta".to_vec())
    );
    assert!(reporter.contains("Backing up files to:"));
    assert!(reporter.contains("File written to:"));
}

#[tokio::test]
async fn test_repeated_put_is_idempotent() {
    let sandbox = Sandbox::new();
    sandbox.write("data/a.txt", "alpha");
    sandbox.write("data/b.txt", "beta");
    let location = sandbox.path("backup.tar");
    let service = ArchiveService::new(ArchiveFormat::Tar, location.to_string_lossy());
    let reporter = CollectingReporter::default();

    service
        .put_at(&[sandbox.path("data")], &location, &reporter)
        .await
        .unwrap();
    let first = fs::read(&location).unwrap();

    let summary = service
        .put_at(&[sandbox.path("data")], &location, &reporter)
        .await
        .unwrap();
    let second = fs::read(&location).unwrap();

    assert_eq!(summary.inserted, 0);
    assert_eq!(summary.updated, 2);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_changed_file_updates_in_place() {
    let sandbox = Sandbox::new();
    let a = sandbox.write("data/a.txt", "one");
    sandbox.write("data/b.txt", "keep");
    let location = sandbox.path("backup.pack");
    let service = ArchiveService::new(ArchiveFormat::Bundle, location.to_string_lossy());
    let reporter = CollectingReporter::default();

    service
        .put_at(&[sandbox.path("data")], &location, &reporter)
        .await
        .unwrap();
    let order_before: Vec<String> = ArchiveFormat::Bundle
        .open(&location)
        .unwrap()
        .entries()
        .iter()
        .map(|e| e.name.clone())
        .collect();

    fs::write(&a, "two").unwrap();
    service
        .put_at(&[sandbox.path("data")], &location, &reporter)
        .await
        .unwrap();

    let state = ArchiveFormat::Bundle.open(&location).unwrap();
    let order_after: Vec<String> = state.entries().iter().map(|e| e.name.clone()).collect();
    assert_eq!(order_before, order_after);
    assert_eq!(
        content_of(ArchiveFormat::Bundle, &location, &entry_name(&a)),
        Some(b"two".to_vec())
    );
}

#[tokio::test]
async fn test_entries_from_other_roots_survive() {
    let sandbox = Sandbox::new();
    let first = sandbox.write("first.txt", "1");
    let second = sandbox.write("second.txt", "2");
    let location = sandbox.path("backup.tar");
    let service = ArchiveService::new(ArchiveFormat::Tar, location.to_string_lossy());
    let reporter = CollectingReporter::default();

    service.put_at(&[first.clone()], &location, &reporter).await.unwrap();
    service.put_at(&[second.clone()], &location, &reporter).await.unwrap();

    let state = ArchiveFormat::Tar.open(&location).unwrap();
    assert_eq!(state.len(), 2);
    assert!(state.get(&entry_name(&first)).is_some());
    assert!(state.get(&entry_name(&second)).is_some());
}

#[cfg(unix)]
#[tokio::test]
async fn test_two_links_to_one_directory_store_content_once() {
    let sandbox = Sandbox::new();
    let target = sandbox.mkdir("real");
    let file = sandbox.write("real/shared.txt", "shared");
    let left = sandbox.symlink(&target, "left");
    let right = sandbox.symlink(&target, "right");
    let location = sandbox.path("backup.pack");

    let service = ArchiveService::new(ArchiveFormat::Bundle, location.to_string_lossy());
    let reporter = CollectingReporter::default();
    let summary = service
        .put_at(&[left.clone(), right.clone()], &location, &reporter)
        .await
        .unwrap();

    assert_eq!(summary.entries, 3);
    assert_eq!(summary.traversal.skipped, 1);

    let state = ArchiveFormat::Bundle.open(&location).unwrap();
    assert!(state.get(&entry_name(&file)).is_some());
    for link in [&left, &right] {
        match &state.get(&symlink_entry_name(link)).unwrap().body {
            EntryBody::Symlink { target: recorded } => {
                assert_eq!(recorded, &target.to_string_lossy())
            }
            other => panic!("expected symlink marker, got {:?}", other),
        }
    }
    assert!(reporter.contains("Skipping already visited"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_root_through_aliased_directory_stored_once() {
    let sandbox = Sandbox::new();
    let real_file = sandbox.write("real/sub/f.txt", "f");
    let link = sandbox.symlink(&real_file, "real/sub/l");
    sandbox.symlink(&sandbox.path("real"), "alias");
    let location = sandbox.path("backup.pack");

    let service = ArchiveService::new(ArchiveFormat::Bundle, location.to_string_lossy());
    let summary = service
        .put_at(&[sandbox.path("alias/sub")], &location, &CollectingReporter::default())
        .await
        .unwrap();

    let state = ArchiveFormat::Bundle.open(&location).unwrap();
    let content_names: Vec<&str> = state
        .entries()
        .iter()
        .filter(|e| matches!(e.body, EntryBody::Content(_)))
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(content_names, vec![entry_name(&real_file).as_str()]);
    assert!(state.get(&symlink_entry_name(&link)).is_some());
    assert_eq!(summary.entries, 2);
    assert_eq!(summary.traversal.skipped, 1);
}

#[cfg(unix)]
#[tokio::test]
async fn test_root_that_is_a_symlink_keeps_its_marker() {
    let sandbox = Sandbox::new();
    let target = sandbox.write("real/a.txt", "a");
    sandbox.symlink(&sandbox.path("real"), "alias");
    let link = sandbox.symlink(&target, "real/link");
    let location = sandbox.path("backup.tar");

    let service = ArchiveService::new(ArchiveFormat::Tar, location.to_string_lossy());
    service
        .put_at(&[sandbox.path("alias/link")], &location, &CollectingReporter::default())
        .await
        .unwrap();

    let state = ArchiveFormat::Tar.open(&location).unwrap();
    assert!(state.get(&symlink_entry_name(&link)).is_some());
    assert!(state.get(&entry_name(&target)).is_some());
    assert_eq!(state.len(), 2);
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_cycle_terminates() {
    let sandbox = Sandbox::new();
    let dir = sandbox.mkdir("loop");
    sandbox.write("loop/file.txt", "x");
    sandbox.symlink(&dir, "loop/back");
    let location = sandbox.path("backup.tar");

    let service = ArchiveService::new(ArchiveFormat::Tar, location.to_string_lossy());
    let summary = service
        .put_at(&[dir.clone()], &location, &CollectingReporter::default())
        .await
        .unwrap();

    // file.txt plus the marker for loop/back
    assert_eq!(summary.entries, 2);
    assert!(summary.traversal.skipped >= 1);
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_marker_round_trips_through_tar() {
    let sandbox = Sandbox::new();
    let target = sandbox.write("target.txt", "t");
    let link = sandbox.symlink(&target, "link");
    let location = sandbox.path("backup.tar");

    let service = ArchiveService::new(ArchiveFormat::Tar, location.to_string_lossy());
    let reporter = CollectingReporter::default();
    service.put_at(&[link.clone()], &location, &reporter).await.unwrap();
    let first = fs::read(&location).unwrap();

    let state = ArchiveFormat::Tar.open(&location).unwrap();
    assert_eq!(
        state.get(&symlink_entry_name(&link)).unwrap().body,
        EntryBody::Symlink {
            target: target.to_string_lossy().into_owned()
        }
    );
    assert!(state.get(&entry_name(&target)).is_some());

    service.put_at(&[link], &location, &reporter).await.unwrap();
    assert_eq!(first, fs::read(&location).unwrap());
}

#[tokio::test]
async fn test_missing_root_leaves_archive_untouched() {
    let sandbox = Sandbox::new();
    sandbox.write("data/a.txt", "alpha");
    let location = sandbox.path("backup.pack");
    let service = ArchiveService::new(ArchiveFormat::Bundle, location.to_string_lossy());
    let reporter = CollectingReporter::default();

    service
        .put_at(&[sandbox.path("data")], &location, &reporter)
        .await
        .unwrap();
    let before = fs::read(&location).unwrap();

    sandbox.write("data/a.txt", "changed");
    let err = service
        .put_at(
            &[sandbox.path("data"), sandbox.path("missing")],
            &location,
            &reporter,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, BackupError::Traversal(_)));
    assert_eq!(before, fs::read(&location).unwrap());
}

#[cfg(unix)]
#[tokio::test]
async fn test_dangling_symlink_fails_without_writing() {
    let sandbox = Sandbox::new();
    let link = sandbox.symlink(&sandbox.path("nowhere"), "dangling");
    let location = sandbox.path("backup.tar");

    let service = ArchiveService::new(ArchiveFormat::Tar, location.to_string_lossy());
    let result = service
        .put_at(&[link], &location, &CollectingReporter::default())
        .await;

    assert!(result.is_err());
    assert!(!location.exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_socket_in_tree_fails_without_writing() {
    let sandbox = Sandbox::new();
    sandbox.write("data/a.txt", "alpha");
    let _socket = std::os::unix::net::UnixListener::bind(sandbox.path("data/sock")).unwrap();
    let location = sandbox.path("backup.pack");

    let service = ArchiveService::new(ArchiveFormat::Bundle, location.to_string_lossy());
    let err = service
        .put_at(&[sandbox.path("data")], &location, &CollectingReporter::default())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("sock"));
    assert!(!location.exists());
}

#[tokio::test]
async fn test_put_expands_date_template() {
    let sandbox = Sandbox::new();
    let file = sandbox.write("a.txt", "alpha");
    let template = format!("{}/{{date.yyyy}}/{{date.mm}}/day-{{date.dd}}.pack", sandbox.root.display());

    let service = ArchiveService::new(ArchiveFormat::Bundle, template);
    let summary = service
        .put(&[file], &CollectingReporter::default())
        .await
        .unwrap();

    let today = chrono::Local::now().date_naive();
    let expected = sandbox
        .root
        .join(today.format("%Y").to_string())
        .join(today.format("%m").to_string())
        .join(format!("day-{}.pack", today.format("%d")));
    assert_eq!(summary.location, expected);
    assert!(expected.exists());
}
