//! Reconciliation integration tests
//!
//! Scans a real directory tree, loads a catalog file and checks the work list.

use std::fs;
use std::path::Path;
use tubevault::{catalog, reconcile, scanner::Scanner};
use tubevault_common::RemoteEntry;

fn touch(dir: &Path, name: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), b"").unwrap();
}

fn write_catalog(path: &Path, ids: &[&str]) {
    let entries: Vec<RemoteEntry> = ids
        .iter()
        .map(|id| RemoteEntry::new(*id, format!("video {id}")))
        .collect();
    fs::write(path, serde_json::to_string_pretty(&entries).unwrap()).unwrap();
}

#[test]
fn test_scan_then_reconcile() {
    let tmp = tempfile::tempdir().unwrap();
    let chan = tmp.path().join("chan");
    touch(&chan, "first upload-AAAAAAAAAAA.mp4");
    touch(&chan, "third upload-CCCCCCCCCCC.mkv");
    touch(&chan.join("2024"), "fourth upload-DDDDDDDDDDD.MKV");
    touch(&chan, "third upload-CCCCCCCCCCC.info.json");
    touch(&chan, "notes.txt");

    let catalog_path = tmp.path().join("chan.json");
    write_catalog(
        &catalog_path,
        &["AAAAAAAAAAA", "BBBBBBBBBBB", "CCCCCCCCCCC", "DDDDDDDDDDD"],
    );

    let report = Scanner::new().scan_directory_blocking(&chan).unwrap();
    assert_eq!(report.videos.len(), 3);
    assert_eq!(report.skipped_unsupported, 2);

    let entries = catalog::load_entries(&catalog_path).unwrap();
    let to_fetch = reconcile::entries_to_fetch(entries, &report.videos);
    assert_eq!(to_fetch.len(), 1);
    assert_eq!(to_fetch[0].id.as_str(), "BBBBBBBBBBB");
    assert_eq!(to_fetch[0].title, "video BBBBBBBBBBB");
}

#[test]
fn test_empty_archive_fetches_everything() {
    let tmp = tempfile::tempdir().unwrap();
    let catalog_path = tmp.path().join("chan.json");
    write_catalog(&catalog_path, &["BBBBBBBBBBB", "AAAAAAAAAAA"]);

    let report = Scanner::new().scan_directory_blocking(tmp.path()).unwrap();
    assert!(report.videos.is_empty());

    let entries = catalog::load_entries(&catalog_path).unwrap();
    let to_fetch = reconcile::entries_to_fetch(entries.clone(), &report.videos);
    assert_eq!(to_fetch, entries);
}

#[test]
fn test_unidentified_files_do_not_match() {
    let tmp = tempfile::tempdir().unwrap();
    // Too short to carry an id, so it cannot satisfy any entry.
    touch(tmp.path(), "AAAAAAAAAA.mp4");

    let report = Scanner::new().scan_directory_blocking(tmp.path()).unwrap();
    assert_eq!(report.skipped_unidentified, 1);

    let remote = vec![RemoteEntry::new("AAAAAAAAAAA", "")];
    assert_eq!(reconcile::entries_to_fetch(remote, &report.videos).len(), 1);
}
