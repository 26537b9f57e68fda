//! Full runs through `run_batch` against a temporary source tree.

use assert_fs::prelude::*;
use batch_move::{
    BatchError, BatchRequest, ManifestFormat, TransferMode, read_json_manifest, run_batch,
};
use std::fs;
use std::path::{Path, PathBuf};

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Source root with folders A, B, C, each holding one file.
fn abc_source(td: &assert_fs::TempDir) -> PathBuf {
    for name in ["A", "B", "C"] {
        td.child("src")
            .child(name)
            .child(format!("{name}.txt"))
            .write_str(&format!("content of {name}"))
            .unwrap();
    }
    td.path().join("src")
}

fn read(p: impl AsRef<Path>) -> String {
    fs::read_to_string(p).unwrap()
}

#[test]
fn copy_scenario() {
    let td = assert_fs::TempDir::new().unwrap();
    let src = abc_source(&td);
    let out = td.path().join("out");

    let mut req = BatchRequest::new(&src, ids(&["A", "B", "C", "D"]), 2);
    req.operation = Some(TransferMode::Copy);
    req.destination_root = Some(out.clone());

    let report = run_batch(&req).unwrap();
    assert_eq!(report.resolution.existing_ids(), vec!["A", "B", "C"]);
    assert_eq!(report.resolution.missing, vec!["D"]);
    assert_eq!(report.chunks.len(), 2);
    assert_eq!(report.chunks[0].name, "chunk_1");
    assert_eq!(report.chunks[0].ids, vec!["A", "B"]);
    assert_eq!(report.chunks[1].name, "chunk_2");
    assert_eq!(report.chunks[1].ids, vec!["C"]);

    assert_eq!(read(out.join("chunk_1/A/A.txt")), "content of A");
    assert_eq!(read(out.join("chunk_1/B/B.txt")), "content of B");
    assert_eq!(read(out.join("chunk_2/C/C.txt")), "content of C");
    for name in ["A", "B", "C"] {
        assert_eq!(read(src.join(name).join(format!("{name}.txt"))), format!("content of {name}"));
    }
    assert_eq!(report.transferred.len(), 2);
    assert!(report.transfer_error.is_none());
}

#[test]
fn move_scenario() {
    let td = assert_fs::TempDir::new().unwrap();
    let src = abc_source(&td);
    let out = td.path().join("out");

    let mut req = BatchRequest::new(&src, ids(&["A", "B", "C", "D"]), 2);
    req.operation = Some(TransferMode::Move);
    req.destination_root = Some(out.clone());

    run_batch(&req).unwrap();
    for name in ["A", "B", "C"] {
        assert!(!src.join(name).exists(), "{name} should be gone from source");
    }
    assert_eq!(read(out.join("chunk_1/A/A.txt")), "content of A");
    assert_eq!(read(out.join("chunk_1/B/B.txt")), "content of B");
    assert_eq!(read(out.join("chunk_2/C/C.txt")), "content of C");
}

#[test]
fn rerun_copy_is_deterministic() {
    let td = assert_fs::TempDir::new().unwrap();
    let src = abc_source(&td);
    let out = td.path().join("out");
    td.child("out/chunk_1/A/leftover.txt").write_str("stale").unwrap();

    let mut req = BatchRequest::new(&src, ids(&["A", "B"]), 5);
    req.operation = Some(TransferMode::Copy);
    req.destination_root = Some(out.clone());
    run_batch(&req).unwrap();
    run_batch(&req).unwrap();

    assert!(!out.join("chunk_1/A/leftover.txt").exists());
    let names: Vec<_> = fs::read_dir(out.join("chunk_1/A"))
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec!["A.txt"]);
}

#[test]
fn unchunked_save_writes_one_aggregate() {
    let td = assert_fs::TempDir::new().unwrap();
    let src = abc_source(&td);
    let chunks_dir = td.path().join("manifests");

    let mut req = BatchRequest::new(&src, ids(&["C", "A", "D", "B"]), 0);
    req.save_manifests = true;
    req.chunks_dir = chunks_dir.clone();

    let report = run_batch(&req).unwrap();
    assert!(!report.chunked);
    assert_eq!(report.manifests_written, vec![chunks_dir.join("all_mapping.json")]);
    assert_eq!(fs::read_dir(&chunks_dir).unwrap().count(), 1);

    let v: serde_json::Value = serde_json::from_str(&read(chunks_dir.join("all_mapping.json"))).unwrap();
    let obj = v.as_object().unwrap();
    assert_eq!(obj.len(), 3);
    assert_eq!(obj["C"].as_array().unwrap().len(), 1);
}

#[test]
fn chunked_save_writes_one_manifest_per_chunk() {
    let td = assert_fs::TempDir::new().unwrap();
    let src = abc_source(&td);
    let chunks_dir = td.path().join("manifests");

    let mut req = BatchRequest::new(&src, ids(&["A", "B", "C"]), 2);
    req.save_manifests = true;
    req.chunks_dir = chunks_dir.clone();
    req.chunk_prefix = "batch-".into();

    run_batch(&req).unwrap();
    assert_eq!(read_json_manifest(&chunks_dir.join("batch-1.json")).unwrap(), vec!["A", "B"]);
    assert_eq!(read_json_manifest(&chunks_dir.join("batch-2.json")).unwrap(), vec!["C"]);

    req.manifest_format = ManifestFormat::Text;
    run_batch(&req).unwrap();
    assert_eq!(read(chunks_dir.join("batch-1.text")), "A\nB\n");
    assert_eq!(read(chunks_dir.join("batch-2.text")), "C\n");
}

#[test]
fn print_only_touches_nothing() {
    let td = assert_fs::TempDir::new().unwrap();
    let src = abc_source(&td);
    let out = td.path().join("out");
    let chunks_dir = td.path().join("manifests");

    let mut req = BatchRequest::new(&src, ids(&["A", "B", "C"]), 1);
    req.save_manifests = true;
    req.chunks_dir = chunks_dir.clone();
    req.operation = Some(TransferMode::Move);
    req.destination_root = Some(out.clone());
    req.print_only = true;

    let report = run_batch(&req).unwrap();
    assert_eq!(report.chunks.len(), 3);
    assert!(!out.exists());
    assert!(!chunks_dir.exists());
    assert!(src.join("A").exists());
}

#[test]
fn preconditions_fail_before_mutation() {
    let td = assert_fs::TempDir::new().unwrap();
    let src = abc_source(&td);
    let out = td.path().join("out");

    let mut req = BatchRequest::new(&src, ids(&["A"]), -1);
    req.operation = Some(TransferMode::Move);
    req.destination_root = Some(out.clone());
    assert!(matches!(run_batch(&req), Err(BatchError::InvalidChunkSize(-1))));

    req.chunk_size = 1;
    req.destination_root = None;
    assert!(matches!(run_batch(&req), Err(BatchError::MissingDestination)));

    req.destination_root = Some(out.clone());
    req.source_root = td.path().join("no_such_root");
    assert!(matches!(run_batch(&req), Err(BatchError::InvalidSourceRoot(_))));

    assert!(!out.exists());
    assert!(src.join("A").exists());
}

#[test]
fn duplicate_id_across_chunks_fails_on_second_move() {
    let td = assert_fs::TempDir::new().unwrap();
    let src = abc_source(&td);
    let out = td.path().join("out");

    let mut req = BatchRequest::new(&src, ids(&["A", "B", "A"]), 2);
    req.operation = Some(TransferMode::Move);
    req.destination_root = Some(out.clone());

    let report = run_batch(&req).unwrap();
    match &report.transfer_error {
        Some(BatchError::Transaction { chunk, identifier, .. }) => {
            assert_eq!(chunk, "chunk_2");
            assert_eq!(identifier, "A");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    // chunk_1 stays applied and is still reported.
    assert_eq!(report.transferred.len(), 1);
    assert_eq!(report.transferred[0].0, "chunk_1");
    assert_eq!(read(out.join("chunk_1/A/A.txt")), "content of A");
    assert_eq!(read(out.join("chunk_1/B/B.txt")), "content of B");
}

#[cfg(unix)]
#[test]
fn manifest_failure_does_not_stop_transfers() {
    let td = assert_fs::TempDir::new().unwrap();
    let src = abc_source(&td);
    let out = td.path().join("out");
    // A file where the chunks directory should be makes every manifest write fail.
    let blocker = td.child("manifests");
    blocker.write_str("not a dir").unwrap();

    let mut req = BatchRequest::new(&src, ids(&["A", "B", "C"]), 2);
    req.save_manifests = true;
    req.chunks_dir = blocker.path().to_path_buf();
    req.operation = Some(TransferMode::Copy);
    req.destination_root = Some(out.clone());

    let report = run_batch(&req).unwrap();
    assert_eq!(report.manifest_failures.len(), 2);
    assert!(report
        .manifest_failures
        .iter()
        .all(|e| matches!(e, BatchError::IoWrite { .. })));
    assert!(report.manifests_written.is_empty());
    assert!(out.join("chunk_2/C/C.txt").exists());
}

#[test]
fn unchunked_transfer_uses_single_group() {
    let td = assert_fs::TempDir::new().unwrap();
    let src = abc_source(&td);
    let out = td.path().join("out");

    let mut req = BatchRequest::new(&src, ids(&["B", "A"]), 0);
    req.operation = Some(TransferMode::Copy);
    req.destination_root = Some(out.clone());

    let report = run_batch(&req).unwrap();
    assert_eq!(report.chunks.len(), 1);
    assert_eq!(report.chunks[0].ids, vec!["B", "A"]);
    assert!(out.join("chunk_1/A/A.txt").exists());
    assert!(out.join("chunk_1/B/B.txt").exists());
}

#[test]
fn listing_respects_recursion_flag() {
    let td = assert_fs::TempDir::new().unwrap();
    let src = abc_source(&td);
    td.child("src/A/deep/more.txt").write_str("x").unwrap();

    let mut req = BatchRequest::new(&src, ids(&["A"]), 0);
    let report = run_batch(&req).unwrap();
    assert_eq!(report.files[0].1.len(), 2);

    req.recursive = false;
    let report = run_batch(&req).unwrap();
    assert_eq!(report.files[0].1.len(), 1);
}

#[test]
fn source_under_destination_chunk_is_kept() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("out/chunk_1/A/precious.txt").write_str("keep me").unwrap();
    let out = td.path().join("out");

    let mut req = BatchRequest::new(out.join("chunk_1"), ids(&["A"]), 1);
    req.operation = Some(TransferMode::Copy);
    req.destination_root = Some(out.clone());

    let report = run_batch(&req).unwrap();
    assert!(matches!(
        report.transfer_error,
        Some(BatchError::Transaction { ref identifier, .. }) if identifier == "A"
    ));
    assert_eq!(read(out.join("chunk_1/A/precious.txt")), "keep me");
}
