//! Detection over real trees through the public library API.

use super::fixture::{content_a, content_b, create_sample, write_file, SAMPLE_FILES};
use dupurge::duplicates::{detect, DuplicateFinder, FinderConfig, FinderError, Stage};
use dupurge::scanner::{HashError, Walker, WalkerConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::tempdir;

fn walk(root: &Path, config: WalkerConfig) -> Vec<PathBuf> {
    Walker::new(root, config)
        .walk()
        .filter_map(Result::ok)
        .collect()
}

#[test]
fn test_detect_empty_input() {
    let (groups, summary) = DuplicateFinder::with_defaults().detect(Vec::new()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_detect_sample_groups() {
    let dir = tempdir().unwrap();
    create_sample(dir.path());
    let paths = walk(dir.path(), WalkerConfig::default());
    assert_eq!(paths.len(), SAMPLE_FILES);

    let (groups, summary) = DuplicateFinder::with_defaults().detect(paths).unwrap();

    let mut sizes: Vec<_> = groups.iter().map(|g| (g.size, g.len())).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![(100, 2), (2048, 2), (2048, 3)]);
    assert_eq!(summary.duplicate_files, 7);
    assert_eq!(summary.wasted_space, 100 + 2048 + 2 * 2048);

    for group in &groups {
        let first = fs::read(&group.paths[0]).unwrap();
        for path in &group.paths[1..] {
            assert_eq!(fs::read(path).unwrap(), first, "{} differs", path.display());
        }
    }
}

#[test]
fn test_detect_stage_counters() {
    let dir = tempdir().unwrap();
    create_sample(dir.path());
    let paths = walk(dir.path(), WalkerConfig::default());

    let (_, summary) = DuplicateFinder::with_defaults().detect(paths).unwrap();

    let by_size = summary.stage(Stage::BySize).unwrap();
    assert_eq!(by_size.input_files, 8);
    assert_eq!(by_size.duplicate_keys, 2);
    assert_eq!(by_size.carried_forward, 8);

    // unique.txt shares its size with the C files but not their first KiB
    let by_crc = summary.stage(Stage::ByPartialChecksum).unwrap();
    assert_eq!(by_crc.input_files, 8);
    assert_eq!(by_crc.carried_forward, 7);

    // A and B share the first KiB; only the full digest splits them
    let by_hash = summary.stage(Stage::ByFullHash).unwrap();
    assert_eq!(by_hash.input_files, 7);
    assert_eq!(by_hash.duplicate_keys, 3);
}

#[test]
fn test_same_prefix_different_tail_not_grouped() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.bin");
    let b = dir.path().join("b.bin");
    write_file(&a, &content_a(), 1);
    write_file(&b, &content_b(), 1);

    let groups = detect(vec![a, b]).unwrap();
    assert!(groups.is_empty());
}

#[test]
fn test_detection_is_deterministic() {
    let dir = tempdir().unwrap();
    create_sample(dir.path());
    let paths = walk(dir.path(), WalkerConfig::default());

    let first = detect(paths.clone()).unwrap();
    let second = detect(paths).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_top_limit_bounds_candidates() {
    let dir = tempdir().unwrap();
    // ten pairs of equal-size files; each pair shares a distinct size
    for i in 0..10u8 {
        let data = vec![i; 10 + usize::from(i)];
        write_file(&dir.path().join(format!("p{i}/x")), &data, 1);
        write_file(&dir.path().join(format!("p{i}/y")), &data, 1);
    }
    let paths = walk(dir.path(), WalkerConfig::default());

    let finder = DuplicateFinder::new(FinderConfig::default().with_top(Some(2)));
    let (groups, summary) = finder.detect(paths.clone()).unwrap();

    // size limit 4 members, checksum limit 4 members: two pairs survive
    assert_eq!(groups.len(), 2);
    assert!(summary.stage(Stage::BySize).unwrap().dropped_by_limit > 0);
    for group in &groups {
        assert_eq!(group.len(), 2);
    }

    let unbounded = detect(paths).unwrap();
    assert_eq!(unbounded.len(), 10);
}

#[test]
fn test_skip_hidden_and_empty_walk() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join(".hidden/a"), b"same", 1);
    write_file(&dir.path().join("visible/a"), b"same", 1);
    write_file(&dir.path().join("e1"), b"", 1);
    write_file(&dir.path().join("e2"), b"", 1);

    let all = detect(walk(dir.path(), WalkerConfig::default())).unwrap();
    assert_eq!(all.len(), 2);

    let filtered = detect(walk(dir.path(), WalkerConfig::new(false, false))).unwrap();
    assert!(filtered.is_empty());
}

#[test]
fn test_unreadable_candidate_is_fatal() {
    let dir = tempdir().unwrap();
    let present = dir.path().join("present");
    fs::write(&present, "x").unwrap();
    let missing = dir.path().join("missing");

    let err = detect(vec![present, missing.clone()]).unwrap_err();
    match err {
        FinderError::Hash(HashError::NotFound(path)) => assert_eq!(path, missing),
        other => panic!("Expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_raised_shutdown_flag_interrupts() {
    let dir = tempdir().unwrap();
    create_sample(dir.path());
    let paths = walk(dir.path(), WalkerConfig::default());

    let flag = Arc::new(AtomicBool::new(true));
    let finder = DuplicateFinder::new(FinderConfig::default().with_shutdown_flag(flag));

    assert!(matches!(finder.detect(paths), Err(FinderError::Interrupted)));
}
