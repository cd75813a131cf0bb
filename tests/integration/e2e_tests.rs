//! End-to-end runs over the sample tree.

use super::fixture::{count_files, create_sample, path_arg, run, set_mtime, SAMPLE_FILES};
use dupurge::config::ConfigError;
use dupurge::error::ExitCode;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_straight() {
    let dir = tempdir().unwrap();
    let tst = dir.path().join("tst");
    create_sample(&tst);
    assert_eq!(count_files(&tst), SAMPLE_FILES);

    let golden = path_arg(&tst.join("golden"));
    let work = path_arg(&tst.join("work"));
    let (result, report) = run(&["-g", &golden, "-w", &work, "--purge"]);

    assert_eq!(result.unwrap(), ExitCode::Success);
    assert_eq!(count_files(&tst), 5);
    assert_eq!(count_files(&tst.join("golden")), 3);
    assert_eq!(count_files(&tst.join("work")), 2);
    assert!(tst.join("work/1/.new.jpg").exists());
    assert!(tst.join("work/unique.txt").exists());

    assert!(report.contains(&format!("files unchanged (golden) in: {golden}")));
    assert!(report.contains(&format!("searching and removing duplicates in: {work}")));
    assert!(report.contains("Total duplicates: 7, keep: 3, skipped (in golden): 1, deleted: 3/3"));
    assert!(report.contains("Complete in 0 minutes"));
}

#[test]
fn test_straight_removes_emptied_directories() {
    let dir = tempdir().unwrap();
    let tst = dir.path().join("tst");
    create_sample(&tst);

    let (result, report) = run(&[
        "-g",
        &path_arg(&tst.join("golden")),
        "-w",
        &path_arg(&tst.join("work")),
        "-p",
    ]);

    result.unwrap();
    assert!(!tst.join("work/2").exists());
    assert!(tst.join("work/1").is_dir());
    assert!(tst.join("work").is_dir());
    assert!(report.contains("Deleting empty dir's in work ("));
    assert!(report.contains("   empty directory removed: "));
}

#[test]
fn test_no_cleanup_keeps_emptied_directories() {
    let dir = tempdir().unwrap();
    let tst = dir.path().join("tst");
    create_sample(&tst);

    let (result, report) = run(&[
        "-g",
        &path_arg(&tst.join("golden")),
        "-w",
        &path_arg(&tst.join("work")),
        "-p",
        "--no-cleanup",
    ]);

    result.unwrap();
    assert!(tst.join("work/2").is_dir());
    assert!(!report.contains("Deleting empty dir's"));
}

#[test]
fn test_reverse_leaves_golden_untouched() {
    let dir = tempdir().unwrap();
    let tst = dir.path().join("tst");
    create_sample(&tst);

    // The old "work" tree is now protected; the old "golden" tree is purged.
    let (result, report) = run(&[
        "-w",
        &path_arg(&tst.join("golden")),
        "-g",
        &path_arg(&tst.join("work")),
        "-p",
    ]);

    result.unwrap();
    assert_eq!(count_files(&tst.join("work")), 5);
    assert_eq!(count_files(&tst.join("golden")), 0);
    assert!(tst.join("golden").is_dir());
    assert!(report.contains("Total duplicates: 7, keep: 3, skipped (in golden): 1, deleted: 3/3"));
}

#[test]
fn test_report_only_deletes_nothing() {
    let dir = tempdir().unwrap();
    let tst = dir.path().join("tst");
    create_sample(&tst);

    let (result, report) = run(&[
        "-g",
        &path_arg(&tst.join("golden")),
        "-w",
        &path_arg(&tst.join("work")),
    ]);

    result.unwrap();
    assert_eq!(count_files(&tst), SAMPLE_FILES);
    assert!(!report.contains("DELETED"));
    assert!(report.contains("*D"));
    assert!(report.contains("Total duplicates: 7, keep: 3, skipped (in golden): 1, deleted: 0/3"));
}

#[test]
fn test_work_inside_golden_is_rejected() {
    let dir = tempdir().unwrap();
    let tst = dir.path().join("tst");
    create_sample(&tst);

    let (result, report) = run(&["-g", &path_arg(&tst), "-w", &path_arg(&tst.join("work")), "-p"]);

    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::WorkInsideGolden { .. })
    ));
    assert_eq!(ExitCode::for_error(&err), ExitCode::Fatal);
    assert!(report.is_empty());
    assert_eq!(count_files(&tst), SAMPLE_FILES);
}

#[test]
fn test_same_path_is_rejected() {
    let dir = tempdir().unwrap();
    let tst = dir.path().join("tst");
    create_sample(&tst);

    let with_slash = format!("{}/", path_arg(&tst));
    let (result, _) = run(&["-g", &path_arg(&tst), "-w", &with_slash, "-p"]);

    let err = result.unwrap_err();
    assert!(err.to_string().contains("work path is under golden"));
    assert_eq!(count_files(&tst), SAMPLE_FILES);
}

#[test]
fn test_golden_inside_work() {
    let dir = tempdir().unwrap();
    let tst = dir.path().join("tst");
    create_sample(&tst);

    let (result, report) = run(&["-w", &path_arg(&tst), "-g", &path_arg(&tst.join("golden")), "-p"]);

    result.unwrap();
    assert_eq!(count_files(&tst), 5);
    assert_eq!(count_files(&tst.join("golden")), 3);
    assert_eq!(count_files(&tst.join("work")), 2);
    assert!(report.contains("Total duplicates: 7, keep: 3, skipped (in golden): 1, deleted: 3/3"));
}

#[test]
fn test_oldest_copy_is_preserved() {
    let dir = tempdir().unwrap();
    let tst = dir.path().join("tst");
    create_sample(&tst);
    let hidden = tst.join("work/1/.new.jpg");
    set_mtime(&hidden, 0);

    let (result, _) = run(&["-w", &path_arg(&tst), "-g", &path_arg(&tst.join("golden")), "-p"]);

    result.unwrap();
    assert!(hidden.is_file());
    assert!(!tst.join("work/2/c.jpg").exists());
    assert_eq!(count_files(&tst), 5);
}

#[test]
fn test_most_recent_copy_is_removed() {
    let dir = tempdir().unwrap();
    let tst = dir.path().join("tst");
    create_sample(&tst);
    let hidden = tst.join("work/1/.new.jpg");
    set_mtime(&hidden, 4000);

    let (result, _) = run(&["-w", &path_arg(&tst), "-g", &path_arg(&tst.join("golden")), "-p"]);

    result.unwrap();
    assert!(!hidden.exists());
    assert!(tst.join("work/2/c.jpg").is_file());
    assert_eq!(count_files(&tst), 5);
}

#[test]
fn test_no_golden_keeps_one_copy() {
    let dir = tempdir().unwrap();
    let tst = dir.path().join("tst");
    create_sample(&tst);

    let (result, report) = run(&["-w", &path_arg(&tst), "-p"]);

    result.unwrap();
    assert_eq!(count_files(&tst), 4);
    assert!(tst.join("golden/a.jpg").is_file());
    assert!(tst.join("golden/b.jpg").is_file());
    assert!(tst.join("work/1/.new.jpg").is_file());
    assert!(tst.join("work/unique.txt").is_file());
    assert!(!report.contains("files unchanged (golden)"));
    assert!(report.contains("Total duplicates: 7, keep: 3, skipped (in golden): 0, deleted: 4/4"));
}

#[test]
fn test_similar_names_are_not_nested() {
    let dir = tempdir().unwrap();
    let tst = dir.path().join("tst");
    let copy = dir.path().join("tst copy");
    create_sample(&tst);
    create_sample(&copy);

    let (result, _) = run(&["-w", &path_arg(&copy), "-g", &path_arg(&tst), "-p"]);

    result.unwrap();
    assert_eq!(count_files(&tst), SAMPLE_FILES);
    assert_eq!(count_files(&copy), 0);
}

#[test]
fn test_similar_names_other_way_around() {
    let dir = tempdir().unwrap();
    let tst = dir.path().join("tst");
    let copy = dir.path().join("tst copy");
    create_sample(&tst);
    create_sample(&copy);

    let (result, _) = run(&["-g", &path_arg(&copy), "-w", &path_arg(&tst), "-p"]);

    result.unwrap();
    assert_eq!(count_files(&tst), 0);
    assert_eq!(count_files(&copy), SAMPLE_FILES);
}

#[test]
fn test_skip_hidden_ignores_dot_files() {
    let dir = tempdir().unwrap();
    let tst = dir.path().join("tst");
    create_sample(&tst);

    let (result, report) = run(&["-w", &path_arg(&tst), "--skip-hidden", "-p"]);

    result.unwrap();
    assert!(tst.join("work/1/.new.jpg").is_file());
    assert!(tst.join("work/2/c.jpg").is_file());
    assert!(!report.contains(".new.jpg"));
}

#[test]
fn test_empty_files_grouped_unless_skipped() {
    let dir = tempdir().unwrap();
    let work = dir.path().join("work");
    fs::create_dir_all(work.join("x")).unwrap();
    fs::write(work.join("x/empty1"), b"").unwrap();
    fs::write(work.join("empty2"), b"").unwrap();
    fs::write(work.join("full"), b"not empty").unwrap();

    let (result, report) = run(&["-w", &path_arg(&work), "--skip-empty"]);
    result.unwrap();
    assert!(report.contains("Total duplicates: 0, keep: 0, skipped (in golden): 0, deleted: 0/0"));

    let (result, report) = run(&["-w", &path_arg(&work)]);
    result.unwrap();
    assert!(report.contains("Found 2 duplicate files (size: 0 B)"));
    assert!(report.contains("Total duplicates: 2, keep: 1, skipped (in golden): 0, deleted: 0/1"));
}

#[test]
fn test_missing_work_root_is_fatal() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");

    let (result, _) = run(&["-w", &path_arg(&missing)]);

    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::WorkNotFound(_))
    ));
}
