//! Detection followed by resolution, without the CLI shell.

use super::fixture::{create_sample, write_file};
use dupurge::duplicates::detect;
use dupurge::output::TextReporter;
use dupurge::resolution::{
    check_roots, resolve, Deletion, GroupHeader, GroupReporter, NullReporter, ResolvedMember,
    Resolver, Tag,
};
use dupurge::scanner::{Walker, WalkerConfig};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

#[derive(Default)]
struct Recorder {
    headers: Vec<GroupHeader>,
    members: Vec<(PathBuf, Tag, Deletion)>,
}

impl GroupReporter for Recorder {
    fn on_group(&mut self, header: &GroupHeader) {
        self.headers.push(header.clone());
    }

    fn on_member(&mut self, member: &ResolvedMember) {
        self.members
            .push((member.path.clone(), member.tag, member.deletion.clone()));
    }
}

fn walk_all(roots: &[&Path]) -> Vec<PathBuf> {
    roots
        .iter()
        .flat_map(|root| {
            Walker::new(root, WalkerConfig::default())
                .walk()
                .filter_map(Result::ok)
                .collect::<Vec<_>>()
        })
        .collect()
}

#[test]
fn test_golden_members_never_deleted() {
    let dir = tempdir().unwrap();
    create_sample(dir.path());
    let roots = check_roots(&dir.path().join("work"), Some(&dir.path().join("golden"))).unwrap();
    let groups = detect(walk_all(&[roots.work(), roots.golden().unwrap()])).unwrap();

    let mut recorder = Recorder::default();
    let stats = Resolver::from_roots(&roots)
        .with_purge(true)
        .resolve(groups, &mut recorder)
        .unwrap();

    for (path, tag, deletion) in &recorder.members {
        if roots.is_golden(path) {
            assert_ne!(*tag, Tag::Delete, "{} tagged Delete", path.display());
            assert!(path.exists());
        }
        if *tag == Tag::Delete {
            assert_eq!(*deletion, Deletion::Deleted);
            assert!(!path.exists());
        }
    }
    assert!(stats.is_consistent());
    assert_eq!(stats.deleted, stats.to_delete);
}

#[test]
fn test_one_keep_per_group() {
    let dir = tempdir().unwrap();
    create_sample(dir.path());
    let groups = detect(walk_all(&[dir.path()])).unwrap();
    let group_count = groups.len();

    let mut recorder = Recorder::default();
    let stats = resolve(groups, None, false, &mut recorder).unwrap();

    assert_eq!(recorder.headers.len(), group_count);
    let keeps = recorder.members.iter().filter(|(_, t, _)| *t == Tag::Keep).count();
    assert_eq!(keeps, group_count);
    assert_eq!(stats.keep, group_count);
    assert_eq!(stats.skip + stats.to_delete, stats.total - group_count);
}

#[test]
fn test_groups_reported_largest_first() {
    let dir = tempdir().unwrap();
    create_sample(dir.path());
    let groups = detect(walk_all(&[dir.path()])).unwrap();

    let mut recorder = Recorder::default();
    resolve(groups, None, false, &mut recorder).unwrap();

    let order: Vec<_> = recorder.headers.iter().map(|h| (h.size, h.count)).collect();
    assert_eq!(order, vec![(2048, 3), (2048, 2), (100, 2)]);
    let positions: Vec<_> = recorder.headers.iter().map(|h| h.position).collect();
    assert_eq!(positions, vec![1, 2, 3]);
}

#[test]
fn test_work_only_older_kept_newer_deleted() {
    let dir = tempdir().unwrap();
    let older = dir.path().join("a.txt");
    let newer = dir.path().join("b.txt");
    write_file(&older, b"identical", 1_000);
    write_file(&newer, b"identical", 2_000);

    let groups = detect(vec![newer.clone(), older.clone()]).unwrap();
    let stats = resolve(groups, None, true, &mut NullReporter).unwrap();

    assert!(older.exists());
    assert!(!newer.exists());
    assert_eq!((stats.keep, stats.to_delete, stats.deleted), (1, 1, 1));
}

#[test]
fn test_text_report_for_sample() {
    let dir = tempdir().unwrap();
    create_sample(dir.path());
    let roots = check_roots(&dir.path().join("work"), Some(&dir.path().join("golden"))).unwrap();
    let groups = detect(walk_all(&[roots.work(), roots.golden().unwrap()])).unwrap();

    let mut reporter = TextReporter::new(Vec::new(), false);
    Resolver::from_roots(&roots)
        .resolve(groups, &mut reporter)
        .unwrap();
    let report = String::from_utf8(reporter.finish().unwrap()).unwrap();

    assert!(report.contains("(1) Found 3 duplicate files (size: "));
    assert!(report.contains(" 1:  K 'golden/a.jpg' ["));
    assert!(report.contains(" 2:  S 'golden/sub/a_copy.jpg' ["));
    assert!(report.contains(" 3: *D 'work/1/a.jpg' ["));
    assert!(report.contains("(3) Found 2 duplicate files (size: 100 B) in '"));
    assert!(report.contains(" 1:  K '1/.new.jpg' ["));
    assert!(report.contains(" 2: *D '2/c.jpg' ["));
}

#[test]
fn test_copy_vanishing_after_detection_leaves_a_survivor() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    let c = dir.path().join("c");
    write_file(&a, b"same content", 1_000);
    write_file(&b, b"same content", 2_000);
    write_file(&c, b"same content", 3_000);

    let groups = detect(walk_all(&[dir.path()])).unwrap();
    assert_eq!(groups.len(), 1);
    std::fs::remove_file(&a).unwrap();

    let stats = resolve(groups, None, true, &mut NullReporter).unwrap();

    let survivors = [&a, &b, &c].iter().filter(|p| p.exists()).count();
    assert_eq!(survivors, 1);
    assert!(b.exists());
    assert_eq!(stats.deleted + stats.failed, stats.to_delete);
}
