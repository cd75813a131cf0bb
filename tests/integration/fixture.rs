//! Sample tree shared by the integration tests.
//!
//! ```text
//! <root>/golden/a.jpg            A   mtime 100
//! <root>/golden/b.jpg            B   mtime 100
//! <root>/golden/sub/a_copy.jpg   A   mtime 200
//! <root>/work/1/a.jpg            A   mtime 300
//! <root>/work/1/.new.jpg         C   mtime 1000
//! <root>/work/2/b.jpg            B   mtime 300
//! <root>/work/2/c.jpg            C   mtime 2000
//! <root>/work/unique.txt         U   mtime 100
//! ```
//!
//! A and B have the same size and the same first KiB, so only the full
//! digest tells them apart. C and U have the same size but differ at once.

use dupurge::cli::Cli;
use dupurge::error::ExitCode;
use filetime::{set_file_mtime, FileTime};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

pub const SAMPLE_FILES: usize = 8;

pub fn content_a() -> Vec<u8> {
    vec![b'a'; 2048]
}

pub fn content_b() -> Vec<u8> {
    let mut data = content_a();
    data[2047] = b'b';
    data
}

pub fn write_file(path: &Path, data: &[u8], mtime: i64) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, data).unwrap();
    set_file_mtime(path, FileTime::from_unix_time(mtime, 0)).unwrap();
}

pub fn set_mtime(path: &Path, mtime: i64) {
    set_file_mtime(path, FileTime::from_unix_time(mtime, 0)).unwrap();
}

/// Populate `root` with the sample tree.
pub fn create_sample(root: &Path) {
    write_file(&root.join("golden/a.jpg"), &content_a(), 100);
    write_file(&root.join("golden/b.jpg"), &content_b(), 100);
    write_file(&root.join("golden/sub/a_copy.jpg"), &content_a(), 200);
    write_file(&root.join("work/1/a.jpg"), &content_a(), 300);
    write_file(&root.join("work/1/.new.jpg"), &[b'c'; 100], 1000);
    write_file(&root.join("work/2/b.jpg"), &content_b(), 300);
    write_file(&root.join("work/2/c.jpg"), &[b'c'; 100], 2000);
    write_file(&root.join("work/unique.txt"), &[b'u'; 100], 100);
}

/// Regular files under `dir`, hidden ones included.
pub fn count_files(dir: &Path) -> usize {
    if !dir.exists() {
        return 0;
    }
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .count()
}

/// Run the binary's logic with `args`, returning the result and the report.
pub fn run(args: &[&str]) -> (anyhow::Result<ExitCode>, String) {
    use clap::Parser;

    let mut argv = vec!["dupurge"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();

    let mut out = Vec::new();
    let result = dupurge::run_with_output(cli, &mut out);
    (result, String::from_utf8(out).unwrap())
}

pub fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
