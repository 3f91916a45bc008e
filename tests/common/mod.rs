#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tox::index::INDEX_FILE;
use tox::Config;

/// Create a directory structure from a list of relative paths.
/// Paths ending with '/' create directories; others create empty files.
pub fn create_fixture(paths: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for p in paths {
        let full = tmp.path().join(p);
        if p.ends_with('/') {
            fs::create_dir_all(&full).unwrap();
        } else {
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&full, "").unwrap();
        }
    }
    tmp
}

/// Canonical path of a fixture, so comparisons survive symlinked temp dirs.
pub fn root_of(tmp: &TempDir) -> PathBuf {
    tmp.path().canonicalize().unwrap()
}

/// Write an index file into `dir` with one line per entry.
pub fn write_index(dir: &Path, lines: &[&str]) -> PathBuf {
    let path = dir.join(INDEX_FILE);
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(&path, content).unwrap();
    path
}

/// Raw lines of the index file in `dir`.
pub fn read_index(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join(INDEX_FILE))
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

/// Config bounded by `root` with `home` as fallback, ownership unchecked.
pub fn test_config(root: &Path, home: &Path) -> Config {
    Config::new(root, Some(home.to_path_buf())).with_owner_check(false)
}
