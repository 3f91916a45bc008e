mod common;

use common::{create_fixture, root_of, test_config, write_index};
use std::path::PathBuf;
use tox::index::INDEX_FILE;
use tox::{Config, IndexChainLoader, IndexLocator, ToxError};

/// Fixture: <root>/home with an index, <root>/work with an index,
/// <root>/work/proj with an index, and an unindexed <root>/other.
fn layout() -> (tempfile::TempDir, PathBuf) {
    let tmp = create_fixture(&["home/", "work/proj/sub/", "other/deep/"]);
    let root = root_of(&tmp);
    write_index(&root.join("home"), &["notes"]);
    write_index(&root.join("work"), &["proj", "tools"]);
    write_index(&root.join("work/proj"), &["sub"]);
    (tmp, root)
}

// --- Locator ---

#[test]
fn test_locate_nearest_ancestor() {
    let (_tmp, root) = layout();
    let cfg = test_config(&root, &root.join("home"));
    let found = IndexLocator::new(&cfg)
        .locate(&root.join("work/proj/sub"))
        .unwrap();
    assert_eq!(found, Some(root.join("work/proj").join(INDEX_FILE)));
}

#[test]
fn test_locate_falls_back_to_home() {
    let (_tmp, root) = layout();
    let cfg = test_config(&root, &root.join("home"));
    let found = IndexLocator::new(&cfg)
        .locate(&root.join("other/deep"))
        .unwrap();
    assert_eq!(found, Some(root.join("home").join(INDEX_FILE)));
}

#[test]
fn test_locate_at_root_still_falls_back() {
    let (_tmp, root) = layout();
    let cfg = test_config(&root, &root.join("home"));
    let found = IndexLocator::new(&cfg).locate(&root).unwrap();
    assert_eq!(found, Some(root.join("home").join(INDEX_FILE)));
}

#[test]
fn test_locate_outside_boundary_goes_home() {
    let (_tmp, root) = layout();
    let cfg = test_config(&root.join("work"), &root.join("home"));
    let found = IndexLocator::new(&cfg)
        .locate(&root.join("other/deep"))
        .unwrap();
    assert_eq!(found, Some(root.join("home").join(INDEX_FILE)));
}

#[test]
fn test_locate_not_found() {
    let tmp = create_fixture(&["home/", "a/b/"]);
    let root = root_of(&tmp);
    let cfg = test_config(&root, &root.join("home"));
    assert_eq!(IndexLocator::new(&cfg).locate(&root.join("a/b")).unwrap(), None);

    let no_home = Config::new(&root, None).with_owner_check(false);
    assert_eq!(IndexLocator::new(&no_home).locate(&root.join("a/b")).unwrap(), None);
}

#[test]
#[cfg(unix)]
fn test_locate_with_owner_check() {
    let (_tmp, root) = layout();
    let cfg = Config::new(&root, Some(root.join("home")));
    assert!(cfg.require_owner_match);
    let found = IndexLocator::new(&cfg).locate(&root.join("work")).unwrap();
    assert_eq!(found, Some(root.join("work").join(INDEX_FILE)));
}

#[test]
#[cfg(unix)]
fn test_locate_skips_foreign_owner() {
    let (_tmp, root) = layout();
    let mut cfg = Config::new(&root, Some(root.join("home")));
    cfg.user = cfg.user.map(|uid| uid.wrapping_add(1));
    let found = IndexLocator::new(&cfg).locate(&root.join("work")).unwrap();
    assert_eq!(found, None);
}

// --- Chain loader ---

#[test]
fn test_chain_shallow_has_no_outer() {
    let (_tmp, root) = layout();
    let cfg = test_config(&root, &root.join("home"));
    let store = IndexChainLoader::new(&cfg)
        .load(&root.join("work/proj/sub"), false)
        .unwrap()
        .unwrap();
    assert_eq!(store.root(), root.join("work/proj"));
    assert!(store.outer().is_none());
}

#[test]
fn test_chain_deep_links_outward_to_home() {
    let (_tmp, root) = layout();
    let cfg = test_config(&root, &root.join("home"));
    let store = IndexChainLoader::new(&cfg)
        .load(&root.join("work/proj/sub"), true)
        .unwrap()
        .unwrap();
    let roots: Vec<PathBuf> = store.chain().map(|s| s.root().to_path_buf()).collect();
    assert_eq!(
        roots,
        vec![root.join("work/proj"), root.join("work"), root.join("home")]
    );
}

#[test]
fn test_chain_stops_at_home() {
    let (_tmp, root) = layout();
    let cfg = test_config(&root, &root.join("home"));
    let store = IndexChainLoader::new(&cfg)
        .load(&root.join("home"), true)
        .unwrap()
        .unwrap();
    assert_eq!(store.chain().count(), 1);
}

#[test]
fn test_chain_no_index_is_none() {
    let tmp = create_fixture(&["home/", "x/"]);
    let root = root_of(&tmp);
    let cfg = test_config(&root, &root.join("home"));
    assert!(IndexChainLoader::new(&cfg)
        .load(&root.join("x"), true)
        .unwrap()
        .is_none());
}

#[test]
fn test_chain_rejects_non_directory() {
    let tmp = create_fixture(&["file.txt"]);
    let root = root_of(&tmp);
    let cfg = test_config(&root, &root);
    let err = IndexChainLoader::new(&cfg)
        .load(&root.join("file.txt"), false)
        .unwrap_err();
    assert!(matches!(err, ToxError::NotADirectory(_)));
}
