mod common;

use assert_cmd::Command;
use common::{create_fixture, read_index, root_of, write_index};
use predicates::prelude::*;
use std::path::Path;

/// `tox` confined to `root`, with `root/home` as HOME.
fn tox(root: &Path, cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tox").unwrap();
    cmd.current_dir(cwd)
        .env("HOME", root.join("home"))
        .env("TOX_ROOT", root)
        .env_remove("TOX_LOG")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_help_flag() {
    Command::cargo_bin("tox")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Directory bookmarks"))
        .stdout(predicate::str::contains("--add"))
        .stdout(predicate::str::contains("--clean"))
        .stdout(predicate::str::contains("--grep"))
        .stdout(predicate::str::contains("Examples:"));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("tox")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tox"));
}

#[test]
fn test_init_add_and_resolve() {
    let tmp = create_fixture(&["home/", "work/alpha/", "work/beta/"]);
    let root = root_of(&tmp);
    let work = root.join("work");

    tox(&root, &work).arg("--init").assert().success();
    tox(&root, &work).args(["-a", "alpha"]).assert().success();
    tox(&root, &work)
        .args(["-a", "alpha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already present"));
    tox(&root, &work).args(["-a", "beta"]).assert().success();
    assert_eq!(read_index(&work), vec!["alpha", "beta"]);

    tox(&root, &work)
        .arg("alp")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("{}\n", work.join("alpha").display())));

    tox(&root, &work)
        .args(["-p", "a"])
        .assert()
        .success()
        .stdout("alpha\nbeta\n");

    tox(&root, &work)
        .args(["a", "-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("beta"));
}

#[test]
fn test_no_match_exits_nonzero() {
    let tmp = create_fixture(&["home/", "work/"]);
    let root = root_of(&tmp);
    let work = root.join("work");
    write_index(&work, &[]);

    tox(&root, &work)
        .arg("nothing")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing"));
}

#[test]
fn test_ambiguous_with_closed_stdin_cancels() {
    let tmp = create_fixture(&["home/", "work/a1/", "work/a2/"]);
    let root = root_of(&tmp);
    let work = root.join("work");
    write_index(&work, &["a1", "a2"]);

    tox(&root, &work)
        .arg("a")
        .write_stdin("")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());

    tox(&root, &work)
        .arg("a")
        .write_stdin("x\n2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("a2"))
        .stderr(predicate::str::contains("'x' is not a number"));
}

#[test]
fn test_clean_reports_removed() {
    let tmp = create_fixture(&["home/", "work/keep/"]);
    let root = root_of(&tmp);
    let work = root.join("work");
    write_index(&work, &["gone", "keep"]);

    tox(&root, &work)
        .arg("--clean")
        .assert()
        .success()
        .stdout("removed gone\n");
    assert_eq!(read_index(&work), vec!["keep"]);
}

#[test]
fn test_remove_protected_index_fails() {
    let tmp = create_fixture(&["home/", "work/"]);
    let root = root_of(&tmp);
    let work = root.join("work");

    tox(&root, &work).arg("--init-protected").assert().success();
    tox(&root, &work)
        .arg("--remove-index")
        .assert()
        .failure()
        .stderr(predicate::str::contains("protected"));
}

#[test]
fn test_mutation_without_index_fails() {
    let tmp = create_fixture(&["home/", "work/"]);
    let root = root_of(&tmp);
    tox(&root, &root.join("work"))
        .arg("-a")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no index"));
}
