use assert_fs::prelude::*;
use few_fs::checksum::compute_tree_checksum;
use few_fs::{copy_tree_filtered, replace_tree};
use predicates::prelude::*;
use pretty_assertions::assert_eq;

fn package_fixture() -> assert_fs::TempDir {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("README.md").write_str("# demo\n").unwrap();
    temp.child("src/lib.rs").write_str("pub fn hello() {}\n").unwrap();
    temp.child("docs/guide/intro.md").write_str("intro").unwrap();
    temp.child(".git/HEAD").write_str("ref: refs/heads/main\n").unwrap();
    temp.child("vendor/sub/.git").write_str("gitdir: ../../.git/modules/sub\n").unwrap();
    temp.child("vendor/sub/file.txt").write_str("sub").unwrap();
    temp
}

#[test]
fn test_copy_excludes_git_metadata_at_every_depth() {
    let src = package_fixture();
    let out = assert_fs::TempDir::new().unwrap();
    let dst = out.child("demo");

    copy_tree_filtered(src.path(), dst.path(), &[".git"]).unwrap();

    dst.child("README.md").assert("# demo\n");
    dst.child("src/lib.rs").assert(predicate::path::exists());
    dst.child("docs/guide/intro.md").assert("intro");
    dst.child("vendor/sub/file.txt").assert("sub");
    dst.child(".git").assert(predicate::path::missing());
    dst.child("vendor/sub/.git").assert(predicate::path::missing());
}

#[test]
fn test_copy_reports_stats() {
    let src = package_fixture();
    let out = assert_fs::TempDir::new().unwrap();

    let stats = copy_tree_filtered(src.path(), &out.path().join("demo"), &[".git"]).unwrap();

    assert_eq!(stats.files, 4);
    assert_eq!(stats.dirs, 6);
    assert_eq!(stats.bytes, ("# demo\n".len() + "pub fn hello() {}\n".len() + 5 + 3) as u64);
}

#[test]
fn test_copy_is_byte_identical_apart_from_exclusions() {
    let src = package_fixture();
    let out = assert_fs::TempDir::new().unwrap();
    let dst = out.path().join("demo");

    copy_tree_filtered(src.path(), &dst, &[".git"]).unwrap();

    assert_eq!(
        compute_tree_checksum(src.path(), &[".git"]).unwrap(),
        compute_tree_checksum(&dst, &[]).unwrap()
    );
}

#[test]
fn test_replace_tree_drops_stale_files() {
    let src = package_fixture();
    let out = assert_fs::TempDir::new().unwrap();
    let dst = out.child("demo");
    dst.child("old-file.txt").write_str("stale").unwrap();

    replace_tree(src.path(), dst.path(), &[".git"]).unwrap();

    dst.child("old-file.txt").assert(predicate::path::missing());
    dst.child("README.md").assert("# demo\n");
}

#[test]
fn test_replace_tree_leaves_no_staging_directory() {
    let src = package_fixture();
    let out = assert_fs::TempDir::new().unwrap();

    replace_tree(src.path(), &out.path().join("demo"), &[".git"]).unwrap();
    replace_tree(src.path(), &out.path().join("demo"), &[".git"]).unwrap();

    let names: Vec<_> = std::fs::read_dir(out.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["demo".to_string()]);
}

#[test]
fn test_replace_tree_failure_keeps_previous_copy() {
    let out = assert_fs::TempDir::new().unwrap();
    let dst = out.child("demo");
    dst.child("keep.txt").write_str("previous").unwrap();

    let missing_source = out.path().join("no-such-cache-entry");
    assert!(replace_tree(&missing_source, dst.path(), &[".git"]).is_err());

    dst.child("keep.txt").assert("previous");
}

#[cfg(unix)]
#[test]
fn test_copy_preserves_symlinks() {
    let src = package_fixture();
    std::os::unix::fs::symlink("README.md", src.path().join("LINK.md")).unwrap();
    let out = assert_fs::TempDir::new().unwrap();
    let dst = out.path().join("demo");

    let stats = copy_tree_filtered(src.path(), &dst, &[".git"]).unwrap();

    assert_eq!(stats.symlinks, 1);
    let target = std::fs::read_link(dst.join("LINK.md")).unwrap();
    assert_eq!(target, std::path::PathBuf::from("README.md"));
}
