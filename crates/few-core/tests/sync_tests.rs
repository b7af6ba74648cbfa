//! Tests for the SyncEngine

use few_core::{CacheStatus, Error, LitanyOutcome, Settings, SyncEngine, VcsBackend};
use few_fs::NormalizedPath;
use few_fs::checksum::compute_tree_checksum;
use few_test_utils::fake::FakeVcs;
use few_test_utils::git::{commit_files, remote_repo};
use few_test_utils::project::TestProject;
use pretty_assertions::assert_eq;
use std::fs;

const BAR_URL: &str = "https://github.com/foo/bar.git";
const ALPHA_URL: &str = "https://github.com/peterbaileyct/alpha.git";
const BETA_URL: &str = "https://github.com/peterbaileyct/beta.git";

fn engine(project: &TestProject, vcs: &FakeVcs) -> SyncEngine {
    let settings = Settings::new(NormalizedPath::new(project.cache_root()));
    SyncEngine::new(settings, Box::new(vcs.clone()))
}

fn root(project: &TestProject) -> NormalizedPath {
    NormalizedPath::new(project.root())
}

#[test]
fn test_listen_package_on_empty_project() {
    let project = TestProject::new();
    let vcs = FakeVcs::new();
    vcs.publish(BAR_URL, &[("README.md", "# bar\n"), ("src/lib.txt", "words")]);

    let report = engine(&project, &vcs)
        .listen_package(&root(&project), "foo/bar")
        .unwrap();

    assert_eq!(report.package.name, "bar");
    assert_eq!(report.package.remote_url, BAR_URL);
    assert_eq!(report.package.cache, CacheStatus::Cloned);
    assert!(report.package.manifest_updated);
    assert!(!report.init.is_noop());

    project.assert_file_exists("PARSEME.md");
    project.assert_file_contains("README.md", "read PARSEME.md");
    project.assert_line_count(".gitignore", ".few/", 1);
    project.assert_line_count(".gitignore", "few.litany.yaml", 1);
    assert_eq!(project.read("few.litany.yaml"), "words:\n- foo/bar\n");
    assert_eq!(project.read(".few/words/bar/src/lib.txt"), "words");
    project.assert_file_not_exists(".few/words/bar/.git");
    assert!(project.cache_root().join("words/bar/.git").is_dir());
}

#[test]
fn test_listen_package_twice_appends_once_and_pulls() {
    let project = TestProject::new();
    let vcs = FakeVcs::new();
    vcs.publish(BAR_URL, &[("a.txt", "v1")]);
    let engine = engine(&project, &vcs);

    engine.listen_package(&root(&project), "foo/bar").unwrap();
    vcs.publish(BAR_URL, &[("b.txt", "v2")]);
    let second = engine.listen_package(&root(&project), "foo/bar").unwrap();

    assert!(!second.package.manifest_updated);
    assert!(second.init.is_noop());
    assert_eq!(second.package.cache, CacheStatus::Updated);
    assert_eq!(vcs.clone_count(), 1);
    project.assert_line_count("few.litany.yaml", "- foo/bar", 1);
    // previous copy replaced wholesale
    project.assert_file_not_exists(".few/words/bar/a.txt");
    assert_eq!(project.read(".few/words/bar/b.txt"), "v2");
}

#[test]
fn test_materialized_copy_matches_cache_entry() {
    let project = TestProject::new();
    let vcs = FakeVcs::new();
    vcs.publish(
        BAR_URL,
        &[
            ("README.md", "# bar\n"),
            ("nested/deep/file.bin", "\u{0}\u{1}binary"),
            ("nested/.hidden", "dot"),
        ],
    );

    let report = engine(&project, &vcs)
        .listen_package(&root(&project), "foo/bar")
        .unwrap();

    let cached = compute_tree_checksum(&project.cache_root().join("words/bar"), &[".git"]).unwrap();
    assert_eq!(report.package.checksum, cached);
    assert_eq!(report.package.files, 3);
}

#[test]
fn test_invalid_token_fails_after_init() {
    let project = TestProject::new();
    let vcs = FakeVcs::new();

    let err = engine(&project, &vcs)
        .listen_package(&root(&project), "a/b/c")
        .unwrap_err();

    assert!(err.is_invalid_identifier(), "{err:?}");
    // initialization is not rolled back, and nothing was declared
    assert_eq!(project.read("few.litany.yaml"), "words: []\n");
    assert!(vcs.calls().is_empty());
}

#[test]
fn test_failed_fetch_keeps_manifest_entry() {
    let project = TestProject::new();
    let vcs = FakeVcs::new();
    vcs.fail_clone(BAR_URL);

    let err = engine(&project, &vcs)
        .listen_package(&root(&project), "foo/bar")
        .unwrap_err();

    assert!(matches!(err, Error::FetchError { .. }), "{err:?}");
    project.assert_line_count("few.litany.yaml", "- foo/bar", 1);
    project.assert_file_not_exists(".few/words/bar");
    assert!(!project.cache_root().join("words/bar").exists());
}

#[test]
fn test_stale_entry_is_materialized_with_warning() {
    let project = TestProject::new();
    let vcs = FakeVcs::new();
    vcs.publish(BAR_URL, &[("a.txt", "v1")]);
    let engine = engine(&project, &vcs);
    engine.listen_package(&root(&project), "foo/bar").unwrap();

    vcs.fail_pull(BAR_URL);
    let report = engine.listen_package(&root(&project), "foo/bar").unwrap();

    assert!(report.package.cache.is_stale());
    assert_eq!(report.package.warnings.len(), 1);
    assert_eq!(project.read(".few/words/bar/a.txt"), "v1");
}

#[test]
fn test_litany_collects_failures() {
    let project = TestProject::new();
    project.write("few.litany.yaml", "words:\n  - alpha\n  - beta\n");
    let vcs = FakeVcs::new();
    vcs.publish(ALPHA_URL, &[("alpha.md", "alpha")]);
    vcs.fail_clone(BETA_URL);

    let report = engine(&project, &vcs).litany(&root(&project)).unwrap();

    assert!(!report.success());
    assert_eq!(
        report.outcomes.iter().map(LitanyOutcome::token).collect::<Vec<_>>(),
        vec!["alpha", "beta"]
    );
    assert_eq!(report.synced().count(), 1);
    assert!(matches!(
        &report.outcomes[1],
        LitanyOutcome::Failed { token, invalid_identifier: false, .. } if token == "beta"
    ));
    assert_eq!(project.read(".few/words/alpha/alpha.md"), "alpha");
    project.assert_file_not_exists(".few/words/beta");
}

#[test]
fn test_litany_continues_past_invalid_tokens_in_order() {
    let project = TestProject::new();
    project.write("few.litany.yaml", "words:\n- a/b/c\n- alpha\n");
    let vcs = FakeVcs::new();
    vcs.publish(ALPHA_URL, &[("x", "x")]);

    let report = engine(&project, &vcs).litany(&root(&project)).unwrap();

    assert!(matches!(
        &report.outcomes[0],
        LitanyOutcome::Failed { invalid_identifier: true, .. }
    ));
    assert!(matches!(&report.outcomes[1], LitanyOutcome::Synced(_)));
}

#[test]
fn test_litany_without_manifest_creates_it() {
    let project = TestProject::new();
    let vcs = FakeVcs::new();

    let report = engine(&project, &vcs).litany(&root(&project)).unwrap();

    assert!(report.success());
    assert!(report.outcomes.is_empty());
    assert_eq!(project.read("few.litany.yaml"), "words: []\n");
}

#[test]
fn test_litany_does_not_append() {
    let project = TestProject::new();
    let manifest = "# deps\nwords:\n  - alpha\n";
    project.write("few.litany.yaml", manifest);
    let vcs = FakeVcs::new();
    vcs.publish(ALPHA_URL, &[("x", "x")]);

    engine(&project, &vcs).litany(&root(&project)).unwrap();

    assert_eq!(project.read("few.litany.yaml"), manifest);
}

#[test]
fn test_litany_malformed_manifest_fails_whole_run() {
    let project = TestProject::new();
    project.write("few.litany.yaml", "words: nope\n");
    let vcs = FakeVcs::new();

    let err = engine(&project, &vcs).litany(&root(&project)).unwrap_err();

    assert!(matches!(err, Error::ManifestError { .. }), "{err:?}");
    assert!(vcs.calls().is_empty());
}

#[test]
fn test_listen_init_is_idempotent() {
    let project = TestProject::new();
    let vcs = FakeVcs::new();
    let engine = engine(&project, &vcs);

    engine.listen_init(&root(&project)).unwrap();
    let once = project.snapshot();
    let again = engine.listen_init(&root(&project)).unwrap();

    assert!(again.is_noop());
    assert_eq!(project.snapshot(), once);
    assert!(vcs.calls().is_empty());
}

#[test]
fn test_missing_project_root_is_rejected() {
    let project = TestProject::new();
    let vcs = FakeVcs::new();
    let missing = NormalizedPath::new(project.root().join("nope"));

    assert!(engine(&project, &vcs).listen_init(&missing).is_err());
    assert!(!project.root().join("nope").exists());
}

#[test]
fn test_preflight_reports_unavailable_client() {
    let project = TestProject::new();
    let vcs = FakeVcs::new();
    vcs.set_unavailable();

    let err = engine(&project, &vcs).preflight().unwrap_err();

    assert!(matches!(err, Error::PreflightError { .. }));
    assert!(!project.cache_root().exists());
}

#[test]
fn test_report_serializes_to_json() {
    let project = TestProject::new();
    let vcs = FakeVcs::new();
    vcs.publish(BAR_URL, &[("a", "a")]);

    let report = engine(&project, &vcs)
        .listen_package(&root(&project), "foo/bar")
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["package"]["name"], "bar");
    assert_eq!(json["package"]["cache"]["status"], "cloned");
    assert_eq!(json["init"]["actions"][0]["action"], "created_parseme");
}

#[test]
fn test_real_git_clone_then_pull() {
    let project = TestProject::new();
    let url = remote_repo(&project.remotes(), "tool", &[("README.md", "v1\n")]);
    let settings = Settings::new(NormalizedPath::new(project.cache_root()))
        .with_backend(VcsBackend::Cli);
    let engine = SyncEngine::from_settings(settings, None);
    engine.preflight().unwrap();

    let first = engine.listen_package(&root(&project), &url).unwrap();
    assert_eq!(first.package.name, "tool");
    assert_eq!(first.package.cache, CacheStatus::Cloned);
    assert_eq!(project.read(".few/words/tool/README.md"), "v1\n");
    project.assert_file_not_exists(".few/words/tool/.git");

    commit_files(&project.remotes().join("tool"), &[("README.md", "v2\n")], "Update");
    let report = engine.litany(&root(&project)).unwrap();

    assert!(report.success());
    let synced: Vec<_> = report.synced().collect();
    assert_eq!(synced[0].cache, CacheStatus::Updated);
    assert_eq!(project.read(".few/words/tool/README.md"), "v2\n");
    assert_eq!(
        fs::read_to_string(project.cache_root().join("words/tool/README.md")).unwrap(),
        "v2\n"
    );
}
