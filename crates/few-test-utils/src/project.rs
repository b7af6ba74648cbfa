//! [`TestProject`]: a throwaway consuming project plus its own cache root.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory holding a project root, a user cache root and a
/// directory for test remotes, all isolated from the real home directory.
///
/// # Example
///
/// ```rust,no_run
/// use few_test_utils::project::TestProject;
///
/// let project = TestProject::new();
/// project.write("README.md", "# Demo\n");
/// project.assert_file_exists("README.md");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        for dir in ["project", "home", "remotes"] {
            fs::create_dir_all(temp_dir.path().join(dir)).unwrap();
        }
        Self { temp_dir }
    }

    /// The consuming project's root directory.
    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join("project")
    }

    /// The user-level cache root (stands in for `~/.few`). Not created up front.
    pub fn cache_root(&self) -> PathBuf {
        self.temp_dir.path().join("home/.few")
    }

    /// A scratch directory for creating test remotes.
    pub fn remotes(&self) -> PathBuf {
        self.temp_dir.path().join("remotes")
    }

    /// Write `content` to `path` relative to the project root.
    pub fn write(&self, path: &str, content: &str) {
        let full_path = self.root().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }

    /// Read `path` relative to the project root.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read(&self, path: &str) -> String {
        let full_path = self.root().join(path);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    /// Snapshot every file under the project root as `(relative path, bytes)`.
    pub fn snapshot(&self) -> Vec<(String, Vec<u8>)> {
        let mut files = Vec::new();
        collect(&self.root(), &self.root(), &mut files);
        files.sort();
        files
    }

    /// Assert that `path` (relative to the project root) exists.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the project root) does **not** exist.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` contains `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = self.read(path);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            path,
            content,
            file_content
        );
    }

    /// Assert that `line` appears exactly `count` times as a whole line.
    pub fn assert_line_count(&self, path: &str, line: &str, count: usize) {
        let file_content = self.read(path);
        let actual = file_content.lines().filter(|l| l.trim() == line).count();
        assert_eq!(
            actual, count,
            "Expected {count} occurrence(s) of line {line:?} in {path}, found {actual}:\n{file_content}"
        );
    }
}

fn collect(root: &Path, dir: &Path, out: &mut Vec<(String, Vec<u8>)>) {
    for entry in fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        let path = entry.path();
        if entry.file_type().unwrap().is_dir() {
            out.push((relative(root, &path) + "/", Vec::new()));
            collect(root, &path, out);
        } else {
            out.push((relative(root, &path), fs::read(&path).unwrap()));
        }
    }
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap()
        .to_string_lossy()
        .replace('\\', "/")
}
