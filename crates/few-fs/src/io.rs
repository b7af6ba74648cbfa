//! Atomic text I/O with file locking

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Write content atomically to a file with locking.
///
/// Writes to a temp file in the same directory and renames it over the
/// target, so readers see either the old or the new content. A symlink is
/// followed and its target rewritten, and an existing file keeps its
/// permissions.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = write_target(path.to_native())?;

    if let Some(parent) = native_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Same directory keeps the rename on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    if let Ok(existing) = fs::metadata(&native_path)
        && let Err(e) = temp_file.set_permissions(existing.permissions())
    {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(&temp_path, e));
    }

    let written = temp_file
        .write_all(content)
        .and_then(|_| temp_file.sync_all());
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(&temp_path, e));
    }

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;
    drop(temp_file);

    if let Err(e) = fs::rename(&temp_path, &native_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(&native_path, e));
    }

    Ok(())
}

/// The file a write to `path` should land in: the link target for a symlink.
fn write_target(path: PathBuf) -> Result<PathBuf> {
    match fs::symlink_metadata(&path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            let target = fs::read_link(&path).map_err(|e| Error::io(&path, e))?;
            let target = match path.parent() {
                Some(parent) if target.is_relative() => parent.join(target),
                _ => target,
            };
            // A dangling link is written through to where it points
            match dunce::canonicalize(&target) {
                Ok(resolved) => Ok(resolved),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(target),
                Err(e) => Err(Error::io(&target, e)),
            }
        }
        _ => Ok(path),
    }
}

/// Append text to a file under an exclusive lock, creating it if missing.
///
/// The file is opened in append mode, so symlinks and permissions are left
/// as they are.
pub fn append_text(path: &NormalizedPath, content: &str) -> Result<()> {
    let native_path = path.to_native();
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(&native_path)
        .map_err(|e| Error::io(&native_path, e))?;

    file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;
    let written = file
        .write_all(content.as_bytes())
        .and_then(|_| file.sync_all());
    let _ = file.unlock();
    written.map_err(|e| Error::io(&native_path, e))
}

/// Read text content, returning `None` when the file does not exist.
pub fn read_text_if_exists(path: &NormalizedPath) -> Result<Option<String>> {
    let native_path = path.to_native();
    match fs::read_to_string(&native_path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(&native_path, e)),
    }
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Create a directory and all of its parents.
///
/// Returns `true` when the directory did not exist before.
pub fn ensure_dir(path: &NormalizedPath) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    let native_path = path.to_native();
    fs::create_dir_all(&native_path).map_err(|e| Error::io(&native_path, e))?;
    Ok(true)
}

/// Remove a directory tree if it exists.
pub fn remove_dir_if_exists(path: &NormalizedPath) -> Result<()> {
    let native_path = path.to_native();
    match fs::remove_dir_all(&native_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(&native_path, e)),
    }
}
