//! Filtered recursive directory copy
//!
//! Materialized packages are plain snapshots of a cache checkout, so the copy
//! skips excluded names (such as `.git`) at every depth instead of cloning the
//! directory wholesale.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Counters describing a completed copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files: usize,
    pub dirs: usize,
    pub symlinks: usize,
    pub bytes: u64,
}

/// Recursively copy `src` into `dst`, skipping entries named in `exclude`.
///
/// `dst` is created if missing. Exclusions match a single path component at
/// any depth. Symlinks are recreated as symlinks on Unix; elsewhere a link
/// pointing at a file is copied as that file and other links are skipped.
pub fn copy_tree_filtered(src: &Path, dst: &Path, exclude: &[&str]) -> Result<CopyStats> {
    if !src.is_dir() {
        return Err(Error::NotADirectory {
            path: src.to_path_buf(),
        });
    }
    reject_copy_into_self(src, dst)?;

    let mut stats = CopyStats::default();
    let mut pending: Vec<(PathBuf, PathBuf)> = vec![(src.to_path_buf(), dst.to_path_buf())];

    while let Some((from_dir, to_dir)) = pending.pop() {
        fs::create_dir_all(&to_dir).map_err(|e| Error::io(&to_dir, e))?;
        stats.dirs += 1;

        let mut entries = fs::read_dir(&from_dir)
            .map_err(|e| Error::io(&from_dir, e))?
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|e| Error::io(&from_dir, e))?;
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let name = entry.file_name();
            if exclude.iter().any(|ex| name.as_os_str() == *ex) {
                tracing::trace!(path = %entry.path().display(), "Skipping excluded entry");
                continue;
            }

            let from = entry.path();
            let to = to_dir.join(&name);
            let file_type = entry.file_type().map_err(|e| Error::io(&from, e))?;

            if file_type.is_symlink() {
                copy_symlink(&from, &to, &mut stats)?;
            } else if file_type.is_dir() {
                pending.push((from, to));
            } else {
                stats.bytes += fs::copy(&from, &to).map_err(|e| Error::io(&from, e))?;
                stats.files += 1;
            }
        }
    }

    Ok(stats)
}

/// Replace `dst` with a filtered copy of `src`.
///
/// The copy is built in a staging directory beside `dst` and swapped in only
/// once complete, so an interrupted copy never sits under the final name.
pub fn replace_tree(src: &Path, dst: &Path, exclude: &[&str]) -> Result<CopyStats> {
    let parent = dst.parent().unwrap_or_else(|| Path::new("."));
    let name = dst
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let staging = parent.join(format!(".{}.staging-{}", name, std::process::id()));

    remove_if_exists(&staging)?;
    let stats = match copy_tree_filtered(src, &staging, exclude) {
        Ok(stats) => stats,
        Err(e) => {
            let _ = fs::remove_dir_all(&staging);
            return Err(e);
        }
    };

    if let Err(e) = remove_if_exists(dst) {
        let _ = fs::remove_dir_all(&staging);
        return Err(e);
    }
    fs::rename(&staging, dst).map_err(|e| {
        let _ = fs::remove_dir_all(&staging);
        Error::io(dst, e)
    })?;

    Ok(stats)
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path).map_err(|e| Error::io(path, e)),
        Ok(_) => fs::remove_file(path).map_err(|e| Error::io(path, e)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(path, e)),
    }
}

fn reject_copy_into_self(src: &Path, dst: &Path) -> Result<()> {
    let src_canon = dunce::canonicalize(src).map_err(|e| Error::io(src, e))?;

    // dst usually does not exist yet; resolve through its nearest existing ancestor
    let mut existing = dst.to_path_buf();
    let mut tail = Vec::new();
    while !existing.exists() {
        match (existing.file_name(), existing.parent()) {
            (Some(name), Some(parent)) => {
                tail.push(name.to_os_string());
                existing = parent.to_path_buf();
            }
            _ => return Ok(()),
        }
    }
    let mut dst_canon = if existing.as_os_str().is_empty() {
        std::env::current_dir().map_err(|e| Error::io(dst, e))?
    } else {
        dunce::canonicalize(&existing).map_err(|e| Error::io(&existing, e))?
    };
    for name in tail.into_iter().rev() {
        dst_canon.push(name);
    }

    if dst_canon.starts_with(&src_canon) {
        return Err(Error::CopyIntoSelf {
            source_dir: src.to_path_buf(),
            destination: dst.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path, stats: &mut CopyStats) -> Result<()> {
    let target = fs::read_link(from).map_err(|e| Error::io(from, e))?;
    std::os::unix::fs::symlink(&target, to).map_err(|e| Error::io(to, e))?;
    stats.symlinks += 1;
    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path, stats: &mut CopyStats) -> Result<()> {
    match fs::metadata(from) {
        Ok(meta) if meta.is_file() => {
            stats.bytes += fs::copy(from, to).map_err(|e| Error::io(from, e))?;
            stats.files += 1;
        }
        _ => tracing::warn!(path = %from.display(), "Skipping symlink that does not point at a file"),
    }
    Ok(())
}
