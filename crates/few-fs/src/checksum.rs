//! SHA-256 checksum utilities
//!
//! Checksums use the canonical `sha256:<hex>` format. Tree checksums cover
//! relative paths and file contents, so two directories with byte-identical
//! contents hash the same regardless of where they live.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::{Error, Result};

const PREFIX: &str = "sha256:";

/// Compute a checksum over every file beneath `root`.
///
/// Entries named in `exclude` are skipped at any depth, matching
/// [`copy_tree_filtered`](crate::copy_tree_filtered).
pub fn compute_tree_checksum(root: &Path, exclude: &[&str]) -> Result<String> {
    let mut files = Vec::new();
    collect_entries(root, Path::new(""), exclude, &mut files)?;
    files.sort();

    let mut hasher = Sha256::new();
    for relative in files {
        let full = root.join(&relative);
        let meta = fs::symlink_metadata(&full).map_err(|e| Error::io(&full, e))?;
        hasher.update(relative.to_string_lossy().replace('\\', "/").as_bytes());
        hasher.update([0u8]);
        if meta.file_type().is_symlink() {
            let target = fs::read_link(&full).map_err(|e| Error::io(&full, e))?;
            hasher.update(b"link:");
            hasher.update(target.to_string_lossy().as_bytes());
        } else {
            let content = fs::read(&full).map_err(|e| Error::io(&full, e))?;
            hasher.update((content.len() as u64).to_le_bytes());
            hasher.update(&content);
        }
    }
    Ok(format!("{}{:x}", PREFIX, hasher.finalize()))
}

fn collect_entries(
    root: &Path,
    relative: &Path,
    exclude: &[&str],
    out: &mut Vec<PathBuf>,
) -> Result<()> {
    let dir = root.join(relative);
    for entry in fs::read_dir(&dir).map_err(|e| Error::io(&dir, e))? {
        let entry = entry.map_err(|e| Error::io(&dir, e))?;
        let name = entry.file_name();
        if exclude.iter().any(|ex| name.as_os_str() == *ex) {
            continue;
        }
        let child = relative.join(&name);
        let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
        if file_type.is_dir() {
            collect_entries(root, &child, exclude, out)?;
        } else {
            out.push(child);
        }
    }
    Ok(())
}
