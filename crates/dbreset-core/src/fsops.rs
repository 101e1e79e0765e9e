//! Filesystem primitives for the reset procedure
//!
//! Ordered copy, idempotent delete, and rename with operation context on
//! every failure.

use crate::errors::{fs_error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Recursively copy a directory tree, creating `dst` if needed
///
/// Existing files under `dst` are overwritten. Entries are visited in
/// name order so repeated runs produce identical logs.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst).map_err(|e| fs_error("create_dir", dst, e))?;

    let mut entries: Vec<fs::DirEntry> = fs::read_dir(src)
        .map_err(|e| fs_error("read_dir", src, e))?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| fs_error("read_dir", src, e))?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let entry_path = entry.path();
        let target = dst.join(entry.file_name());
        let file_type = entry
            .file_type()
            .map_err(|e| fs_error("stat", &entry_path, e))?;

        if file_type.is_dir() {
            copy_dir_recursive(&entry_path, &target)?;
        } else {
            fs::copy(&entry_path, &target).map_err(|e| fs_error("copy_file", &entry_path, e))?;
        }
    }

    Ok(())
}

/// Recursively delete a directory; an already-absent path is success
pub fn remove_dir_idempotent(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(fs_error("remove_dir", path, e)),
    }
}

/// Immediate child directories of `path`, sorted by name
pub fn list_subdirectories(path: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = Vec::new();

    let entries = fs::read_dir(path)
        .map_err(|e| fs_error("read_dir", path, e))?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| fs_error("read_dir", path, e))?;

    for entry in entries {
        let entry_path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| fs_error("stat", &entry_path, e))?;
        if file_type.is_dir() {
            dirs.push(entry_path);
        }
    }

    dirs.sort();
    Ok(dirs)
}

/// Copy a single file, overwriting the destination if present
pub fn copy_file_overwrite(src: &Path, dst: &Path) -> Result<u64> {
    fs::copy(src, dst).map_err(|e| fs_error("copy_file", src, e))
}

/// Rename a path, with context on failure
pub fn rename(src: &Path, dst: &Path) -> Result<()> {
    fs::rename(src, dst).map_err(|e| fs_error("rename", src, e))
}
