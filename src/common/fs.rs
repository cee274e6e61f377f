use std::{fs, path::Path};

use anyhow::{bail, Context, Result};

/// Create the directory if it doesn’t exist; error if a non-directory exists there.
pub(crate) fn ensure_dir_exists(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            bail!("[common::fs] Path exists but is not a directory: {}", path.display());
        }
    } else {
        fs::create_dir_all(path)
            .with_context(|| format!("[common::fs] Failed to create directory {}", path.display()))?;
    }
    Ok(())
}

/// Error unless the directory already exists.
pub(crate) fn require_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("[common::fs] Data directory does not exist: {}", path.display());
    }
    if !path.is_dir() {
        bail!("[common::fs] Path exists but is not a directory: {}", path.display());
    }
    Ok(())
}

/// Error unless `path` is an existing regular file.
pub(crate) fn require_file_exists(path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!("[common::fs] Required data file is missing: {}", path.display());
    }
    Ok(())
}

/// Create the parent directory of an output file.
pub(crate) fn ensure_parent_exists(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir_exists(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guards() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("grid.csv");
        fs::write(&file, "a\n1\n").unwrap();

        assert!(require_dir_exists(dir.path()).is_ok());
        assert!(require_dir_exists(&file).is_err());
        assert!(require_file_exists(&file).is_ok());
        assert!(require_file_exists(&dir.path().join("missing.csv")).is_err());

        let nested = dir.path().join("out/maps/map.svg");
        ensure_parent_exists(&nested).unwrap();
        assert!(nested.parent().unwrap().is_dir());
        assert!(ensure_dir_exists(&file).is_err());
    }
}
