//! Output path resolution.

use crate::core::error::RetouchResult;
use std::path::{Path, PathBuf};

/// Pick the path the result is written to.
///
/// With `overwrite`, or when `path` does not exist yet, `path` is returned
/// unchanged. Otherwise the first free `name_1.ext`, `name_2.ext`, ... in
/// the same directory is returned.
pub fn resolve_output_path(path: &Path, overwrite: bool) -> PathBuf {
    if overwrite || !path.exists() {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path.extension().map(|e| e.to_string_lossy().into_owned());

    (1u64..)
        .map(|n| {
            let name = match &extension {
                Some(ext) => format!("{}_{}.{}", stem, n, ext),
                None => format!("{}_{}", stem, n),
            };
            path.with_file_name(name)
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Create missing parent directories and resolve the final output path.
pub fn prepare_output_path(path: &Path, overwrite: bool) -> RetouchResult<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(resolve_output_path(path, overwrite))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_free_path_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        assert_eq!(resolve_output_path(&path, false), path);
    }

    #[test]
    fn test_existing_path_gets_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        fs::write(&path, b"x").unwrap();
        assert_eq!(resolve_output_path(&path, false), dir.path().join("out_1.png"));

        fs::write(dir.path().join("out_1.png"), b"x").unwrap();
        assert_eq!(resolve_output_path(&path, false), dir.path().join("out_2.png"));

        assert_eq!(resolve_output_path(&path, true), path);
    }

    #[test]
    fn test_suffix_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result");
        fs::write(&path, b"x").unwrap();
        assert_eq!(resolve_output_path(&path, false), dir.path().join("result_1"));
    }

    #[test]
    fn test_prepare_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("out.jpg");
        let resolved = prepare_output_path(&path, false).unwrap();
        assert_eq!(resolved, path);
        assert!(dir.path().join("a").join("b").is_dir());
    }
}
