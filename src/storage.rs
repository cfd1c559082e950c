//! Per-symbol download directories

use crate::codal::CodalError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Create `base/symbol` if needed and return it. Safe to call repeatedly.
pub fn ensure_symbol_dir(base: &Path, symbol: &str) -> Result<PathBuf, CodalError> {
    let dir = base.join(symbol);
    std::fs::create_dir_all(&dir)?;
    info!("Directory \"{}\" ready for \"{}\"", dir.display(), symbol);
    Ok(dir)
}

/// File names directly inside `dir`, without their extension.
pub fn existing_stems(dir: &Path) -> Result<HashSet<String>, CodalError> {
    let mut stems = HashSet::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        // Titles may contain dots, so only the last extension goes.
        if let Some(stem) = entry.path().file_stem() {
            stems.insert(stem.to_string_lossy().into_owned());
        }
    }

    debug!("Found {} existing files in {}", stems.len(), dir.display());
    Ok(stems)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_symbol_dir_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("Downloads");

        let first = ensure_symbol_dir(&base, "کاردان").unwrap();
        let second = ensure_symbol_dir(&base, "کاردان").unwrap();

        assert_eq!(first, second);
        assert!(first.is_dir());
        assert_eq!(first, base.join("کاردان"));
    }

    #[test]
    fn test_ensure_symbol_dir_fails_when_path_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("X"), b"not a directory").unwrap();

        assert!(ensure_symbol_dir(temp_dir.path(), "X").is_err());
    }

    #[test]
    fn test_existing_stems_strips_last_extension() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("X report 1.2 1001.pdf"), b"%PDF").unwrap();
        std::fs::write(temp_dir.path().join("X sheet 1003.xlsx"), b"PK").unwrap();
        std::fs::create_dir(temp_dir.path().join("nested.dir")).unwrap();
        std::fs::write(temp_dir.path().join("nested.dir").join("X deep 9.pdf"), b"").unwrap();

        let stems = existing_stems(temp_dir.path()).unwrap();

        assert_eq!(stems.len(), 2);
        assert!(stems.contains("X report 1.2 1001"));
        assert!(stems.contains("X sheet 1003"));
    }
}
