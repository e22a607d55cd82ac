//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't leave a half-written file
//! behind on failure.

use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::error::LivrariaError;

/// Path of the temporary file used while writing `path`
///
/// The `.tmp` suffix is appended to the full name so the temporary file
/// never matches the pattern of the file being written.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Copy `src` to `dst` atomically (copy to temp, sync, then rename)
///
/// The destination is either the complete byte-identical copy or untouched.
/// Returns the number of bytes copied.
pub fn copy_atomic<S, D>(src: S, dst: D) -> Result<u64, LivrariaError>
where
    S: AsRef<Path>,
    D: AsRef<Path>,
{
    let src = src.as_ref();
    let dst = dst.as_ref();

    if !src.is_file() {
        return Err(LivrariaError::Io(format!(
            "Source file not found: {}",
            src.display()
        )));
    }

    let temp_path = temp_path_for(dst);

    let bytes = fs::copy(src, &temp_path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        LivrariaError::Io(format!(
            "Failed to copy {} to {}: {}",
            src.display(),
            temp_path.display(),
            e
        ))
    })?;

    // Sync to disk before rename
    File::open(&temp_path)
        .and_then(|f| f.sync_all())
        .map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            LivrariaError::Io(format!("Failed to sync {}: {}", temp_path.display(), e))
        })?;

    fs::rename(&temp_path, dst).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        LivrariaError::Io(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_is_byte_identical() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("livraria.db");
        let dst = temp_dir.path().join("copy.db");
        fs::write(&src, [0u8, 1, 2, 255, 254]).unwrap();

        let bytes = copy_atomic(&src, &dst).unwrap();

        assert_eq!(bytes, 5);
        assert_eq!(fs::read(&dst).unwrap(), fs::read(&src).unwrap());
    }

    #[test]
    fn test_no_temp_file_left() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("livraria.db");
        let dst = temp_dir.path().join("copy.db");
        fs::write(&src, "data").unwrap();

        copy_atomic(&src, &dst).unwrap();

        assert!(dst.exists());
        assert!(!temp_path_for(&dst).exists());
    }

    #[test]
    fn test_missing_source_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = copy_atomic(
            temp_dir.path().join("missing.db"),
            temp_dir.path().join("copy.db"),
        )
        .unwrap_err();

        assert!(err.is_io());
        assert!(!temp_dir.path().join("copy.db").exists());
    }

    #[test]
    fn test_missing_destination_dir_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("livraria.db");
        fs::write(&src, "data").unwrap();

        let err = copy_atomic(&src, temp_dir.path().join("nope").join("copy.db")).unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_temp_path_keeps_full_name() {
        let path = Path::new("/b/backup_livraria_2024-01-01-00-00-00.db");
        assert_eq!(
            temp_path_for(path),
            PathBuf::from("/b/backup_livraria_2024-01-01-00-00-00.db.tmp")
        );
    }
}
