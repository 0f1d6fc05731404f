//! Raw File Storage.
//!
//! Provides basic file system operations with security checks.
//!
//! # Security
//! - Ensures files are written atomically (write-sync-rename).
//! - Creates files owner-only (0600) on Unix.
//! - Bounds reads so a hostile path cannot exhaust memory.

use super::StorageError;

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Largest file `read_file` accepts (1 GiB).
pub const MAX_FILE_LEN: u64 = 1024 * 1024 * 1024;

/// Writes data to a file atomically.
///
/// The data goes to a sibling temp file that is synced and then renamed over
/// `path`, so readers see either the old contents or the new, never a mix.
pub fn write_atomic<P: AsRef<Path>>(path: P, data: &[u8]) -> Result<(), StorageError> {
    let path = path.as_ref();
    let temp_path = temp_sibling(path)?;

    let result = write_synced(&temp_path, data).and_then(|()| {
        fs::rename(&temp_path, path)?;
        Ok(())
    });
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn temp_sibling(path: &Path) -> Result<PathBuf, StorageError> {
    let filename = path.file_name().ok_or(StorageError::InvalidPath)?;
    let mut temp_path = path.to_path_buf();
    temp_path.set_file_name(format!(
        ".{}.{}.tmp",
        filename.to_string_lossy(),
        std::process::id()
    ));
    Ok(temp_path)
}

fn write_synced(path: &Path, data: &[u8]) -> Result<(), StorageError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(data)?;
    file.sync_all()?;
    Ok(())
}

/// Reads data from a file, up to [`MAX_FILE_LEN`] bytes.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, StorageError> {
    read_limited(path, MAX_FILE_LEN)
}

/// Reads data from a file no larger than `max` bytes.
pub fn read_limited<P: AsRef<Path>>(path: P, max: u64) -> Result<Vec<u8>, StorageError> {
    let file = File::open(path)?;
    let len = file.metadata()?.len();
    if len > max {
        return Err(StorageError::TooLarge { len, max });
    }

    // The length can change under us; never read past the cap.
    let mut buffer = Vec::with_capacity(len as usize);
    file.take(max.saturating_add(1)).read_to_end(&mut buffer)?;
    if buffer.len() as u64 > max {
        return Err(StorageError::TooLarge {
            len: buffer.len() as u64,
            max,
        });
    }
    Ok(buffer)
}

/// Checks if a file exists.
pub fn exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists()
}

/// Deletes a file.
pub fn delete<P: AsRef<Path>>(path: P) -> Result<(), StorageError> {
    if path.as_ref().exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "shamir_vault_storage_{}_{}",
            name,
            std::process::id()
        ));
        let _ = fs::create_dir_all(&dir);
        dir
    }

    #[test]
    fn test_atomic_write_read() {
        let dir = scratch_dir("atomic");
        let path = dir.join("test_atomic.bin");

        let data = b"Hello World";
        write_atomic(&path, data).unwrap();

        assert!(exists(&path));
        let read_data = read_file(&path).unwrap();
        assert_eq!(read_data, data);

        // Overwrite replaces the contents and leaves no temp file behind.
        write_atomic(&path, b"second").unwrap();
        assert_eq!(read_file(&path).unwrap(), b"second");
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);

        delete(&path).unwrap();
        assert!(!exists(&path));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_read_limit() {
        let dir = scratch_dir("limit");
        let path = dir.join("big.bin");
        write_atomic(&path, &[7u8; 100]).unwrap();

        assert_eq!(read_limited(&path, 100).unwrap().len(), 100);
        assert_eq!(
            read_limited(&path, 99),
            Err(StorageError::TooLarge { len: 100, max: 99 })
        );

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file() {
        let dir = scratch_dir("missing");
        assert_eq!(read_file(dir.join("nope")), Err(StorageError::NotFound));
        assert!(delete(dir.join("nope")).is_ok());
        let _ = fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn test_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = scratch_dir("perms");
        let path = dir.join("secret.bin");
        write_atomic(&path, b"x").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_rejects_path_without_filename() {
        assert_eq!(write_atomic("/", b"x"), Err(StorageError::InvalidPath));
    }
}
