//! Storage Module.
//!
//! File system plumbing for sealed files and share files. Everything here is
//! plain I/O; confidentiality comes from the cipher layer.

pub mod raw_files;

use core::fmt;

/// Errors related to storage operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// File not found.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Target already exists and overwriting was not requested.
    AlreadyExists,
    /// IO error (generic).
    IoError,
    /// File exceeds the size accepted for its kind.
    TooLarge { len: u64, max: u64 },
    /// Invalid path or filename.
    InvalidPath,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotFound => write!(f, "File not found"),
            StorageError::PermissionDenied => write!(f, "Permission denied"),
            StorageError::AlreadyExists => write!(f, "File already exists"),
            StorageError::IoError => write!(f, "I/O error"),
            StorageError::TooLarge { len, max } => {
                write!(f, "File is {} bytes, limit is {}", len, max)
            }
            StorageError::InvalidPath => write!(f, "Invalid path"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageError::PermissionDenied,
            std::io::ErrorKind::AlreadyExists => StorageError::AlreadyExists,
            _ => {
                log::debug!("Unclassified I/O error: {}", err);
                StorageError::IoError
            }
        }
    }
}
