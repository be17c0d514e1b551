//! Temporary directory helpers
//!
//! RAII wrapper for scratch directories holding throwaway calendar stores
//! and config files in tests.

use std::path::{Path, PathBuf};
use std::{fs, io};

/// Temporary directory that is automatically deleted when dropped
///
/// # Examples
///
/// ```
/// use calbridge_common::testing::TempDir;
///
/// let temp_dir = TempDir::new("calendar-store").unwrap();
/// let db_path = temp_dir.path().join("calendar.db");
/// assert!(db_path.starts_with(temp_dir.path()));
/// ```
#[derive(Debug)]
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    /// Create a new temporary directory with a prefix
    pub fn new(prefix: &str) -> io::Result<Self> {
        let path = std::env::temp_dir().join(format!("{}-{}", prefix, uuid::Uuid::new_v4()));
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    /// Get the path to the temporary directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a file in the temporary directory
    pub fn create_file(&self, name: &str, contents: &str) -> io::Result<PathBuf> {
        let file_path = self.path.join(name);
        fs::write(&file_path, contents)?;
        Ok(file_path)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_dir_all(&self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_directory_on_drop() {
        let temp_dir = TempDir::new("calbridge-temp").unwrap();
        let file = temp_dir.create_file("config.toml", "time_zone = \"UTC\"").unwrap();
        let path = temp_dir.path().to_path_buf();
        assert!(file.exists());

        drop(temp_dir);
        assert!(!path.exists());
    }
}
