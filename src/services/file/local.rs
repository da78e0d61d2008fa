//! Local filesystem provider.

use std::fs;
use std::path::{Path, PathBuf};

use super::provider::{DirEntry, FileError, FileProvider, Result};

#[derive(Debug, Default)]
pub struct LocalFileProvider;

impl LocalFileProvider {
    pub fn new() -> Self {
        Self
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = std::ffi::OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".tmp~");
    path.with_file_name(name)
}

impl FileProvider for LocalFileProvider {
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).map_err(|e| FileError::from_io(e, path))? {
            let entry = entry.map_err(|e| FileError::from_io(e, path))?;
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            entries.push(DirEntry {
                path: entry.path(),
                name: entry.file_name(),
                is_dir,
            });
        }
        Ok(entries)
    }

    fn read_file(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| FileError::from_io(e, path))
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        let tmp = temp_sibling(path);
        fs::write(&tmp, content).map_err(|e| FileError::from_io(e, path))?;
        match fs::rename(&tmp, path) {
            Ok(()) => Ok(()),
            Err(e) => {
                let _ = fs::remove_file(&tmp);
                Err(FileError::from_io(e, path))
            }
        }
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        fs::create_dir(path).map_err(|e| FileError::from_io(e, path))
    }

    fn delete_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|e| FileError::from_io(e, path))
    }

    fn delete_dir(&self, path: &Path) -> Result<()> {
        fs::remove_dir(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::DirectoryNotEmpty => FileError::NotEmpty(path.to_path_buf()),
            _ => FileError::from_io(e, path),
        })
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        if to.exists() {
            return Err(FileError::AlreadyExists(to.to_path_buf()));
        }
        if !from.exists() {
            return Err(FileError::NotFound(from.to_path_buf()));
        }
        fs::rename(from, to).map_err(|e| FileError::from_io(e, from))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/services/local.rs"]
mod tests;
