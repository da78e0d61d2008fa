//! Persisted user preferences: last working folder and favorite folders.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const PREFS_DIR: &str = ".znote";
const PREFS_FILE: &str = "prefs.json";
const LOG_DIR: &str = "logs";

/// Favorites are most-recent-first and bounded.
pub const MAX_FAVORITES: usize = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPrefs {
    #[serde(default)]
    pub working_folder: Option<PathBuf>,
    #[serde(default)]
    pub favorite_folders: Vec<PathBuf>,
}

impl UserPrefs {
    /// Records a newly opened root: it becomes the working folder and moves
    /// to the front of the favorites list.
    pub fn record_working_folder(&mut self, path: &Path) {
        self.working_folder = Some(path.to_path_buf());
        self.add_favorite(path);
    }

    pub fn add_favorite(&mut self, path: &Path) {
        self.favorite_folders.retain(|p| p != path);
        self.favorite_folders.insert(0, path.to_path_buf());
        self.favorite_folders.truncate(MAX_FAVORITES);
    }
}

pub fn prefs_path() -> Option<PathBuf> {
    app_dir().map(|dir| dir.join(PREFS_FILE))
}

pub fn load() -> UserPrefs {
    let Some(path) = prefs_path() else {
        return UserPrefs::default();
    };
    let Ok(data) = std::fs::read_to_string(path) else {
        return UserPrefs::default();
    };
    serde_json::from_str(&data).unwrap_or_default()
}

pub fn save(prefs: &UserPrefs) -> std::io::Result<()> {
    let path = prefs_path().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Cannot determine preferences directory",
        )
    })?;
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let content = serde_json::to_string_pretty(prefs).unwrap_or_else(|_| "{}".to_string());
    std::fs::write(&path, content)
}

pub(crate) fn app_dir() -> Option<PathBuf> {
    get_cache_dir().map(|dir| dir.join(PREFS_DIR))
}

pub(crate) fn ensure_log_dir() -> std::io::Result<PathBuf> {
    let dir = app_dir()
        .ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "Cannot determine cache directory")
        })?
        .join(LOG_DIR);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn get_cache_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Caches"));
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
            return Some(PathBuf::from(xdg));
        }
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".cache"));
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(local) = std::env::var("LOCALAPPDATA") {
            return Some(PathBuf::from(local));
        }
        return std::env::var("APPDATA").ok().map(PathBuf::from);
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}
