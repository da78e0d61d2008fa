//! Service layer: filesystem access and preference persistence.

pub mod file;
pub mod prefs;

pub use file::{DirEntry, FileError, FileProvider, LocalFileProvider};
pub use prefs::UserPrefs;
