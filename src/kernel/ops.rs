//! Explorer operations: lazy expansion, rename with extension coercion,
//! numbered create, delete, and description-file resolution.
//!
//! Everything here mutates the tree and the filesystem only; publishing the
//! resulting events is the workspace's job, after tree borrows are released.

use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};

use crate::models::mode::{MARKUP_EXTENSION, TEXT_EXTENSION};
use crate::models::{ExplorerError, ExplorerTree, NodeId, NodeKind};
use crate::services::file::{FileError, FileProvider};

/// Base name of the hidden per-folder description file; `desc.txt` is probed
/// before `desc.html`.
pub const DESC_BASE: &str = "desc";
pub const MEMO_PREFIX: &str = "memo";
pub const FOLDER_PREFIX: &str = "folder";

pub fn has_recognized_extension(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(&format!(".{}", TEXT_EXTENSION))
        || lower.ends_with(&format!(".{}", MARKUP_EXTENSION))
}

fn desc_candidates() -> [String; 2] {
    [
        format!("{}.{}", DESC_BASE, TEXT_EXTENSION),
        format!("{}.{}", DESC_BASE, MARKUP_EXTENSION),
    ]
}

pub fn is_desc_name(name: &str) -> bool {
    desc_candidates().iter().any(|c| c == name)
}

fn resolve_desc_name(provider: &dyn FileProvider, folder: &Path) -> Option<OsString> {
    desc_candidates()
        .into_iter()
        .find(|candidate| provider.is_file(&folder.join(candidate)))
        .map(OsString::from)
}

fn tree_err(err: ExplorerError) -> FileError {
    FileError::Io(io::Error::new(io::ErrorKind::Other, err.to_string()))
}

/// Scans a folder's immediate children: subdirectories first, then files with
/// a recognized extension, excluding the resolved description file. A scan
/// failure leaves the folder expanded with zero children; browsing must not
/// hard-fail on one bad subtree. No-op for folders already scanned.
pub fn expand(tree: &mut ExplorerTree, provider: &dyn FileProvider, id: NodeId) {
    if !tree.is_folder(id) {
        return;
    }
    if !tree.is_unexpanded(id) {
        tree.set_expanded(id);
        return;
    }

    let path = tree.full_path(id);
    tree.take_placeholder(id);

    let entries = match provider.read_dir(&path) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "folder scan failed");
            tree.set_expanded(id);
            return;
        }
    };

    let desc = resolve_desc_name(provider, &path);
    tree.set_desc_name(id, desc.clone());

    for entry in &entries {
        if entry.is_dir {
            let _ = tree.insert_child(id, entry.name.clone(), NodeKind::Folder);
        }
    }
    for entry in &entries {
        if entry.is_dir {
            continue;
        }
        let name = entry.name.to_string_lossy();
        if !has_recognized_extension(&name) {
            continue;
        }
        if desc.as_deref() == Some(entry.name.as_os_str()) {
            continue;
        }
        let _ = tree.insert_child(id, entry.name.clone(), NodeKind::File);
    }

    tree.set_expanded(id);
}

/// Existing description file of a folder, if any; backfills the node field.
pub fn resolve_description(
    tree: &mut ExplorerTree,
    provider: &dyn FileProvider,
    id: NodeId,
) -> Option<PathBuf> {
    let folder = tree.full_path(id);
    let name = resolve_desc_name(provider, &folder)?;
    tree.set_desc_name(id, Some(name.clone()));
    Some(folder.join(name))
}

/// Resolves the folder's description file, creating an empty primary-extension
/// one when neither candidate exists. Never produces a visible child node.
pub fn ensure_description(
    tree: &mut ExplorerTree,
    provider: &dyn FileProvider,
    id: NodeId,
) -> Result<PathBuf, FileError> {
    if let Some(path) = resolve_description(tree, provider, id) {
        return Ok(path);
    }

    let name = format!("{}.{}", DESC_BASE, TEXT_EXTENSION);
    let path = tree.full_path(id).join(&name);
    provider.write_file(&path, "")?;
    tree.set_desc_name(id, Some(OsString::from(name)));
    Ok(path)
}

#[derive(Debug, Clone)]
pub struct RenameOutcome {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
}

/// Renames a node on disk and in the tree. File names lacking a recognized
/// extension get the primary one appended. Collisions and vanished sources
/// abort with no mutation. Folders are reset and rescanned afterwards, since
/// their description-file association may now resolve differently.
pub fn rename(
    tree: &mut ExplorerTree,
    provider: &dyn FileProvider,
    id: NodeId,
    new_name: &str,
) -> Result<RenameOutcome, FileError> {
    let kind = tree
        .kind(id)
        .filter(|&k| k != NodeKind::Placeholder)
        .ok_or_else(|| tree_err(ExplorerError::InvalidNodeId))?;

    let mut new_name = new_name.trim().to_string();
    if new_name.is_empty() {
        return Err(FileError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "empty name",
        )));
    }
    if kind == NodeKind::File && !has_recognized_extension(&new_name) {
        new_name.push('.');
        new_name.push_str(TEXT_EXTENSION);
    }

    let old_path = tree.full_path(id);
    if tree.name(id).map(|n| n.as_os_str()) == Some(OsStr::new(&new_name)) {
        return Ok(RenameOutcome {
            old_path: old_path.clone(),
            new_path: old_path,
        });
    }

    let new_path = old_path
        .parent()
        .map(|dir| dir.join(&new_name))
        .unwrap_or_else(|| PathBuf::from(&new_name));

    provider.rename(&old_path, &new_path)?;
    tree.rename(id, OsString::from(&new_name)).map_err(tree_err)?;

    if kind == NodeKind::Folder {
        tree.reset_for_rescan(id);
        expand(tree, provider, id);
    }

    Ok(RenameOutcome { old_path, new_path })
}

/// Create/delete target: the selected node when it is a folder, else its
/// parent, else the root.
fn target_folder(tree: &ExplorerTree) -> NodeId {
    match tree.selected() {
        Some(id) if tree.is_folder(id) => id,
        Some(id) => tree
            .parent(id)
            .filter(|p| tree.is_folder(*p))
            .unwrap_or_else(|| tree.root()),
        None => tree.root(),
    }
}

#[derive(Debug, Clone)]
pub struct CreateOutcome {
    /// Absent when the created file is the folder's description file, which
    /// never shows up as a child.
    pub node: Option<NodeId>,
    pub parent: NodeId,
    pub name: String,
    pub path: PathBuf,
}

pub fn create_new(
    tree: &mut ExplorerTree,
    provider: &dyn FileProvider,
    explicit_name: Option<&str>,
) -> Result<CreateOutcome, FileError> {
    let parent = target_folder(tree);
    if tree.is_unexpanded(parent) {
        expand(tree, provider, parent);
    }
    let folder_path = tree.full_path(parent);

    let name = match explicit_name {
        Some(name) => {
            let name = name.trim().to_string();
            if provider.exists(&folder_path.join(&name)) {
                return Err(FileError::AlreadyExists(folder_path.join(name)));
            }
            name
        }
        None => probe_name(provider, &folder_path, MEMO_PREFIX, Some(TEXT_EXTENSION)),
    };

    let path = folder_path.join(&name);
    provider.write_file(&path, "")?;

    let desc = tree
        .desc_name(parent)
        .or_else(|| resolve_desc_name(provider, &folder_path));
    if desc.as_deref() == Some(OsStr::new(&name)) {
        tree.set_desc_name(parent, desc);
        tree.set_expanded(parent);
        return Ok(CreateOutcome {
            node: None,
            parent,
            name,
            path,
        });
    }

    let id = tree
        .insert_child(parent, OsString::from(&name), NodeKind::File)
        .map_err(tree_err)?;
    tree.set_expanded(parent);

    Ok(CreateOutcome {
        node: Some(id),
        parent,
        name,
        path,
    })
}

pub fn create_new_folder(
    tree: &mut ExplorerTree,
    provider: &dyn FileProvider,
) -> Result<CreateOutcome, FileError> {
    let parent = target_folder(tree);
    if tree.is_unexpanded(parent) {
        expand(tree, provider, parent);
    }
    let folder_path = tree.full_path(parent);

    let name = probe_name(provider, &folder_path, FOLDER_PREFIX, None);
    let path = folder_path.join(&name);
    provider.create_dir(&path)?;

    let id = tree
        .insert_child(parent, OsString::from(&name), NodeKind::Folder)
        .map_err(tree_err)?;
    tree.set_expanded(parent);

    Ok(CreateOutcome {
        node: Some(id),
        parent,
        name,
        path,
    })
}

/// Probes `prefix1`, `prefix2`, ... (plus extension) until an unused name.
fn probe_name(
    provider: &dyn FileProvider,
    folder: &Path,
    prefix: &str,
    extension: Option<&str>,
) -> String {
    let mut n = 1u32;
    loop {
        let name = match extension {
            Some(ext) => format!("{}{}.{}", prefix, n, ext),
            None => format!("{}{}", prefix, n),
        };
        if !provider.exists(&folder.join(&name)) {
            return name;
        }
        n += 1;
    }
}

#[derive(Debug, Clone)]
pub struct DeleteOutcome {
    pub parent: Option<NodeId>,
    pub path: PathBuf,
}

/// Deletes a file, an empty folder, or a folder whose only file is its own
/// description file (description first, then the directory). Anything else
/// is refused and the tree is left unchanged.
pub fn delete(
    tree: &mut ExplorerTree,
    provider: &dyn FileProvider,
    id: NodeId,
) -> Result<DeleteOutcome, FileError> {
    let kind = tree
        .kind(id)
        .ok_or_else(|| tree_err(ExplorerError::InvalidNodeId))?;
    let path = tree.full_path(id);

    match kind {
        NodeKind::File => provider.delete_file(&path)?,
        NodeKind::Folder => {
            let entries = provider.read_dir(&path)?;
            match entries.as_slice() {
                [] => provider.delete_dir(&path)?,
                [only] if !only.is_dir && is_desc_name(&only.name.to_string_lossy()) => {
                    provider.delete_file(&only.path)?;
                    provider.delete_dir(&path)?;
                }
                _ => return Err(FileError::NotEmpty(path)),
            }
        }
        NodeKind::Placeholder => return Err(tree_err(ExplorerError::InvalidNodeId)),
    }

    let parent = tree.delete(id).map_err(tree_err)?;
    Ok(DeleteOutcome { parent, path })
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/ops.rs"]
mod tests;
