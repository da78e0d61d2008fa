//! Explorer tree data model.

use rustc_hash::FxHashSet;
use slotmap::{new_key_type, SlotMap};
use std::{
    collections::{BTreeMap, HashMap},
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
};

new_key_type! { pub struct NodeId; }

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Folder,
    /// Sole child of a not-yet-scanned folder.
    Placeholder,
}

#[derive(Debug)]
pub enum ExplorerError {
    ParentNotFolder,
    NameExists,
    InvalidNodeId,
}

impl fmt::Display for ExplorerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExplorerError::ParentNotFolder => write!(f, "parent is not a folder"),
            ExplorerError::NameExists => write!(f, "name already exists in parent"),
            ExplorerError::InvalidNodeId => write!(f, "invalid node id"),
        }
    }
}

impl std::error::Error for ExplorerError {}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    name: OsString,
    parent: Option<NodeId>,
    children: Option<BTreeMap<OsString, NodeId>>,
    desc_name: Option<OsString>,
}

impl Node {
    fn new_file(name: OsString, parent: Option<NodeId>) -> Self {
        Self {
            kind: NodeKind::File,
            name,
            parent,
            children: None,
            desc_name: None,
        }
    }

    fn new_folder(name: OsString, parent: Option<NodeId>) -> Self {
        Self {
            kind: NodeKind::Folder,
            name,
            parent,
            children: Some(BTreeMap::new()),
            desc_name: None,
        }
    }

    fn new_placeholder(parent: NodeId) -> Self {
        Self {
            kind: NodeKind::Placeholder,
            name: OsString::new(),
            parent: Some(parent),
            children: None,
            desc_name: None,
        }
    }
}

pub struct ExplorerTree {
    arena: SlotMap<NodeId, Node>,
    root: NodeId,
    expanded: FxHashSet<NodeId>,
    selected: Option<NodeId>,
    absolute_root: PathBuf,
    path_cache: HashMap<NodeId, PathBuf>,
}

impl ExplorerTree {
    /// Creates a tree holding only the root folder, unscanned.
    pub fn new(root_name: OsString, absolute_root: PathBuf) -> Self {
        let mut arena = SlotMap::with_key();
        let root = arena.insert(Node::new_folder(root_name, None));
        let placeholder = arena.insert(Node::new_placeholder(root));
        if let Some(children) = arena[root].children.as_mut() {
            children.insert(OsString::new(), placeholder);
        }

        Self {
            arena,
            root,
            expanded: FxHashSet::default(),
            selected: None,
            absolute_root,
            path_cache: HashMap::new(),
        }
    }

    pub fn open(root_path: &Path) -> Self {
        let absolute_root = root_path
            .canonicalize()
            .unwrap_or_else(|_| root_path.to_path_buf());

        let root_name = root_path
            .file_name()
            .or_else(|| root_path.iter().next_back())
            .unwrap_or(root_path.as_os_str())
            .to_os_string();

        Self::new(root_name, absolute_root)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn set_selected(&mut self, id: Option<NodeId>) {
        self.selected = id;
    }

    pub fn absolute_root(&self) -> &Path {
        &self.absolute_root
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains_key(id)
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.arena.get(id).map(|n| n.kind)
    }

    pub fn is_folder(&self, id: NodeId) -> bool {
        self.kind(id) == Some(NodeKind::Folder)
    }

    pub fn name(&self, id: NodeId) -> Option<&OsString> {
        self.arena.get(id).map(|n| &n.name)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|n| n.parent)
    }

    pub fn desc_name(&self, id: NodeId) -> Option<OsString> {
        self.arena.get(id).and_then(|n| n.desc_name.clone())
    }

    pub fn set_desc_name(&mut self, id: NodeId, name: Option<OsString>) {
        if let Some(node) = self.arena.get_mut(id) {
            node.desc_name = name;
        }
    }

    /// A folder that still carries its placeholder has not been scanned.
    pub fn is_unexpanded(&self, id: NodeId) -> bool {
        let Some(node) = self.arena.get(id) else {
            return false;
        };
        let Some(children) = node.children.as_ref() else {
            return false;
        };
        children.len() == 1
            && children
                .values()
                .next()
                .and_then(|&c| self.arena.get(c))
                .is_some_and(|c| c.kind == NodeKind::Placeholder)
    }

    /// Removes the placeholder child ahead of a directory scan.
    pub fn take_placeholder(&mut self, id: NodeId) {
        let placeholder = self
            .arena
            .get(id)
            .and_then(|n| n.children.as_ref())
            .map(|children| {
                children
                    .iter()
                    .filter(|(_, &c)| {
                        self.arena
                            .get(c)
                            .is_some_and(|n| n.kind == NodeKind::Placeholder)
                    })
                    .map(|(name, &c)| (name.clone(), c))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        for (name, child) in placeholder {
            if let Some(children) = self.arena.get_mut(id).and_then(|n| n.children.as_mut()) {
                children.remove(&name);
            }
            self.arena.remove(child);
        }
    }

    pub fn insert_child(
        &mut self,
        parent: NodeId,
        name: OsString,
        kind: NodeKind,
    ) -> Result<NodeId, ExplorerError> {
        {
            let parent_ro = self
                .arena
                .get(parent)
                .ok_or(ExplorerError::InvalidNodeId)?;
            let children_ro = parent_ro
                .children
                .as_ref()
                .ok_or(ExplorerError::ParentNotFolder)?;
            if children_ro.contains_key(&name) {
                return Err(ExplorerError::NameExists);
            }
        }

        let node = match kind {
            NodeKind::Folder => Node::new_folder(name.clone(), Some(parent)),
            _ => Node::new_file(name.clone(), Some(parent)),
        };
        let id = self.arena.insert(node);

        if kind == NodeKind::Folder {
            let placeholder = self.arena.insert(Node::new_placeholder(id));
            if let Some(children) = self.arena.get_mut(id).and_then(|n| n.children.as_mut()) {
                children.insert(OsString::new(), placeholder);
            }
        }

        let parent_node = self
            .arena
            .get_mut(parent)
            .ok_or(ExplorerError::InvalidNodeId)?;
        let children = parent_node
            .children
            .as_mut()
            .ok_or(ExplorerError::ParentNotFolder)?;
        children.insert(name, id);

        Ok(id)
    }

    pub fn full_path(&mut self, id: NodeId) -> PathBuf {
        if id == self.root {
            return self.absolute_root.clone();
        }

        if let Some(cached) = self.path_cache.get(&id) {
            return cached.clone();
        }

        let mut path = self.absolute_root.clone();
        let mut current = id;
        let mut components = vec![];

        while let Some(node) = self.arena.get(current) {
            if let Some(parent) = node.parent {
                components.push(node.name.as_os_str());
                current = parent;
            } else {
                break;
            }
        }

        for comp in components.iter().rev() {
            path.push(comp);
        }

        self.path_cache.insert(id, path.clone());
        path
    }

    fn invalidate_path_cache_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(node_id) = stack.pop() {
            self.path_cache.remove(&node_id);
            if let Some(node) = self.arena.get(node_id) {
                if let Some(children) = &node.children {
                    for &child_id in children.values() {
                        stack.push(child_id);
                    }
                }
            }
        }
    }

    /// In-tree rename; the filesystem move has already happened by the time
    /// this runs.
    pub fn rename(&mut self, id: NodeId, new_name: OsString) -> Result<(), ExplorerError> {
        let (parent, old_name) = {
            let node = self.arena.get(id).ok_or(ExplorerError::InvalidNodeId)?;
            (node.parent, node.name.clone())
        };

        if old_name == new_name {
            return Ok(());
        }

        if let Some(parent_id) = parent {
            let parent_node = self
                .arena
                .get_mut(parent_id)
                .ok_or(ExplorerError::InvalidNodeId)?;
            let children = parent_node
                .children
                .as_mut()
                .ok_or(ExplorerError::ParentNotFolder)?;

            if children.contains_key(&new_name) {
                return Err(ExplorerError::NameExists);
            }
            children.remove(&old_name);
            children.insert(new_name.clone(), id);
        }

        self.arena
            .get_mut(id)
            .ok_or(ExplorerError::InvalidNodeId)?
            .name = new_name;

        self.invalidate_path_cache_subtree(id);
        Ok(())
    }

    /// Detaches a node from its parent and drops its subtree. Returns the
    /// parent, which callers promote to the new selection.
    pub fn delete(&mut self, id: NodeId) -> Result<Option<NodeId>, ExplorerError> {
        if id == self.root {
            return Err(ExplorerError::InvalidNodeId);
        }

        let (parent, name) = {
            let node = self.arena.get(id).ok_or(ExplorerError::InvalidNodeId)?;
            (node.parent, node.name.clone())
        };

        if let Some(parent_id) = parent {
            if let Some(children) = self
                .arena
                .get_mut(parent_id)
                .and_then(|n| n.children.as_mut())
            {
                children.remove(&name);
            }
        }

        self.recursive_remove(id);
        Ok(parent)
    }

    fn recursive_remove(&mut self, id: NodeId) {
        if let Some(node) = self.arena.get(id).cloned() {
            if let Some(children) = node.children {
                for (_, child_id) in children {
                    self.recursive_remove(child_id);
                }
            }

            self.expanded.remove(&id);
            self.path_cache.remove(&id);

            if self.selected == Some(id) {
                self.selected = node.parent;
            }

            self.arena.remove(id);
        }
    }

    /// Drops every child of a folder. Used by the forced rescan after a
    /// folder rename, when the description-file association may have moved.
    pub fn clear_children(&mut self, id: NodeId) {
        let child_ids: Vec<NodeId> = self
            .arena
            .get(id)
            .and_then(|n| n.children.as_ref())
            .map(|c| c.values().copied().collect())
            .unwrap_or_default();

        for child in child_ids {
            self.recursive_remove(child);
        }
        if let Some(children) = self.arena.get_mut(id).and_then(|n| n.children.as_mut()) {
            children.clear();
        }
    }

    pub fn reset_for_rescan(&mut self, id: NodeId) {
        if !self.is_folder(id) {
            return;
        }
        self.clear_children(id);
        let placeholder = self.arena.insert(Node::new_placeholder(id));
        if let Some(children) = self.arena.get_mut(id).and_then(|n| n.children.as_mut()) {
            children.insert(OsString::new(), placeholder);
        }
        self.expanded.remove(&id);
        self.set_desc_name(id, None);
        self.invalidate_path_cache_subtree(id);
    }

    pub fn set_expanded(&mut self, id: NodeId) {
        if self.is_folder(id) {
            self.expanded.insert(id);
        }
    }

    pub fn collapse(&mut self, id: NodeId) {
        self.expanded.remove(&id);
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.arena
            .get(id)
            .and_then(|n| n.children.as_ref())
            .map(|c| c.len())
            .unwrap_or(0)
    }

    pub fn children(&self, id: NodeId) -> Option<impl Iterator<Item = (&OsString, &NodeId)>> {
        self.arena
            .get(id)
            .and_then(|n| n.children.as_ref())
            .map(|c| c.iter())
    }
}

#[derive(Debug, Clone)]
pub struct ExplorerRow {
    pub id: NodeId,
    pub depth: u16,
    pub name: OsString,
    pub kind: NodeKind,
    pub is_expanded: bool,
}

impl ExplorerTree {
    /// Flattens the expanded portion of the tree for rendering. Placeholders
    /// are not shown; folders sort before files, each group in name order.
    pub fn rows(&self) -> Vec<ExplorerRow> {
        let mut result = Vec::new();
        let mut stack: Vec<(NodeId, u16)> = vec![(self.root, 0)];

        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.arena.get(id) else {
                continue;
            };
            if node.kind == NodeKind::Placeholder {
                continue;
            }

            result.push(ExplorerRow {
                id,
                depth,
                name: node.name.clone(),
                kind: node.kind,
                is_expanded: self.expanded.contains(&id),
            });

            if self.expanded.contains(&id) {
                if let Some(children) = &node.children {
                    let mut folders = Vec::new();
                    let mut files = Vec::new();

                    for &child_id in children.values() {
                        match self.arena.get(child_id).map(|c| c.kind) {
                            Some(NodeKind::Folder) => folders.push(child_id),
                            Some(NodeKind::File) => files.push(child_id),
                            _ => {}
                        }
                    }

                    for file_id in files.into_iter().rev() {
                        stack.push((file_id, depth + 1));
                    }
                    for folder_id in folders.into_iter().rev() {
                        stack.push((folder_id, depth + 1));
                    }
                }
            }
        }

        result
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/explorer.rs"]
mod tests;
