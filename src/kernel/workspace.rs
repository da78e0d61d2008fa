//! Workspace: composition root wiring the tree, the save coordinator and the
//! preferences onto one event bus.
//!
//! Handlers never publish while holding a borrow on the shared tree or
//! coordinator; outcomes are computed first, borrows released, then events go
//! out. That keeps re-entrant dispatch (create -> select -> flush -> save
//! events) safe on the single UI thread.

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::core::{Event, EventBus, EventKind, SubscriberId};
use crate::models::mode::{SwitchAnswer, SwitchPrompt};
use crate::models::{EditMode, ExplorerRow, ExplorerTree, NodeId, NodeKind};
use crate::services::file::FileProvider;
use crate::services::prefs::{self, UserPrefs};

use super::coordinator::SaveCoordinator;
use super::ops;

pub struct Workspace {
    bus: EventBus,
    provider: Rc<dyn FileProvider>,
    tree: Rc<RefCell<ExplorerTree>>,
    coordinator: Rc<RefCell<SaveCoordinator>>,
    prefs: Rc<RefCell<UserPrefs>>,
}

impl Workspace {
    pub fn open(root: &Path, provider: Rc<dyn FileProvider>, mut prefs: UserPrefs) -> Self {
        prefs.record_working_folder(root);

        let ws = Self {
            bus: EventBus::new(),
            provider,
            tree: Rc::new(RefCell::new(ExplorerTree::open(root))),
            coordinator: Rc::new(RefCell::new(SaveCoordinator::new())),
            prefs: Rc::new(RefCell::new(prefs)),
        };

        ws.attach_handlers();
        {
            let mut tree = ws.tree.borrow_mut();
            let root_id = tree.root();
            ops::expand(&mut tree, ws.provider.as_ref(), root_id);
        }
        let root_id = ws.tree.borrow().root();
        ws.select(root_id);
        ws
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn root_path(&self) -> PathBuf {
        self.tree.borrow().absolute_root().to_path_buf()
    }

    pub fn rows(&self) -> Vec<ExplorerRow> {
        self.tree.borrow().rows()
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.tree.borrow().selected()
    }

    pub fn node_name(&self, id: NodeId) -> Option<String> {
        self.tree
            .borrow()
            .name(id)
            .map(|n| n.to_string_lossy().into_owned())
    }

    pub fn is_folder(&self, id: NodeId) -> bool {
        self.tree.borrow().is_folder(id)
    }

    pub fn mode(&self) -> EditMode {
        self.coordinator.borrow().mode()
    }

    pub fn is_dirty(&self) -> bool {
        self.coordinator.borrow().buffer().is_dirty()
    }

    pub fn is_editable(&self) -> bool {
        self.coordinator.borrow().buffer().is_editable()
    }

    pub fn active_node(&self) -> Option<NodeId> {
        self.coordinator.borrow().buffer().active()
    }

    pub fn active_text(&self) -> String {
        self.coordinator.borrow().active_text().to_string()
    }

    pub fn set_active_text(&self, content: &str) {
        self.coordinator.borrow_mut().set_active_text(content);
    }

    pub fn favorites(&self) -> Vec<PathBuf> {
        self.prefs.borrow().favorite_folders.clone()
    }

    /// Sets the single tree-wide selection and announces it; the coordinator
    /// flushes the previous buffer and loads the new node in response.
    pub fn select(&self, id: NodeId) {
        let valid = {
            let tree = self.tree.borrow();
            tree.contains(id) && tree.kind(id) != Some(NodeKind::Placeholder)
        };
        if !valid {
            return;
        }
        {
            self.tree.borrow_mut().set_selected(Some(id));
        }
        self.bus.publish(Event::with_node(EventKind::Selected, id));
    }

    pub fn toggle_expand(&self, id: NodeId) {
        let (is_folder, expanded) = {
            let tree = self.tree.borrow();
            (tree.is_folder(id), tree.is_expanded(id))
        };
        if !is_folder {
            return;
        }
        if expanded {
            self.tree.borrow_mut().collapse(id);
        } else {
            let mut tree = self.tree.borrow_mut();
            ops::expand(&mut tree, self.provider.as_ref(), id);
        }
    }

    pub fn save(&self) -> bool {
        flush(&self.coordinator, self.provider.as_ref(), &self.bus)
    }

    pub fn create_file(&self) {
        self.bus.publish(Event::new(EventKind::CreateNew));
    }

    pub fn create_file_named(&self, name: &str) {
        self.bus
            .publish(Event::with_args(EventKind::CreateNew, name, ""));
    }

    pub fn create_folder(&self) {
        self.bus.publish(Event::new(EventKind::CreateNewFolder));
    }

    pub fn delete_selected(&self) {
        self.bus.publish(Event::new(EventKind::DeleteRequested));
    }

    pub fn rename_selected(&self, new_name: &str) -> bool {
        let Some(id) = self.tree.borrow().selected() else {
            return false;
        };
        self.save();

        let outcome = {
            let mut tree = self.tree.borrow_mut();
            ops::rename(&mut tree, self.provider.as_ref(), id, new_name)
        };
        match outcome {
            Ok(outcome) => {
                self.bus.publish(
                    Event::with_args(
                        EventKind::RenameCompleted,
                        outcome.old_path.display().to_string(),
                        outcome.new_path.display().to_string(),
                    )
                    .node(id),
                );
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "rename failed");
                self.bus.publish(Event::error(err.to_string()));
                false
            }
        }
    }

    pub fn request_mode_switch(&self) -> Option<(EditMode, SwitchPrompt)> {
        self.coordinator.borrow().prompt_for_switch()
    }

    /// Applies an answered mode switch. When the open node is a file, the
    /// backing file's extension follows the new mode through the ordinary
    /// rename path.
    pub fn apply_mode_switch(&self, target: EditMode, answer: SwitchAnswer) -> bool {
        let switched = { self.coordinator.borrow_mut().apply_switch(target, answer) };
        let Some(new_mode) = switched else {
            return false;
        };

        let node = self.coordinator.borrow().buffer().active();
        if let Some(id) = node {
            let is_file = self.tree.borrow().kind(id) == Some(NodeKind::File);
            if is_file {
                self.bus.publish(
                    Event::with_args(
                        EventKind::ExtensionChangeRequested,
                        "",
                        new_mode.extension(),
                    )
                    .node(id),
                );
            }
        }
        true
    }

    /// Tears the current tree down (announced, so tree-scoped handlers
    /// unsubscribe), rebuilds on the new root, and records it in preferences.
    pub fn change_root(&self, path: &Path) {
        self.save();
        self.bus.publish(Event::new(EventKind::TreeDestroyed));

        {
            *self.tree.borrow_mut() = ExplorerTree::open(path);
        }
        self.attach_handlers();
        {
            let mut tree = self.tree.borrow_mut();
            let root_id = tree.root();
            ops::expand(&mut tree, self.provider.as_ref(), root_id);
        }

        {
            let mut prefs = self.prefs.borrow_mut();
            prefs.record_working_folder(path);
            if let Err(err) = prefs::save(&prefs) {
                tracing::warn!(error = %err, "saving preferences failed");
            }
        }

        self.bus.publish(Event::with_args(
            EventKind::FolderChanged,
            path.display().to_string(),
            "",
        ));

        let root_id = self.tree.borrow().root();
        self.select(root_id);
    }

    /// Final flush before the shell goes away, preferences included.
    pub fn flush_on_exit(&self) {
        self.save();
        let prefs = self.prefs.borrow();
        if let Err(err) = prefs::save(&prefs) {
            tracing::warn!(error = %err, "saving preferences failed");
        }
    }

    fn attach_handlers(&self) {
        {
            let tree = Rc::clone(&self.tree);
            let provider = Rc::clone(&self.provider);
            let own_id: Rc<Cell<Option<SubscriberId>>> = Rc::new(Cell::new(None));
            let own = Rc::clone(&own_id);
            let id = self.bus.subscribe(move |bus, event| {
                handle_tree_command(&tree, provider.as_ref(), bus, event, &own);
            });
            own_id.set(Some(id));
        }
        {
            let tree = Rc::clone(&self.tree);
            let provider = Rc::clone(&self.provider);
            let coordinator = Rc::clone(&self.coordinator);
            let own_id: Rc<Cell<Option<SubscriberId>>> = Rc::new(Cell::new(None));
            let own = Rc::clone(&own_id);
            let id = self.bus.subscribe(move |bus, event| {
                handle_content_event(&coordinator, &tree, provider.as_ref(), bus, event, &own);
            });
            own_id.set(Some(id));
        }
    }
}

fn handle_tree_command(
    tree: &Rc<RefCell<ExplorerTree>>,
    provider: &dyn FileProvider,
    bus: &EventBus,
    event: &Event,
    own_id: &Rc<Cell<Option<SubscriberId>>>,
) {
    match event.kind {
        EventKind::CreateNew => {
            let explicit = (!event.arg1.is_empty()).then_some(event.arg1.as_str());
            let outcome = {
                let mut tree = tree.borrow_mut();
                ops::create_new(&mut tree, provider, explicit)
            };
            match outcome {
                Ok(outcome) => {
                    if let Some(id) = outcome.node {
                        {
                            tree.borrow_mut().set_selected(Some(id));
                        }
                        bus.publish(
                            Event::with_args(
                                EventKind::CreatedNew,
                                outcome.name,
                                outcome.path.display().to_string(),
                            )
                            .node(id),
                        );
                        bus.publish(Event::with_node(EventKind::Selected, id));
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "create file failed");
                    bus.publish(Event::error(err.to_string()));
                }
            }
        }
        EventKind::CreateNewFolder => {
            let outcome = {
                let mut tree = tree.borrow_mut();
                ops::create_new_folder(&mut tree, provider)
            };
            match outcome {
                Ok(outcome) => {
                    if let Some(id) = outcome.node {
                        {
                            tree.borrow_mut().set_selected(Some(id));
                        }
                        bus.publish(
                            Event::with_args(
                                EventKind::CreatedNewFolder,
                                outcome.name,
                                outcome.path.display().to_string(),
                            )
                            .node(id),
                        );
                        bus.publish(Event::with_node(EventKind::Selected, id));
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "create folder failed");
                    bus.publish(Event::error(err.to_string()));
                }
            }
        }
        EventKind::DeleteRequested => {
            let Some(id) = tree.borrow().selected() else {
                return;
            };
            let outcome = {
                let mut tree = tree.borrow_mut();
                ops::delete(&mut tree, provider, id)
            };
            match outcome {
                Ok(outcome) => {
                    bus.publish(Event::with_args(
                        EventKind::Closed,
                        outcome.path.display().to_string(),
                        "",
                    ));
                    if let Some(parent) = outcome.parent {
                        {
                            tree.borrow_mut().set_selected(Some(parent));
                        }
                        bus.publish(Event::with_node(EventKind::Selected, parent));
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "delete failed");
                    bus.publish(Event::error(err.to_string()));
                }
            }
        }
        EventKind::ExtensionChangeRequested => {
            let Some(id) = event.node else {
                return;
            };
            let new_name = {
                let tree = tree.borrow();
                tree.name(id).map(|name| {
                    let stem = Path::new(name)
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_else(|| name.to_string_lossy().into_owned());
                    format!("{}.{}", stem, event.arg2)
                })
            };
            let Some(new_name) = new_name else {
                return;
            };
            let outcome = {
                let mut tree = tree.borrow_mut();
                ops::rename(&mut tree, provider, id, &new_name)
            };
            match outcome {
                Ok(outcome) => {
                    if outcome.old_path != outcome.new_path {
                        bus.publish(
                            Event::with_args(
                                EventKind::RenameCompleted,
                                outcome.old_path.display().to_string(),
                                outcome.new_path.display().to_string(),
                            )
                            .node(id),
                        );
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "extension change failed");
                    bus.publish(Event::error(err.to_string()));
                }
            }
        }
        EventKind::TreeDestroyed => {
            if let Some(id) = own_id.get() {
                bus.unsubscribe(id);
            }
        }
        _ => {}
    }
}

fn handle_content_event(
    coordinator: &Rc<RefCell<SaveCoordinator>>,
    tree: &Rc<RefCell<ExplorerTree>>,
    provider: &dyn FileProvider,
    bus: &EventBus,
    event: &Event,
    own_id: &Rc<Cell<Option<SubscriberId>>>,
) {
    match event.kind {
        EventKind::Selected => {
            let Some(id) = event.node else {
                return;
            };
            flush(coordinator, provider, bus);

            let kind = tree.borrow().kind(id);
            let source = match kind {
                Some(NodeKind::File) => Some(Ok(tree.borrow_mut().full_path(id))),
                Some(NodeKind::Folder) => {
                    let mut tree = tree.borrow_mut();
                    Some(ops::ensure_description(&mut tree, provider, id))
                }
                _ => None,
            };

            match source {
                Some(Ok(path)) => match provider.read_file(&path) {
                    Ok(content) => {
                        coordinator
                            .borrow_mut()
                            .open_source(Some(id), path, content);
                    }
                    Err(err) => {
                        tracing::warn!(path = %path.display(), error = %err, "open failed");
                        coordinator.borrow_mut().detach();
                        bus.publish(Event::error(err.to_string()));
                    }
                },
                Some(Err(err)) => {
                    tracing::warn!(error = %err, "description file unavailable");
                    coordinator.borrow_mut().detach();
                    bus.publish(Event::error(err.to_string()));
                }
                None => coordinator.borrow_mut().detach(),
            }
        }
        EventKind::Closed => {
            coordinator
                .borrow_mut()
                .source_closed(Path::new(&event.arg1));
        }
        EventKind::RenameCompleted => {
            coordinator
                .borrow_mut()
                .source_renamed(Path::new(&event.arg1), Path::new(&event.arg2));
        }
        EventKind::TreeDestroyed => {
            coordinator.borrow_mut().detach();
            if let Some(id) = own_id.get() {
                bus.unsubscribe(id);
            }
        }
        _ => {}
    }
}

/// Dirty-gated write. `BeforeSave` goes out first so subscribers can push
/// fresh surface content into the buffer; `AfterSave` only follows a
/// successful write. A failed write keeps the dirty flag for a retry.
fn flush(
    coordinator: &Rc<RefCell<SaveCoordinator>>,
    provider: &dyn FileProvider,
    bus: &EventBus,
) -> bool {
    let Some(path) = coordinator.borrow().pending_write() else {
        return true;
    };

    bus.publish(Event::with_args(
        EventKind::BeforeSave,
        path.display().to_string(),
        "",
    ));

    let content = coordinator.borrow().serialized();
    match provider.write_file(&path, &content) {
        Ok(()) => {
            coordinator.borrow_mut().commit_saved();
            bus.publish(Event::with_args(
                EventKind::AfterSave,
                path.display().to_string(),
                "",
            ));
            true
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "save failed");
            bus.publish(Event::error(err.to_string()));
            false
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/workspace.rs"]
mod tests;
