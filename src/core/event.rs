use crate::models::NodeId;

/// The fixed vocabulary carried by the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Selected,
    /// The open node's backing content is gone (deleted); the buffer must
    /// detach without flushing.
    Closed,
    CreateNew,
    CreatedNew,
    CreateNewFolder,
    CreatedNewFolder,
    DeleteRequested,
    RenameCompleted,
    ExtensionChangeRequested,
    BeforeSave,
    AfterSave,
    TreeDestroyed,
    FolderChanged,
    Error,
}

/// A bus payload: kind, two free-form string arguments (paths, filenames,
/// messages) and an optional node reference. Fire-and-forget, never persisted.
#[derive(Debug, Clone)]
pub struct Event {
    pub kind: EventKind,
    pub arg1: String,
    pub arg2: String,
    pub node: Option<NodeId>,
}

impl Event {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            arg1: String::new(),
            arg2: String::new(),
            node: None,
        }
    }

    pub fn with_args(kind: EventKind, arg1: impl Into<String>, arg2: impl Into<String>) -> Self {
        Self {
            kind,
            arg1: arg1.into(),
            arg2: arg2.into(),
            node: None,
        }
    }

    pub fn with_node(kind: EventKind, node: NodeId) -> Self {
        Self {
            kind,
            arg1: String::new(),
            arg2: String::new(),
            node: Some(node),
        }
    }

    pub fn node(mut self, node: NodeId) -> Self {
        self.node = Some(node);
        self
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_args(EventKind::Error, message, "")
    }
}
