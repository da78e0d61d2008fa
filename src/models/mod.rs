//! Data model layer.

pub mod buffer;
pub mod explorer;
pub mod mode;

pub use buffer::EditBuffer;
pub use explorer::{ExplorerError, ExplorerRow, ExplorerTree, NodeId, NodeKind};
pub use mode::{
    EditMode, ModeMachine, SwitchAnswer, SwitchPrompt, MARKUP_EXTENSION, TEXT_EXTENSION,
};
