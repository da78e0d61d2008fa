//! Save coordinator: owns the open node's buffer and the edit mode, and
//! decides what gets persisted and where.

use std::path::{Path, PathBuf};

use crate::models::mode::{self, SwitchAnswer, SwitchPrompt};
use crate::models::{EditBuffer, EditMode, ModeMachine, NodeId};

pub struct SaveCoordinator {
    buffer: EditBuffer,
    machine: ModeMachine,
}

impl SaveCoordinator {
    pub fn new() -> Self {
        Self {
            buffer: EditBuffer::new(),
            machine: ModeMachine::new(EditMode::Text),
        }
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    pub fn mode(&self) -> EditMode {
        self.machine.mode()
    }

    /// Destination of a due flush: only a dirty buffer with a bound source
    /// gets written.
    pub fn pending_write(&self) -> Option<PathBuf> {
        if self.buffer.is_dirty() {
            self.buffer.source().map(Path::to_path_buf)
        } else {
            None
        }
    }

    /// Serialized form of the active mode's content. Markup gets the fixed
    /// document header unless the marker is already present.
    pub fn serialized(&self) -> String {
        match self.machine.mode() {
            EditMode::Text => self.buffer.text().to_string(),
            EditMode::Markup => mode::wrap_markup(self.buffer.markup()),
        }
    }

    pub fn commit_saved(&mut self) {
        self.buffer.clear_dirty();
    }

    /// Binds freshly loaded content; the mode follows the source extension.
    /// No save events fire around a load.
    pub fn open_source(&mut self, node: Option<NodeId>, source: PathBuf, content: String) {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mode = EditMode::for_file_name(&name);
        self.machine.set_mode(mode);
        match mode {
            EditMode::Text => self.buffer.load(node, source, content, String::new()),
            EditMode::Markup => self.buffer.load(node, source, String::new(), content),
        }
    }

    /// Drops the binding entirely; editing is disabled until the next load.
    pub fn detach(&mut self) {
        self.buffer.reset();
        self.machine.set_mode(EditMode::Text);
    }

    /// Content of the active mode's form, for the content surface.
    pub fn active_text(&self) -> &str {
        match self.machine.mode() {
            EditMode::Text => self.buffer.text(),
            EditMode::Markup => self.buffer.markup(),
        }
    }

    /// Editing path from the content surface into the active form.
    pub fn set_active_text(&mut self, content: &str) {
        if !self.buffer.is_editable() {
            return;
        }
        match self.machine.mode() {
            EditMode::Text => self.buffer.set_text(content),
            EditMode::Markup => self.buffer.set_markup(content),
        }
    }

    pub fn prompt_for_switch(&self) -> Option<(EditMode, SwitchPrompt)> {
        if !self.buffer.is_editable() {
            return None;
        }
        let target = self.machine.mode().other();
        self.machine.prompt_for(target).map(|prompt| (target, prompt))
    }

    /// Returns the new mode when the answered switch went through.
    pub fn apply_switch(&mut self, target: EditMode, answer: SwitchAnswer) -> Option<EditMode> {
        if self.machine.apply(target, answer, &mut self.buffer) {
            Some(self.machine.mode())
        } else {
            None
        }
    }

    /// Rebases the source path after a completed rename, whether the renamed
    /// entry is the source itself or one of its ancestor folders.
    pub fn source_renamed(&mut self, old_path: &Path, new_path: &Path) {
        let Some(source) = self.buffer.source() else {
            return;
        };
        if source == old_path {
            self.buffer.set_source(new_path.to_path_buf());
        } else if let Ok(rest) = source.strip_prefix(old_path) {
            let rebased = new_path.join(rest);
            self.buffer.set_source(rebased);
        }
    }

    /// Detaches when the closed path backs the buffer, directly or as an
    /// ancestor (a deleted folder takes its description file with it).
    pub fn source_closed(&mut self, path: &Path) {
        let detach = self
            .buffer
            .source()
            .is_some_and(|source| source == path || source.starts_with(path));
        if detach {
            self.detach();
        }
    }
}

impl Default for SaveCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/coordinator.rs"]
mod tests;
