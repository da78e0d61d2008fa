use std::path::{Path, PathBuf};

use super::NodeId;

/// In-memory content of the open node: a plain-text form and a markup form,
/// one of which is active depending on the edit mode.
#[derive(Debug, Default)]
pub struct EditBuffer {
    text: String,
    markup: String,
    dirty: bool,
    active: Option<NodeId>,
    source: Option<PathBuf>,
    editable: bool,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn set_source(&mut self, source: PathBuf) {
        self.source = Some(source);
    }

    /// Editing path: replaces the plain-text form and marks the buffer dirty
    /// when the content actually changed.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.text != text {
            self.text = text;
            self.dirty = true;
        }
    }

    pub fn set_markup(&mut self, markup: impl Into<String>) {
        let markup = markup.into();
        if self.markup != markup {
            self.markup = markup;
            self.dirty = true;
        }
    }

    /// Replaces a form without touching the dirty flag (mode conversion,
    /// surface refresh before a write).
    pub fn refresh_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn refresh_markup(&mut self, markup: impl Into<String>) {
        self.markup = markup.into();
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Binds the buffer to a freshly loaded node.
    pub fn load(
        &mut self,
        active: Option<NodeId>,
        source: PathBuf,
        text: String,
        markup: String,
    ) {
        self.active = active;
        self.source = Some(source);
        self.text = text;
        self.markup = markup;
        self.dirty = false;
        self.editable = true;
    }

    /// Detaches the buffer; nothing is open and editing is disabled.
    pub fn reset(&mut self) {
        self.text.clear();
        self.markup.clear();
        self.dirty = false;
        self.active = None;
        self.source = None;
        self.editable = false;
    }
}
