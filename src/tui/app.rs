//! Shell state: focus, dialogs, key handling.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crossterm::event::{Event as InputEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::EventKind;
use crate::kernel::Workspace;
use crate::models::mode::SwitchPrompt;
use crate::models::{EditMode, ExplorerRow, NodeId, SwitchAnswer};

use super::editor::EditorPane;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Explorer,
    Editor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Rename,
    ChangeRoot,
}

#[derive(Debug, Clone)]
pub enum Dialog {
    None,
    Input {
        kind: InputKind,
        title: String,
        value: String,
    },
    ConfirmDelete {
        message: String,
    },
    ConfirmModeSwitch {
        target: EditMode,
        prompt: SwitchPrompt,
    },
}

pub struct ShellApp {
    workspace: Workspace,
    pub focus: Focus,
    pub dialog: Dialog,
    pub editor: EditorPane,
    pub explorer_scroll: usize,
    status: Rc<RefCell<Option<String>>>,
    /// What the editor pane currently mirrors; reloaded when it drifts.
    bound: Option<(Option<NodeId>, EditMode)>,
    should_quit: bool,
}

impl ShellApp {
    pub fn new(workspace: Workspace) -> Self {
        let status: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&status);
        workspace.bus().subscribe(move |_, event| match event.kind {
            EventKind::Error => *sink.borrow_mut() = Some(event.arg1.clone()),
            EventKind::AfterSave => *sink.borrow_mut() = Some(format!("saved {}", event.arg1)),
            _ => {}
        });

        let mut app = Self {
            workspace,
            focus: Focus::Explorer,
            dialog: Dialog::None,
            editor: EditorPane::new(),
            explorer_scroll: 0,
            status,
            bound: None,
            should_quit: false,
        };
        app.sync_editor();
        app
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn status(&self) -> Option<String> {
        self.status.borrow().clone()
    }

    pub fn rows(&self) -> Vec<ExplorerRow> {
        self.workspace.rows()
    }

    pub fn finish(&self) {
        self.workspace.flush_on_exit();
    }

    /// Reloads the pane when the buffer got rebound under it (selection
    /// change, create, delete, mode switch).
    fn sync_editor(&mut self) {
        let current = (self.workspace.active_node(), self.workspace.mode());
        if self.bound != Some(current) {
            self.bound = Some(current);
            self.editor.set_content(&self.workspace.active_text());
        }
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        if let InputEvent::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                self.handle_key(key);
                self.sync_editor();
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if !matches!(self.dialog, Dialog::None) {
            self.handle_dialog_key(key);
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match (key.code, ctrl) {
            (KeyCode::Char('q'), true) => self.should_quit = true,
            (KeyCode::Char('s'), true) => {
                self.workspace.save();
            }
            (KeyCode::Char('e'), true) => {
                if let Some((target, prompt)) = self.workspace.request_mode_switch() {
                    self.dialog = Dialog::ConfirmModeSwitch { target, prompt };
                }
            }
            (KeyCode::Tab, _) => {
                self.focus = match self.focus {
                    Focus::Explorer => Focus::Editor,
                    Focus::Editor => Focus::Explorer,
                };
            }
            _ => match self.focus {
                Focus::Explorer => self.handle_explorer_key(key),
                Focus::Editor => self.handle_editor_key(key),
            },
        }
    }

    fn handle_explorer_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Enter => {
                if let Some(id) = self.workspace.selected() {
                    if self.workspace.is_folder(id) {
                        self.workspace.toggle_expand(id);
                    }
                    self.workspace.select(id);
                }
            }
            KeyCode::Char('n') => self.workspace.create_file(),
            KeyCode::Char('f') => self.workspace.create_folder(),
            KeyCode::F(2) | KeyCode::Char('r') => {
                if let Some(id) = self.workspace.selected() {
                    let value = self.workspace.node_name(id).unwrap_or_default();
                    self.dialog = Dialog::Input {
                        kind: InputKind::Rename,
                        title: "rename".to_string(),
                        value,
                    };
                }
            }
            KeyCode::Delete | KeyCode::Char('d') => {
                if let Some(id) = self.workspace.selected() {
                    let name = self.workspace.node_name(id).unwrap_or_default();
                    self.dialog = Dialog::ConfirmDelete {
                        message: format!("delete {}?", name),
                    };
                }
            }
            KeyCode::Char('o') => {
                self.dialog = Dialog::Input {
                    kind: InputKind::ChangeRoot,
                    title: "open folder".to_string(),
                    value: self.workspace.root_path().display().to_string(),
                };
            }
            _ => {}
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        if !self.workspace.is_editable() {
            return;
        }
        let mut edited = true;
        match key.code {
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.editor.insert_char(ch)
            }
            KeyCode::Enter => self.editor.insert_newline(),
            KeyCode::Backspace => self.editor.backspace(),
            KeyCode::Left => {
                self.editor.move_left();
                edited = false;
            }
            KeyCode::Right => {
                self.editor.move_right();
                edited = false;
            }
            KeyCode::Up => {
                self.editor.move_up();
                edited = false;
            }
            KeyCode::Down => {
                self.editor.move_down();
                edited = false;
            }
            KeyCode::Home => {
                self.editor.move_home();
                edited = false;
            }
            KeyCode::End => {
                self.editor.move_end();
                edited = false;
            }
            _ => edited = false,
        }
        if edited {
            self.workspace.set_active_text(&self.editor.content());
        }
    }

    fn handle_dialog_key(&mut self, key: KeyEvent) {
        match std::mem::replace(&mut self.dialog, Dialog::None) {
            Dialog::Input { kind, title, mut value } => match key.code {
                KeyCode::Enter => self.commit_input(kind, value.trim()),
                KeyCode::Esc => {}
                KeyCode::Backspace => {
                    value.pop();
                    self.dialog = Dialog::Input { kind, title, value };
                }
                KeyCode::Char(ch) => {
                    value.push(ch);
                    self.dialog = Dialog::Input { kind, title, value };
                }
                _ => self.dialog = Dialog::Input { kind, title, value },
            },
            Dialog::ConfirmDelete { message } => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => self.workspace.delete_selected(),
                KeyCode::Char('n') | KeyCode::Esc => {}
                _ => self.dialog = Dialog::ConfirmDelete { message },
            },
            Dialog::ConfirmModeSwitch { target, prompt } => match key.code {
                KeyCode::Char('y') => {
                    self.workspace.apply_mode_switch(target, SwitchAnswer::Yes);
                }
                KeyCode::Char('n') => {
                    // meaningful for text -> markup only (escape as literal);
                    // a "no" on discard-formatting is a cancel
                    if prompt == SwitchPrompt::InterpretAsMarkup {
                        self.workspace.apply_mode_switch(target, SwitchAnswer::No);
                    }
                }
                KeyCode::Esc => {
                    self.workspace
                        .apply_mode_switch(target, SwitchAnswer::Cancel);
                }
                _ => self.dialog = Dialog::ConfirmModeSwitch { target, prompt },
            },
            Dialog::None => {}
        }
    }

    fn commit_input(&mut self, kind: InputKind, value: &str) {
        if value.is_empty() {
            return;
        }
        match kind {
            InputKind::Rename => {
                self.workspace.rename_selected(value);
            }
            InputKind::ChangeRoot => {
                let path = Path::new(value);
                if path.is_dir() {
                    self.workspace.change_root(path);
                } else {
                    *self.status.borrow_mut() = Some(format!("not a folder: {}", value));
                }
            }
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let rows = self.workspace.rows();
        if rows.is_empty() {
            return;
        }
        let current = self
            .workspace
            .selected()
            .and_then(|sel| rows.iter().position(|row| row.id == sel));
        let next = match current {
            Some(index) => index
                .saturating_add_signed(delta)
                .min(rows.len().saturating_sub(1)),
            None => 0,
        };
        self.workspace.select(rows[next].id);
    }
}
