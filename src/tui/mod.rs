//! TUI integration layer (crossterm + ratatui).
//!
//! Kept separate from `kernel`/`models` so the core stays usable without the
//! terminal crates.

pub mod app;
pub mod editor;
pub mod render;

pub use app::ShellApp;

use std::io;
use std::time::Duration;

use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::kernel::Workspace;

pub struct TerminalGuard;

impl TerminalGuard {
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            cursor::SetCursorStyle::BlinkingBar
        )?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            LeaveAlternateScreen,
            cursor::SetCursorStyle::DefaultUserShape
        );
    }
}

pub fn run(workspace: Workspace) -> io::Result<()> {
    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    let mut app = ShellApp::new(workspace);

    while !app.should_quit() {
        terminal.draw(|frame| render::draw(&mut app, frame))?;
        if crossterm::event::poll(Duration::from_millis(250))? {
            let event = crossterm::event::read()?;
            app.handle_event(event);
        }
    }

    app.finish();
    Ok(())
}
