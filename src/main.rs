use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use znote::kernel::Workspace;
use znote::services::file::LocalFileProvider;
use znote::services::prefs;

fn main() -> io::Result<()> {
    let _logging = znote::logging::init();

    let prefs = prefs::load();

    let root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| prefs.working_folder.clone())
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    if !root.is_dir() {
        eprintln!("not a folder: {}", root.display());
        std::process::exit(2);
    }

    let provider = Rc::new(LocalFileProvider::new());
    let workspace = Workspace::open(&root, provider, prefs);

    znote::tui::run(workspace)
}
