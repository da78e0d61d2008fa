//! znote - TUI memo editor library
//!
//! Module structure:
//! - core: event record + multicast bus
//! - models: data model (ExplorerTree, EditBuffer, ModeMachine)
//! - services: filesystem provider, preferences
//! - kernel: explorer ops, save coordinator, workspace wiring
//! - tui: terminal shell (feature `tui`)

pub mod core;
pub mod kernel;
pub mod logging;
pub mod models;
pub mod services;

#[cfg(feature = "tui")]
pub mod tui;
