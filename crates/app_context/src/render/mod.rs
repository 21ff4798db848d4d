//! Window and renderer acquisition
//!
//! Two separate steps so each handle reaches the ledger on its own: a renderer
//! failure after a successful window creation still leaves the window to be
//! destroyed by teardown.

pub mod renderer;
pub mod window;

pub use renderer::create_renderer;
pub use window::{create_window, resolve_rect};
