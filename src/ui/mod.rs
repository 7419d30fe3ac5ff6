pub mod overlay;
pub mod render;
pub mod shell;

pub use overlay::{phase_overlay, render_overlay, OverlayMessage, OverlayStyle};
pub use render::render;
pub use shell::TerminalShell;
