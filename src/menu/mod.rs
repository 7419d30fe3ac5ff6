// Menu module for LANPong
// Main menu, join dialog, settings screen and the waiting screens

pub mod input;
pub mod render;
pub mod state;

pub use input::{handle_menu_input, try_paste_from_clipboard, MenuAction};
pub use render::{render_connecting, render_menu, render_waiting_for_connection};
pub use state::{AppState, GameMode, MenuItem, MenuScreen, MenuState};
