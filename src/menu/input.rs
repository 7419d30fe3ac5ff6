// Menu input handling

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::time::Duration;

use tracing::{debug, warn};

use super::state::{GameMode, MenuItem, MenuScreen, MenuState};
use crate::config::Config;
use crate::game::input::matches_binding;

/// Menu action result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Continue in menu
    None,
    StartGame(GameMode),
    /// Settings screen closed; the edited config should be saved
    SaveSettings,
    Quit,
}

/// Wait briefly for a key and apply it to the menu
pub fn handle_menu_input(menu: &mut MenuState, config: &mut Config) -> io::Result<MenuAction> {
    if event::poll(Duration::from_millis(100))? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(handle_key_press(menu, config, key));
            }
        }
    }

    Ok(MenuAction::None)
}

pub fn handle_key_press(menu: &mut MenuState, config: &mut Config, key: KeyEvent) -> MenuAction {
    match menu.screen {
        MenuScreen::JoinDialog => handle_address_input(menu, key),
        MenuScreen::Settings => handle_settings_input(menu, config, key.code),
        MenuScreen::Main => handle_main_input(menu, config, key.code),
    }
}

fn handle_main_input(menu: &mut MenuState, config: &Config, code: KeyCode) -> MenuAction {
    let keys = &config.keybindings;
    if matches_binding(code, &keys.menu_up) || matches!(code, KeyCode::Char('k' | 'K')) {
        menu.select_previous();
        MenuAction::None
    } else if matches_binding(code, &keys.menu_down) || matches!(code, KeyCode::Char('j' | 'J')) {
        menu.select_next();
        MenuAction::None
    } else if matches_binding(code, &keys.menu_select) || code == KeyCode::Char(' ') {
        select_item(menu)
    } else if matches_binding(code, &keys.menu_back) || matches_binding(code, &keys.quit) {
        MenuAction::Quit
    } else {
        MenuAction::None
    }
}

fn select_item(menu: &mut MenuState) -> MenuAction {
    match menu.selected_item() {
        MenuItem::HostGame => MenuAction::StartGame(GameMode::Host),
        MenuItem::JoinGame => {
            menu.start_address_input();
            MenuAction::None
        }
        MenuItem::Settings => {
            menu.open_settings();
            MenuAction::None
        }
        MenuItem::Quit => MenuAction::Quit,
    }
}

fn handle_address_input(menu: &mut MenuState, key: KeyEvent) -> MenuAction {
    let paste = key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('v' | 'V'));
    if paste {
        match try_paste_from_clipboard() {
            Ok(text) => {
                menu.paste_address(&text);
            }
            Err(e) => menu.status = Some(e),
        }
        return MenuAction::None;
    }

    match key.code {
        KeyCode::Enter => match menu.submit_address() {
            Some(address) => MenuAction::StartGame(GameMode::Join(address)),
            None => MenuAction::None,
        },
        KeyCode::Esc => {
            menu.cancel_address_input();
            MenuAction::None
        }
        KeyCode::Backspace => {
            menu.backspace_address();
            MenuAction::None
        }
        KeyCode::Char(c) => {
            menu.add_char_to_address(c);
            MenuAction::None
        }
        _ => MenuAction::None,
    }
}

fn handle_settings_input(menu: &mut MenuState, config: &mut Config, code: KeyCode) -> MenuAction {
    let keys = &config.keybindings;
    if matches_binding(code, &keys.menu_up) || matches!(code, KeyCode::Char('k' | 'K')) {
        menu.select_previous_setting();
        return MenuAction::None;
    }
    if matches_binding(code, &keys.menu_down) || matches!(code, KeyCode::Char('j' | 'J')) {
        menu.select_next_setting();
        return MenuAction::None;
    }

    let steps = match code {
        KeyCode::Left | KeyCode::Char('-' | 'h') => -1,
        KeyCode::Right | KeyCode::Char('+' | '=' | 'l') => 1,
        KeyCode::Enter | KeyCode::Esc => {
            menu.close_settings();
            return MenuAction::SaveSettings;
        }
        _ => return MenuAction::None,
    };

    let key = menu.selected_setting();
    let value = config.adjust_setting(key, steps);
    debug!("{} set to {}", key.descriptor().label, value);
    MenuAction::None
}

/// Read text from the system clipboard; the error is already user-facing
pub fn try_paste_from_clipboard() -> Result<String, String> {
    let mut clipboard = arboard::Clipboard::new().map_err(|e| {
        warn!("clipboard unavailable: {}", e);
        format!("Clipboard unavailable: {}", e)
    })?;
    clipboard.get_text().map_err(|e| {
        warn!("paste failed: {}", e);
        format!("Paste failed: {}", e)
    })
}
