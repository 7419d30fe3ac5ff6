// Menu state and the screens reachable from it

use crate::config::SettingKey;

/// What the app is doing between frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    Menu,
    Game(GameMode),
    Exiting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameMode {
    /// Listen on the configured port and wait for a guest
    Host,
    /// Connect to the host at this address
    Join(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    HostGame,
    JoinGame,
    Settings,
    Quit,
}

impl MenuItem {
    pub fn display_text(&self) -> &str {
        match self {
            MenuItem::HostGame => "Host Game",
            MenuItem::JoinGame => "Join Game",
            MenuItem::Settings => "Settings",
            MenuItem::Quit => "Quit",
        }
    }

    pub fn all() -> Vec<MenuItem> {
        vec![
            MenuItem::HostGame,
            MenuItem::JoinGame,
            MenuItem::Settings,
            MenuItem::Quit,
        ]
    }
}

/// Which part of the menu has the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuScreen {
    Main,
    JoinDialog,
    Settings,
}

pub struct MenuState {
    pub selected_index: usize,
    pub items: Vec<MenuItem>,
    pub screen: MenuScreen,
    /// Host address typed or pasted in the join dialog
    pub address_input: String,
    pub setting_index: usize,
    /// Shown under the menu, e.g. the last error or a clipboard failure
    pub status: Option<String>,
}

impl MenuState {
    pub fn new() -> Self {
        Self {
            selected_index: 0,
            items: MenuItem::all(),
            screen: MenuScreen::Main,
            address_input: String::new(),
            setting_index: 0,
            status: None,
        }
    }

    pub fn selected_item(&self) -> MenuItem {
        self.items[self.selected_index]
    }

    pub fn select_previous(&mut self) {
        self.selected_index = wrap_previous(self.selected_index, self.items.len());
    }

    pub fn select_next(&mut self) {
        self.selected_index = wrap_next(self.selected_index, self.items.len());
    }

    pub fn start_address_input(&mut self) {
        self.screen = MenuScreen::JoinDialog;
        self.address_input.clear();
        self.status = None;
    }

    pub fn cancel_address_input(&mut self) {
        self.screen = MenuScreen::Main;
        self.address_input.clear();
    }

    /// Leave the dialog with the trimmed address, or `None` if it is empty
    pub fn submit_address(&mut self) -> Option<String> {
        let address = self.address_input.trim().to_string();
        if address.is_empty() {
            return None;
        }
        self.screen = MenuScreen::Main;
        Some(address)
    }

    /// Hostnames, IPv4 and IPv6 literals only
    pub fn add_char_to_address(&mut self, c: char) -> bool {
        if is_address_char(c) {
            self.address_input.push(c);
            true
        } else {
            false
        }
    }

    pub fn backspace_address(&mut self) {
        self.address_input.pop();
    }

    /// Append pasted text, dropping whitespace and anything else that cannot
    /// be part of an address. Returns how many characters were kept.
    pub fn paste_address(&mut self, text: &str) -> usize {
        let before = self.address_input.len();
        self.address_input
            .extend(text.chars().filter(|c| is_address_char(*c)));
        self.address_input.len() - before
    }

    pub fn open_settings(&mut self) {
        self.screen = MenuScreen::Settings;
        self.setting_index = 0;
        self.status = None;
    }

    pub fn close_settings(&mut self) {
        self.screen = MenuScreen::Main;
    }

    pub fn selected_setting(&self) -> SettingKey {
        SettingKey::all()[self.setting_index]
    }

    pub fn select_previous_setting(&mut self) {
        self.setting_index = wrap_previous(self.setting_index, SettingKey::all().len());
    }

    pub fn select_next_setting(&mut self) {
        self.setting_index = wrap_next(self.setting_index, SettingKey::all().len());
    }
}

impl Default for MenuState {
    fn default() -> Self {
        Self::new()
    }
}

fn is_address_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':')
}

fn wrap_previous(index: usize, len: usize) -> usize {
    if index > 0 {
        index - 1
    } else {
        len - 1
    }
}

fn wrap_next(index: usize, len: usize) -> usize {
    if index + 1 < len {
        index + 1
    } else {
        0
    }
}
