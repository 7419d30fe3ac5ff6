// Configuration module for LANPong
// Handles loading, editing and saving game configuration from a TOML file

pub mod loader;
pub mod settings;
pub mod types;

pub use loader::{get_config_path, load_config, save_config};
pub use settings::{SettingDescriptor, SettingKey};
pub use types::{Config, DisplayConfig, KeyBindings, NetworkConfig, PhysicsConfig, SessionParams};
