// Configuration file loading, creation and saving

use super::types::Config;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Get the path to the configuration file
pub fn get_config_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("lanpong");

    // Create config directory if it doesn't exist
    fs::create_dir_all(&path).ok();

    path.push("config.toml");
    path
}

/// Load configuration from file, or create default if it doesn't exist
pub fn load_config() -> Result<Config, io::Error> {
    load_config_from(&get_config_path())
}

pub fn load_config_from(path: &Path) -> Result<Config, io::Error> {
    if path.exists() {
        let contents = fs::read_to_string(path)?;
        Ok(parse_config(&contents))
    } else {
        create_default_config(path)?;
        Ok(Config::default())
    }
}

/// Parse config text, falling back to defaults when the file is broken
pub fn parse_config(contents: &str) -> Config {
    match toml::from_str::<Config>(contents) {
        Ok(mut config) => {
            config.snap_ball_speed();
            config
        }
        Err(e) => {
            warn!("failed to parse config file, using defaults: {}", e);
            Config::default()
        }
    }
}

/// Create a default configuration file with helpful comments
pub fn create_default_config(path: &Path) -> Result<(), io::Error> {
    save_config(path, &Config::default())?;
    info!("created default config file at {}", path.display());
    Ok(())
}

/// Write the config back to disk (settings screen)
pub fn save_config(path: &Path, config: &Config) -> Result<(), io::Error> {
    let toml_string = toml::to_string_pretty(config).map_err(io::Error::other)?;

    let commented_toml = format!(
        "# LANPong Configuration File\n\
         # The hosting player's paddle speed and screen size are sent to the\n\
         # joining player, so only the host's values matter during a match.\n\
         #\n\
         # Key binding format: \"Up\", \"Down\", \"Enter\", \"Esc\", \"Space\"\n\
         #                     or single characters like \"W\", \"S\", \"Q\"\n\n\
         {}",
        toml_string
    );

    fs::write(path, commented_toml)
}
