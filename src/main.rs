use anyhow::{bail, Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{error, info, warn};

use lanpong::config::{self, Config};
use lanpong::game_modes::{run_game_network_client, run_game_network_host};
use lanpong::logging;
use lanpong::menu::{self, AppState, GameMode, MenuAction, MenuState};

/// What the command line asked for
#[derive(Debug, PartialEq, Eq)]
struct CliArgs {
    debug: bool,
    /// Skip the menu and go straight into a game
    mode: Option<GameMode>,
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("lanpong");
    let cli = match parse_args(args.get(1..).unwrap_or(&[])) {
        Ok(Some(cli)) => cli,
        Ok(None) => {
            print_usage(program);
            return Ok(());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage(program);
            std::process::exit(1);
        }
    };

    let log_path = logging::init(cli.debug).context("failed to open log file")?;
    info!("LANPong starting, logging to {}", log_path.display());

    let config = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            warn!("failed to load config, using defaults: {}", e);
            Config::default()
        }
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, config, cli.mode);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        error!("exiting with error: {:#}", e);
    }
    result
}

/// Hand-rolled flag parsing. `Ok(None)` means help was requested.
fn parse_args(args: &[String]) -> Result<Option<CliArgs>> {
    let mut cli = CliArgs {
        debug: false,
        mode: None,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--debug" | "-d" => cli.debug = true,
            "--host" | "--listen" | "-l" => set_mode(&mut cli, GameMode::Host)?,
            "--connect" | "-c" => {
                let address = match iter.next() {
                    Some(address) if !address.starts_with('-') => address.clone(),
                    _ => bail!("--connect requires the host's IP address"),
                };
                set_mode(&mut cli, GameMode::Join(address))?;
            }
            "--help" | "-h" => return Ok(None),
            other => bail!("unknown argument: {}", other),
        }
    }

    Ok(Some(cli))
}

fn set_mode(cli: &mut CliArgs, mode: GameMode) -> Result<()> {
    if cli.mode.is_some() {
        bail!("--host and --connect are mutually exclusive");
    }
    cli.mode = Some(mode);
    Ok(())
}

fn print_usage(program: &str) {
    println!("LANPong - two-player terminal Pong over a local network");
    println!();
    println!("Usage:");
    println!("  {}                      # Open the menu", program);
    println!("  {} --host               # Host a game and wait for a player", program);
    println!("  {} --connect <ip>       # Join the game hosted at <ip>", program);
    println!();
    println!("Options:");
    println!("  --debug                 Log at DEBUG level");
    println!("  --help                  Show this message");
    println!();
    println!("Config: {}", config::get_config_path().display());
    println!("Log:    {}", logging::log_file_path().display());
}

/// Menu loop. A game chosen on the command line runs once, then exits.
fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut config: Config,
    direct: Option<GameMode>,
) -> Result<()> {
    let exit_after_game = direct.is_some();
    let mut app_state = match direct {
        Some(mode) => AppState::Game(mode),
        None => AppState::Menu,
    };
    let mut menu_state = MenuState::new();

    loop {
        app_state = match app_state {
            AppState::Menu => {
                terminal.draw(|f| menu::render_menu(f, &menu_state, &config))?;
                match menu::handle_menu_input(&mut menu_state, &mut config)? {
                    MenuAction::None => AppState::Menu,
                    MenuAction::StartGame(mode) => AppState::Game(mode),
                    MenuAction::SaveSettings => {
                        let path = config::get_config_path();
                        if let Err(e) = config::save_config(&path, &config) {
                            warn!("failed to save settings: {}", e);
                            menu_state.status = Some(format!("Could not save settings: {}", e));
                        } else {
                            info!("settings saved to {}", path.display());
                        }
                        AppState::Menu
                    }
                    MenuAction::Quit => AppState::Exiting,
                }
            }
            AppState::Game(mode) => {
                match &mode {
                    GameMode::Host => run_game_network_host(terminal, &config)?,
                    GameMode::Join(address) => run_game_network_client(terminal, &config, address)?,
                }
                if exit_after_game {
                    AppState::Exiting
                } else {
                    AppState::Menu
                }
            }
            AppState::Exiting => break,
        };
    }

    info!("LANPong exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_arguments_opens_menu() {
        let cli = parse_args(&[]).unwrap().unwrap();
        assert_eq!(cli.mode, None);
        assert!(!cli.debug);
    }

    #[test]
    fn test_host_and_connect() {
        let cli = parse_args(&args(&["--host", "--debug"])).unwrap().unwrap();
        assert_eq!(cli.mode, Some(GameMode::Host));
        assert!(cli.debug);

        let cli = parse_args(&args(&["--connect", "192.168.1.20"])).unwrap().unwrap();
        assert_eq!(cli.mode, Some(GameMode::Join("192.168.1.20".to_string())));
    }

    #[test]
    fn test_bad_arguments() {
        assert!(parse_args(&args(&["--connect"])).is_err());
        assert!(parse_args(&args(&["--connect", "--debug"])).is_err());
        assert!(parse_args(&args(&["--host", "--connect", "10.0.0.1"])).is_err());
        assert!(parse_args(&args(&["--wat"])).is_err());
    }

    #[test]
    fn test_help() {
        assert!(parse_args(&args(&["--help"])).unwrap().is_none());
    }
}
