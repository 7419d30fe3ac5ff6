// LANPong: two-player Pong over a LAN
// The host runs the physics and streams state; the guest mirrors it and
// reports its paddle, one exchange per tick.

pub mod config;
pub mod game;
pub mod game_modes;
pub mod logging;
pub mod menu;
pub mod network;
pub mod ui;
