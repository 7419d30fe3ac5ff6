pub mod common;
mod network;

pub use common::limit_frame_rate;
pub use network::{run_game_network_client, run_game_network_host};
