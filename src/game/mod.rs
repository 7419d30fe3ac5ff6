pub mod input;
pub mod physics;
pub mod state;

pub use input::{poll_input, LocalInput};
pub use physics::{update, PhysicsEvents};
pub use state::{GamePhase, GameState, Side};
