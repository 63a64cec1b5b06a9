pub mod state;
pub mod turns;
pub mod zones;

pub use state::GameState;
pub use turns::{advance, Decked, StopCondition, TurnOutcome};
pub use zones::{Hand, Library, LibraryError};
