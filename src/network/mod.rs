pub mod broadcast;
pub mod server;
pub mod state;

pub use state::{NodeState, SharedState};
