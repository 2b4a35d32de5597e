pub mod queue;
pub mod state;
