//! Execution context: terminal environment and the per-run session

mod environment;
mod session;

pub use environment::Environment;
pub use session::Session;
