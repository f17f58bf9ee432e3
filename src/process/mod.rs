// Process module - lifecycle of the single supervised trader process

pub mod handle;
pub mod supervisor;

pub use handle::{Liveness, ProcessHandle};
pub use supervisor::Supervisor;
