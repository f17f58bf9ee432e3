// Telemetry readers - read-only views over the files the trader writes.
// No shared mutable state with the supervisor; reads take no lock.

pub mod history;
pub mod log_tail;

pub use history::{read_recent, ChartData};
pub use log_tail::tail_bytes;
