// Library exports for the traderd control plane

pub mod config;
pub mod error;
pub mod keys;
pub mod process;
pub mod server;
pub mod telemetry;
