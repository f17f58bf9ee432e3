use crate::config::Config;
use crate::error::Result;
use crate::process::handle::ProcessHandle;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::Mutex;

/// The single supervised job slot.
///
/// Invariant: at most one live child process exists under the slot.
#[derive(Debug, Default)]
struct JobSlot {
    handle: Option<ProcessHandle>,
}

/// Owns the trader process lifecycle and serializes concurrent control
/// requests.
///
/// One mutex covers the read-modify-write of the whole slot, and it is
/// held for the duration of the OS spawn/terminate calls - two concurrent
/// `start` calls can never both create a process. Liveness is always
/// re-derived from the OS, never cached: the child can exit at any time
/// without the supervisor being notified.
pub struct Supervisor {
    slot: Mutex<JobSlot>,
    command: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    grace: Duration,
}

impl Supervisor {
    pub fn new(config: &Config) -> Self {
        Self {
            slot: Mutex::new(JobSlot::default()),
            command: config.command.clone(),
            args: config.args.clone(),
            cwd: config.cwd.clone(),
            grace: config.stop_timeout(),
        }
    }

    /// Start the trader process.
    ///
    /// Returns `Ok(false)` when a live process already occupies the slot
    /// (a no-op, not an error). A handle whose process has already exited
    /// counts as stopped and is replaced.
    pub async fn start(&self) -> Result<bool> {
        let mut slot = self.slot.lock().await;

        if let Some(handle) = slot.handle.as_mut() {
            if handle.poll().is_alive() {
                return Ok(false);
            }
        }

        // Any handle left at this point has exited; drop it before
        // spawning anew so the slot never holds two children.
        slot.handle = None;

        let handle = ProcessHandle::spawn(&self.command, &self.args, self.cwd.as_deref())?;
        tracing::info!("Started trader process (PID: {})", handle.pid());
        slot.handle = Some(handle);

        Ok(true)
    }

    /// Stop the trader process.
    ///
    /// Returns `Ok(false)` when the slot is already stopped; termination
    /// is never invoked in that case. Otherwise escalates SIGTERM to
    /// SIGKILL after the grace period and returns `Ok(true)` regardless of
    /// which signal did the job. On a termination error the handle has
    /// already left the slot: the supervisor cannot keep a child it can no
    /// longer control.
    pub async fn stop(&self) -> Result<bool> {
        let mut slot = self.slot.lock().await;

        let Some(mut handle) = slot.handle.take() else {
            return Ok(false);
        };

        if !handle.poll().is_alive() {
            // Exited on its own; the slot was already logically stopped.
            return Ok(false);
        }

        handle.terminate(self.grace).await?;
        tracing::info!("Trader process stopped");

        Ok(true)
    }

    /// Whether the trader process is currently alive, per the OS.
    pub async fn is_running(&self) -> bool {
        let mut slot = self.slot.lock().await;

        let alive = match slot.handle.as_mut() {
            Some(handle) => handle.poll().is_alive(),
            None => false,
        };

        if !alive {
            // Reap-and-clear so a dead handle is not re-polled forever
            slot.handle = None;
        }

        alive
    }

    /// Termination grace period this supervisor was built with
    pub fn grace(&self) -> Duration {
        self.grace
    }
}
