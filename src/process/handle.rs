use crate::error::{Result, TraderdError};
use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::path::Path;
use std::time::Duration;
use tokio::process::{Child, Command};

/// Non-blocking liveness of a child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Alive,
    /// Exit code, or None when the process was killed by a signal
    Exited(Option<i32>),
}

impl Liveness {
    pub fn is_alive(&self) -> bool {
        matches!(self, Liveness::Alive)
    }
}

/// Owned handle to the spawned trader process.
///
/// Exactly one handle exists per live child; it is never cloned or shared.
/// Dropping the handle does not kill the child - the trader outlives a
/// dashboard restart.
#[derive(Debug)]
pub struct ProcessHandle {
    child: Child,
    pid: u32,
}

impl ProcessHandle {
    /// Launch the trader command as a child process
    ///
    /// The child inherits the parent's environment and stdio; the trader
    /// writes its own log file. Does not block waiting for completion.
    ///
    /// # Returns
    /// * `Ok(ProcessHandle)` - Successfully spawned process
    /// * `Err(TraderdError::Spawn)` - OS refused to create the process
    pub fn spawn(command: &Path, args: &[String], cwd: Option<&Path>) -> Result<ProcessHandle> {
        let mut cmd = Command::new(command);

        if !args.is_empty() {
            cmd.args(args);
        }

        if let Some(cwd) = cwd {
            cmd.current_dir(cwd);
        }

        let child = cmd.spawn().map_err(|e| {
            TraderdError::Spawn(format!(
                "Failed to spawn '{}': {}",
                command.display(),
                e
            ))
        })?;

        let pid = child.id().ok_or_else(|| {
            TraderdError::Spawn(format!(
                "Failed to get PID for '{}'",
                command.display()
            ))
        })?;

        Ok(ProcessHandle { child, pid })
    }

    /// Process ID assigned by the OS
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Non-blocking liveness check via exit-status polling.
    ///
    /// A wait error leaves the exit unconfirmed, so the process is
    /// reported alive and the next poll re-checks.
    pub fn poll(&mut self) -> Liveness {
        match self.child.try_wait() {
            Ok(Some(status)) => Liveness::Exited(status.code()),
            Ok(None) => Liveness::Alive,
            Err(e) => {
                tracing::warn!("Failed to poll trader process (PID: {}): {}", self.pid, e);
                Liveness::Alive
            }
        }
    }

    /// Terminate the child: SIGTERM, wait up to `grace`, then SIGKILL.
    ///
    /// Returns once the process is confirmed dead or the forced kill has
    /// been issued. Consumes the handle - a terminated process cannot be
    /// polled again.
    pub async fn terminate(mut self, grace: Duration) -> Result<()> {
        let nix_pid = Pid::from_raw(self.pid as i32);

        tracing::info!(
            "Gracefully stopping trader process (PID: {}) with SIGTERM",
            self.pid
        );

        match signal::kill(nix_pid, Signal::SIGTERM) {
            Ok(()) => {}
            // Process already exited between poll and signal; just reap it
            Err(Errno::ESRCH) => {
                let _ = self.child.wait().await;
                return Ok(());
            }
            Err(e) => {
                return Err(TraderdError::Termination(format!(
                    "Failed to send SIGTERM: {}",
                    e
                )));
            }
        }

        match tokio::time::timeout(grace, self.child.wait()).await {
            Ok(Ok(status)) => {
                tracing::info!("Trader process exited gracefully with status: {:?}", status);
                return Ok(());
            }
            Ok(Err(e)) => {
                return Err(TraderdError::Termination(format!("Wait failed: {}", e)));
            }
            Err(_) => {
                tracing::warn!(
                    "Trader process did not exit within {:?}, sending SIGKILL",
                    grace
                );
                signal::kill(nix_pid, Signal::SIGKILL).map_err(|e| {
                    TraderdError::Termination(format!(
                        "Failed to send SIGKILL after timeout: {}",
                        e
                    ))
                })?;
            }
        }

        // Reap the killed child; SIGKILL cannot be ignored so this returns
        // promptly.
        let _ = self.child.wait().await;
        Ok(())
    }
}
