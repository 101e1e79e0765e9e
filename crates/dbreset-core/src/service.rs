//! Service manager collaborator
//!
//! Wraps the external start/stop launchers behind a trait so the
//! procedure can be exercised against a mock in tests. Service liveness
//! is an explicit queried capability rather than an ad-hoc file check at
//! call sites.

use crate::errors::{tool_error, Result};
use crate::layout::Layout;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Queried service liveness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    /// The liveness marker is present; the service may be running
    Running,
    /// The liveness marker is absent
    Stopped,
    /// The marker could not be probed
    Unknown,
}

/// Start/stop control over the external database service
pub trait ServiceManager {
    /// Probe whether the service appears to be running
    fn status(&self) -> ServiceStatus;

    /// Invoke the start launcher and wait for it to exit
    ///
    /// Returning `Ok` means the launcher ran, not that the service is
    /// ready to accept connections.
    fn start(&self) -> Result<()>;

    /// Invoke the stop launcher and wait for it to exit
    ///
    /// Stopping an already-stopped service is a no-op, not an error.
    fn stop(&self) -> Result<()>;
}

/// Production implementation shelling out to the bundled launchers
#[derive(Debug)]
pub struct LauncherServiceManager {
    start_launcher: PathBuf,
    stop_launcher: PathBuf,
    pid_file: PathBuf,
}

impl LauncherServiceManager {
    pub fn new(
        start_launcher: impl Into<PathBuf>,
        stop_launcher: impl Into<PathBuf>,
        pid_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            start_launcher: start_launcher.into(),
            stop_launcher: stop_launcher.into(),
            pid_file: pid_file.into(),
        }
    }

    pub fn from_layout(layout: &Layout) -> Self {
        Self::new(
            layout.start_launcher(),
            layout.stop_launcher(),
            layout.pid_file(),
        )
    }

    /// Run a zero-argument launcher with inherited stdio
    ///
    /// A spawn failure is an error; a non-zero exit is surfaced as a
    /// warning only, matching the launcher contract (its exit code is
    /// not a reliable success signal).
    fn invoke(launcher: &Path) -> Result<()> {
        let status = Command::new(launcher)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| {
                tool_error(
                    launcher.display().to_string(),
                    format!("failed to launch: {}", e),
                )
            })?;

        if !status.success() {
            tracing::warn!(
                launcher = %launcher.display(),
                code = status.code(),
                "launcher exited non-zero"
            );
        }

        Ok(())
    }
}

impl ServiceManager for LauncherServiceManager {
    fn status(&self) -> ServiceStatus {
        match self.pid_file.try_exists() {
            Ok(true) => ServiceStatus::Running,
            Ok(false) => ServiceStatus::Stopped,
            Err(_) => ServiceStatus::Unknown,
        }
    }

    fn start(&self) -> Result<()> {
        tracing::info!(launcher = %self.start_launcher.display(), "starting service");
        Self::invoke(&self.start_launcher)
    }

    fn stop(&self) -> Result<()> {
        tracing::info!(launcher = %self.stop_launcher.display(), "stopping service");
        Self::invoke(&self.stop_launcher)
    }
}
