//! The reset-and-reimport procedure
//!
//! Ordered step sequence over the filesystem and the two injected
//! collaborators. Steps run exactly once, in order, with no retries and
//! no checkpointing; a fatal error aborts the run at the failing step.
//!
//! The candidate data directory is assembled in a staging location and
//! only swapped into the live location once every copy and merge step
//! has succeeded, so an aborted run never leaves the live directory
//! half-migrated.

use crate::errors::{environment, ResetError, Result};
use crate::exclusions::ExclusionSet;
use crate::fsops;
use crate::layout::{Layout, SYSTEM_TABLESPACE};
use crate::service::{ServiceManager, ServiceStatus};
use crate::sql::SqlTools;
use std::fmt;
use thiserror::Error;

/// One transition of the procedure, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Verify launchers and directories before touching any data
    Preflight,
    /// Stop the service if the liveness marker says it may be running
    StopService,
    /// Copy the snapshot into the staging directory
    StageSnapshot,
    /// Carry non-excluded schemas forward from the live directory
    MergeDatabases,
    /// Carry the system tablespace forward if the live directory has one
    RestoreTablespace,
    /// Publish the staged candidate as the live data directory
    SwapDataDir,
    /// Start the service for the export
    StartService,
    /// Export all objects except the excluded schemas
    ExportDump,
    /// Stop the service after the export
    StopAfterExport,
    /// Delete the old-data scratch directory (non-fatal)
    Cleanup,
    /// Start the service for the import
    StartForImport,
    /// Re-import the dump through the client utility
    ImportDump,
    /// Final best-effort stop (non-fatal)
    FinalStop,
}

impl Step {
    fn name(self) -> &'static str {
        match self {
            Step::Preflight => "preflight",
            Step::StopService => "stop-service",
            Step::StageSnapshot => "stage-snapshot",
            Step::MergeDatabases => "merge-databases",
            Step::RestoreTablespace => "restore-tablespace",
            Step::SwapDataDir => "swap-data-dir",
            Step::StartService => "start-service",
            Step::ExportDump => "export-dump",
            Step::StopAfterExport => "stop-after-export",
            Step::Cleanup => "cleanup",
            Step::StartForImport => "start-for-import",
            Step::ImportDump => "import-dump",
            Step::FinalStop => "final-stop",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fatal failure, carrying the step it occurred in
#[derive(Debug, Error)]
#[error("step '{step}' failed: {source}")]
pub struct StepError {
    pub step: Step,
    #[source]
    pub source: ResetError,
}

/// Outcome of a completed run
#[derive(Debug, Default)]
pub struct ResetReport {
    /// Steps that completed, in execution order
    pub completed: Vec<Step>,
    /// Non-fatal problems the operator should know about
    pub warnings: Vec<String>,
}

/// The reset-and-reimport procedure over injected collaborators
pub struct ResetProcedure<'a> {
    layout: &'a Layout,
    exclusions: &'a ExclusionSet,
    service: &'a dyn ServiceManager,
    sql: &'a dyn SqlTools,
}

impl<'a> ResetProcedure<'a> {
    pub fn new(
        layout: &'a Layout,
        exclusions: &'a ExclusionSet,
        service: &'a dyn ServiceManager,
        sql: &'a dyn SqlTools,
    ) -> Self {
        Self {
            layout,
            exclusions,
            service,
            sql,
        }
    }

    /// Run the full sequence to completion or first fatal failure
    pub fn run(&self) -> std::result::Result<ResetReport, StepError> {
        let mut report = ResetReport::default();

        self.fatal(&mut report, Step::Preflight, || self.preflight())?;
        self.fatal(&mut report, Step::StopService, || self.stop_if_running())?;
        self.fatal(&mut report, Step::StageSnapshot, || self.stage_snapshot())?;
        self.fatal(&mut report, Step::MergeDatabases, || self.merge_databases())?;
        self.fatal(&mut report, Step::RestoreTablespace, || {
            self.restore_tablespace()
        })?;
        self.fatal(&mut report, Step::SwapDataDir, || self.swap_data_dir())?;
        self.fatal(&mut report, Step::StartService, || self.service.start())?;
        self.fatal(&mut report, Step::ExportDump, || {
            self.sql.dump(self.exclusions, self.layout.dump_file())
        })?;
        self.fatal(&mut report, Step::StopAfterExport, || self.service.stop())?;
        self.non_fatal(&mut report, Step::Cleanup, || {
            fsops::remove_dir_idempotent(&self.layout.old_data_dir())
        });
        self.fatal(&mut report, Step::StartForImport, || self.service.start())?;
        self.fatal(&mut report, Step::ImportDump, || {
            self.sql.restore(self.layout.dump_file())
        })?;
        self.non_fatal(&mut report, Step::FinalStop, || self.service.stop());

        tracing::info!(steps = report.completed.len(), "reset completed");
        Ok(report)
    }

    fn fatal<F>(
        &self,
        report: &mut ResetReport,
        step: Step,
        op: F,
    ) -> std::result::Result<(), StepError>
    where
        F: FnOnce() -> Result<()>,
    {
        tracing::info!(step = %step, "running step");
        op().map_err(|source| StepError { step, source })?;
        report.completed.push(step);
        Ok(())
    }

    fn non_fatal<F>(&self, report: &mut ResetReport, step: Step, op: F)
    where
        F: FnOnce() -> Result<()>,
    {
        tracing::info!(step = %step, "running step");
        match op() {
            Ok(()) => report.completed.push(step),
            Err(e) => {
                tracing::warn!(step = %step, error = %e, "non-fatal step failed");
                report
                    .warnings
                    .push(format!("step '{}' failed: {}", step, e));
            }
        }
    }

    /// Verify the layout before touching any data
    fn preflight(&self) -> Result<()> {
        let start_launcher = self.layout.start_launcher();
        if !start_launcher.exists() {
            return Err(environment(
                "service start launcher not found; run this tool from the stack directory",
                start_launcher,
            ));
        }

        let data_dir = self.layout.data_dir();
        if !data_dir.is_dir() {
            return Err(environment("live data directory not found", data_dir));
        }

        let snapshot_dir = self.layout.snapshot_dir();
        if !snapshot_dir.is_dir() {
            return Err(environment("snapshot directory not found", snapshot_dir));
        }

        Ok(())
    }

    /// Stop the service unless the liveness marker says it is stopped
    fn stop_if_running(&self) -> Result<()> {
        match self.service.status() {
            ServiceStatus::Running => self.service.stop(),
            ServiceStatus::Stopped => {
                tracing::debug!("service not running, skipping stop");
                Ok(())
            }
            ServiceStatus::Unknown => {
                // Marker probe failed; stopping a stopped service is a no-op
                tracing::warn!("service status unknown, attempting stop");
                self.service.stop()
            }
        }
    }

    /// Copy the snapshot into a fresh staging directory
    fn stage_snapshot(&self) -> Result<()> {
        let staging = self.layout.staging_dir();
        fsops::remove_dir_idempotent(&staging)?;
        tracing::info!(
            from = %self.layout.snapshot_dir().display(),
            to = %staging.display(),
            "staging snapshot"
        );
        fsops::copy_dir_recursive(&self.layout.snapshot_dir(), &staging)
    }

    /// Copy every non-excluded schema directory from the live data
    /// directory into staging, overwriting snapshot-provided entries
    fn merge_databases(&self) -> Result<()> {
        let staging = self.layout.staging_dir();

        for schema_dir in fsops::list_subdirectories(&self.layout.data_dir())? {
            let name = match schema_dir.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };

            if self.exclusions.contains(&name) {
                tracing::debug!(schema = %name, "excluded, not carried forward");
                continue;
            }

            tracing::info!(schema = %name, "carrying schema forward");
            fsops::copy_dir_recursive(&schema_dir, &staging.join(&name))?;
        }

        Ok(())
    }

    /// Copy the system tablespace into staging if the live directory has
    /// one; absence is not an error
    fn restore_tablespace(&self) -> Result<()> {
        let src = self.layout.data_dir().join(SYSTEM_TABLESPACE);
        if !src.exists() {
            tracing::debug!(file = SYSTEM_TABLESPACE, "tablespace absent, skipping");
            return Ok(());
        }

        tracing::info!(file = SYSTEM_TABLESPACE, "restoring system tablespace");
        let dst = self.layout.staging_dir().join(SYSTEM_TABLESPACE);
        fsops::copy_file_overwrite(&src, &dst)?;
        Ok(())
    }

    /// Rename live aside and publish the staged candidate in its place
    fn swap_data_dir(&self) -> Result<()> {
        let data_dir = self.layout.data_dir();
        let old_dir = self.layout.old_data_dir();

        if old_dir.exists() {
            return Err(ResetError::Filesystem {
                op: "rename",
                path: old_dir,
                source: std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "old-data directory left over from a previous run; remove it and retry",
                ),
            });
        }

        tracing::info!(
            live = %data_dir.display(),
            old = %old_dir.display(),
            "swapping staged data directory into place"
        );
        fsops::rename(&data_dir, &old_dir)?;
        fsops::rename(&self.layout.staging_dir(), &data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_names_are_distinct() {
        let steps = [
            Step::Preflight,
            Step::StopService,
            Step::StageSnapshot,
            Step::MergeDatabases,
            Step::RestoreTablespace,
            Step::SwapDataDir,
            Step::StartService,
            Step::ExportDump,
            Step::StopAfterExport,
            Step::Cleanup,
            Step::StartForImport,
            Step::ImportDump,
            Step::FinalStop,
        ];
        let mut names: Vec<&str> = steps.iter().map(|s| s.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), steps.len());
    }

    #[test]
    fn test_step_error_display_carries_step() {
        let err = StepError {
            step: Step::SwapDataDir,
            source: environment("x", "/y"),
        };
        assert!(err.to_string().contains("swap-data-dir"));
    }
}
