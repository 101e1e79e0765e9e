//! Filesystem layout contract for the bundled stack
//!
//! Single source of truth for every path the procedure touches. All paths
//! are resolved from one base directory (normally the directory the stack
//! is installed in).

use std::path::{Path, PathBuf};

/// File name of the engine's system tablespace inside a data directory
pub const SYSTEM_TABLESPACE: &str = "ibdata1";

/// Executable suffix for the host platform
#[cfg(windows)]
const EXE_SUFFIX: &str = ".exe";
#[cfg(not(windows))]
const EXE_SUFFIX: &str = "";

/// Resolved path layout of a bundled stack installation
#[derive(Debug, Clone)]
pub struct Layout {
    base: PathBuf,
    dump_file: PathBuf,
}

impl Layout {
    /// Create a layout rooted at the given base directory
    ///
    /// The dump file defaults to `backup.sql` inside the base directory.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        let dump_file = base.join("backup.sql");
        Self { base, dump_file }
    }

    /// Override the dump file location
    pub fn with_dump_file(mut self, dump_file: impl Into<PathBuf>) -> Self {
        self.dump_file = dump_file.into();
        self
    }

    /// Base directory of the stack
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Service directory (`mysql/`)
    pub fn service_dir(&self) -> PathBuf {
        self.base.join("mysql")
    }

    /// Live data directory the service reads and writes
    pub fn data_dir(&self) -> PathBuf {
        self.service_dir().join("data")
    }

    /// Known-good snapshot directory shipped alongside the service
    pub fn snapshot_dir(&self) -> PathBuf {
        self.service_dir().join("backup")
    }

    /// Candidate data directory assembled before the swap
    pub fn staging_dir(&self) -> PathBuf {
        self.service_dir().join("data.staging")
    }

    /// Scratch name the previous live directory is renamed to
    pub fn old_data_dir(&self) -> PathBuf {
        self.service_dir().join("data.old")
    }

    /// Process-id liveness marker inside the live data directory
    pub fn pid_file(&self) -> PathBuf {
        self.data_dir().join("mysql.pid")
    }

    /// Service start launcher in the base directory
    pub fn start_launcher(&self) -> PathBuf {
        self.base.join(format!("xampp_start{}", EXE_SUFFIX))
    }

    /// Service stop launcher in the base directory
    pub fn stop_launcher(&self) -> PathBuf {
        self.base.join(format!("xampp_stop{}", EXE_SUFFIX))
    }

    /// Dump utility bundled with the service
    pub fn mysqldump_bin(&self) -> PathBuf {
        self.service_dir()
            .join("bin")
            .join(format!("mysqldump{}", EXE_SUFFIX))
    }

    /// Client utility bundled with the service
    pub fn mysql_bin(&self) -> PathBuf {
        self.service_dir()
            .join("bin")
            .join(format!("mysql{}", EXE_SUFFIX))
    }

    /// SQL dump file written by export and consumed by import
    pub fn dump_file(&self) -> &Path {
        &self.dump_file
    }
}
