//! Error handling for dbreset
//!
//! Three-way taxonomy: environment preconditions, filesystem operations,
//! and invoked external executables.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using ResetError
pub type Result<T> = std::result::Result<T, ResetError>;

/// Canonical error type for the reset procedure
#[derive(Debug, Error)]
pub enum ResetError {
    /// A required launcher, tool, or directory is absent from the layout
    #[error("environment check failed: {reason} ({path})")]
    Environment { reason: String, path: PathBuf },

    /// A rename, copy, or delete on the data directories failed
    #[error("filesystem operation '{op}' failed on {path}: {source}")]
    Filesystem {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An invoked executable could not be launched or exited non-zero
    #[error("external tool '{tool}' failed: {detail}")]
    ExternalTool { tool: String, detail: String },
}

impl ResetError {
    /// Get the stable error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ResetError::Environment { .. } => "ERR_ENVIRONMENT",
            ResetError::Filesystem { .. } => "ERR_FILESYSTEM",
            ResetError::ExternalTool { .. } => "ERR_EXTERNAL_TOOL",
        }
    }
}

/// Create an environment precondition error
pub fn environment(reason: impl Into<String>, path: impl Into<PathBuf>) -> ResetError {
    ResetError::Environment {
        reason: reason.into(),
        path: path.into(),
    }
}

/// Create a filesystem error with operation and path context
pub fn fs_error(op: &'static str, path: &Path, source: std::io::Error) -> ResetError {
    ResetError::Filesystem {
        op,
        path: path.to_path_buf(),
        source,
    }
}

/// Create an external tool error
pub fn tool_error(tool: impl Into<String>, detail: impl Into<String>) -> ResetError {
    ResetError::ExternalTool {
        tool: tool.into(),
        detail: detail.into(),
    }
}
