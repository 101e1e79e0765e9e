//! dbreset Core - snapshot-based reset and re-import for a bundled MySQL stack
//!
//! This crate provides the building blocks for the reset procedure, including:
//! - The filesystem layout contract of the bundled stack
//! - An error taxonomy with stable codes
//! - Recursive copy / idempotent delete primitives
//! - Service-manager and dump/restore collaborators behind trait seams
//! - The ordered reset-and-reimport procedure itself

pub mod errors;
pub mod exclusions;
pub mod fsops;
pub mod layout;
pub mod logging;
pub mod procedure;
pub mod service;
pub mod sql;

// Re-export commonly used types
pub use errors::{ResetError, Result};
pub use exclusions::ExclusionSet;
pub use layout::Layout;
pub use procedure::{ResetProcedure, ResetReport, Step, StepError};
pub use service::{LauncherServiceManager, ServiceManager, ServiceStatus};
pub use sql::{MysqlTools, SqlTools};
